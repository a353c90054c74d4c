pub mod cancel_notification;
pub mod reconcile_pending;
pub mod reschedule_from_storage;
pub mod schedule_recurring;
