pub mod add_reminder;
pub mod get_reminders;
pub mod remove_reminder;
pub mod update_reminder;
