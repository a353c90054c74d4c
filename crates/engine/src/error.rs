use crate::notifications::{cancel_notification, schedule_recurring};
use crate::reminders::{add_reminder, remove_reminder, update_reminder};
use pillbox_domain::NotificationId;
use thiserror::Error;

/// Engine-level error surfaced to callers of the reminder operations,
/// flattened from the per-usecase error enums.
#[derive(Debug, Error, PartialEq)]
pub enum PillboxError {
    #[error("Notification permission was denied")]
    PermissionDenied,
    #[error("The notification channel could not be provisioned")]
    ChannelUnavailable,
    #[error("The notification submission failed, a later sweep will retry it")]
    SubmissionFailed,
    #[error("Reminder {0} was not found")]
    NotFound(NotificationId),
    #[error("A storage operation failed")]
    Storage,
    #[error("The platform notifier rejected the request")]
    Notifier,
}

impl From<schedule_recurring::UseCaseError> for PillboxError {
    fn from(e: schedule_recurring::UseCaseError) -> Self {
        match e {
            schedule_recurring::UseCaseError::PermissionDenied => Self::PermissionDenied,
            schedule_recurring::UseCaseError::ChannelUnavailable => Self::ChannelUnavailable,
            schedule_recurring::UseCaseError::SubmissionFailed => Self::SubmissionFailed,
            schedule_recurring::UseCaseError::StorageError => Self::Storage,
        }
    }
}

impl From<cancel_notification::UseCaseError> for PillboxError {
    fn from(e: cancel_notification::UseCaseError) -> Self {
        match e {
            cancel_notification::UseCaseError::StorageError => Self::Storage,
            cancel_notification::UseCaseError::NotifierError => Self::Notifier,
        }
    }
}

impl From<add_reminder::UseCaseError> for PillboxError {
    fn from(e: add_reminder::UseCaseError) -> Self {
        match e {
            add_reminder::UseCaseError::StorageError => Self::Storage,
            add_reminder::UseCaseError::Scheduling(e) => e.into(),
        }
    }
}

impl From<update_reminder::UseCaseError> for PillboxError {
    fn from(e: update_reminder::UseCaseError) -> Self {
        match e {
            update_reminder::UseCaseError::NotFound(id) => Self::NotFound(id),
            update_reminder::UseCaseError::StorageError => Self::Storage,
            update_reminder::UseCaseError::Scheduling(e) => e.into(),
        }
    }
}

impl From<remove_reminder::UseCaseError> for PillboxError {
    fn from(e: remove_reminder::UseCaseError) -> Self {
        match e {
            remove_reminder::UseCaseError::NotFound(id) => Self::NotFound(id),
            remove_reminder::UseCaseError::StorageError => Self::Storage,
            remove_reminder::UseCaseError::Cancellation(e) => e.into(),
        }
    }
}
