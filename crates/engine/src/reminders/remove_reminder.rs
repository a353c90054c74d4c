use crate::notifications::cancel_notification::{self, CancelNotificationUseCase};
use crate::shared::usecase::{execute, UseCase};
use pillbox_domain::NotificationId;
use pillbox_infra::Context;

/// Soft-deletes a reminder and tears down its schedule entry and pending
/// request. The record itself stays in storage for history.
#[derive(Debug)]
pub struct RemoveReminderUseCase {
    pub reminder_id: NotificationId,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(NotificationId),
    StorageError,
    Cancellation(cancel_notification::UseCaseError),
}

#[async_trait::async_trait]
impl UseCase for RemoveReminderUseCase {
    type Response = ();
    type Error = UseCaseError;

    const NAME: &'static str = "RemoveReminder";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .reminders
            .find(self.reminder_id)
            .await
            .ok_or(UseCaseError::NotFound(self.reminder_id))?;

        ctx.repos
            .reminders
            .soft_delete(self.reminder_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        execute(
            CancelNotificationUseCase {
                notification_id: self.reminder_id,
            },
            ctx,
        )
        .await
        .map_err(UseCaseError::Cancellation)
    }
}
