use crate::shared::usecase::UseCase;
use pillbox_domain::NotificationId;
use pillbox_infra::Context;
use tracing::warn;

/// Stops a recurring notification for good: the schedule entry and the
/// last-armed record go first, so a crash mid-way leaves at worst one
/// stray delivery that no longer re-arms anything.
#[derive(Debug)]
pub struct CancelNotificationUseCase {
    pub notification_id: NotificationId,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    StorageError,
    /// The store is already clean, only the pending request survived
    NotifierError,
}

#[async_trait::async_trait]
impl UseCase for CancelNotificationUseCase {
    type Response = ();
    type Error = UseCaseError;

    const NAME: &'static str = "CancelNotification";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        let lock = ctx.arm_locks.get(self.notification_id);
        let _guard = lock.lock().await;

        ctx.repos
            .schedule
            .delete(self.notification_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        if let Err(e) = ctx.notifier.cancel(&[self.notification_id]).await {
            warn!(
                "Cancelling pending request for {} failed: {:?}",
                self.notification_id, e
            );
            return Err(UseCaseError::NotifierError);
        }
        Ok(())
    }
}
