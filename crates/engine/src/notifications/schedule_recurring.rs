use crate::shared::usecase::UseCase;
use chrono::NaiveDateTime;
use pillbox_domain::{ArmedRequest, ChannelConfig, NotificationId, Recurrence, ScheduleEntry};
use pillbox_infra::{Context, PermissionStatus};
use tracing::warn;

/// Arms the next occurrence of a recurring notification: makes sure the
/// channel and permission exist, computes the next fire instant from the
/// descriptor, persists the schedule entry and submits exactly one
/// single-shot request to the notifier.
#[derive(Debug)]
pub struct ScheduleRecurringNotificationUseCase {
    pub notification_id: NotificationId,
    pub title: String,
    pub body: String,
    pub recurrence: Recurrence,
}

#[derive(Debug, Clone)]
pub struct ArmedNotification {
    pub entry: ScheduleEntry,
    pub fire_at: NaiveDateTime,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    /// Surfaced to the caller, never retried automatically
    PermissionDenied,
    /// The full channel and the minimal fallback both failed to provision
    ChannelUnavailable,
    /// The entry was persisted but the submission failed. The next
    /// reconciliation sweep retries it, so callers may treat this as soft.
    SubmissionFailed,
    StorageError,
}

#[async_trait::async_trait]
impl UseCase for ScheduleRecurringNotificationUseCase {
    type Response = ArmedNotification;
    type Error = UseCaseError;

    const NAME: &'static str = "ScheduleRecurringNotification";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        ensure_channel(ctx).await?;
        ensure_permission(ctx).await?;

        // Overlapping re-arms for the same id must not interleave, a stale
        // fire instant could otherwise overwrite a fresher one
        let lock = ctx.arm_locks.get(self.notification_id);
        let _guard = lock.lock().await;

        let now = ctx.sys.now();
        let fire_at = self.recurrence.next_occurrence(now);

        let mut entry = ScheduleEntry::new(
            self.notification_id,
            self.title.clone(),
            self.body.clone(),
            self.recurrence,
        );
        // Persist before submitting: a crash between the two is repaired by
        // the reconciliation sweep, a crash before this line promised
        // nothing
        ctx.repos
            .schedule
            .save(&entry)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        let request = ArmedRequest {
            id: self.notification_id,
            title: self.title.clone(),
            body: self.body.clone(),
            fire_at,
            channel_id: ctx.config.channel.id.clone(),
            extra: None,
        };
        if let Err(e) = ctx.notifier.schedule_once(&request).await {
            warn!(
                "Submitting notification {} failed, the sweep will retry: {:?}",
                self.notification_id, e
            );
            return Err(UseCaseError::SubmissionFailed);
        }

        match ctx
            .repos
            .schedule
            .set_last_armed(self.notification_id, now)
            .await
        {
            Ok(()) => entry.last_armed_at = Some(now),
            // The request is live; a stale last-armed record only costs one
            // redundant re-arm in a later sweep
            Err(e) => warn!(
                "Recording last-armed instant for {} failed: {:?}",
                self.notification_id, e
            ),
        }

        Ok(ArmedNotification { entry, fire_at })
    }
}

async fn ensure_channel(ctx: &Context) -> Result<(), UseCaseError> {
    let wanted = &ctx.config.channel;
    if let Ok(channels) = ctx.notifier.list_channels().await {
        if channels.iter().any(|channel| channel.id == wanted.id) {
            return Ok(());
        }
    }
    if ctx.notifier.create_channel(wanted).await.is_ok() {
        return Ok(());
    }
    // Creating the fully configured channel failed, retry once with a
    // minimal one
    let fallback = ChannelConfig::minimal(&wanted.id);
    ctx.notifier
        .create_channel(&fallback)
        .await
        .map_err(|_| UseCaseError::ChannelUnavailable)
}

async fn ensure_permission(ctx: &Context) -> Result<(), UseCaseError> {
    if ctx.notifier.check_permission().await.is_granted() {
        return Ok(());
    }
    match ctx.notifier.request_permission().await {
        PermissionStatus::Granted => Ok(()),
        PermissionStatus::Denied => Err(UseCaseError::PermissionDenied),
    }
}
