use super::schedule_recurring::{self, ArmedNotification, ScheduleRecurringNotificationUseCase};
use crate::shared::usecase::{execute, UseCase};
use pillbox_domain::NotificationId;
use pillbox_infra::Context;
use tracing::debug;

/// Re-arms a notification from its stored descriptor. The recurrence is
/// read back from the schedule store, never from UI state, so a delivery
/// long after the app last ran still arms the right cadence. A missing
/// entry means there is nothing to re-arm and the trigger is dropped
/// silently.
#[derive(Debug)]
pub struct RescheduleFromStorageUseCase {
    pub notification_id: NotificationId,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    Scheduling(schedule_recurring::UseCaseError),
}

#[async_trait::async_trait]
impl UseCase for RescheduleFromStorageUseCase {
    type Response = Option<ArmedNotification>;
    type Error = UseCaseError;

    const NAME: &'static str = "RescheduleFromStorage";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        let entry = match ctx.repos.schedule.find(self.notification_id).await {
            Some(entry) => entry,
            None => {
                debug!(
                    "No stored config for notification {}, nothing to re-arm",
                    self.notification_id
                );
                return Ok(None);
            }
        };

        let usecase = ScheduleRecurringNotificationUseCase {
            notification_id: entry.id,
            title: entry.title,
            body: entry.body,
            recurrence: entry.recurrence,
        };
        execute(usecase, ctx)
            .await
            .map(Some)
            .map_err(UseCaseError::Scheduling)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pillbox_domain::{Recurrence, ScheduleEntry};
    use pillbox_infra::{InMemoryNotifier, StaticTimeSys};
    use std::sync::Arc;

    fn setup() -> (Context, Arc<InMemoryNotifier>) {
        let notifier = Arc::new(InMemoryNotifier::new());
        let mut ctx = Context::create_inmemory();
        ctx.notifier = notifier.clone();
        ctx.sys = Arc::new(StaticTimeSys::new(
            NaiveDate::from_ymd(2024, 1, 1).and_hms(10, 0, 0),
        ));
        (ctx, notifier)
    }

    #[tokio::test]
    async fn it_rearms_with_the_stored_descriptor() {
        let (ctx, notifier) = setup();
        let entry = ScheduleEntry::new(
            NotificationId::new(5),
            "Medication reminder".into(),
            "Time to take 1 pills of Ibuprofen".into(),
            Recurrence::weekly(3, 8, 0),
        );
        ctx.repos.schedule.save(&entry).await.unwrap();

        let armed = execute(
            RescheduleFromStorageUseCase {
                notification_id: entry.id,
            },
            &ctx,
        )
        .await
        .unwrap()
        .expect("A stored entry to be re-armed");

        // Wednesday after the pinned Monday morning
        assert_eq!(
            armed.fire_at,
            NaiveDate::from_ymd(2024, 1, 3).and_hms(8, 0, 0)
        );
        assert_eq!(notifier.pending_ids(), vec![entry.id]);
    }

    #[tokio::test]
    async fn missing_entry_is_a_silent_noop() {
        let (ctx, notifier) = setup();

        let res = execute(
            RescheduleFromStorageUseCase {
                notification_id: NotificationId::new(99),
            },
            &ctx,
        )
        .await
        .unwrap();

        assert!(res.is_none());
        // No notifier calls happened
        assert_eq!(notifier.submission_count(), 0);
        assert!(notifier.pending_ids().is_empty());
    }
}
