use crate::notifications::schedule_recurring::{self, ScheduleRecurringNotificationUseCase};
use crate::shared::usecase::{execute, UseCase};
use pillbox_domain::{NewReminder, Reminder};
use pillbox_infra::Context;
use tracing::warn;

/// Stores a new medication reminder and arms its first notification. The
/// record is the source of truth: it is inserted first, so a failed arm
/// still leaves a reminder the sweep can pick up.
#[derive(Debug)]
pub struct AddReminderUseCase {
    pub draft: NewReminder,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    StorageError,
    Scheduling(schedule_recurring::UseCaseError),
}

#[async_trait::async_trait]
impl UseCase for AddReminderUseCase {
    type Response = Reminder;
    type Error = UseCaseError;

    const NAME: &'static str = "AddReminder";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        let reminder = ctx
            .repos
            .reminders
            .insert(&self.draft)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        let usecase = ScheduleRecurringNotificationUseCase {
            notification_id: reminder.id,
            title: reminder.notification_title(),
            body: reminder.notification_body(),
            recurrence: reminder.recurrence,
        };
        match execute(usecase, ctx).await {
            Ok(_) => Ok(reminder),
            // The entry is persisted, the sweep retries the submission
            Err(schedule_recurring::UseCaseError::SubmissionFailed) => {
                warn!(
                    "Reminder {} stored but its first submission failed",
                    reminder.id
                );
                Ok(reminder)
            }
            Err(e) => Err(UseCaseError::Scheduling(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pillbox_domain::{NotificationId, Recurrence};
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

    fn draft() -> NewReminder {
        NewReminder {
            name: "Paracetamol".into(),
            description: "After breakfast".into(),
            measure: "pills".into(),
            quantity: 2,
            recurrence: Recurrence::daily(9, 0),
        }
    }

    #[tokio::test]
    async fn it_stores_the_reminder_and_arms_its_notification() {
        let (ctx, notifier) = setup();

        let reminder = execute(AddReminderUseCase { draft: draft() }, &ctx)
            .await
            .unwrap();

        assert!(reminder.active);
        assert_eq!(
            ctx.repos.reminders.find(reminder.id).await,
            Some(reminder.clone())
        );
        let request = notifier
            .pending_request(reminder.id)
            .expect("A pending request to exist");
        assert_eq!(request.title, "Medication reminder");
        assert_eq!(request.body, "Time to take 2 pills of Paracetamol");
        assert_eq!(
            request.fire_at,
            NaiveDate::from_ymd(2024, 1, 2).and_hms(9, 0, 0)
        );
    }

    #[tokio::test]
    async fn a_failed_submission_still_stores_the_reminder() {
        let (ctx, notifier) = setup();
        notifier.fail_next_schedule();

        let reminder = execute(AddReminderUseCase { draft: draft() }, &ctx)
            .await
            .unwrap();

        assert!(ctx.repos.reminders.find(reminder.id).await.is_some());
        // The schedule entry is in place for the sweep to retry
        assert!(ctx.repos.schedule.find(reminder.id).await.is_some());
        assert!(notifier.pending_ids().is_empty());
    }

    #[tokio::test]
    async fn denied_permission_surfaces_to_the_caller() {
        let (ctx, notifier) = setup();
        notifier.deny_permission();

        let res = execute(AddReminderUseCase { draft: draft() }, &ctx).await;

        assert_eq!(
            res.unwrap_err(),
            UseCaseError::Scheduling(schedule_recurring::UseCaseError::PermissionDenied)
        );
    }

    #[tokio::test]
    async fn ids_are_assigned_sequentially_by_the_store() {
        let (ctx, _) = setup();

        let first = execute(AddReminderUseCase { draft: draft() }, &ctx)
            .await
            .unwrap();
        let second = execute(AddReminderUseCase { draft: draft() }, &ctx)
            .await
            .unwrap();

        assert_eq!(first.id, NotificationId::new(1));
        assert_eq!(second.id, NotificationId::new(2));
    }
}
