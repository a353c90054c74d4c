use crate::notifications::schedule_recurring::{self, ScheduleRecurringNotificationUseCase};
use crate::shared::usecase::{execute, UseCase};
use pillbox_domain::{NotificationId, Recurrence, Reminder};
use pillbox_infra::Context;
use tracing::warn;

/// Rewrites a stored reminder and re-arms its notification so the pending
/// request reflects the new cadence and display fields. Re-arming replaces
/// by id, so the old request never lingers next to the new one.
#[derive(Debug)]
pub struct UpdateReminderUseCase {
    pub reminder_id: NotificationId,
    pub name: String,
    pub description: String,
    pub measure: String,
    pub quantity: u32,
    pub recurrence: Recurrence,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(NotificationId),
    StorageError,
    Scheduling(schedule_recurring::UseCaseError),
}

#[async_trait::async_trait]
impl UseCase for UpdateReminderUseCase {
    type Response = Reminder;
    type Error = UseCaseError;

    const NAME: &'static str = "UpdateReminder";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        let mut reminder = ctx
            .repos
            .reminders
            .find(self.reminder_id)
            .await
            .ok_or(UseCaseError::NotFound(self.reminder_id))?;

        reminder.name = self.name.clone();
        reminder.description = self.description.clone();
        reminder.measure = self.measure.clone();
        reminder.quantity = self.quantity;
        reminder.recurrence = self.recurrence;

        ctx.repos
            .reminders
            .save(&reminder)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        if !reminder.active {
            return Ok(reminder);
        }

        let usecase = ScheduleRecurringNotificationUseCase {
            notification_id: reminder.id,
            title: reminder.notification_title(),
            body: reminder.notification_body(),
            recurrence: reminder.recurrence,
        };
        match execute(usecase, ctx).await {
            Ok(_) => Ok(reminder),
            Err(schedule_recurring::UseCaseError::SubmissionFailed) => {
                warn!(
                    "Reminder {} updated but its re-arm submission failed",
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
    use crate::reminders::add_reminder::AddReminderUseCase;
    use chrono::NaiveDate;
    use pillbox_domain::NewReminder;
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

    async fn add(ctx: &Context) -> Reminder {
        execute(
            AddReminderUseCase {
                draft: NewReminder {
                    name: "Paracetamol".into(),
                    description: "After breakfast".into(),
                    measure: "pills".into(),
                    quantity: 2,
                    recurrence: Recurrence::daily(9, 0),
                },
            },
            ctx,
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn it_rewrites_the_record_and_the_pending_request() {
        let (ctx, notifier) = setup();
        let reminder = add(&ctx).await;

        let updated = execute(
            UpdateReminderUseCase {
                reminder_id: reminder.id,
                name: "Ibuprofen".into(),
                description: "".into(),
                measure: "pills".into(),
                quantity: 1,
                recurrence: Recurrence::weekly(3, 8, 30),
            },
            &ctx,
        )
        .await
        .unwrap();

        assert_eq!(updated.name, "Ibuprofen");
        assert_eq!(ctx.repos.reminders.find(reminder.id).await, Some(updated));

        assert_eq!(notifier.pending_ids(), vec![reminder.id]);
        let request = notifier.pending_request(reminder.id).unwrap();
        assert_eq!(request.body, "Time to take 1 pills of Ibuprofen");
        // Wednesday after the pinned Monday morning
        assert_eq!(
            request.fire_at,
            NaiveDate::from_ymd(2024, 1, 3).and_hms(8, 30, 0)
        );
    }

    #[tokio::test]
    async fn updating_a_missing_reminder_fails() {
        let (ctx, _) = setup();

        let res = execute(
            UpdateReminderUseCase {
                reminder_id: NotificationId::new(404),
                name: "Ibuprofen".into(),
                description: "".into(),
                measure: "pills".into(),
                quantity: 1,
                recurrence: Recurrence::daily(9, 0),
            },
            &ctx,
        )
        .await;

        assert_eq!(
            res.unwrap_err(),
            UseCaseError::NotFound(NotificationId::new(404))
        );
    }

    #[tokio::test]
    async fn an_inactive_reminder_is_saved_but_not_rearmed() {
        let (ctx, notifier) = setup();
        let reminder = add(&ctx).await;
        ctx.repos.reminders.soft_delete(reminder.id).await.unwrap();
        notifier.drop_pending(reminder.id);

        let updated = execute(
            UpdateReminderUseCase {
                reminder_id: reminder.id,
                name: "Ibuprofen".into(),
                description: "".into(),
                measure: "pills".into(),
                quantity: 1,
                recurrence: Recurrence::daily(9, 0),
            },
            &ctx,
        )
        .await
        .unwrap();

        assert!(!updated.active);
        assert!(notifier.pending_ids().is_empty());
    }
}
