use crate::notifications::reconcile_pending::ReconcilePendingUseCase;
use crate::notifications::reschedule_from_storage::RescheduleFromStorageUseCase;
use crate::shared::usecase::execute;
use pillbox_infra::{Context, NotifierEvent};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio::time::{interval, sleep};
use tracing::warn;

/// Listens for delivery and interaction signals and re-arms the fired
/// notification from its stored descriptor. Each signal is handled on its
/// own task so a delayed re-arm never blocks the event stream.
pub fn start_event_reactor(ctx: Context) -> JoinHandle<()> {
    let mut events = ctx.notifier.subscribe();
    tokio::spawn(async move {
        loop {
            let event = match events.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    // Dropped signals are repaired by the next sweep
                    warn!("Event reactor lagged, {} signals skipped", skipped);
                    continue;
                }
                Err(RecvError::Closed) => break,
            };
            let context = ctx.clone();
            tokio::spawn(handle_event(context, event));
        }
    })
}

async fn handle_event(ctx: Context, event: NotifierEvent) {
    let delay = match event {
        // Re-arming immediately would race the platform's own display of
        // the alert that just fired
        NotifierEvent::Received(_) => ctx.config.received_rearm_delay,
        NotifierEvent::Interacted(_) => ctx.config.interacted_rearm_delay,
    };
    sleep(delay).await;

    let usecase = RescheduleFromStorageUseCase {
        notification_id: event.notification_id(),
    };
    let _ = execute(usecase, &ctx).await;
}

/// Runs one reconciliation sweep shortly after startup, then repeats on
/// the configured interval.
pub fn start_reconciliation_job(ctx: Context) -> JoinHandle<()> {
    tokio::spawn(async move {
        sleep(ctx.config.startup_sweep_delay).await;
        let mut sweep_interval = interval(ctx.config.sweep_interval);
        loop {
            sweep_interval.tick().await;
            let _ = execute(ReconcilePendingUseCase, &ctx).await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reminders::add_reminder::AddReminderUseCase;
    use chrono::NaiveDate;
    use pillbox_domain::{NewReminder, NotificationId, Recurrence};
    use pillbox_infra::{InMemoryNotifier, StaticTimeSys};
    use std::sync::Arc;
    use std::time::Duration;

    fn setup() -> (Context, Arc<InMemoryNotifier>, Arc<StaticTimeSys>) {
        let notifier = Arc::new(InMemoryNotifier::new());
        let sys = Arc::new(StaticTimeSys::new(
            NaiveDate::from_ymd(2024, 1, 1).and_hms(10, 0, 0),
        ));
        let mut ctx = Context::create_inmemory();
        ctx.notifier = notifier.clone();
        ctx.sys = sys.clone();
        ctx.config.received_rearm_delay = Duration::from_millis(5);
        ctx.config.interacted_rearm_delay = Duration::from_millis(0);
        ctx.config.startup_sweep_delay = Duration::from_millis(5);
        ctx.config.sweep_interval = Duration::from_millis(20);
        (ctx, notifier, sys)
    }

    async fn add(ctx: &Context) -> NotificationId {
        execute(
            AddReminderUseCase {
                draft: NewReminder {
                    name: "Paracetamol".into(),
                    description: "".into(),
                    measure: "pills".into(),
                    quantity: 2,
                    recurrence: Recurrence::daily(9, 0),
                },
            },
            ctx,
        )
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn a_fired_notification_is_rearmed_by_the_reactor() {
        let (ctx, notifier, sys) = setup();
        let id = add(&ctx).await;
        let handle = start_event_reactor(ctx.clone());

        // The alert fires at its scheduled instant
        sys.advance(chrono::Duration::hours(23));
        notifier.fire(id);
        assert!(notifier.pending_ids().is_empty());

        // Received signals wait out the configured delay before re-arming
        sleep(Duration::from_millis(50)).await;
        let request = notifier
            .pending_request(id)
            .expect("The reactor to have re-armed");
        assert_eq!(
            request.fire_at,
            NaiveDate::from_ymd(2024, 1, 3).and_hms(9, 0, 0)
        );
        handle.abort();
    }

    #[tokio::test]
    async fn an_interacted_signal_without_stored_state_is_ignored() {
        let (ctx, notifier, _) = setup();
        let handle = start_event_reactor(ctx.clone());

        notifier.interact(NotificationId::new(12345));

        sleep(Duration::from_millis(30)).await;
        assert_eq!(notifier.submission_count(), 0);
        assert!(notifier.pending_ids().is_empty());
        handle.abort();
    }

    #[tokio::test]
    async fn the_reconciliation_job_resubmits_dropped_requests() {
        let (ctx, notifier, _) = setup();
        let id = add(&ctx).await;
        // Simulate a reboot wiping the platform's pending list
        notifier.drop_pending(id);

        let handle = start_reconciliation_job(ctx.clone());
        sleep(Duration::from_millis(60)).await;

        assert_eq!(notifier.pending_ids(), vec![id]);
        handle.abort();
    }
}
