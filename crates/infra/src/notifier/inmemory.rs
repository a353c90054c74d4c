use super::{INotifier, NotifierEvent, PendingNotification, PermissionStatus};
use anyhow::anyhow;
use chrono::NaiveDateTime;
use pillbox_domain::{ArmedRequest, ChannelConfig, NotificationId};
use std::sync::Mutex;
use tokio::sync::broadcast;

/// In-process notifier used by tests and the demo binary. Mimics the
/// platform's replace-by-id semantics and broadcasts delivery and
/// interaction events; failure injection hooks simulate the silent drops
/// the reconciliation sweep exists for.
pub struct InMemoryNotifier {
    state: Mutex<State>,
    events: broadcast::Sender<NotifierEvent>,
}

#[derive(Default)]
struct State {
    permission_denied: bool,
    channels: Vec<ChannelConfig>,
    pending: Vec<ArmedRequest>,
    delivered: Vec<ArmedRequest>,
    submission_log: Vec<NotificationId>,
    fail_next_schedule: bool,
    fail_channel_creation: bool,
}

impl InMemoryNotifier {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            state: Mutex::new(State::default()),
            events,
        }
    }

    pub fn deny_permission(&self) {
        self.state.lock().unwrap().permission_denied = true;
    }

    /// The next `schedule_once` call fails once
    pub fn fail_next_schedule(&self) {
        self.state.lock().unwrap().fail_next_schedule = true;
    }

    pub fn fail_channel_creation(&self) {
        self.state.lock().unwrap().fail_channel_creation = true;
    }

    pub fn pending_ids(&self) -> Vec<NotificationId> {
        let state = self.state.lock().unwrap();
        state.pending.iter().map(|request| request.id).collect()
    }

    pub fn pending_request(&self, id: NotificationId) -> Option<ArmedRequest> {
        let state = self.state.lock().unwrap();
        state.pending.iter().find(|r| r.id == id).cloned()
    }

    /// How many submissions have been accepted in total, including replaced
    /// ones
    pub fn submission_count(&self) -> usize {
        self.state.lock().unwrap().submission_log.len()
    }

    pub fn submissions_for(&self, id: NotificationId) -> usize {
        let state = self.state.lock().unwrap();
        state.submission_log.iter().filter(|s| **s == id).count()
    }

    /// Simulates the platform silently losing a pending request, the
    /// failure mode only the reconciliation sweep can detect
    pub fn drop_pending(&self, id: NotificationId) -> bool {
        let mut state = self.state.lock().unwrap();
        let before = state.pending.len();
        state.pending.retain(|request| request.id != id);
        state.pending.len() != before
    }

    /// Fires a pending request: moves it to the delivered list and emits a
    /// `Received` event as if the process was foregrounded
    pub fn fire(&self, id: NotificationId) -> bool {
        let mut state = self.state.lock().unwrap();
        let position = match state.pending.iter().position(|r| r.id == id) {
            Some(position) => position,
            None => return false,
        };
        let request = state.pending.remove(position);
        state.delivered.push(request);
        drop(state);
        let _ = self.events.send(NotifierEvent::Received(id));
        true
    }

    /// Emits an `Interacted` event as if the user tapped the alert
    pub fn interact(&self, id: NotificationId) {
        let _ = self.events.send(NotifierEvent::Interacted(id));
    }

    /// Fires every pending request that is due at `now`. Lets the demo
    /// binary and integration tests drive deliveries off a clock.
    pub fn deliver_due(&self, now: NaiveDateTime) -> Vec<NotificationId> {
        let due: Vec<NotificationId> = {
            let state = self.state.lock().unwrap();
            state
                .pending
                .iter()
                .filter(|request| request.fire_at <= now)
                .map(|request| request.id)
                .collect()
        };
        for id in &due {
            self.fire(*id);
        }
        due
    }
}

impl Default for InMemoryNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl INotifier for InMemoryNotifier {
    async fn check_permission(&self) -> PermissionStatus {
        if self.state.lock().unwrap().permission_denied {
            PermissionStatus::Denied
        } else {
            PermissionStatus::Granted
        }
    }

    async fn request_permission(&self) -> PermissionStatus {
        self.check_permission().await
    }

    async fn create_channel(&self, channel: &ChannelConfig) -> anyhow::Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_channel_creation {
            return Err(anyhow!("channel creation unavailable"));
        }
        state.channels.retain(|c| c.id != channel.id);
        state.channels.push(channel.clone());
        Ok(())
    }

    async fn list_channels(&self) -> anyhow::Result<Vec<ChannelConfig>> {
        Ok(self.state.lock().unwrap().channels.clone())
    }

    async fn schedule_once(&self, request: &ArmedRequest) -> anyhow::Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_next_schedule {
            state.fail_next_schedule = false;
            return Err(anyhow!("submission rejected"));
        }
        // Replace-by-id, like the platform primitive
        state.pending.retain(|pending| pending.id != request.id);
        state.pending.push(request.clone());
        state.submission_log.push(request.id);
        Ok(())
    }

    async fn list_pending(&self) -> anyhow::Result<Vec<PendingNotification>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .pending
            .iter()
            .map(|request| PendingNotification {
                id: request.id,
                fire_at: request.fire_at,
            })
            .collect())
    }

    async fn cancel(&self, ids: &[NotificationId]) -> anyhow::Result<()> {
        let mut state = self.state.lock().unwrap();
        state.pending.retain(|request| !ids.contains(&request.id));
        Ok(())
    }

    async fn clear_delivered(&self) -> anyhow::Result<()> {
        self.state.lock().unwrap().delivered.clear();
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<NotifierEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::NaiveDate;

    fn request(id: i64, fire_at: NaiveDateTime) -> ArmedRequest {
        ArmedRequest {
            id: NotificationId::new(id),
            title: "t".into(),
            body: "b".into(),
            fire_at,
            channel_id: "medication-reminders".into(),
            extra: None,
        }
    }

    #[tokio::test]
    async fn schedule_once_replaces_by_id() {
        let notifier = InMemoryNotifier::new();
        let at = NaiveDate::from_ymd(2024, 1, 1).and_hms(9, 0, 0);
        let later = NaiveDate::from_ymd(2024, 1, 2).and_hms(9, 0, 0);

        notifier.schedule_once(&request(1, at)).await.unwrap();
        notifier.schedule_once(&request(1, later)).await.unwrap();

        let pending = notifier.list_pending().await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].fire_at, later);
        assert_eq!(notifier.submission_count(), 2);
    }

    #[tokio::test]
    async fn fire_moves_to_delivered_and_broadcasts() {
        let notifier = InMemoryNotifier::new();
        let mut events = notifier.subscribe();
        let at = NaiveDate::from_ymd(2024, 1, 1).and_hms(9, 0, 0);
        notifier.schedule_once(&request(1, at)).await.unwrap();

        assert!(notifier.fire(NotificationId::new(1)));
        assert!(notifier.list_pending().await.unwrap().is_empty());
        assert_eq!(
            events.recv().await.unwrap(),
            NotifierEvent::Received(NotificationId::new(1))
        );
    }

    #[tokio::test]
    async fn deliver_due_only_fires_requests_at_or_before_now() {
        let notifier = InMemoryNotifier::new();
        let morning = NaiveDate::from_ymd(2024, 1, 1).and_hms(9, 0, 0);
        let evening = NaiveDate::from_ymd(2024, 1, 1).and_hms(21, 0, 0);
        notifier.schedule_once(&request(1, morning)).await.unwrap();
        notifier.schedule_once(&request(2, evening)).await.unwrap();

        let fired = notifier.deliver_due(NaiveDate::from_ymd(2024, 1, 1).and_hms(12, 0, 0));
        assert_eq!(fired, vec![NotificationId::new(1)]);
        assert_eq!(notifier.pending_ids(), vec![NotificationId::new(2)]);
    }
}
