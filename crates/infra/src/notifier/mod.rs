mod inmemory;

pub use inmemory::InMemoryNotifier;

use chrono::NaiveDateTime;
use pillbox_domain::{ArmedRequest, ChannelConfig, NotificationId};
use tokio::sync::broadcast;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

impl PermissionStatus {
    pub fn is_granted(self) -> bool {
        matches!(self, PermissionStatus::Granted)
    }
}

/// A not-yet-fired single-shot request as self-reported by the notifier
#[derive(Debug, Clone, PartialEq)]
pub struct PendingNotification {
    pub id: NotificationId,
    pub fire_at: NaiveDateTime,
}

/// Delivery and interaction signals emitted by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifierEvent {
    /// The alert fired while the process was foregrounded
    Received(NotificationId),
    /// The user tapped or otherwise acted on the alert
    Interacted(NotificationId),
}

impl NotifierEvent {
    pub fn notification_id(self) -> NotificationId {
        match self {
            NotifierEvent::Received(id) => id,
            NotifierEvent::Interacted(id) => id,
        }
    }
}

/// The platform's best-effort single-shot notification primitive. Every
/// call here can fail or silently drop state; the scheduling engine never
/// relies on it for more than "fire one alert at an absolute instant".
#[async_trait::async_trait]
pub trait INotifier: Send + Sync {
    async fn check_permission(&self) -> PermissionStatus;
    async fn request_permission(&self) -> PermissionStatus;
    async fn create_channel(&self, channel: &ChannelConfig) -> anyhow::Result<()>;
    async fn list_channels(&self) -> anyhow::Result<Vec<ChannelConfig>>;
    /// Submitting a request whose id is already pending replaces the prior
    /// request for that id
    async fn schedule_once(&self, request: &ArmedRequest) -> anyhow::Result<()>;
    async fn list_pending(&self) -> anyhow::Result<Vec<PendingNotification>>;
    async fn cancel(&self, ids: &[NotificationId]) -> anyhow::Result<()>;
    async fn clear_delivered(&self) -> anyhow::Result<()>;
    fn subscribe(&self) -> broadcast::Receiver<NotifierEvent>;
}
