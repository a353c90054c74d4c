use crate::{shared::entity::Entity, NotificationId, Recurrence};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Persisted state for one active recurring notification. This is
/// everything needed to resurrect a schedule that the notifier silently
/// lost: the recurrence descriptor, the display fields for the next fired
/// instance and the instant of the last successful submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub id: NotificationId,
    pub title: String,
    pub body: String,
    pub recurrence: Recurrence,
    /// When a single-shot request for this entry was last successfully
    /// submitted to the notifier
    pub last_armed_at: Option<NaiveDateTime>,
}

impl ScheduleEntry {
    pub fn new(id: NotificationId, title: String, body: String, recurrence: Recurrence) -> Self {
        Self {
            id,
            title,
            body,
            recurrence,
            last_armed_at: None,
        }
    }
}

impl Entity for ScheduleEntry {
    fn id(&self) -> NotificationId {
        self.id
    }
}

/// A single-shot submission handed to the external notifier. Ephemeral:
/// not retained once submitted, its outcome is either a delivery event or
/// a silent drop that only the reconciliation sweep detects.
#[derive(Debug, Clone, PartialEq)]
pub struct ArmedRequest {
    pub id: NotificationId,
    pub title: String,
    pub body: String,
    pub fire_at: NaiveDateTime,
    pub channel_id: String,
    pub extra: Option<String>,
}

/// Notification channel that must exist before anything can be scheduled
/// on channel-aware platforms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub id: String,
    pub name: String,
    pub description: String,
    pub importance: u8,
}

impl ChannelConfig {
    /// Bare minimum channel used as a fallback when creating the fully
    /// configured one fails
    pub fn minimal(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            importance: 3,
        }
    }
}
