mod codec;
mod inmemory;
mod sqlite;

pub use inmemory::InMemoryScheduleRepo;
pub use sqlite::SqliteScheduleRepo;

use chrono::NaiveDateTime;
use pillbox_domain::{NotificationId, ScheduleEntry};

/// Durable key-value store of the active recurring notifications. Keys are
/// `notification_<id>` for the serialized config and `last_scheduled_<id>`
/// for the instant of the most recent successful submission.
///
/// Writes are last-write-wins per id, no merge semantics. `save` does not
/// touch the last-armed record; use `set_last_armed` after a successful
/// submission. A corrupt stored entry is removed and reported as absent,
/// never surfaced.
#[async_trait::async_trait]
pub trait IScheduleRepo: Send + Sync {
    async fn save(&self, entry: &ScheduleEntry) -> anyhow::Result<()>;
    async fn find(&self, id: NotificationId) -> Option<ScheduleEntry>;
    /// Removes the entry and its last-armed record
    async fn delete(&self, id: NotificationId) -> anyhow::Result<()>;
    async fn list_ids(&self) -> Vec<NotificationId>;
    async fn set_last_armed(&self, id: NotificationId, armed_at: NaiveDateTime)
        -> anyhow::Result<()>;
}
