use super::codec;
use super::IScheduleRepo;
use chrono::NaiveDateTime;
use pillbox_domain::{NotificationId, ScheduleEntry};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::warn;

pub struct InMemoryScheduleRepo {
    store: Mutex<HashMap<String, String>>,
}

impl InMemoryScheduleRepo {
    pub fn new() -> Self {
        Self {
            store: Mutex::new(HashMap::new()),
        }
    }

    #[cfg(test)]
    pub(crate) fn put_raw(&self, key: &str, value: &str) {
        let mut store = self.store.lock().unwrap();
        store.insert(key.to_string(), value.to_string());
    }
}

#[async_trait::async_trait]
impl IScheduleRepo for InMemoryScheduleRepo {
    async fn save(&self, entry: &ScheduleEntry) -> anyhow::Result<()> {
        let encoded = codec::encode_entry(entry)?;
        let mut store = self.store.lock().unwrap();
        store.insert(codec::entry_key(entry.id), encoded);
        Ok(())
    }

    async fn find(&self, id: NotificationId) -> Option<ScheduleEntry> {
        let mut store = self.store.lock().unwrap();
        let raw = store.get(&codec::entry_key(id))?.clone();
        let mut entry = match codec::decode_entry(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Corrupt schedule entry for {} removed: {:?}", id, e);
                store.remove(&codec::entry_key(id));
                store.remove(&codec::last_armed_key(id));
                return None;
            }
        };

        if let Some(raw) = store.get(&codec::last_armed_key(id)).cloned() {
            match codec::decode_last_armed(&raw) {
                Ok(armed_at) => entry.last_armed_at = Some(armed_at),
                Err(e) => {
                    warn!("Corrupt last-armed record for {} removed: {:?}", id, e);
                    store.remove(&codec::last_armed_key(id));
                }
            }
        }
        Some(entry)
    }

    async fn delete(&self, id: NotificationId) -> anyhow::Result<()> {
        let mut store = self.store.lock().unwrap();
        store.remove(&codec::entry_key(id));
        store.remove(&codec::last_armed_key(id));
        Ok(())
    }

    async fn list_ids(&self) -> Vec<NotificationId> {
        let store = self.store.lock().unwrap();
        store
            .keys()
            .filter_map(|key| codec::id_from_entry_key(key))
            .collect()
    }

    async fn set_last_armed(
        &self,
        id: NotificationId,
        armed_at: NaiveDateTime,
    ) -> anyhow::Result<()> {
        let mut store = self.store.lock().unwrap();
        store.insert(codec::last_armed_key(id), codec::encode_last_armed(armed_at));
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn corrupt_entry_is_removed_and_reported_absent() {
        let repo = InMemoryScheduleRepo::new();
        let id = NotificationId::new(3);
        repo.put_raw("notification_3", "{ not valid json");
        repo.put_raw("last_scheduled_3", "2024-01-01T09:00:00");

        assert!(repo.find(id).await.is_none());
        // Both keys are gone after the repair
        assert!(repo.list_ids().await.is_empty());
        let store = repo.store.lock().unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn corrupt_last_armed_is_dropped_but_entry_survives() {
        let repo = InMemoryScheduleRepo::new();
        let id = NotificationId::new(3);
        repo.put_raw(
            "notification_3",
            r#"{"id":3,"title":"t","body":"b","scheduleConfig":{"hour":9},"reminderBy":"day"}"#,
        );
        repo.put_raw("last_scheduled_3", "yesterday-ish");

        let entry = repo.find(id).await.expect("Entry to survive");
        assert_eq!(entry.last_armed_at, None);
    }
}
