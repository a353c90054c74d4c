use super::codec;
use super::IScheduleRepo;
use chrono::NaiveDateTime;
use pillbox_domain::{NotificationId, ScheduleEntry};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};
use tracing::warn;

pub struct SqliteScheduleRepo {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteScheduleRepo {
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

fn kv_get(connection: &Connection, key: &str) -> Option<String> {
    connection
        .query_row(
            "SELECT value FROM kv WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .ok()
        .flatten()
}

fn kv_set(connection: &Connection, key: &str, value: &str) -> anyhow::Result<()> {
    connection.execute(
        "INSERT INTO kv (key, value) VALUES (?1, ?2)
         ON CONFLICT (key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )?;
    Ok(())
}

fn kv_delete(connection: &Connection, key: &str) {
    if let Err(e) = connection.execute("DELETE FROM kv WHERE key = ?1", params![key]) {
        warn!("Removing key {} failed: {:?}", key, e);
    }
}

#[async_trait::async_trait]
impl IScheduleRepo for SqliteScheduleRepo {
    async fn save(&self, entry: &ScheduleEntry) -> anyhow::Result<()> {
        let encoded = codec::encode_entry(entry)?;
        let connection = self.connection.lock().unwrap();
        kv_set(&connection, &codec::entry_key(entry.id), &encoded)
    }

    async fn find(&self, id: NotificationId) -> Option<ScheduleEntry> {
        let connection = self.connection.lock().unwrap();
        let raw = kv_get(&connection, &codec::entry_key(id))?;
        let mut entry = match codec::decode_entry(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Corrupt schedule entry for {} removed: {:?}", id, e);
                kv_delete(&connection, &codec::entry_key(id));
                kv_delete(&connection, &codec::last_armed_key(id));
                return None;
            }
        };

        if let Some(raw) = kv_get(&connection, &codec::last_armed_key(id)) {
            match codec::decode_last_armed(&raw) {
                Ok(armed_at) => entry.last_armed_at = Some(armed_at),
                Err(e) => {
                    warn!("Corrupt last-armed record for {} removed: {:?}", id, e);
                    kv_delete(&connection, &codec::last_armed_key(id));
                }
            }
        }
        Some(entry)
    }

    async fn delete(&self, id: NotificationId) -> anyhow::Result<()> {
        let connection = self.connection.lock().unwrap();
        connection.execute(
            "DELETE FROM kv WHERE key IN (?1, ?2)",
            params![codec::entry_key(id), codec::last_armed_key(id)],
        )?;
        Ok(())
    }

    async fn list_ids(&self) -> Vec<NotificationId> {
        let connection = self.connection.lock().unwrap();
        let mut statement = match connection.prepare("SELECT key FROM kv WHERE key LIKE 'notification\\_%' ESCAPE '\\'") {
            Ok(statement) => statement,
            Err(e) => {
                warn!("Listing schedule store keys failed: {:?}", e);
                return Vec::new();
            }
        };
        let keys = match statement.query_map([], |row| row.get::<_, String>(0)) {
            Ok(rows) => rows,
            Err(e) => {
                warn!("Listing schedule store keys failed: {:?}", e);
                return Vec::new();
            }
        };

        keys.filter_map(|key| key.ok())
            .filter_map(|key| codec::id_from_entry_key(&key))
            .collect()
    }

    async fn set_last_armed(
        &self,
        id: NotificationId,
        armed_at: NaiveDateTime,
    ) -> anyhow::Result<()> {
        let connection = self.connection.lock().unwrap();
        kv_set(
            &connection,
            &codec::last_armed_key(id),
            &codec::encode_last_armed(armed_at),
        )
    }
}
