mod reminder;
mod schedule;

pub use reminder::{IReminderRepo, InMemoryReminderRepo, SqliteReminderRepo};
pub use schedule::{IScheduleRepo, InMemoryScheduleRepo, SqliteScheduleRepo};

use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub struct Repos {
    pub reminders: Arc<dyn IReminderRepo>,
    pub schedule: Arc<dyn IScheduleRepo>,
}

impl Repos {
    pub fn create_sqlite(database_path: &str) -> anyhow::Result<Self> {
        info!("DB CHECKING CONNECTION ...");
        let connection = Connection::open(database_path)?;
        migrate(&connection)?;
        info!("DB CHECKING CONNECTION ... [done]");

        let connection = Arc::new(Mutex::new(connection));
        Ok(Self {
            reminders: Arc::new(SqliteReminderRepo::new(connection.clone())),
            schedule: Arc::new(SqliteScheduleRepo::new(connection)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            reminders: Arc::new(InMemoryReminderRepo::new()),
            schedule: Arc::new(InMemoryScheduleRepo::new()),
        }
    }
}

pub(crate) fn migrate(connection: &Connection) -> anyhow::Result<()> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS reminders (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT NOT NULL,
            measure TEXT NOT NULL,
            quantity INTEGER NOT NULL,
            schedule_config TEXT NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1
        );
        CREATE TABLE IF NOT EXISTS kv (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );",
    )?;
    Ok(())
}
