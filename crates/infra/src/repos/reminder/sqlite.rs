use super::IReminderRepo;
use pillbox_domain::{NewReminder, NotificationId, Recurrence, Reminder};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};
use tracing::warn;

pub struct SqliteReminderRepo {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteReminderRepo {
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

#[derive(Debug)]
struct ReminderRaw {
    id: i64,
    name: String,
    description: String,
    measure: String,
    quantity: i64,
    schedule_config: String,
    is_active: i64,
}

impl ReminderRaw {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            measure: row.get(3)?,
            quantity: row.get(4)?,
            schedule_config: row.get(5)?,
            is_active: row.get(6)?,
        })
    }

    fn into_domain(self) -> anyhow::Result<Reminder> {
        let recurrence: Recurrence = serde_json::from_str(&self.schedule_config)?;
        Ok(Reminder {
            id: NotificationId::new(self.id),
            name: self.name,
            description: self.description,
            measure: self.measure,
            quantity: self.quantity.max(0) as u32,
            recurrence,
            active: self.is_active != 0,
        })
    }
}

const SELECT_FIELDS: &str =
    "id, name, description, measure, quantity, schedule_config, is_active";

#[async_trait::async_trait]
impl IReminderRepo for SqliteReminderRepo {
    async fn insert(&self, draft: &NewReminder) -> anyhow::Result<Reminder> {
        let connection = self.connection.lock().unwrap();
        let schedule_config = serde_json::to_string(&draft.recurrence)?;
        connection.execute(
            "INSERT INTO reminders (name, description, measure, quantity, schedule_config, is_active)
             VALUES (?1, ?2, ?3, ?4, ?5, 1)",
            params![
                draft.name,
                draft.description,
                draft.measure,
                draft.quantity as i64,
                schedule_config
            ],
        )?;
        let id = NotificationId::new(connection.last_insert_rowid());
        Ok(draft.clone().into_reminder(id))
    }

    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()> {
        let connection = self.connection.lock().unwrap();
        let schedule_config = serde_json::to_string(&reminder.recurrence)?;
        connection.execute(
            "UPDATE reminders
             SET name = ?1, description = ?2, measure = ?3, quantity = ?4,
                 schedule_config = ?5, is_active = ?6
             WHERE id = ?7",
            params![
                reminder.name,
                reminder.description,
                reminder.measure,
                reminder.quantity as i64,
                schedule_config,
                reminder.active as i64,
                reminder.id.inner()
            ],
        )?;
        Ok(())
    }

    async fn find(&self, reminder_id: NotificationId) -> Option<Reminder> {
        let connection = self.connection.lock().unwrap();
        let raw = connection
            .query_row(
                &format!("SELECT {} FROM reminders WHERE id = ?1", SELECT_FIELDS),
                params![reminder_id.inner()],
                ReminderRaw::from_row,
            )
            .optional()
            .ok()
            .flatten()?;

        match raw.into_domain() {
            Ok(reminder) => Some(reminder),
            Err(e) => {
                warn!(
                    "Unparseable reminder record {} treated as absent: {:?}",
                    reminder_id, e
                );
                None
            }
        }
    }

    async fn find_active(&self) -> Vec<Reminder> {
        let connection = self.connection.lock().unwrap();
        let mut statement = match connection.prepare(&format!(
            "SELECT {} FROM reminders WHERE is_active = 1",
            SELECT_FIELDS
        )) {
            Ok(statement) => statement,
            Err(e) => {
                warn!("Listing active reminders failed: {:?}", e);
                return Vec::new();
            }
        };
        let rows = match statement.query_map([], ReminderRaw::from_row) {
            Ok(rows) => rows,
            Err(e) => {
                warn!("Listing active reminders failed: {:?}", e);
                return Vec::new();
            }
        };

        rows.filter_map(|raw| match raw {
            Ok(raw) => raw.into_domain().ok(),
            Err(_) => None,
        })
        .collect()
    }

    async fn soft_delete(&self, reminder_id: NotificationId) -> anyhow::Result<()> {
        let connection = self.connection.lock().unwrap();
        connection.execute(
            "UPDATE reminders SET is_active = 0 WHERE id = ?1",
            params![reminder_id.inner()],
        )?;
        Ok(())
    }
}
