use crate::{shared::entity::Entity, NotificationId, Recurrence};
use serde::{Deserialize, Serialize};

/// A medication reminder record. The record's id doubles as the id of the
/// single-shot notification requests representing its occurrences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: NotificationId,
    pub name: String,
    pub description: String,
    /// Dose unit, e.g. "pills" or "ml"
    pub measure: String,
    pub quantity: u32,
    pub recurrence: Recurrence,
    /// Soft-deleted records stay in storage with `active = false`
    pub active: bool,
}

impl Reminder {
    /// Title of the next fired notification instance
    pub fn notification_title(&self) -> String {
        "Medication reminder".to_string()
    }

    /// Body of the next fired notification instance
    pub fn notification_body(&self) -> String {
        format!(
            "Time to take {} {} of {}",
            self.quantity, self.measure, self.name
        )
    }
}

impl Entity for Reminder {
    fn id(&self) -> NotificationId {
        self.id
    }
}

/// A reminder that has not been stored yet and therefore has no id
#[derive(Debug, Clone, PartialEq)]
pub struct NewReminder {
    pub name: String,
    pub description: String,
    pub measure: String,
    pub quantity: u32,
    pub recurrence: Recurrence,
}

impl NewReminder {
    pub fn into_reminder(self, id: NotificationId) -> Reminder {
        Reminder {
            id,
            name: self.name,
            description: self.description,
            measure: self.measure,
            quantity: self.quantity,
            recurrence: self.recurrence,
            active: true,
        }
    }
}
