use super::IReminderRepo;
use pillbox_domain::{Entity, NewReminder, NotificationId, Reminder};
use std::sync::Mutex;

pub struct InMemoryReminderRepo {
    reminders: Mutex<Vec<Reminder>>,
    next_id: Mutex<i64>,
}

impl InMemoryReminderRepo {
    pub fn new() -> Self {
        Self {
            reminders: Mutex::new(Vec::new()),
            next_id: Mutex::new(1),
        }
    }

    fn assign_id(&self) -> NotificationId {
        let mut next_id = self.next_id.lock().unwrap();
        let id = NotificationId::new(*next_id);
        *next_id += 1;
        id
    }
}

#[async_trait::async_trait]
impl IReminderRepo for InMemoryReminderRepo {
    async fn insert(&self, draft: &NewReminder) -> anyhow::Result<Reminder> {
        let reminder = draft.clone().into_reminder(self.assign_id());
        let mut reminders = self.reminders.lock().unwrap();
        reminders.push(reminder.clone());
        Ok(reminder)
    }

    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()> {
        let mut reminders = self.reminders.lock().unwrap();
        for stored in reminders.iter_mut() {
            if stored.id() == reminder.id() {
                *stored = reminder.clone();
            }
        }
        Ok(())
    }

    async fn find(&self, reminder_id: NotificationId) -> Option<Reminder> {
        let reminders = self.reminders.lock().unwrap();
        reminders.iter().find(|r| r.id == reminder_id).cloned()
    }

    async fn find_active(&self) -> Vec<Reminder> {
        let reminders = self.reminders.lock().unwrap();
        reminders.iter().filter(|r| r.active).cloned().collect()
    }

    async fn soft_delete(&self, reminder_id: NotificationId) -> anyhow::Result<()> {
        let mut reminders = self.reminders.lock().unwrap();
        for stored in reminders.iter_mut() {
            if stored.id == reminder_id {
                stored.active = false;
            }
        }
        Ok(())
    }
}
