mod inmemory;
mod sqlite;

pub use inmemory::InMemoryReminderRepo;
pub use sqlite::SqliteReminderRepo;

use pillbox_domain::{NewReminder, NotificationId, Reminder};

/// Storage for medication reminder records. The scheduling engine only
/// reads these to obtain the notification id and the display fields; it
/// never owns their persistence.
#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    async fn insert(&self, draft: &NewReminder) -> anyhow::Result<Reminder>;
    /// Overwrites the stored record with the given one. Saving an id with
    /// no stored record is an `Ok` no-op; callers that need the record to
    /// exist `find` it first.
    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()>;
    async fn find(&self, reminder_id: NotificationId) -> Option<Reminder>;
    async fn find_active(&self) -> Vec<Reminder>;
    /// Soft delete: flips `active` off but keeps the record
    async fn soft_delete(&self, reminder_id: NotificationId) -> anyhow::Result<()>;
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::repos::Repos;
    use pillbox_domain::Recurrence;

    fn create_repos() -> Vec<Repos> {
        vec![
            Repos::create_inmemory(),
            Repos::create_sqlite(":memory:").expect("In memory sqlite to open"),
        ]
    }

    fn draft(name: &str) -> NewReminder {
        NewReminder {
            name: name.into(),
            description: "".into(),
            measure: "pills".into(),
            quantity: 1,
            recurrence: Recurrence::daily(9, 0),
        }
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids_and_round_trips() {
        for repos in create_repos() {
            let first = repos.reminders.insert(&draft("Ibuprofen")).await.unwrap();
            let second = repos.reminders.insert(&draft("Vitamin D")).await.unwrap();
            assert!(second.id > first.id);

            let found = repos
                .reminders
                .find(first.id)
                .await
                .expect("To find reminder just inserted");
            assert_eq!(found, first);
        }
    }

    #[tokio::test]
    async fn soft_delete_hides_from_active_but_keeps_record() {
        for repos in create_repos() {
            let reminder = repos.reminders.insert(&draft("Ibuprofen")).await.unwrap();
            assert_eq!(repos.reminders.find_active().await.len(), 1);

            repos.reminders.soft_delete(reminder.id).await.unwrap();
            assert!(repos.reminders.find_active().await.is_empty());

            let kept = repos.reminders.find(reminder.id).await.unwrap();
            assert!(!kept.active);
        }
    }

    #[tokio::test]
    async fn save_overwrites_all_fields() {
        for repos in create_repos() {
            let mut reminder = repos.reminders.insert(&draft("Ibuprofen")).await.unwrap();
            reminder.quantity = 3;
            reminder.recurrence = Recurrence::weekly(3, 8, 0);
            repos.reminders.save(&reminder).await.unwrap();

            assert_eq!(repos.reminders.find(reminder.id).await.unwrap(), reminder);
        }
    }

    #[tokio::test]
    async fn save_on_an_unknown_id_is_an_ok_noop() {
        for repos in create_repos() {
            let unknown = draft("Ibuprofen").into_reminder(NotificationId::new(404));
            repos.reminders.save(&unknown).await.unwrap();

            assert!(repos.reminders.find(unknown.id).await.is_none());
            assert!(repos.reminders.find_active().await.is_empty());
        }
    }
}
