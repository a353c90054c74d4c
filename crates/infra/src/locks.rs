use pillbox_domain::NotificationId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Serializes re-arm work per notification id: overlapping re-arms for the
/// same id must not interleave, a stale fire instant could otherwise
/// overwrite a fresher one. Handlers for different ids interleave freely.
#[derive(Clone, Default)]
pub struct IdLocks {
    locks: Arc<Mutex<HashMap<NotificationId, Arc<tokio::sync::Mutex<()>>>>>,
}

impl IdLocks {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn get(&self, id: NotificationId) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().unwrap();
        locks.entry(id).or_insert_with(Default::default).clone()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn same_id_maps_to_the_same_lock() {
        let locks = IdLocks::new();
        let a = locks.get(NotificationId::new(1));
        let b = locks.get(NotificationId::new(1));
        let other = locks.get(NotificationId::new(2));

        let _guard = a.lock().await;
        assert!(b.try_lock().is_err());
        assert!(other.try_lock().is_ok());
    }
}
