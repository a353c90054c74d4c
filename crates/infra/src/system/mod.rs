use chrono::{Duration, Local, NaiveDateTime, Utc};
use std::sync::Mutex;

// Mocking out time so that it is possible to run tests that depend on time.
pub trait ISys: Send + Sync {
    /// The current local wall clock time
    fn now(&self) -> NaiveDateTime;
    /// The current timestamp in millis
    fn get_timestamp_millis(&self) -> i64;
}

/// System that gets the real time and is used when not testing
pub struct RealSys {}
impl ISys for RealSys {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn get_timestamp_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Clock pinned to a fixed instant and advanced manually, so tests can move
/// virtual time deterministically instead of waiting on real timers
pub struct StaticTimeSys {
    now: Mutex<NaiveDateTime>,
}

impl StaticTimeSys {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn advance(&self, duration: Duration) {
        let mut now = self.now.lock().unwrap();
        *now = *now + duration;
    }
}

impl ISys for StaticTimeSys {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock().unwrap()
    }

    fn get_timestamp_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }
}
