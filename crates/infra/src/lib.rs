mod config;
mod locks;
mod notifier;
mod repos;
mod system;

pub use config::Config;
pub use locks::IdLocks;
pub use notifier::{
    INotifier, InMemoryNotifier, NotifierEvent, PendingNotification, PermissionStatus,
};
pub use repos::{IReminderRepo, IScheduleRepo, InMemoryReminderRepo, InMemoryScheduleRepo, Repos};
pub use system::{ISys, RealSys, StaticTimeSys};

use std::sync::Arc;

#[derive(Clone)]
pub struct Context {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub notifier: Arc<dyn INotifier>,
    pub arm_locks: IdLocks,
}

impl Context {
    /// Context backed entirely by in-process storage and an in-process
    /// notifier. Used by tests and available as a fallback when no durable
    /// database can be opened.
    pub fn create_inmemory() -> Self {
        Self {
            repos: Repos::create_inmemory(),
            config: Config::new(),
            sys: Arc::new(RealSys {}),
            notifier: Arc::new(InMemoryNotifier::new()),
            arm_locks: IdLocks::new(),
        }
    }
}

/// Will setup the infrastructure context given the environment
pub fn setup_context(notifier: Arc<dyn INotifier>) -> anyhow::Result<Context> {
    let config = Config::new();
    let repos = Repos::create_sqlite(&config.database_path)?;
    Ok(Context {
        repos,
        config,
        sys: Arc::new(RealSys {}),
        notifier,
        arm_locks: IdLocks::new(),
    })
}
