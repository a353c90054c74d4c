mod error;
pub mod job_schedulers;
pub mod notifications;
pub mod reminders;
pub mod shared;

pub use error::PillboxError;

use pillbox_infra::Context;
use tokio::task::JoinHandle;
use tracing::info;

/// Owns the background tasks that keep recurrences alive: the event
/// reactor that re-arms fired notifications and the periodic
/// reconciliation sweep. Explicit start/stop lifecycle so nothing in the
/// engine depends on ambient process-wide timers.
pub struct Scheduler {
    handles: Vec<JoinHandle<()>>,
}

impl Scheduler {
    pub fn start(ctx: Context) -> Self {
        let handles = vec![
            job_schedulers::start_event_reactor(ctx.clone()),
            job_schedulers::start_reconciliation_job(ctx),
        ];
        info!("Scheduler started");
        Self { handles }
    }

    pub fn stop(self) {
        for handle in &self.handles {
            handle.abort();
        }
        info!("Scheduler stopped");
    }
}
