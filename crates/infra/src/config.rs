use pillbox_domain::ChannelConfig;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the sqlite database file backing the reminder and schedule
    /// repositories
    pub database_path: String,
    /// Whether the notifier's pending list is a trustworthy signal.
    /// Browser-style environments report pending state stale, in which
    /// case the sweeper uses the time-since-last-arm heuristic instead.
    pub pending_list_reliable: bool,
    /// How often the reconciliation sweep runs
    pub sweep_interval: Duration,
    /// Delay before the one-shot reconciliation sweep at startup
    pub startup_sweep_delay: Duration,
    /// Delay before re-arming after a notification was delivered while the
    /// process was foregrounded. Materially longer than the interacted
    /// delay so the re-arm does not race the platform's own display of the
    /// alert that just fired.
    pub received_rearm_delay: Duration,
    /// Delay before re-arming after the user interacted with a
    /// notification. The alert has been acknowledged at that point, so
    /// this defaults to an immediate re-arm.
    pub interacted_rearm_delay: Duration,
    /// How long since `last_armed_at` before the sweeper considers an
    /// entry silently dropped. Materially larger than `sweep_interval` to
    /// avoid racing an alert that is legitimately about to fire.
    pub rearm_stale_threshold: Duration,
    /// Channel all medication reminders are scheduled on
    pub channel: ChannelConfig,
}

impl Config {
    pub fn new() -> Self {
        let database_path =
            std::env::var("DATABASE_PATH").unwrap_or_else(|_| "pillbox.sqlite".into());
        let pending_list_reliable = bool_env("PENDING_LIST_RELIABLE", true);
        // Environments without a trustworthy pending list also tend to lack
        // background execution, so they sweep far more often
        let default_sweep_secs = if pending_list_reliable { 10 * 60 } else { 60 };
        let sweep_secs = secs_env("SWEEP_INTERVAL_SECS", default_sweep_secs);

        Self {
            database_path,
            pending_list_reliable,
            sweep_interval: Duration::from_secs(sweep_secs),
            startup_sweep_delay: Duration::from_secs(secs_env("STARTUP_SWEEP_DELAY_SECS", 10)),
            received_rearm_delay: Duration::from_secs(secs_env("RECEIVED_REARM_DELAY_SECS", 30)),
            interacted_rearm_delay: Duration::from_secs(secs_env("INTERACTED_REARM_DELAY_SECS", 0)),
            rearm_stale_threshold: Duration::from_secs(secs_env(
                "REARM_STALE_THRESHOLD_SECS",
                sweep_secs * 6,
            )),
            channel: ChannelConfig {
                id: "medication-reminders".into(),
                name: "Medication reminders".into(),
                description: "Recurring medication reminders".into(),
                importance: 4,
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn secs_env(name: &str, default: u64) -> u64 {
    match std::env::var(name) {
        Ok(raw) => match raw.parse::<u64>() {
            Ok(secs) => secs,
            Err(_) => {
                warn!(
                    "The given {}: {} is not valid, falling back to the default: {}.",
                    name, raw, default
                );
                default
            }
        },
        Err(_) => default,
    }
}

fn bool_env(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(raw) => match raw.parse::<bool>() {
            Ok(value) => value,
            Err(_) => {
                warn!(
                    "The given {}: {} is not valid, falling back to the default: {}.",
                    name, raw, default
                );
                default
            }
        },
        Err(_) => default,
    }
}
