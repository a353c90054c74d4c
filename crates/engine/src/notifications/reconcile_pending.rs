use super::reschedule_from_storage::RescheduleFromStorageUseCase;
use crate::shared::usecase::{execute, UseCase};
use pillbox_domain::NotificationId;
use pillbox_infra::Context;
use std::collections::HashSet;
use tracing::{info, warn};

/// Walks every stored schedule entry and re-arms the ones whose pending
/// request went missing, repairing reboots, force-stops and crashes
/// between persisting and submitting. Best-effort per id: one bad entry
/// never stops the rest of the sweep.
#[derive(Debug)]
pub struct ReconcilePendingUseCase;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepReport {
    pub checked: usize,
    pub rearmed: usize,
}

#[derive(Debug)]
pub enum UseCaseError {}

#[async_trait::async_trait]
impl UseCase for ReconcilePendingUseCase {
    type Response = SweepReport;
    type Error = UseCaseError;

    const NAME: &'static str = "ReconcilePending";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        let ids = ctx.repos.schedule.list_ids().await;

        // The pending list is only consulted when the platform keeps it
        // truthful. Otherwise, or when the query itself fails, fall back to
        // the time-since-last-arm heuristic.
        let pending: Option<HashSet<NotificationId>> = if ctx.config.pending_list_reliable {
            match ctx.notifier.list_pending().await {
                Ok(pending) => Some(pending.into_iter().map(|p| p.id).collect()),
                Err(e) => {
                    warn!("Querying pending notifications failed: {:?}", e);
                    None
                }
            }
        } else {
            None
        };

        let mut report = SweepReport {
            checked: ids.len(),
            rearmed: 0,
        };
        for id in ids {
            let needs_rearm = match &pending {
                Some(pending) => !pending.contains(&id),
                None => self.looks_stale(ctx, id).await,
            };
            if !needs_rearm {
                continue;
            }
            match execute(RescheduleFromStorageUseCase { notification_id: id }, ctx).await {
                Ok(Some(_)) => report.rearmed += 1,
                // The entry vanished between listing and re-arming
                Ok(None) => {}
                Err(e) => warn!("Sweep failed to re-arm notification {}: {:?}", id, e),
            }
        }
        if report.rearmed > 0 {
            info!(
                "Reconciliation sweep re-armed {} of {} notifications",
                report.rearmed, report.checked
            );
        }
        Ok(report)
    }
}

impl ReconcilePendingUseCase {
    async fn looks_stale(&self, ctx: &Context, id: NotificationId) -> bool {
        let entry = match ctx.repos.schedule.find(id).await {
            Some(entry) => entry,
            None => return false,
        };
        let last_armed = match entry.last_armed_at {
            Some(at) => at,
            // Persisted but never successfully submitted
            None => return true,
        };
        match chrono::Duration::from_std(ctx.config.rearm_stale_threshold) {
            Ok(threshold) => ctx.sys.now() - last_armed >= threshold,
            Err(_) => false,
        }
    }
}
