// crates/renown-daemon/src/shared.rs
//
// DaemonSharedState: the engine components the daemon owns.
//
// Constructed once in main.rs, then handed to the keeper and the event
// listener.

use std::sync::Arc;
use std::time::Instant;

use renown_core::{Clock, StateStore};
use renown_leaderboard::SnapshotScheduler;
use renown_scoring::ScoreCalculator;
use renown_store::FileLedger;

use crate::config::DaemonConfig;

/// Shared engine state for the daemon.
#[derive(Clone)]
pub struct DaemonSharedState {
    /// Ledger mirror; also the reward sink.
    pub ledger: Arc<FileLedger>,
    /// Snapshot scheduler over the persistent store.
    pub scheduler: Arc<SnapshotScheduler>,
    /// Daemon start time for uptime reporting.
    pub start_time: Instant,
}

impl DaemonSharedState {
    /// Wire the scheduler over `ledger` and `store` with the configured
    /// score weights and snapshot settings.
    pub fn new(
        config: &DaemonConfig,
        ledger: Arc<FileLedger>,
        store: Arc<dyn StateStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let calculator = ScoreCalculator::new(config.scoring.clone(), ledger.clone(), store.clone());
        let scheduler = Arc::new(SnapshotScheduler::new(
            config.snapshot.clone(),
            calculator,
            ledger.clone(),
            ledger.clone(),
            store,
            clock,
        ));
        Self {
            ledger,
            scheduler,
            start_time: Instant::now(),
        }
    }
}
