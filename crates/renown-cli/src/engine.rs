// crates/renown-cli/src/engine.rs
//
// Wires the engine components over the local state store and ledger mirror.

use std::sync::Arc;

use renown_core::{Clock, StateStore, SystemClock};
use renown_leaderboard::{RankPresenter, SnapshotScheduler};
use renown_scoring::ScoreCalculator;
use renown_store::{FileLedger, RocksStateStore};
use renown_streak::StreakTracker;

use crate::config::{expand_tilde, CliConfig};

/// Everything a command needs.
pub struct Engine {
    pub config: CliConfig,
    pub store: Arc<dyn StateStore>,
    pub calculator: ScoreCalculator,
    pub tracker: StreakTracker,
    pub scheduler: SnapshotScheduler,
    pub presenter: RankPresenter,
}

impl Engine {
    /// Open the RocksDB state under `data_dir` and load the ledger file.
    pub fn open(config: CliConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let data_dir = expand_tilde(&config.data_dir);
        std::fs::create_dir_all(&data_dir)
            .map_err(|e| format!("Failed to create data directory {}: {}", data_dir, e))?;
        let store = Arc::new(RocksStateStore::open(&format!("{}/state_rocksdb", data_dir))?);

        let ledger_path = expand_tilde(&config.ledger_path);
        let ledger = Arc::new(
            FileLedger::load(&ledger_path)
                .map_err(|e| format!("Failed to load ledger from {}: {}", ledger_path, e))?,
        );

        Ok(Self::with_parts(config, ledger, store, Arc::new(SystemClock)))
    }

    /// Build the engine over explicit parts.
    pub fn with_parts(
        config: CliConfig,
        ledger: Arc<FileLedger>,
        store: Arc<dyn StateStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let calculator = ScoreCalculator::new(config.scoring.clone(), ledger.clone(), store.clone());
        let tracker = StreakTracker::new(ledger.clone(), store.clone(), clock.clone());
        let scheduler = SnapshotScheduler::new(
            config.snapshot.clone(),
            calculator.clone(),
            ledger.clone(),
            ledger.clone(),
            store.clone(),
            clock,
        );
        let presenter = RankPresenter::new(
            calculator.clone(),
            ledger.clone(),
            store.clone(),
            config.reads.clone(),
        );
        Self {
            config,
            store,
            calculator,
            tracker,
            scheduler,
            presenter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use renown_core::{AccountId, ManualClock};
    use renown_store::MemoryStore;

    #[tokio::test]
    async fn test_components_share_store_and_ledger() {
        let ledger = Arc::new(FileLedger::new());
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::at_day(42));
        let engine = Engine::with_parts(CliConfig::default(), ledger.clone(), store, clock);

        let alice = AccountId::new("0xalice");
        ledger.update(&alice, |r| {
            r.profile = true;
            r.credential = true;
            r.articles = 1;
        });

        engine.tracker.say_gm(&alice).await.unwrap();
        let outcome = engine.scheduler.update_snapshot(&alice).await.unwrap();
        assert!(outcome.completed);

        // base 20 + article 250 + gm 10 + streak 1, plus the updater reward.
        assert_eq!(engine.calculator.score(&alice).await.unwrap(), 291);
        let view = engine.presenter.present().await.unwrap();
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].snapshot_score, Some(281));
        assert_eq!(view.rows[0].score, 291);
        assert_eq!(ledger.emoji_balance(&alice, "trophy"), 1);
    }
}
