// crates/renown-daemon/src/keeper.rs
//
// Snapshot keeper for the Renown daemon.
//
// Wakes every `keeper_interval_secs`, refreshes the ledger mirror, and if
// today's sweep is still due drives `update_snapshot` window by window
// until the sweep completes.

use std::sync::Arc;
use std::time::Duration;

use renown_core::{AccountId, RenownError};
use renown_leaderboard::SnapshotScheduler;
use renown_store::FileLedger;

/// What a single keeper pass did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeeperTick {
    /// Today's sweep had already completed.
    UpToDate,
    /// An update is due but no keeper account is configured.
    NoKeeper,
    /// The keeper drove a sweep to completion.
    Completed {
        /// Number of `update_snapshot` calls it took.
        windows: u64,
        /// Leaderboard size after the sweep.
        leaderboard_size: usize,
    },
}

/// Keeper that drives the daily leaderboard sweep.
pub struct SnapshotKeeper {
    scheduler: Arc<SnapshotScheduler>,
    ledger: Arc<FileLedger>,
    keeper: Option<AccountId>,
    interval: Duration,
}

impl SnapshotKeeper {
    /// Create a keeper. A zero interval is raised to one second.
    pub fn new(
        scheduler: Arc<SnapshotScheduler>,
        ledger: Arc<FileLedger>,
        keeper: Option<AccountId>,
        interval: Duration,
    ) -> Self {
        Self {
            scheduler,
            ledger,
            keeper,
            interval: interval.max(Duration::from_secs(1)),
        }
    }

    /// Run keeper passes until ctrl-c.
    ///
    /// The first pass runs immediately. Failed passes are logged and retried
    /// on the next interval.
    pub async fn run(&self) {
        tracing::info!(
            "Snapshot keeper started (interval={}s, keeper={})",
            self.interval.as_secs(),
            self.keeper
                .as_ref()
                .map(|k| k.to_string())
                .unwrap_or_else(|| "none".to_string())
        );

        loop {
            self.pass().await;
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Snapshot keeper received shutdown signal");
                    break;
                }
                _ = tokio::time::sleep(self.interval) => {}
            }
        }
    }

    async fn pass(&self) {
        match self.tick().await {
            Ok(KeeperTick::Completed {
                windows,
                leaderboard_size,
            }) => tracing::info!(
                "Keeper completed sweep in {} window(s), {} entries",
                windows,
                leaderboard_size
            ),
            Ok(KeeperTick::NoKeeper) => {
                tracing::info!("Snapshot update is due but no keeper account is configured")
            }
            Ok(KeeperTick::UpToDate) => tracing::debug!("Leaderboard is up to date"),
            Err(e) if e.is_retryable() => tracing::warn!("Keeper pass failed, will retry: {}", e),
            Err(e) => tracing::error!("Keeper pass failed: {}", e),
        }
    }

    /// One keeper pass.
    pub async fn tick(&self) -> Result<KeeperTick, RenownError> {
        self.ledger.reload()?;

        if !self.scheduler.can_update().await? {
            return Ok(KeeperTick::UpToDate);
        }
        let Some(keeper) = &self.keeper else {
            return Ok(KeeperTick::NoKeeper);
        };

        let mut windows = 0;
        loop {
            match self.scheduler.update_snapshot(keeper).await {
                Ok(outcome) => {
                    windows += 1;
                    if outcome.completed {
                        return Ok(KeeperTick::Completed {
                            windows,
                            leaderboard_size: outcome.leaderboard_size,
                        });
                    }
                }
                Err(RenownError::AlreadyUpdatedToday { day }) => {
                    tracing::debug!("Sweep for {} completed by another caller", day);
                    return Ok(KeeperTick::UpToDate);
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use renown_core::{ActivityLedger, ManualClock, StateStore};
    use renown_leaderboard::SnapshotConfig;
    use renown_scoring::{ScoreCalculator, ScoreComponents};
    use renown_store::MemoryStore;

    struct Fixture {
        ledger: Arc<FileLedger>,
        store: Arc<MemoryStore>,
        clock: Arc<ManualClock>,
        scheduler: Arc<SnapshotScheduler>,
    }

    async fn fixture(candidates: usize, window: u64) -> Fixture {
        let ledger = Arc::new(FileLedger::new());
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::at_day(500));
        let calculator =
            ScoreCalculator::new(ScoreComponents::default(), ledger.clone(), store.clone());
        let config = SnapshotConfig {
            max_candidates_per_update: window,
            ..SnapshotConfig::default()
        };
        let scheduler = Arc::new(SnapshotScheduler::new(
            config,
            calculator,
            ledger.clone(),
            ledger.clone(),
            store.clone(),
            clock.clone(),
        ));

        for i in 0..candidates {
            let account = AccountId::new(format!("0xc{}", i));
            ledger.update(&account, |r| {
                r.profile = true;
                r.articles = i as u64;
            });
            scheduler.enroll(&account).await.unwrap();
        }
        ledger.update(&AccountId::new("0xkeeper"), |r| r.credential = true);

        Fixture {
            ledger,
            store,
            clock,
            scheduler,
        }
    }

    fn keeper(f: &Fixture, account: Option<&str>) -> SnapshotKeeper {
        SnapshotKeeper::new(
            f.scheduler.clone(),
            f.ledger.clone(),
            account.map(AccountId::from),
            Duration::from_secs(60),
        )
    }

    #[tokio::test]
    async fn test_tick_drives_sweep_to_completion() {
        let f = fixture(5, 2).await;
        let k = keeper(&f, Some("0xkeeper"));

        let tick = k.tick().await.unwrap();
        assert_eq!(
            tick,
            KeeperTick::Completed {
                windows: 3,
                leaderboard_size: 5
            }
        );
        assert_eq!(f.store.leaderboard().await.unwrap().len(), 5);
        assert_eq!(f.ledger.emoji_balance(&AccountId::new("0xkeeper"), "trophy"), 1);

        assert_eq!(k.tick().await.unwrap(), KeeperTick::UpToDate);
    }

    #[tokio::test]
    async fn test_tick_runs_again_next_day() {
        let f = fixture(3, 50).await;
        let k = keeper(&f, Some("0xkeeper"));

        assert!(matches!(k.tick().await.unwrap(), KeeperTick::Completed { windows: 1, .. }));
        f.clock.advance_days(1);
        assert!(matches!(k.tick().await.unwrap(), KeeperTick::Completed { windows: 1, .. }));

        let state = f.store.snapshot_state().await.unwrap();
        assert_eq!(state.accrued_reward(&AccountId::new("0xkeeper")), 20);
    }

    #[tokio::test]
    async fn test_tick_without_keeper_account() {
        let f = fixture(3, 50).await;
        let k = keeper(&f, None);

        assert_eq!(k.tick().await.unwrap(), KeeperTick::NoKeeper);
        assert!(f.scheduler.can_update().await.unwrap());
    }

    #[tokio::test]
    async fn test_tick_rejects_uncredentialed_keeper() {
        let f = fixture(3, 50).await;
        let k = keeper(&f, Some("0xnobody"));

        let err = k.tick().await.unwrap_err();
        assert!(matches!(err, RenownError::InsufficientCredential(_)));
        assert!(f.store.leaderboard().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reward_kept_across_reloads_of_ledger_file() {
        let path = std::env::temp_dir().join(format!("renown_keeper_{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{"accounts": {
                "0xc0": {"profile": true, "articles": 1},
                "0xkeeper": {"credential": true}
            }}"#,
        )
        .unwrap();
        let ledger = Arc::new(FileLedger::load(&path).unwrap());
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::at_day(500));
        let calculator =
            ScoreCalculator::new(ScoreComponents::default(), ledger.clone(), store.clone());
        let scheduler = Arc::new(SnapshotScheduler::new(
            SnapshotConfig::default(),
            calculator,
            ledger.clone(),
            ledger.clone(),
            store,
            clock.clone(),
        ));
        scheduler.enroll(&AccountId::new("0xc0")).await.unwrap();
        let k = SnapshotKeeper::new(
            scheduler,
            ledger.clone(),
            Some(AccountId::new("0xkeeper")),
            Duration::from_secs(60),
        );
        let keeper = AccountId::new("0xkeeper");

        assert!(matches!(k.tick().await.unwrap(), KeeperTick::Completed { .. }));
        assert_eq!(ledger.emoji_balance(&keeper, "trophy"), 1);

        // The exporter publishes new counts; the next pass reloads them and
        // keeps the credit already written to the file.
        std::fs::write(
            &path,
            std::fs::read_to_string(&path)
                .unwrap()
                .replace(r#""articles": 1"#, r#""articles": 7"#),
        )
        .unwrap();
        clock.advance_days(1);
        assert!(matches!(k.tick().await.unwrap(), KeeperTick::Completed { .. }));
        assert_eq!(ledger.emoji_balance(&keeper, "trophy"), 2);

        let reloaded = FileLedger::load(&path).unwrap();
        assert_eq!(reloaded.emoji_balance(&keeper, "trophy"), 2);
        assert_eq!(reloaded.article_count(&AccountId::new("0xc0")).await.unwrap(), 7);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_zero_interval_raised() {
        let ledger = Arc::new(FileLedger::new());
        let store = Arc::new(MemoryStore::new());
        let calculator =
            ScoreCalculator::new(ScoreComponents::default(), ledger.clone(), store.clone());
        let scheduler = Arc::new(SnapshotScheduler::new(
            SnapshotConfig::default(),
            calculator,
            ledger.clone(),
            ledger.clone(),
            store,
            Arc::new(ManualClock::at_day(1)),
        ));
        let k = SnapshotKeeper::new(scheduler, ledger, None, Duration::ZERO);
        assert_eq!(k.interval, Duration::from_secs(1));
    }
}
