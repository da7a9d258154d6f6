// crates/renown-store/src/memory.rs
//
// In-memory `StateStore`.
//
// All records sit behind a single async mutex, so each commit is trivially
// atomic: readers see either the state before or after a commit.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex;

use renown_core::{AccountId, GmStats, LeaderboardEntry, RenownError, SnapshotState, StateStore};

#[derive(Debug, Default)]
struct Inner {
    gm: HashMap<AccountId, GmStats>,
    candidates: Vec<AccountId>,
    enrolled: HashSet<AccountId>,
    snapshot: SnapshotState,
    leaderboard: Vec<LeaderboardEntry>,
}

impl Inner {
    fn enroll(&mut self, account: &AccountId) -> bool {
        if !self.enrolled.insert(account.clone()) {
            return false;
        }
        self.candidates.push(account.clone());
        true
    }
}

/// Volatile state store used by tests and simulations.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn gm_stats(&self, account: &AccountId) -> Result<Option<GmStats>, RenownError> {
        Ok(self.inner.lock().await.gm.get(account).cloned())
    }

    async fn commit_checkin(
        &self,
        account: &AccountId,
        stats: &GmStats,
        enroll: bool,
    ) -> Result<(), RenownError> {
        let mut inner = self.inner.lock().await;
        inner.gm.insert(account.clone(), stats.clone());
        if enroll {
            inner.enroll(account);
        }
        Ok(())
    }

    async fn enroll_candidate(&self, account: &AccountId) -> Result<bool, RenownError> {
        Ok(self.inner.lock().await.enroll(account))
    }

    async fn candidate_count(&self) -> Result<u64, RenownError> {
        Ok(self.inner.lock().await.candidates.len() as u64)
    }

    async fn candidates(&self, start: u64, len: u64) -> Result<Vec<AccountId>, RenownError> {
        let inner = self.inner.lock().await;
        let total = inner.candidates.len();
        let start = (start as usize).min(total);
        let end = start.saturating_add(len as usize).min(total);
        Ok(inner.candidates[start..end].to_vec())
    }

    async fn snapshot_state(&self) -> Result<SnapshotState, RenownError> {
        Ok(self.inner.lock().await.snapshot.clone())
    }

    async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, RenownError> {
        Ok(self.inner.lock().await.leaderboard.clone())
    }

    async fn commit_snapshot(
        &self,
        state: &SnapshotState,
        entries: &[LeaderboardEntry],
    ) -> Result<(), RenownError> {
        let mut inner = self.inner.lock().await;
        inner.snapshot = state.clone();
        inner.leaderboard = entries.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use renown_core::EpochDay;

    #[tokio::test]
    async fn test_checkin_commit_enrolls_once() {
        let store = MemoryStore::new();
        let a = AccountId::new("0xa");
        let stats = GmStats {
            total: 1,
            streak: 1,
            best_streak: 1,
            last_checkin_day: Some(EpochDay(10)),
            first_checkin_day: Some(EpochDay(10)),
        };
        store.commit_checkin(&a, &stats, true).await.unwrap();
        store.commit_checkin(&a, &stats, true).await.unwrap();

        assert_eq!(store.gm_stats(&a).await.unwrap(), Some(stats));
        assert_eq!(store.candidate_count().await.unwrap(), 1);
        assert!(!store.enroll_candidate(&a).await.unwrap());
    }

    #[tokio::test]
    async fn test_candidates_window_is_clipped() {
        let store = MemoryStore::new();
        for name in ["0x1", "0x2", "0x3"] {
            assert!(store.enroll_candidate(&AccountId::new(name)).await.unwrap());
        }
        let window = store.candidates(1, 10).await.unwrap();
        assert_eq!(window, vec![AccountId::new("0x2"), AccountId::new("0x3")]);
        assert!(store.candidates(5, 2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_commit_replaces_both_records() {
        let store = MemoryStore::new();
        let state = SnapshotState {
            cursor: 7,
            ..SnapshotState::default()
        };
        let entries = vec![LeaderboardEntry {
            account: AccountId::new("0xa"),
            score: 99,
            last_updated: EpochDay(3),
        }];
        store.commit_snapshot(&state, &entries).await.unwrap();
        assert_eq!(store.snapshot_state().await.unwrap().cursor, 7);
        assert_eq!(store.leaderboard().await.unwrap(), entries);
    }
}
