// crates/renown-leaderboard/src/cache.rs
//
// Read-model cache for ledger activity signals.
//
// Entries are served while younger than the TTL and refetched afterwards.
// Expired entries are dropped on every ranking pass, so the cache only
// holds accounts seen within the last TTL.
// Only successful reads are cached, so an unavailable read is retried on
// the next request instead of being remembered as zero.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

use renown_core::{AccountId, ActivitySignals};

/// TTL cache of `ActivitySignals` keyed by account.
#[derive(Debug)]
pub struct SignalCache {
    ttl: Duration,
    entries: RwLock<HashMap<AccountId, (ActivitySignals, Instant)>>,
}

impl SignalCache {
    /// Create an empty cache with the given staleness bound.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Cached signals for `account`, if still fresh.
    pub async fn get(&self, account: &AccountId) -> Option<ActivitySignals> {
        let entries = self.entries.read().await;
        entries
            .get(account)
            .filter(|(_, fetched_at)| fetched_at.elapsed() <= self.ttl)
            .map(|(signals, _)| *signals)
    }

    /// Store freshly fetched signals.
    pub async fn insert(&self, account: AccountId, signals: ActivitySignals) {
        self.entries
            .write()
            .await
            .insert(account, (signals, Instant::now()));
    }

    /// Drop one account's entry (e.g. after a known write).
    pub async fn invalidate(&self, account: &AccountId) {
        self.entries.write().await.remove(account);
    }

    /// Drop expired entries.
    pub async fn purge_expired(&self) {
        let ttl = self.ttl;
        self.entries
            .write()
            .await
            .retain(|_, (_, fetched_at)| fetched_at.elapsed() <= ttl);
    }

    /// Number of entries held, fresh or not.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals(articles: u64) -> ActivitySignals {
        ActivitySignals {
            articles,
            ..ActivitySignals::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let cache = SignalCache::new(Duration::from_secs(60));
        let a = AccountId::new("0xa");
        cache.insert(a.clone(), signals(3)).await;
        assert_eq!(cache.get(&a).await, Some(signals(3)));

        tokio::time::advance(Duration::from_secs(60)).await;
        assert_eq!(cache.get(&a).await, Some(signals(3)));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(cache.get(&a).await, None);

        cache.purge_expired().await;
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_invalidate() {
        let cache = SignalCache::new(Duration::from_secs(60));
        let a = AccountId::new("0xa");
        cache.insert(a.clone(), signals(1)).await;
        cache.invalidate(&a).await;
        assert_eq!(cache.get(&a).await, None);
    }
}
