// crates/renown-leaderboard/src/presenter.rs
//
// RankPresenter: the read model over the materialized leaderboard.
//
// The stored leaderboard is refreshed at most once per sweep, but tips,
// proposals and articles keep changing in between. The presenter takes the
// visible candidate set (the stored entries), rescores each from live
// ledger reads served through a TTL cache, and sorts by score descending
// with ascending account id as the tie-breaker.
//
// It never feeds back into the write path. Accounts whose reads fail keep
// their stored snapshot score, are flagged as not fresh, and are listed in
// `unavailable`.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use renown_core::{AccountId, ActivityLedger, LeaderboardEntry, RenownError, StateStore};
use renown_scoring::ScoreCalculator;

use crate::aggregator::rank_order;
use crate::cache::SignalCache;
use crate::config::ReadConfig;
use crate::reads::fetch_signals;

/// One displayed leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedRow {
    /// 1-based rank.
    pub rank: usize,
    pub account: AccountId,
    /// Live score, or the stored snapshot score when `fresh` is false.
    pub score: u64,
    /// Score stored by the last snapshot window, if the account is listed.
    pub snapshot_score: Option<u64>,
    /// Whether `score` was recomputed from live reads.
    pub fresh: bool,
}

/// A ranked, sliced view of the leaderboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RankedView {
    pub rows: Vec<RankedRow>,
    /// Accounts whose live data is stale or unavailable, with the reason.
    pub unavailable: BTreeMap<AccountId, String>,
}

/// Recomputes live rankings over the visible candidate set.
pub struct RankPresenter {
    calculator: ScoreCalculator,
    ledger: Arc<dyn ActivityLedger>,
    store: Arc<dyn StateStore>,
    cache: SignalCache,
    config: ReadConfig,
}

impl RankPresenter {
    /// Create a presenter.
    pub fn new(
        calculator: ScoreCalculator,
        ledger: Arc<dyn ActivityLedger>,
        store: Arc<dyn StateStore>,
        config: ReadConfig,
    ) -> Self {
        let cache = SignalCache::new(config.cache_ttl());
        Self {
            calculator,
            ledger,
            store,
            cache,
            config,
        }
    }

    /// The signal cache (exposed so callers can invalidate after writes).
    pub fn cache(&self) -> &SignalCache {
        &self.cache
    }

    /// Live ranking of the stored leaderboard, sliced to `display_size`.
    pub async fn present(&self) -> Result<RankedView, RenownError> {
        let entries = self.store.leaderboard().await?;
        self.rank(&entries, &[], self.config.display_size).await
    }

    /// Live ranking of the stored leaderboard plus `extra` accounts, sliced
    /// to `limit`.
    pub async fn present_with(
        &self,
        extra: &[AccountId],
        limit: usize,
    ) -> Result<RankedView, RenownError> {
        let entries = self.store.leaderboard().await?;
        self.rank(&entries, extra, limit).await
    }

    async fn rank(
        &self,
        entries: &[LeaderboardEntry],
        extra: &[AccountId],
        limit: usize,
    ) -> Result<RankedView, RenownError> {
        let mut stored: BTreeMap<AccountId, u64> = BTreeMap::new();
        for e in entries {
            stored.insert(e.account.clone(), e.score);
        }
        let mut visible: Vec<AccountId> = stored.keys().cloned().collect();
        for account in extra {
            if !stored.contains_key(account) && !visible.contains(account) {
                visible.push(account.clone());
            }
        }

        // Serve fresh cache hits, batch-fetch the rest.
        self.cache.purge_expired().await;
        let mut signals = BTreeMap::new();
        let mut misses = Vec::new();
        for account in &visible {
            match self.cache.get(account).await {
                Some(s) => {
                    signals.insert(account.clone(), s);
                }
                None => misses.push(account.clone()),
            }
        }
        let report = fetch_signals(
            self.ledger.clone(),
            &misses,
            self.config.effective_chunk_size(),
            self.config.read_timeout(),
        )
        .await;
        for (account, s) in report.fetched {
            self.cache.insert(account.clone(), s).await;
            signals.insert(account, s);
        }
        let mut unavailable = report.unavailable;

        let state = self.store.snapshot_state().await?;
        let mut scored: Vec<(AccountId, u64, bool)> = Vec::with_capacity(visible.len());
        for account in visible {
            match signals.get(&account) {
                Some(s) => {
                    let inputs = self.calculator.inputs_from(&account, *s, &state).await?;
                    let score = self.calculator.score_inputs(&inputs);
                    scored.push((account, score, true));
                }
                None => {
                    // Never rank an unreadable account as zero: keep the
                    // stored score if there is one, otherwise leave it out.
                    unavailable
                        .entry(account.clone())
                        .or_insert_with(|| "ledger read unavailable".to_string());
                    if let Some(&score) = stored.get(&account) {
                        scored.push((account, score, false));
                    }
                }
            }
        }

        scored.sort_by(|(a, a_score, _), (b, b_score, _)| rank_order(*a_score, a, *b_score, b));
        let rows = scored
            .into_iter()
            .take(limit)
            .enumerate()
            .map(|(i, (account, score, fresh))| RankedRow {
                rank: i + 1,
                snapshot_score: stored.get(&account).copied(),
                account,
                score,
                fresh,
            })
            .collect();

        Ok(RankedView { rows, unavailable })
    }
}
