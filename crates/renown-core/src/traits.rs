// crates/renown-core/src/traits.rs

use async_trait::async_trait;

use crate::account::AccountId;
use crate::error::RenownError;
use crate::signals::ActivitySignals;
use crate::state::{GmStats, LeaderboardEntry, SnapshotState};

/// Read interface to the external activity ledger.
///
/// All methods are pure, side-effect-free queries. A failed or timed-out
/// read must be reported as `RenownError::StaleOrUnavailableRead`, never
/// as a zero count.
#[async_trait]
pub trait ActivityLedger: Send + Sync {
    /// Number of articles the account has published.
    async fn article_count(&self, account: &AccountId) -> Result<u64, RenownError>;

    /// Number of funding proposals the account has created.
    async fn proposal_count(&self, account: &AccountId) -> Result<u64, RenownError>;

    /// Number of proposals the account has funded.
    async fn funded_proposal_count(&self, account: &AccountId) -> Result<u64, RenownError>;

    /// Total tips given by the account.
    async fn tips_given_value(&self, account: &AccountId) -> Result<u64, RenownError>;

    /// Whether the account holds a membership/publisher credential.
    async fn has_qualifying_credential(&self, account: &AccountId) -> Result<bool, RenownError>;

    /// Whether the account holds a qualifying profile (required to say GM).
    async fn has_qualifying_profile(&self, account: &AccountId) -> Result<bool, RenownError>;

    /// Read all four activity counters. Fails as a whole if any read fails.
    async fn signals(&self, account: &AccountId) -> Result<ActivitySignals, RenownError> {
        Ok(ActivitySignals {
            articles: self.article_count(account).await?,
            proposals_created: self.proposal_count(account).await?,
            proposals_funded: self.funded_proposal_count(account).await?,
            tips_given: self.tips_given_value(account).await?,
        })
    }
}

/// Single atomic writes against the external ledger.
#[async_trait]
pub trait RewardSink: Send + Sync {
    /// Mint/credit `amount` units of the reward emoji `emoji` to `account`.
    async fn credit_emoji(
        &self,
        account: &AccountId,
        emoji: &str,
        amount: u64,
    ) -> Result<(), RenownError>;
}

/// Persistence for the engine's own state.
///
/// Every `commit_*` method must be all-or-nothing: either every listed
/// record is written or none is.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the GM stats of an account (`None` if it never checked in).
    async fn gm_stats(&self, account: &AccountId) -> Result<Option<GmStats>, RenownError>;

    /// Atomically write the account's new GM stats and, when `enroll` is
    /// set and the account is not a candidate yet, append it to the
    /// candidate arena.
    async fn commit_checkin(
        &self,
        account: &AccountId,
        stats: &GmStats,
        enroll: bool,
    ) -> Result<(), RenownError>;

    /// Append an account to the candidate arena. Returns `false` if it was
    /// already enrolled.
    async fn enroll_candidate(&self, account: &AccountId) -> Result<bool, RenownError>;

    /// Number of enrolled candidates.
    async fn candidate_count(&self) -> Result<u64, RenownError>;

    /// Candidates at arena indices `[start, start + len)`, clipped to the
    /// arena size.
    async fn candidates(&self, start: u64, len: u64) -> Result<Vec<AccountId>, RenownError>;

    /// Load the snapshot state (default state if never committed).
    async fn snapshot_state(&self) -> Result<SnapshotState, RenownError>;

    /// Load the materialized leaderboard entries.
    async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, RenownError>;

    /// Atomically write the snapshot state together with the leaderboard.
    async fn commit_snapshot(
        &self,
        state: &SnapshotState,
        entries: &[LeaderboardEntry],
    ) -> Result<(), RenownError>;
}
