// crates/renown-core/src/state.rs
//
// Persisted state records for the Renown engine.
//
// These records live in the `StateStore` (the ledger-side persistence).
// `GmStats` is mutated only by the streak tracker; `SnapshotState` and the
// leaderboard entries only by the snapshot scheduler.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::account::AccountId;
use crate::epoch::EpochDay;

/// Per-account daily check-in ("GM") statistics.
///
/// Created lazily on the first check-in and never deleted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GmStats {
    /// Total number of check-ins ever made.
    pub total: u64,
    /// Consecutive-day streak ending at `last_checkin_day`.
    pub streak: u64,
    /// Longest streak ever reached.
    #[serde(default)]
    pub best_streak: u64,
    /// Day of the most recent check-in (`None` before the first one).
    pub last_checkin_day: Option<EpochDay>,
    /// Day of the first check-in.
    #[serde(default)]
    pub first_checkin_day: Option<EpochDay>,
}

impl GmStats {
    /// Whether the account already checked in on `day`.
    pub fn checked_in_on(&self, day: EpochDay) -> bool {
        self.last_checkin_day == Some(day)
    }
}

/// One row of the materialized top-N leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub account: AccountId,
    pub score: u64,
    /// Day the score was last recomputed by a snapshot window.
    pub last_updated: EpochDay,
}

/// Process-wide snapshot scheduler state.
///
/// Created at system initialization and never destroyed. Mutated only
/// inside the snapshot update operation, and committed atomically together
/// with the leaderboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotState {
    /// Day of the last completed sweep (`None` before the first one).
    pub last_update_day: Option<EpochDay>,
    /// Unix time of the last completed sweep.
    pub last_update_time: Option<i64>,
    /// Index into the candidate arena where the next window starts.
    pub cursor: u64,
    /// Day on which the in-flight sweep started, if one is in progress.
    #[serde(default)]
    pub sweep_started_day: Option<EpochDay>,
    /// Accrued updater reward points per account.
    pub updater_rewards: BTreeMap<AccountId, u64>,
}

impl SnapshotState {
    /// Reward points accrued by `account` for triggering snapshots.
    pub fn accrued_reward(&self, account: &AccountId) -> u64 {
        self.updater_rewards.get(account).copied().unwrap_or(0)
    }
}
