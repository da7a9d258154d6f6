// crates/renown-core/src/error.rs

use thiserror::Error;

use crate::account::AccountId;
use crate::epoch::EpochDay;

/// Engine-wide error type for Renown.
#[derive(Debug, Error)]
pub enum RenownError {
    /// The account already said GM today.
    #[error("{account} already checked in on {day}")]
    AlreadyCheckedInToday { account: AccountId, day: EpochDay },

    /// The account holds no qualifying profile on the ledger.
    #[error("{0} holds no qualifying profile")]
    NoQualifyingProfile(AccountId),

    /// The leaderboard sweep has already completed for today.
    #[error("leaderboard already updated on {day}")]
    AlreadyUpdatedToday { day: EpochDay },

    /// The account lacks the membership/publisher credential needed to
    /// trigger a snapshot.
    #[error("{0} lacks a qualifying membership or publisher credential")]
    InsufficientCredential(AccountId),

    /// A ledger read failed or timed out. Never substituted with zero.
    #[error("read for {account} is stale or unavailable: {reason}")]
    StaleOrUnavailableRead { account: AccountId, reason: String },

    /// State store error (RocksDB, in-memory store).
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A write against the external ledger (e.g. reward credit) failed.
    #[error("Ledger error: {0}")]
    Ledger(String),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// Invalid state transition or corrupted state.
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// How a caller should react to an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The caller is not eligible right now; retrying the same call today
    /// will not help.
    Ineligible,
    /// Transient infrastructure failure; retry later.
    Transient,
    /// Bug, corrupted state or misconfiguration.
    Internal,
}

impl RenownError {
    /// Classify this error for retry decisions.
    pub fn class(&self) -> ErrorClass {
        match self {
            RenownError::AlreadyCheckedInToday { .. }
            | RenownError::NoQualifyingProfile(_)
            | RenownError::AlreadyUpdatedToday { .. }
            | RenownError::InsufficientCredential(_) => ErrorClass::Ineligible,
            RenownError::StaleOrUnavailableRead { .. }
            | RenownError::Storage(_)
            | RenownError::Ledger(_) => ErrorClass::Transient,
            RenownError::Serialization(_)
            | RenownError::Config(_)
            | RenownError::InvalidState(_) => ErrorClass::Internal,
        }
    }

    /// Whether retrying later may succeed.
    pub fn is_retryable(&self) -> bool {
        self.class() == ErrorClass::Transient
    }

    /// Shorthand for an unavailable read of `account`.
    pub fn unavailable(account: &AccountId, reason: impl Into<String>) -> Self {
        RenownError::StaleOrUnavailableRead {
            account: account.clone(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for RenownError {
    fn from(e: serde_json::Error) -> Self {
        RenownError::Serialization(e.to_string())
    }
}
