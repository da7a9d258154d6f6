// crates/renown-core/src/signals.rs

use serde::{Deserialize, Serialize};

/// The activity counts an account has on the external ledger.
///
/// These are read fresh from the `ActivityLedger` on every score
/// computation (or through a bounded-staleness cache on the read path).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivitySignals {
    /// Articles published.
    pub articles: u64,
    /// Funding proposals created.
    pub proposals_created: u64,
    /// Proposals this account has funded.
    pub proposals_funded: u64,
    /// Tips given (ledger-reported value).
    pub tips_given: u64,
}
