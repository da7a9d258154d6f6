// crates/renown-core/src/lib.rs
//
// renown-core: Core types, traits, and the epoch clock for the Renown engine.
//
// This is the leaf crate that all other crates in the workspace depend on.
// It defines account identity, the epoch-day clock, the persisted state
// records (GM stats, snapshot state, leaderboard entries), the error
// taxonomy, and the trait seams to the external activity ledger and to the
// state store.

pub mod account;
pub mod epoch;
pub mod error;
pub mod signals;
pub mod state;
pub mod traits;

// Re-export key types for ergonomic access from downstream crates.
// Usage: `use renown_core::AccountId;`

pub use account::AccountId;
pub use epoch::{Clock, EpochDay, ManualClock, SystemClock, SECONDS_PER_DAY};
pub use error::{ErrorClass, RenownError};
pub use signals::ActivitySignals;
pub use state::{GmStats, LeaderboardEntry, SnapshotState};
pub use traits::{ActivityLedger, RewardSink, StateStore};
