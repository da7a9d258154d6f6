// crates/renown-leaderboard/src/lib.rs
//
// renown-leaderboard: Leaderboard materialization and presentation for the
// Renown engine.
//
// The snapshot scheduler advances a rotating cursor over the candidate
// arena at most once per completed sweep per epoch day, rescoring a bounded
// window of candidates per call into a capped top-N list. The rank
// presenter is the read model on top: it rescores the visible entries from
// live (cached) ledger reads so rankings reflect activity since the last
// sweep.

pub mod aggregator;
pub mod cache;
pub mod config;
pub mod presenter;
pub mod reads;
pub mod snapshot;

// Re-export key types for ergonomic access from downstream crates.
pub use aggregator::{rank_order, Leaderboard, Placement};
pub use cache::SignalCache;
pub use config::{ReadConfig, SnapshotConfig};
pub use presenter::{RankPresenter, RankedRow, RankedView};
pub use reads::{fetch_signals, BatchReport};
pub use snapshot::{SnapshotEvent, SnapshotOutcome, SnapshotPhase, SnapshotScheduler};
