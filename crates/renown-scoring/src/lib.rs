// crates/renown-scoring/src/lib.rs
//
// renown-scoring: Reputation score for the Renown engine.
//
// The score is a pure, weighted sum of an account's ledger activity counts,
// its GM check-in totals, a streak bonus, and the reward points it accrued
// by triggering leaderboard snapshots. Both the snapshot write path and the
// rank presenter read path compute it through this crate.

pub mod bonus;
pub mod calculator;
pub mod components;

pub use bonus::StreakBonus;
pub use calculator::ScoreCalculator;
pub use components::{score, ScoreBreakdown, ScoreComponents, ScoreInputs};
