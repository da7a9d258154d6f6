// crates/renown-streak/src/lib.rs
//
// renown-streak: Daily check-in ("GM") tracking for the Renown engine.
//
// An account with a qualifying profile may say GM once per epoch day.
// Consecutive days extend its streak; any gap of two or more days resets
// the streak to one.

pub mod streak;
pub mod tracker;

pub use streak::next_stats;
pub use tracker::{CheckinEvent, StreakTracker, UserStats};
