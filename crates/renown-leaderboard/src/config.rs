// crates/renown-leaderboard/src/config.rs
//
// Tunables for the snapshot write path and the presenter read path.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use renown_core::SECONDS_PER_DAY;

/// Snapshot scheduler settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    /// Maximum number of leaderboard entries (MAX_LEADERBOARD_SIZE).
    pub max_leaderboard_size: usize,
    /// Candidates rescored per update call (MAX_CANDIDATES_PER_UPDATE).
    pub max_candidates_per_update: u64,
    /// Points added to the triggering account's accrued reward when its
    /// call completes a sweep (UPDATE_REWARD_POINTS).
    pub update_reward_points: u64,
    /// Emoji credited to the triggering account (UPDATE_REWARD_EMOJI).
    pub update_reward_emoji: String,
    /// Units of the emoji credited per completed sweep.
    pub update_reward_emoji_amount: u64,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            max_leaderboard_size: 100,
            max_candidates_per_update: 50,
            update_reward_points: 10,
            update_reward_emoji: "trophy".to_string(),
            update_reward_emoji_amount: 1,
        }
    }
}

impl SnapshotConfig {
    /// Candidates per window, never zero.
    pub fn effective_window(&self) -> u64 {
        self.max_candidates_per_update.max(1)
    }
}

/// Read-path settings for batch reads and the presenter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadConfig {
    /// Accounts fetched concurrently per chunk.
    pub chunk_size: usize,
    /// Deadline for one chunk of reads, in milliseconds.
    pub read_timeout_ms: u64,
    /// How long cached ledger signals stay fresh, in seconds.
    pub cache_ttl_secs: u64,
    /// Rows shown by the presenter.
    pub display_size: usize,
}

impl Default for ReadConfig {
    fn default() -> Self {
        Self {
            chunk_size: 16,
            read_timeout_ms: 5_000,
            cache_ttl_secs: 300,
            display_size: 20,
        }
    }
}

impl ReadConfig {
    /// Chunk deadline.
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    /// Cache TTL, clamped to one epoch day.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs.min(SECONDS_PER_DAY as u64))
    }

    /// Chunk size, never zero.
    pub fn effective_chunk_size(&self) -> usize {
        self.chunk_size.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_ttl_clamped_to_one_day() {
        let cfg = ReadConfig {
            cache_ttl_secs: 10 * 86_400,
            ..ReadConfig::default()
        };
        assert_eq!(cfg.cache_ttl(), Duration::from_secs(86_400));
        assert_eq!(ReadConfig::default().cache_ttl(), Duration::from_secs(300));
    }

    #[test]
    fn test_zero_chunk_size_is_one() {
        let cfg = ReadConfig {
            chunk_size: 0,
            ..ReadConfig::default()
        };
        assert_eq!(cfg.effective_chunk_size(), 1);
    }

    #[test]
    fn test_zero_window_is_one() {
        let cfg = SnapshotConfig {
            max_candidates_per_update: 0,
            ..SnapshotConfig::default()
        };
        assert_eq!(cfg.effective_window(), 1);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let cfg: SnapshotConfig = toml::from_str("max_leaderboard_size = 10").unwrap();
        assert_eq!(cfg.max_leaderboard_size, 10);
        assert_eq!(cfg.max_candidates_per_update, 50);
        assert_eq!(cfg.update_reward_emoji, "trophy");
    }
}
