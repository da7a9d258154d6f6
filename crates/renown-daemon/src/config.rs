// crates/renown-daemon/src/config.rs
//
// Runtime configuration for the Renown daemon.
// Loaded from a TOML file or populated with sensible defaults.

use serde::Deserialize;
use std::fs;

use renown_leaderboard::SnapshotConfig;
use renown_scoring::ScoreComponents;

/// Runtime configuration for the daemon.
///
/// The file is shared with the CLI, so sections the daemon does not use
/// (such as `[reads]`) are ignored here.
#[derive(Debug, Clone, Deserialize)]
pub struct DaemonConfig {
    /// Directory for local state (RocksDB).
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// JSON file mirroring the activity ledger.
    #[serde(default = "default_ledger_path")]
    pub ledger_path: String,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Account that triggers snapshot sweeps. When unset the keeper only
    /// reports whether an update is due.
    #[serde(default)]
    pub keeper_account: Option<String>,

    /// Seconds between keeper passes.
    #[serde(default = "default_keeper_interval_secs")]
    pub keeper_interval_secs: u64,

    /// Score weights.
    #[serde(default)]
    pub scoring: ScoreComponents,

    /// Snapshot scheduler settings.
    #[serde(default)]
    pub snapshot: SnapshotConfig,
}

fn default_data_dir() -> String {
    "~/.renown/data".to_string()
}

fn default_ledger_path() -> String {
    "~/.renown/ledger.json".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_keeper_interval_secs() -> u64 {
    3600
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            ledger_path: default_ledger_path(),
            log_level: default_log_level(),
            keeper_account: None,
            keeper_interval_secs: default_keeper_interval_secs(),
            scoring: ScoreComponents::default(),
            snapshot: SnapshotConfig::default(),
        }
    }
}

impl DaemonConfig {
    /// Load configuration from a TOML file at the given path.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        let config: DaemonConfig = toml::from_str(&contents)?;
        Ok(config)
    }
}
