// crates/renown-cli/src/config.rs
//
// CLI view of the shared Renown TOML configuration file.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use renown_leaderboard::{ReadConfig, SnapshotConfig};
use renown_scoring::ScoreComponents;

/// Settings the CLI reads from the config file. Daemon-only keys are
/// ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    #[serde(default = "default_ledger_path")]
    pub ledger_path: String,

    #[serde(default)]
    pub scoring: ScoreComponents,

    #[serde(default)]
    pub snapshot: SnapshotConfig,

    #[serde(default)]
    pub reads: ReadConfig,
}

fn default_data_dir() -> String {
    "~/.renown/data".to_string()
}

fn default_ledger_path() -> String {
    "~/.renown/ledger.json".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            ledger_path: default_ledger_path(),
            scoring: ScoreComponents::default(),
            snapshot: SnapshotConfig::default(),
            reads: ReadConfig::default(),
        }
    }
}

impl CliConfig {
    /// Load the config file, or the defaults if it does not exist.
    ///
    /// A file that exists but does not parse is an error.
    pub fn load_or_default(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        if !Path::new(path).exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        let config: CliConfig = toml::from_str(&contents)
            .map_err(|e| format!("Invalid config file {}: {}", path, e))?;
        Ok(config)
    }
}

/// Expand `~` at the start of a path to the user's home directory.
pub fn expand_tilde(path: &str) -> String {
    if path.starts_with("~/") {
        if let Some(home) = dirs::home_dir() {
            return format!("{}{}", home.display(), &path[1..]);
        }
    }
    path.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let cfg = CliConfig::load_or_default("/nonexistent/renown/config.toml").unwrap();
        assert_eq!(cfg.ledger_path, "~/.renown/ledger.json");
        assert_eq!(cfg.reads.display_size, 20);
    }

    #[test]
    fn test_daemon_keys_ignored() {
        let cfg: CliConfig = toml::from_str(
            r#"
            keeper_account = "0xkeeper"
            log_level = "debug"
            [reads]
            display_size = 5
            "#,
        )
        .unwrap();
        assert_eq!(cfg.reads.display_size, 5);
        assert_eq!(cfg.snapshot.max_leaderboard_size, 100);
    }

    #[test]
    fn test_expand_tilde_leaves_absolute_paths() {
        assert_eq!(expand_tilde("/var/lib/renown"), "/var/lib/renown");
    }
}
