// crates/renown-store/src/ledger.rs
//
// File-backed activity ledger.
//
// The real platform keeps activity counts and credentials on an external
// ledger. `FileLedger` mirrors that ledger from a JSON export so the daemon
// and CLI can run against a local copy:
//
//   {
//     "accounts": {
//       "0xabc": { "articles": 3, "profile": true, "credential": true }
//     },
//     "emoji_balances": { "0xabc": { "trophy": 2 } }
//   }
//
// If a reload fails, the ledger turns stale and every read reports
// `StaleOrUnavailableRead` until the next successful reload; the previous
// contents are kept but never served as fresh.
//
// Activity counts belong to the exporter and are never written back. The
// only write is an emoji credit, which re-reads the file, bumps one entry
// under `emoji_balances` and replaces the file atomically before the credit
// is reported as done.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use renown_core::{AccountId, ActivityLedger, RenownError, RewardSink};

/// Ledger-side record of one account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerRecord {
    pub articles: u64,
    pub proposals_created: u64,
    pub proposals_funded: u64,
    pub tips_given: u64,
    /// Holds a membership/publisher credential.
    pub credential: bool,
    /// Holds a qualifying profile.
    pub profile: bool,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct LedgerFile {
    accounts: BTreeMap<AccountId, LedgerRecord>,
    emoji_balances: BTreeMap<AccountId, BTreeMap<String, u64>>,
}

/// JSON-file mirror of the external activity ledger.
#[derive(Debug, Default)]
pub struct FileLedger {
    path: Option<PathBuf>,
    records: RwLock<HashMap<AccountId, LedgerRecord>>,
    emoji: RwLock<BTreeMap<AccountId, BTreeMap<String, u64>>>,
    unavailable: RwLock<HashSet<AccountId>>,
    stale: AtomicBool,
}

impl FileLedger {
    /// Create an empty ledger not tied to any file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a ledger from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RenownError> {
        let path = path.as_ref().to_path_buf();
        let file = read_file(&path)?;
        let ledger = Self {
            path: Some(path),
            ..Self::default()
        };
        ledger.install(file);
        Ok(ledger)
    }

    /// Re-read the backing file.
    ///
    /// On failure the ledger is marked stale and the error is returned.
    pub fn reload(&self) -> Result<(), RenownError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        match read_file(path) {
            Ok(file) => {
                self.install(file);
                self.stale.store(false, Ordering::SeqCst);
                tracing::debug!("Reloaded ledger from {}", path.display());
                Ok(())
            }
            Err(e) => {
                self.stale.store(true, Ordering::SeqCst);
                tracing::warn!("Ledger reload from {} failed: {}", path.display(), e);
                Err(e)
            }
        }
    }

    /// Insert or replace an account record.
    pub fn upsert(&self, account: AccountId, record: LedgerRecord) {
        write(&self.records).insert(account, record);
    }

    /// Apply an in-place change to an account record (created if missing).
    pub fn update(&self, account: &AccountId, change: impl FnOnce(&mut LedgerRecord)) {
        let mut records = write(&self.records);
        change(records.entry(account.clone()).or_default());
    }

    /// Mark a single account's record as unreadable (e.g. while it is being
    /// re-imported) or readable again.
    pub fn set_unavailable(&self, account: &AccountId, unavailable: bool) {
        let mut set = write(&self.unavailable);
        if unavailable {
            set.insert(account.clone());
        } else {
            set.remove(account);
        }
    }

    /// Whether the last reload failed.
    pub fn is_stale(&self) -> bool {
        self.stale.load(Ordering::SeqCst)
    }

    /// Emoji balance of an account.
    pub fn emoji_balance(&self, account: &AccountId, emoji: &str) -> u64 {
        read(&self.emoji)
            .get(account)
            .and_then(|m| m.get(emoji))
            .copied()
            .unwrap_or(0)
    }

    fn install(&self, file: LedgerFile) {
        *write(&self.records) = file.accounts.into_iter().collect();
        *write(&self.emoji) = file.emoji_balances;
    }

    /// Fetch a record for reading, honouring staleness and per-account
    /// unavailability. Unknown accounts read as an empty record.
    fn record(&self, account: &AccountId) -> Result<LedgerRecord, RenownError> {
        if self.is_stale() {
            return Err(RenownError::unavailable(account, "ledger mirror is stale"));
        }
        if read(&self.unavailable).contains(account) {
            return Err(RenownError::unavailable(account, "ledger record unavailable"));
        }
        Ok(read(&self.records).get(account).cloned().unwrap_or_default())
    }
}

fn read_file(path: &Path) -> Result<LedgerFile, RenownError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| RenownError::Ledger(format!("reading {}: {}", path.display(), e)))?;
    Ok(serde_json::from_str(&contents)?)
}

/// Add `amount` to `emoji_balances[account][emoji]` in the file at `path`,
/// leaving every other key as the file has it. Returns the new balance.
fn persist_credit(
    path: &Path,
    account: &AccountId,
    emoji: &str,
    amount: u64,
) -> Result<u64, RenownError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| RenownError::Ledger(format!("reading {}: {}", path.display(), e)))?;
    let mut doc: Value = serde_json::from_str(&contents)?;
    let root = as_object(&mut doc, path, "ledger file")?;
    let balances = as_object(
        root.entry("emoji_balances")
            .or_insert_with(|| Value::Object(Map::new())),
        path,
        "emoji_balances",
    )?;

    // Reuse the exporter's spelling of the account key if it has one.
    let key = balances
        .keys()
        .find(|k| AccountId::new(k.as_str()) == *account)
        .cloned()
        .unwrap_or_else(|| account.to_string());
    let held = as_object(
        balances
            .entry(key)
            .or_insert_with(|| Value::Object(Map::new())),
        path,
        "emoji balance",
    )?;
    let current = match held.get(emoji) {
        None => 0,
        Some(v) => v.as_u64().ok_or_else(|| {
            RenownError::Ledger(format!(
                "{}: {} balance of {} is not a count",
                path.display(),
                emoji,
                account
            ))
        })?,
    };
    let balance = current.saturating_add(amount);
    held.insert(emoji.to_string(), Value::from(balance));

    write_replacing(path, &serde_json::to_vec_pretty(&doc)?)?;
    Ok(balance)
}

fn as_object<'a>(
    value: &'a mut Value,
    path: &Path,
    what: &str,
) -> Result<&'a mut Map<String, Value>, RenownError> {
    value
        .as_object_mut()
        .ok_or_else(|| RenownError::Ledger(format!("{}: {} is not an object", path.display(), what)))
}

/// Write to a sibling temp file, then rename it over `path`.
fn write_replacing(path: &Path, bytes: &[u8]) -> Result<(), RenownError> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    std::fs::write(&tmp, bytes)
        .map_err(|e| RenownError::Ledger(format!("writing {}: {}", tmp.display(), e)))?;
    std::fs::rename(&tmp, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp);
        RenownError::Ledger(format!("replacing {}: {}", path.display(), e))
    })
}

// The guarded maps stay consistent across a panic, so poisoning is ignored.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}

#[async_trait]
impl ActivityLedger for FileLedger {
    async fn article_count(&self, account: &AccountId) -> Result<u64, RenownError> {
        Ok(self.record(account)?.articles)
    }

    async fn proposal_count(&self, account: &AccountId) -> Result<u64, RenownError> {
        Ok(self.record(account)?.proposals_created)
    }

    async fn funded_proposal_count(&self, account: &AccountId) -> Result<u64, RenownError> {
        Ok(self.record(account)?.proposals_funded)
    }

    async fn tips_given_value(&self, account: &AccountId) -> Result<u64, RenownError> {
        Ok(self.record(account)?.tips_given)
    }

    async fn has_qualifying_credential(&self, account: &AccountId) -> Result<bool, RenownError> {
        Ok(self.record(account)?.credential)
    }

    async fn has_qualifying_profile(&self, account: &AccountId) -> Result<bool, RenownError> {
        Ok(self.record(account)?.profile)
    }
}

#[async_trait]
impl RewardSink for FileLedger {
    async fn credit_emoji(
        &self,
        account: &AccountId,
        emoji: &str,
        amount: u64,
    ) -> Result<(), RenownError> {
        if self.is_stale() {
            return Err(RenownError::Ledger(
                "cannot credit reward while the ledger mirror is stale".to_string(),
            ));
        }
        // Held across the file update so credits never interleave.
        let mut balances = write(&self.emoji);
        let balance = match &self.path {
            Some(path) => persist_credit(path, account, emoji, amount)?,
            None => balances
                .get(account)
                .and_then(|m| m.get(emoji))
                .copied()
                .unwrap_or(0)
                .saturating_add(amount),
        };
        balances
            .entry(account.clone())
            .or_default()
            .insert(emoji.to_string(), balance);
        tracing::info!("Credited {} x {} to {}", amount, emoji, account);
        Ok(())
    }
}
