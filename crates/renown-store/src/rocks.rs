// crates/renown-store/src/rocks.rs
//
// RocksDB-backed persistence for the Renown engine state.
//
// Key format:
//   - `gm:{account}`            -> JSON GmStats
//   - `candidate:{index:020}`   -> account id (append-only arena)
//   - `candidate_of:{account}`  -> arena index (enrollment index only)
//   - `candidate:count`         -> arena length (u64, big-endian)
//   - `snapshot:state`          -> JSON SnapshotState
//   - `snapshot:leaderboard`    -> JSON Vec<LeaderboardEntry>
//
// Every commit goes through a single `WriteBatch`, which RocksDB applies
// atomically. Read-modify-write sequences (enrollment) are serialized by
// `write_lock`.

use std::sync::Mutex;

use async_trait::async_trait;
use rocksdb::{DBWithThreadMode, MultiThreaded, Options, WriteBatch};

use renown_core::{AccountId, GmStats, LeaderboardEntry, RenownError, SnapshotState, StateStore};

const CANDIDATE_COUNT_KEY: &[u8] = b"candidate:count";
const SNAPSHOT_STATE_KEY: &[u8] = b"snapshot:state";
const LEADERBOARD_KEY: &[u8] = b"snapshot:leaderboard";

/// RocksDB wrapper implementing the `StateStore` trait.
#[derive(Debug)]
pub struct RocksStateStore {
    db: DBWithThreadMode<MultiThreaded>,
    write_lock: Mutex<()>,
}

impl RocksStateStore {
    /// Open a RocksDB database at the given filesystem path.
    ///
    /// Creates the database directory if it does not exist.
    pub fn open(path: &str) -> Result<Self, RenownError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);

        let db = DBWithThreadMode::<MultiThreaded>::open(&opts, path).map_err(|e| {
            RenownError::Storage(format!("Failed to open RocksDB at {}: {}", path, e))
        })?;

        Ok(Self {
            db,
            write_lock: Mutex::new(()),
        })
    }

    fn gm_key(account: &AccountId) -> Vec<u8> {
        format!("gm:{}", account).into_bytes()
    }

    fn candidate_key(index: u64) -> Vec<u8> {
        format!("candidate:{:020}", index).into_bytes()
    }

    fn candidate_of_key(account: &AccountId) -> Vec<u8> {
        format!("candidate_of:{}", account).into_bytes()
    }

    /// Get raw bytes from RocksDB, mapping errors to RenownError::Storage.
    fn get_raw(&self, key: &[u8]) -> Result<Option<Vec<u8>>, RenownError> {
        self.db
            .get(key)
            .map_err(|e| RenownError::Storage(format!("RocksDB get failed: {}", e)))
    }

    /// Apply a write batch atomically.
    fn write(&self, batch: WriteBatch) -> Result<(), RenownError> {
        self.db
            .write(batch)
            .map_err(|e| RenownError::Storage(format!("RocksDB batch write failed: {}", e)))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ()> {
        // The guard protects no data, so a poisoned lock is still usable.
        self.write_lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn count_sync(&self) -> Result<u64, RenownError> {
        match self.get_raw(CANDIDATE_COUNT_KEY)? {
            Some(bytes) => {
                let arr: [u8; 8] = bytes.as_slice().try_into().map_err(|_| {
                    RenownError::InvalidState(format!(
                        "candidate count has {} bytes, expected 8",
                        bytes.len()
                    ))
                })?;
                Ok(u64::from_be_bytes(arr))
            }
            None => Ok(0),
        }
    }

    fn is_enrolled(&self, account: &AccountId) -> Result<bool, RenownError> {
        Ok(self.get_raw(&Self::candidate_of_key(account))?.is_some())
    }

    /// Stage the enrollment writes for `account` into `batch`.
    ///
    /// Caller must hold `write_lock` until the batch is written.
    fn stage_enrollment(&self, batch: &mut WriteBatch, account: &AccountId) -> Result<bool, RenownError> {
        if self.is_enrolled(account)? {
            return Ok(false);
        }
        let index = self.count_sync()?;
        batch.put(Self::candidate_key(index), account.as_str().as_bytes());
        batch.put(Self::candidate_of_key(account), index.to_be_bytes());
        batch.put(CANDIDATE_COUNT_KEY, (index + 1).to_be_bytes());
        Ok(true)
    }
}

#[async_trait]
impl StateStore for RocksStateStore {
    async fn gm_stats(&self, account: &AccountId) -> Result<Option<GmStats>, RenownError> {
        match self.get_raw(&Self::gm_key(account))? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn commit_checkin(
        &self,
        account: &AccountId,
        stats: &GmStats,
        enroll: bool,
    ) -> Result<(), RenownError> {
        let _guard = self.lock();
        let mut batch = WriteBatch::default();
        batch.put(Self::gm_key(account), serde_json::to_vec(stats)?);
        if enroll {
            self.stage_enrollment(&mut batch, account)?;
        }
        self.write(batch)
    }

    async fn enroll_candidate(&self, account: &AccountId) -> Result<bool, RenownError> {
        let _guard = self.lock();
        let mut batch = WriteBatch::default();
        let added = self.stage_enrollment(&mut batch, account)?;
        if added {
            self.write(batch)?;
        }
        Ok(added)
    }

    async fn candidate_count(&self) -> Result<u64, RenownError> {
        self.count_sync()
    }

    async fn candidates(&self, start: u64, len: u64) -> Result<Vec<AccountId>, RenownError> {
        let count = self.count_sync()?;
        let end = start.saturating_add(len).min(count);
        let mut out = Vec::with_capacity(end.saturating_sub(start) as usize);
        for index in start..end {
            let bytes = self.get_raw(&Self::candidate_key(index))?.ok_or_else(|| {
                RenownError::InvalidState(format!("candidate arena missing index {}", index))
            })?;
            let raw = String::from_utf8(bytes)
                .map_err(|e| RenownError::Serialization(format!("candidate {}: {}", index, e)))?;
            out.push(AccountId::new(raw));
        }
        Ok(out)
    }

    async fn snapshot_state(&self) -> Result<SnapshotState, RenownError> {
        match self.get_raw(SNAPSHOT_STATE_KEY)? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(SnapshotState::default()),
        }
    }

    async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, RenownError> {
        match self.get_raw(LEADERBOARD_KEY)? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(Vec::new()),
        }
    }

    async fn commit_snapshot(
        &self,
        state: &SnapshotState,
        entries: &[LeaderboardEntry],
    ) -> Result<(), RenownError> {
        let mut batch = WriteBatch::default();
        batch.put(SNAPSHOT_STATE_KEY, serde_json::to_vec(state)?);
        batch.put(LEADERBOARD_KEY, serde_json::to_vec(entries)?);
        self.write(batch)
    }
}
