// crates/renown-leaderboard/src/reads.rs
//
// Chunked batch reads against the activity ledger.
//
// Accounts are fetched in chunks of at most `chunk_size` concurrent reads;
// chunks run one after another, each under its own deadline. A failed or
// timed-out chunk only marks its own unfinished accounts unavailable;
// results already fetched (in earlier chunks or earlier in the same chunk)
// are kept.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;

use renown_core::{AccountId, ActivityLedger, ActivitySignals};

/// Outcome of a batch read.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Successfully fetched signals.
    pub fetched: HashMap<AccountId, ActivitySignals>,
    /// Accounts whose data is stale or unavailable, with the reason.
    pub unavailable: BTreeMap<AccountId, String>,
}

impl BatchReport {
    /// Whether every requested account was fetched.
    pub fn is_complete(&self) -> bool {
        self.unavailable.is_empty()
    }
}

/// Fetch activity signals for `accounts`.
pub async fn fetch_signals(
    ledger: Arc<dyn ActivityLedger>,
    accounts: &[AccountId],
    chunk_size: usize,
    chunk_timeout: Duration,
) -> BatchReport {
    let mut report = BatchReport::default();

    for chunk in accounts.chunks(chunk_size.max(1)) {
        fetch_chunk(&ledger, chunk, chunk_timeout, &mut report).await;
    }

    if !report.is_complete() {
        tracing::warn!(
            "Batch read: {} of {} accounts unavailable",
            report.unavailable.len(),
            accounts.len()
        );
    }
    report
}

async fn fetch_chunk(
    ledger: &Arc<dyn ActivityLedger>,
    chunk: &[AccountId],
    chunk_timeout: Duration,
    report: &mut BatchReport,
) {
    let mut pending: HashSet<AccountId> = chunk.iter().cloned().collect();
    let mut set = JoinSet::new();
    for account in pending.iter().cloned() {
        let ledger = ledger.clone();
        set.spawn(async move {
            let result = ledger.signals(&account).await;
            (account, result)
        });
    }

    let deadline = tokio::time::Instant::now() + chunk_timeout;
    let mut failure = "read task failed".to_string();
    loop {
        match tokio::time::timeout_at(deadline, set.join_next()).await {
            Ok(Some(Ok((account, Ok(signals))))) => {
                pending.remove(&account);
                report.fetched.insert(account, signals);
            }
            Ok(Some(Ok((account, Err(e))))) => {
                pending.remove(&account);
                tracing::debug!("Read for {} failed: {}", account, e);
                report.unavailable.insert(account, e.to_string());
            }
            Ok(Some(Err(join_err))) => {
                // The account stays pending and is reported below.
                tracing::warn!("Ledger read task aborted: {}", join_err);
            }
            Ok(None) => break,
            Err(_) => {
                set.abort_all();
                failure = format!("read timed out after {} ms", chunk_timeout.as_millis());
                break;
            }
        }
    }

    for account in pending {
        report.unavailable.insert(account, failure.clone());
    }
}
