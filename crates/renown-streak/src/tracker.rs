// crates/renown-streak/src/tracker.rs
//
// StreakTracker: the `say_gm` write path and the `user_stats` read path.
//
// `say_gm` is all-or-nothing: every check runs before the single atomic
// store commit, and the event is published only after that commit. The
// write lock stands in for the ledger's serialized writer, so two
// concurrent check-ins by the same account resolve to one success and one
// `AlreadyCheckedInToday`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, Mutex};

use renown_core::{AccountId, ActivityLedger, Clock, EpochDay, GmStats, RenownError, StateStore};

use crate::streak::next_stats;

/// Capacity of the check-in event channel.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Published after every successful check-in, for external reward hooks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckinEvent {
    pub account: AccountId,
    pub day: EpochDay,
    /// Streak after this check-in.
    pub streak: u64,
    /// Total check-ins after this check-in.
    pub total: u64,
}

/// Read-side view of an account's check-in stats.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub total: u64,
    pub streak: u64,
    pub best_streak: u64,
    /// Whether the account already checked in today.
    pub said_today: bool,
    pub last_checkin_day: Option<EpochDay>,
}

/// Records daily check-ins and derives streaks.
pub struct StreakTracker {
    ledger: Arc<dyn ActivityLedger>,
    store: Arc<dyn StateStore>,
    clock: Arc<dyn Clock>,
    events: broadcast::Sender<CheckinEvent>,
    write_lock: Mutex<()>,
}

impl StreakTracker {
    /// Create a tracker over the given ledger, store and clock.
    pub fn new(
        ledger: Arc<dyn ActivityLedger>,
        store: Arc<dyn StateStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            ledger,
            store,
            clock,
            events,
            write_lock: Mutex::new(()),
        }
    }

    /// Subscribe to check-in events.
    pub fn subscribe(&self) -> broadcast::Receiver<CheckinEvent> {
        self.events.subscribe()
    }

    /// Record today's check-in for `account`.
    ///
    /// The first successful check-in also enrolls the account as a
    /// leaderboard candidate, in the same commit.
    ///
    /// # Errors
    /// - `AlreadyCheckedInToday` if the account already said GM today.
    /// - `NoQualifyingProfile` if the account holds no qualifying profile.
    /// - `StaleOrUnavailableRead` if the profile check could not be read.
    pub async fn say_gm(&self, account: &AccountId) -> Result<GmStats, RenownError> {
        let _guard = self.write_lock.lock().await;
        let day = self.clock.today();

        let prev = self.store.gm_stats(account).await?;
        if prev.as_ref().is_some_and(|s| s.checked_in_on(day)) {
            return Err(RenownError::AlreadyCheckedInToday {
                account: account.clone(),
                day,
            });
        }

        if !self.ledger.has_qualifying_profile(account).await? {
            return Err(RenownError::NoQualifyingProfile(account.clone()));
        }

        let next = next_stats(prev.as_ref(), day)?;
        self.store.commit_checkin(account, &next, true).await?;

        tracing::info!(
            "GM from {} on {} (streak {}, total {})",
            account,
            day,
            next.streak,
            next.total
        );

        // No subscribers is fine: the event is advisory.
        let _ = self.events.send(CheckinEvent {
            account: account.clone(),
            day,
            streak: next.streak,
            total: next.total,
        });

        Ok(next)
    }

    /// Current check-in stats of `account`. Pure read.
    pub async fn user_stats(&self, account: &AccountId) -> Result<UserStats, RenownError> {
        let today = self.clock.today();
        let stats = self.store.gm_stats(account).await?.unwrap_or_default();
        Ok(UserStats {
            total: stats.total,
            streak: stats.streak,
            best_streak: stats.best_streak,
            said_today: stats.checked_in_on(today),
            last_checkin_day: stats.last_checkin_day,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use renown_core::ManualClock;
    use renown_store::{FileLedger, MemoryStore};

    struct Fixture {
        tracker: Arc<StreakTracker>,
        ledger: Arc<FileLedger>,
        store: Arc<MemoryStore>,
        clock: Arc<ManualClock>,
    }

    fn fixture(day: i64) -> Fixture {
        let ledger = Arc::new(FileLedger::new());
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::at_day(day));
        let tracker = Arc::new(StreakTracker::new(
            ledger.clone(),
            store.clone(),
            clock.clone(),
        ));
        Fixture {
            tracker,
            ledger,
            store,
            clock,
        }
    }

    fn with_profile(f: &Fixture, name: &str) -> AccountId {
        let account = AccountId::new(name);
        f.ledger.update(&account, |r| r.profile = true);
        account
    }

    #[tokio::test]
    async fn test_consecutive_days_and_reset() {
        let f = fixture(100);
        let a = with_profile(&f, "0xa");

        for expected in 1..=3 {
            let stats = f.tracker.say_gm(&a).await.unwrap();
            assert_eq!(stats.streak, expected);
            f.clock.advance_days(1);
        }

        // Now on day 103: skip it and check in on day 104.
        f.clock.advance_days(1);
        let stats = f.tracker.say_gm(&a).await.unwrap();
        assert_eq!(stats.streak, 1);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.best_streak, 3);
    }

    #[tokio::test]
    async fn test_second_checkin_same_day_rejected() {
        let f = fixture(10);
        let a = with_profile(&f, "0xa");
        f.tracker.say_gm(&a).await.unwrap();

        let err = f.tracker.say_gm(&a).await.unwrap_err();
        assert!(matches!(
            err,
            RenownError::AlreadyCheckedInToday { day: EpochDay(10), .. }
        ));
        assert_eq!(f.tracker.user_stats(&a).await.unwrap().total, 1);
    }

    #[tokio::test]
    async fn test_no_profile_rejected_without_mutation() {
        let f = fixture(10);
        let a = AccountId::new("0xnoprofile");
        let err = f.tracker.say_gm(&a).await.unwrap_err();
        assert!(matches!(err, RenownError::NoQualifyingProfile(_)));
        assert_eq!(f.store.gm_stats(&a).await.unwrap(), None);
        assert_eq!(f.store.candidate_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unreadable_profile_is_transient() {
        let f = fixture(10);
        let a = with_profile(&f, "0xa");
        f.ledger.set_unavailable(&a, true);
        let err = f.tracker.say_gm(&a).await.unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(f.store.gm_stats(&a).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_first_checkin_enrolls_candidate() {
        let f = fixture(10);
        let a = with_profile(&f, "0xa");
        f.tracker.say_gm(&a).await.unwrap();
        f.clock.advance_days(1);
        f.tracker.say_gm(&a).await.unwrap();
        assert_eq!(f.store.candidates(0, 10).await.unwrap(), vec![a]);
    }

    #[tokio::test]
    async fn test_user_stats_said_today_and_idempotent() {
        let f = fixture(50);
        let a = with_profile(&f, "0xa");

        let before = f.tracker.user_stats(&a).await.unwrap();
        assert_eq!(before, UserStats::default());

        f.tracker.say_gm(&a).await.unwrap();
        let first = f.tracker.user_stats(&a).await.unwrap();
        let second = f.tracker.user_stats(&a).await.unwrap();
        assert_eq!(first, second);
        assert!(first.said_today);
        assert_eq!(first.total, 1);

        f.clock.advance_days(1);
        assert!(!f.tracker.user_stats(&a).await.unwrap().said_today);
    }

    #[tokio::test]
    async fn test_concurrent_checkins_one_wins() {
        let f = fixture(10);
        let a = with_profile(&f, "0xa");

        let mut handles = Vec::new();
        for _ in 0..8 {
            let tracker = f.tracker.clone();
            let account = a.clone();
            handles.push(tokio::spawn(async move { tracker.say_gm(&account).await }));
        }

        let mut ok = 0;
        let mut already = 0;
        for h in handles {
            match h.await.unwrap() {
                Ok(_) => ok += 1,
                Err(RenownError::AlreadyCheckedInToday { .. }) => already += 1,
                Err(e) => panic!("unexpected error: {}", e),
            }
        }
        assert_eq!(ok, 1);
        assert_eq!(already, 7);
    }

    #[tokio::test]
    async fn test_event_published_after_commit() {
        let f = fixture(10);
        let a = with_profile(&f, "0xa");
        let mut rx = f.tracker.subscribe();

        f.tracker.say_gm(&a).await.unwrap();
        let event = rx.recv().await.unwrap();
        assert_eq!(
            event,
            CheckinEvent {
                account: a.clone(),
                day: EpochDay(10),
                streak: 1,
                total: 1,
            }
        );

        // A rejected check-in publishes nothing.
        assert!(f.tracker.say_gm(&a).await.is_err());
        assert!(rx.try_recv().is_err());
    }
}
