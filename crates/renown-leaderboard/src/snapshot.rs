// crates/renown-leaderboard/src/snapshot.rs
//
// Snapshot scheduler: the once-per-day leaderboard update.
//
// State machine over the persisted `SnapshotState`:
//
//   Idle(day) --update--> Updating(day, cursor) --update--> ... --> Idle(day')
//
// Each `update_snapshot` call rescores a window of at most
// `max_candidates_per_update` candidates starting at the cursor (indices
// taken modulo the arena size) and advances the cursor. The call whose
// window reaches the end of the arena completes the sweep: it stamps
// `last_update_day`, resets the cursor, and earns the updater reward.
// Until then `can_update` stays true and any credentialed account may
// continue the sweep, on the same day or later.
//
// Every check runs before anything is written, the reward credit happens
// before the commit, and state plus leaderboard are committed together, so
// a failing call leaves no partial mutation behind.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{broadcast, Mutex};

use renown_core::{
    AccountId, ActivityLedger, Clock, EpochDay, RenownError, RewardSink, SnapshotState, StateStore,
};
use renown_scoring::ScoreCalculator;

use crate::aggregator::{Leaderboard, Placement};
use crate::config::SnapshotConfig;

/// Capacity of the snapshot event channel.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Where the scheduler is in its daily cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum SnapshotPhase {
    /// No sweep in flight. `last_update_day` is the last completed sweep.
    Idle { last_update_day: Option<EpochDay> },
    /// A sweep started on `started` is in flight at `cursor`.
    Updating { started: EpochDay, cursor: u64 },
}

impl SnapshotPhase {
    /// Derive the phase from persisted state.
    pub fn of(state: &SnapshotState) -> Self {
        match state.sweep_started_day {
            Some(started) => SnapshotPhase::Updating {
                started,
                cursor: state.cursor,
            },
            None => SnapshotPhase::Idle {
                last_update_day: state.last_update_day,
            },
        }
    }
}

/// Result of a successful `update_snapshot` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotOutcome {
    /// Day the call ran on.
    pub day: EpochDay,
    /// Candidates visited in this window.
    pub processed: u64,
    /// Candidates whose ledger reads failed; their entries were left as is.
    pub skipped: Vec<AccountId>,
    /// Cursor after the call (0 once the sweep completed).
    pub cursor: u64,
    /// Arena size at the time of the call.
    pub candidate_count: u64,
    /// Whether this call completed the sweep.
    pub completed: bool,
    /// Reward points credited to the trigger (only on completion).
    pub reward_points: u64,
    /// Leaderboard size after the call.
    pub leaderboard_size: usize,
}

/// Published after every committed snapshot call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotEvent {
    /// A window was processed but the sweep is still in flight.
    WindowProcessed {
        day: EpochDay,
        trigger: AccountId,
        processed: u64,
        cursor: u64,
    },
    /// The sweep completed and the trigger was rewarded.
    SweepCompleted {
        day: EpochDay,
        trigger: AccountId,
        reward_points: u64,
        leaderboard_size: usize,
    },
}

/// Gates and performs the daily leaderboard sweep.
pub struct SnapshotScheduler {
    config: SnapshotConfig,
    calculator: ScoreCalculator,
    ledger: Arc<dyn ActivityLedger>,
    rewards: Arc<dyn RewardSink>,
    store: Arc<dyn StateStore>,
    clock: Arc<dyn Clock>,
    events: broadcast::Sender<SnapshotEvent>,
    write_lock: Mutex<()>,
}

impl SnapshotScheduler {
    /// Create a scheduler.
    pub fn new(
        config: SnapshotConfig,
        calculator: ScoreCalculator,
        ledger: Arc<dyn ActivityLedger>,
        rewards: Arc<dyn RewardSink>,
        store: Arc<dyn StateStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            config,
            calculator,
            ledger,
            rewards,
            store,
            clock,
            events,
            write_lock: Mutex::new(()),
        }
    }

    /// The scheduler settings.
    pub fn config(&self) -> &SnapshotConfig {
        &self.config
    }

    /// Subscribe to snapshot events.
    pub fn subscribe(&self) -> broadcast::Receiver<SnapshotEvent> {
        self.events.subscribe()
    }

    /// True iff the current day is past the last completed sweep.
    pub async fn can_update(&self) -> Result<bool, RenownError> {
        let state = self.store.snapshot_state().await?;
        Ok(can_update_on(&state, self.clock.today()))
    }

    /// Current phase of the scheduler.
    pub async fn phase(&self) -> Result<SnapshotPhase, RenownError> {
        Ok(SnapshotPhase::of(&self.store.snapshot_state().await?))
    }

    /// Enroll an account as a leaderboard candidate.
    ///
    /// Returns `false` if it was already enrolled.
    ///
    /// # Errors
    /// `NoQualifyingProfile` if the account holds no qualifying profile.
    pub async fn enroll(&self, account: &AccountId) -> Result<bool, RenownError> {
        if !self.ledger.has_qualifying_profile(account).await? {
            return Err(RenownError::NoQualifyingProfile(account.clone()));
        }
        let added = self.store.enroll_candidate(account).await?;
        if added {
            tracing::info!("Enrolled {} as leaderboard candidate", account);
        }
        Ok(added)
    }

    /// Advance the leaderboard sweep by one window.
    ///
    /// # Errors
    /// - `AlreadyUpdatedToday` if today's sweep has already completed.
    /// - `InsufficientCredential` if `trigger` holds no qualifying credential.
    /// - `Ledger` if the reward credit fails (nothing is committed).
    /// - storage errors from the state store.
    pub async fn update_snapshot(&self, trigger: &AccountId) -> Result<SnapshotOutcome, RenownError> {
        let _guard = self.write_lock.lock().await;
        let now = self.clock.now_unix();
        let day = EpochDay::from_unix(now);

        let mut state = self.store.snapshot_state().await?;
        if !can_update_on(&state, day) {
            return Err(RenownError::AlreadyUpdatedToday { day });
        }

        if !self.ledger.has_qualifying_credential(trigger).await? {
            return Err(RenownError::InsufficientCredential(trigger.clone()));
        }

        let total = self.store.candidate_count().await?;
        let cursor = if total == 0 { 0 } else { state.cursor % total };
        let take = self.config.effective_window().min(total);
        let window = self.window(cursor, take, total).await?;

        let mut board = Leaderboard::from_entries(
            self.store.leaderboard().await?,
            self.config.max_leaderboard_size,
        );
        let mut skipped = Vec::new();
        for account in &window {
            let inputs = match self.calculator.inputs_against(account, &state).await {
                Ok(inputs) => inputs,
                Err(e @ RenownError::StaleOrUnavailableRead { .. }) => {
                    tracing::warn!("Skipping {} in snapshot window: {}", account, e);
                    skipped.push(account.clone());
                    continue;
                }
                Err(e) => return Err(e),
            };
            let score = self.calculator.score_inputs(&inputs);
            if let Placement::Replaced { evicted } = board.offer(account, score, day) {
                tracing::debug!("{} (score {}) evicted {}", account, score, evicted);
            }
        }

        let next_cursor = cursor + take;
        let completed = next_cursor >= total;
        if state.sweep_started_day.is_none() {
            state.sweep_started_day = Some(day);
        }

        let reward_points = if completed {
            self.rewards
                .credit_emoji(
                    trigger,
                    &self.config.update_reward_emoji,
                    self.config.update_reward_emoji_amount,
                )
                .await?;
            let accrued = state.updater_rewards.entry(trigger.clone()).or_insert(0);
            *accrued = accrued.saturating_add(self.config.update_reward_points);

            state.last_update_day = Some(day);
            state.last_update_time = Some(now);
            state.cursor = 0;
            state.sweep_started_day = None;
            self.config.update_reward_points
        } else {
            state.cursor = next_cursor;
            0
        };

        let leaderboard_size = board.len();
        self.store
            .commit_snapshot(&state, board.entries())
            .await?;

        let outcome = SnapshotOutcome {
            day,
            processed: take,
            skipped,
            cursor: state.cursor,
            candidate_count: total,
            completed,
            reward_points,
            leaderboard_size,
        };

        let event = if completed {
            tracing::info!(
                "Leaderboard sweep completed on {} by {} ({} candidates, {} entries)",
                day,
                trigger,
                total,
                leaderboard_size
            );
            SnapshotEvent::SweepCompleted {
                day,
                trigger: trigger.clone(),
                reward_points,
                leaderboard_size,
            }
        } else {
            tracing::debug!(
                "Snapshot window on {}: processed {}, cursor {}/{}",
                day,
                take,
                outcome.cursor,
                total
            );
            SnapshotEvent::WindowProcessed {
                day,
                trigger: trigger.clone(),
                processed: take,
                cursor: outcome.cursor,
            }
        };
        let _ = self.events.send(event);

        Ok(outcome)
    }

    /// Candidates at indices `cursor, cursor + 1, ..` (mod `total`), `take`
    /// of them.
    async fn window(&self, cursor: u64, take: u64, total: u64) -> Result<Vec<AccountId>, RenownError> {
        let mut window = self.store.candidates(cursor, take).await?;
        let wrapped = take.saturating_sub(window.len() as u64);
        if wrapped > 0 && total > 0 {
            window.extend(self.store.candidates(0, wrapped).await?);
        }
        Ok(window)
    }
}

/// The gate: the day must be strictly after the last completed sweep.
fn can_update_on(state: &SnapshotState, day: EpochDay) -> bool {
    state.last_update_day.map_or(true, |last| day > last)
}
