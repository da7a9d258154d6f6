// crates/renown-scoring/src/calculator.rs
//
// Gathers score inputs from the activity ledger and the state store.
//
// The calculator holds no state of its own beyond the immutable weights:
// any caller with the same ledger and store reads derives the same score.

use std::sync::Arc;

use renown_core::{
    AccountId, ActivityLedger, ActivitySignals, RenownError, SnapshotState, StateStore,
};

use crate::components::{score, ScoreBreakdown, ScoreComponents, ScoreInputs};

/// Computes reputation scores from live ledger and store reads.
#[derive(Clone)]
pub struct ScoreCalculator {
    components: ScoreComponents,
    ledger: Arc<dyn ActivityLedger>,
    store: Arc<dyn StateStore>,
}

impl ScoreCalculator {
    /// Create a calculator over the given ledger and store.
    pub fn new(
        components: ScoreComponents,
        ledger: Arc<dyn ActivityLedger>,
        store: Arc<dyn StateStore>,
    ) -> Self {
        Self {
            components,
            ledger,
            store,
        }
    }

    /// The scoring weights in use.
    pub fn components(&self) -> &ScoreComponents {
        &self.components
    }

    /// Read every input for `account`.
    ///
    /// # Errors
    /// Returns `StaleOrUnavailableRead` if any ledger read fails, or a
    /// storage error if the state store cannot be read.
    pub async fn inputs(&self, account: &AccountId) -> Result<ScoreInputs, RenownError> {
        let signals = self.ledger.signals(account).await?;
        self.inputs_with_signals(account, signals).await
    }

    /// Complete already-fetched ledger signals with the store-held inputs
    /// (GM stats and accrued snapshot reward).
    pub async fn inputs_with_signals(
        &self,
        account: &AccountId,
        signals: ActivitySignals,
    ) -> Result<ScoreInputs, RenownError> {
        let state = self.store.snapshot_state().await?;
        self.inputs_from(account, signals, &state).await
    }

    /// Read the inputs for `account`, taking the accrued reward from an
    /// in-flight snapshot state instead of the committed one.
    pub async fn inputs_against(
        &self,
        account: &AccountId,
        state: &SnapshotState,
    ) -> Result<ScoreInputs, RenownError> {
        let signals = self.ledger.signals(account).await?;
        self.inputs_from(account, signals, state).await
    }

    /// Complete already-fetched ledger signals with the account's GM stats
    /// and its accrued reward in `state`.
    pub async fn inputs_from(
        &self,
        account: &AccountId,
        signals: ActivitySignals,
        state: &SnapshotState,
    ) -> Result<ScoreInputs, RenownError> {
        let gm = self.store.gm_stats(account).await?;
        Ok(ScoreInputs::new(signals, gm.as_ref(), state.accrued_reward(account)))
    }

    /// Score an account from the given inputs.
    pub fn score_inputs(&self, inputs: &ScoreInputs) -> u64 {
        score(&self.components, inputs)
    }

    /// Read the inputs for `account` and score them.
    pub async fn score(&self, account: &AccountId) -> Result<u64, RenownError> {
        let inputs = self.inputs(account).await?;
        Ok(self.score_inputs(&inputs))
    }

    /// Per-term breakdown of an account's current score.
    pub async fn breakdown(&self, account: &AccountId) -> Result<ScoreBreakdown, RenownError> {
        let inputs = self.inputs(account).await?;
        Ok(ScoreBreakdown::compute(&self.components, &inputs))
    }
}
