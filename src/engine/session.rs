//! Prediction engine.
//!
//! Owns one tracking session: ingests round outcomes, keeps the pair
//! history, derives the dominance verdict and prediction, settles bets on
//! the staking ladder and supports snapshot-based undo.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::accountant::{Accountant, Settlement};
use super::history::{SessionState, UndoStack};
use super::SessionObserver;
use crate::config::AppConfig;
use crate::strategy::{DominanceDetector, PairTally, StakingLadder};
use crate::types::{DominanceVerdict, Outcome, PairRecord, Prediction, StakeState, TrackerError};

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// What a single `record_outcome` call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundReport {
    pub outcome: Outcome,
    /// Outcomes recorded in this session, including this one.
    pub round: usize,
    /// Pair formed by this outcome; `None` for the opening outcome.
    pub pair: Option<PairRecord>,
    pub settlement: Option<Settlement>,
    pub dominance: DominanceVerdict,
    pub prediction: Prediction,
}

impl RoundReport {
    /// New profit lock reached this round, if any.
    pub fn profit_lock(&self) -> Option<i64> {
        self.settlement.as_ref().and_then(|s| s.new_profit_lock)
    }
}

/// Read-only summary for views and observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionStatus {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub rounds: usize,
    pub pairs: usize,
    pub last_outcome: Option<Outcome>,
    pub effective_bet: i64,
    pub bankroll: i64,
    pub profit_lock: i64,
    pub distance_to_lock: i64,
    pub consecutive_wins: u32,
    pub consecutive_losses: u32,
    pub prediction: String,
    pub dominance: String,
    pub streak: String,
    pub window_odd: usize,
    pub window_even: usize,
    pub undo_depth: usize,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

pub struct PredictionEngine {
    session_id: Uuid,
    started_at: DateTime<Utc>,
    state: SessionState,
    undo: UndoStack,
    detector: DominanceDetector,
    ladder: StakingLadder,
    unit_size: i64,
    settle_after_pairs: usize,
    history_limit: usize,
    observers: Vec<Box<dyn SessionObserver>>,
}

impl Default for PredictionEngine {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

impl PredictionEngine {
    /// Build an engine from a config that has already passed
    /// [`AppConfig::validate`]. Use [`PredictionEngine::try_new`] for
    /// configs assembled in code.
    pub fn new(config: &AppConfig) -> Self {
        debug_assert!(config.validate().is_ok(), "invalid engine config");
        let unit_size = config.session.unit_size;
        let engine = Self {
            session_id: Uuid::new_v4(),
            started_at: Utc::now(),
            state: SessionState::new(unit_size),
            undo: UndoStack::new(),
            detector: DominanceDetector::new(config.signal.clone()),
            ladder: StakingLadder::new(config.ladder.clone()),
            unit_size,
            settle_after_pairs: config.signal.settle_after_pairs,
            history_limit: config.session.history_limit,
            observers: Vec::new(),
        };
        info!(session_id = %engine.session_id, unit_size, "Session started");
        engine
    }

    /// Validate `config`, then build the engine.
    pub fn try_new(config: &AppConfig) -> Result<Self> {
        config.validate().context("Invalid tracker config")?;
        Ok(Self::new(config))
    }

    /// Register an observer for change notifications.
    pub fn subscribe(&mut self, observer: Box<dyn SessionObserver>) {
        self.observers.push(observer);
    }

    // -- Operations ---------------------------------------------------------

    /// Record the winner of a round.
    ///
    /// The first outcome of a session only seeds the pair history. From the
    /// fifth pair on a verdict and prediction are issued; from the sixth,
    /// last round's prediction is settled against this outcome. A win that
    /// sets a new profit lock resets betting and ends the call early, so
    /// `previous_outcome` is not advanced on that round.
    pub fn record_outcome(&mut self, outcome: Outcome) -> RoundReport {
        let prior_prediction = self.state.prediction;
        let prior_verdict = self.state.dominance;
        self.undo.push(self.state.clone());

        let Some(previous) = self.state.previous_outcome else {
            self.state.previous_outcome = Some(outcome);
            self.state.prediction = Prediction::NotAvailable;
            debug!(outcome = %outcome, "Opening outcome recorded");
            self.notify_refresh();
            return self.report(outcome, None, None);
        };

        let pair = PairRecord::new(previous, outcome);
        self.state.pairs.push(pair);
        self.state.streak = self.detector.detect_streak(&self.state.pairs, outcome);

        if let Some(signal) = self
            .detector
            .evaluate(&self.state.pairs, self.state.streak, outcome)
        {
            self.state.dominance = signal.dominance;
            self.state.prediction = signal.prediction;
            self.state.stake.ensure_bet();
        }

        let mut settlement = None;
        if self.state.pairs.len() >= self.settle_after_pairs {
            if let Some(backed) = prior_prediction.side() {
                let settled = Accountant::settle(
                    &mut self.state.stake,
                    backed,
                    prior_verdict,
                    outcome,
                    &self.ladder,
                );
                if let Some(lock) = settled.new_profit_lock {
                    self.reset_betting_quiet();
                    self.notify_profit_lock(lock);
                    self.notify_refresh();
                    return self.report(outcome, Some(pair), Some(settled));
                }
                settlement = Some(settled);
            }
        }

        self.state.previous_outcome = Some(outcome);

        debug!(
            round = self.state.rounds(),
            pair = %pair,
            dominance = %self.state.dominance,
            prediction = %self.state.prediction,
            bet = self.state.stake.effective_bet(),
            "Outcome recorded"
        );

        self.notify_refresh();
        self.report(outcome, Some(pair), settlement)
    }

    /// Restore the state from before the most recent outcome.
    pub fn undo(&mut self) -> Result<(), TrackerError> {
        let Some(snapshot) = self.undo.pop() else {
            warn!("Undo requested with empty history");
            return Err(TrackerError::EmptyHistory);
        };
        self.state = snapshot;
        debug!(
            rounds = self.state.rounds(),
            remaining = self.undo.len(),
            "Undo applied"
        );
        self.notify_refresh();
        Ok(())
    }

    /// Clear the staking ladder and streak, keep the pair history and the
    /// profit lock, and rebuild the verdict from history.
    pub fn reset_betting(&mut self) {
        self.reset_betting_quiet();
        self.notify_refresh();
    }

    /// Discard everything and start a fresh session.
    pub fn reset_session(&mut self) {
        self.state = SessionState::new(self.unit_size);
        self.undo.clear();
        self.session_id = Uuid::new_v4();
        self.started_at = Utc::now();
        info!(session_id = %self.session_id, "New session started");
        self.notify_refresh();
    }

    /// Alias for [`PredictionEngine::reset_session`].
    pub fn new_session(&mut self) {
        self.reset_session();
    }

    fn reset_betting_quiet(&mut self) {
        self.state.stake.reset_betting();
        self.state.streak = None;
        if !self.undo.is_empty() {
            debug!(dropped = self.undo.len(), "Undo history cleared");
            self.undo.clear();
        }

        let (streak, signal) = self.detector.recompute(&self.state.pairs);
        self.state.streak = streak;
        self.state.dominance = signal.dominance;
        self.state.prediction = signal.prediction;

        info!(
            pairs = self.state.pairs.len(),
            profit_lock = self.state.stake.profit_lock,
            prediction = %self.state.prediction,
            "Betting reset"
        );
    }

    // -- Accessors ----------------------------------------------------------

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn stake(&self) -> &StakeState {
        &self.state.stake
    }

    pub fn effective_bet(&self) -> i64 {
        self.state.stake.effective_bet()
    }

    pub fn bankroll(&self) -> i64 {
        self.state.stake.bankroll
    }

    pub fn profit_lock(&self) -> i64 {
        self.state.stake.profit_lock
    }

    pub fn prediction(&self) -> Prediction {
        self.state.prediction
    }

    pub fn dominance(&self) -> DominanceVerdict {
        self.state.dominance
    }

    pub fn streak(&self) -> Option<Outcome> {
        self.state.streak
    }

    /// "N/A", "Hold", "Player" or "Banker".
    pub fn prediction_text(&self) -> String {
        self.state.prediction.to_string()
    }

    /// "None" or the side on a streak.
    pub fn streak_label(&self) -> String {
        match self.state.streak {
            Some(side) => side.to_string(),
            None => "None".to_string(),
        }
    }

    pub fn pairs(&self) -> &[PairRecord] {
        &self.state.pairs
    }

    /// The most recent pairs, oldest first, capped at the configured
    /// history limit.
    pub fn recent_pairs(&self) -> &[PairRecord] {
        let start = self.state.pairs.len().saturating_sub(self.history_limit);
        &self.state.pairs[start..]
    }

    /// Recent pairs rendered as `(prev, cur) (Odd|Even)`.
    pub fn history_lines(&self) -> Vec<String> {
        self.recent_pairs().iter().map(|p| p.to_string()).collect()
    }

    /// Odd/even counts over the current trailing window.
    pub fn window_tally(&self) -> PairTally {
        self.detector.tally(&self.state.pairs)
    }

    pub fn rounds_recorded(&self) -> usize {
        self.state.rounds()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn status(&self) -> SessionStatus {
        let tally = self.window_tally();
        let stake = &self.state.stake;
        SessionStatus {
            session_id: self.session_id,
            started_at: self.started_at,
            rounds: self.state.rounds(),
            pairs: self.state.pairs.len(),
            last_outcome: self.state.previous_outcome,
            effective_bet: stake.effective_bet(),
            bankroll: stake.bankroll,
            profit_lock: stake.profit_lock,
            distance_to_lock: stake.distance_to_lock(),
            consecutive_wins: stake.consecutive_wins,
            consecutive_losses: stake.consecutive_losses,
            prediction: self.prediction_text(),
            dominance: self.state.dominance.to_string(),
            streak: self.streak_label(),
            window_odd: tally.odd,
            window_even: tally.even,
            undo_depth: self.undo.len(),
        }
    }

    // -- Internals ----------------------------------------------------------

    fn report(
        &self,
        outcome: Outcome,
        pair: Option<PairRecord>,
        settlement: Option<Settlement>,
    ) -> RoundReport {
        RoundReport {
            outcome,
            round: self.state.rounds(),
            pair,
            settlement,
            dominance: self.state.dominance,
            prediction: self.state.prediction,
        }
    }

    fn notify_refresh(&mut self) {
        if self.observers.is_empty() {
            return;
        }
        let status = self.status();
        for observer in &mut self.observers {
            observer.on_refresh(&status);
        }
    }

    fn notify_profit_lock(&mut self, lock: i64) {
        for observer in &mut self.observers {
            observer.on_profit_lock(lock);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
