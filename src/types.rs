//! Shared types for the tracker.
//!
//! The data model used by the strategy, engine, console and replay
//! modules: round outcomes, the pairs they form, the derived verdict and
//! prediction caches, and the staking state.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Winner of a single round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Player,
    Banker,
}

impl Outcome {
    /// The other side of the table.
    pub fn opposite(&self) -> Self {
        match self {
            Outcome::Player => Outcome::Banker,
            Outcome::Banker => Outcome::Player,
        }
    }

    /// Single-letter form used on the compact road display.
    pub fn symbol(&self) -> char {
        match self {
            Outcome::Player => 'P',
            Outcome::Banker => 'B',
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Player => write!(f, "Player"),
            Outcome::Banker => write!(f, "Banker"),
        }
    }
}

/// Parse an outcome from user input (case-insensitive).
impl std::str::FromStr for Outcome {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "p" | "player" => Ok(Outcome::Player),
            "b" | "banker" => Ok(Outcome::Banker),
            _ => Err(TrackerError::InvalidOutcome(s.trim().to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Pairs
// ---------------------------------------------------------------------------

/// Classification of two consecutive outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PairKind {
    Odd,
    Even,
}

impl fmt::Display for PairKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PairKind::Odd => write!(f, "Odd"),
            PairKind::Even => write!(f, "Even"),
        }
    }
}

/// Two consecutive outcomes, oldest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairRecord {
    pub previous: Outcome,
    pub current: Outcome,
}

impl PairRecord {
    pub fn new(previous: Outcome, current: Outcome) -> Self {
        Self { previous, current }
    }

    /// Even when both rounds went the same way, Odd otherwise.
    pub fn kind(&self) -> PairKind {
        if self.previous == self.current {
            PairKind::Even
        } else {
            PairKind::Odd
        }
    }

    pub fn is_even(&self) -> bool {
        self.kind() == PairKind::Even
    }
}

impl fmt::Display for PairRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}) ({})", self.previous, self.current, self.kind())
    }
}

// ---------------------------------------------------------------------------
// Derived signals
// ---------------------------------------------------------------------------

/// Rolling majority signal over the trailing pair window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DominanceVerdict {
    #[default]
    NotAvailable,
    Odd,
    Even,
    Streak(Outcome),
}

impl fmt::Display for DominanceVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DominanceVerdict::NotAvailable => write!(f, "N/A"),
            DominanceVerdict::Odd => write!(f, "Odd"),
            DominanceVerdict::Even => write!(f, "Even"),
            DominanceVerdict::Streak(side) => write!(f, "Streak ({side})"),
        }
    }
}

/// Next-round recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Prediction {
    #[default]
    NotAvailable,
    Hold,
    Bet(Outcome),
}

impl Prediction {
    /// The side to back, if this prediction places a bet.
    pub fn side(&self) -> Option<Outcome> {
        match self {
            Prediction::Bet(side) => Some(*side),
            _ => None,
        }
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prediction::NotAvailable => write!(f, "N/A"),
            Prediction::Hold => write!(f, "Hold"),
            Prediction::Bet(side) => write!(f, "{side}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Stake state
// ---------------------------------------------------------------------------

/// Unit-staking ladder state. All amounts are in betting units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeState {
    pub unit_size: i64,
    pub current_bet: i64,
    /// Net result since the last betting reset.
    pub bankroll: i64,
    /// High-water mark of `bankroll`.
    pub profit_lock: i64,
    pub consecutive_wins: u32,
    pub consecutive_losses: u32,
}

impl fmt::Display for StakeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "bet={}u | bankroll={:+}u | lock={}u | W{}/L{}",
            self.effective_bet(),
            self.bankroll,
            self.profit_lock,
            self.consecutive_wins,
            self.consecutive_losses,
        )
    }
}

impl StakeState {
    pub fn new(unit_size: i64) -> Self {
        Self {
            unit_size,
            current_bet: unit_size,
            bankroll: 0,
            profit_lock: 0,
            consecutive_wins: 0,
            consecutive_losses: 0,
        }
    }

    /// Stake actually applied to a settlement, never below one unit.
    pub fn effective_bet(&self) -> i64 {
        self.unit_size.max(self.current_bet.abs())
    }

    /// Put a zeroed bet back on the unit.
    pub fn ensure_bet(&mut self) {
        if self.current_bet == 0 {
            self.current_bet = self.unit_size;
        }
    }

    pub fn record_win(&mut self, amount: i64) {
        self.bankroll += amount;
        self.consecutive_wins += 1;
        self.consecutive_losses = 0;
    }

    pub fn record_loss(&mut self, amount: i64) {
        self.bankroll -= amount;
        self.consecutive_losses += 1;
        self.consecutive_wins = 0;
    }

    /// Raise the profit lock if the bankroll is at a new high. Returns true
    /// when the lock moved.
    pub fn lock_profit(&mut self) -> bool {
        if self.bankroll > self.profit_lock {
            self.profit_lock = self.bankroll;
            true
        } else {
            false
        }
    }

    /// Units still needed to reach the profit lock again.
    pub fn distance_to_lock(&self) -> i64 {
        (self.profit_lock - self.bankroll).max(0)
    }

    /// Clear the ladder and counters. The profit lock survives.
    pub fn reset_betting(&mut self) {
        self.bankroll = 0;
        self.current_bet = self.unit_size;
        self.consecutive_wins = 0;
        self.consecutive_losses = 0;
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain errors surfaced by the engine and the input boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrackerError {
    #[error("Nothing to undo: no outcomes recorded since the last reset")]
    EmptyHistory,

    #[error("Invalid outcome: {0:?} (expected Player or Banker)")]
    InvalidOutcome(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
