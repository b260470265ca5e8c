//! Unit staking ladder.
//!
//! Steps the bet down after a run of wins and up after a loss, doubling
//! (with a ceiling) once losses pile up.

use tracing::debug;

use crate::config::LadderConfig;
use crate::types::StakeState;

/// How the ladder moved after a settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LadderStep {
    Held,
    SteppedDown,
    SteppedUp,
    Doubled,
}

pub struct StakingLadder {
    config: LadderConfig,
}

impl StakingLadder {
    pub fn new(config: LadderConfig) -> Self {
        Self { config }
    }

    /// Adjust the bet after a win that did not set a new profit lock.
    /// Counters must already include the win.
    pub fn after_win(&self, stake: &mut StakeState) -> LadderStep {
        if stake.consecutive_wins < self.config.win_streak_to_reduce {
            return LadderStep::Held;
        }
        stake.current_bet = self.config.min_bet.max(stake.current_bet - 1);
        debug!(
            wins = stake.consecutive_wins,
            bet = stake.current_bet,
            "Ladder stepped down"
        );
        LadderStep::SteppedDown
    }

    /// Adjust the bet after a loss. Counters must already include the loss.
    pub fn after_loss(&self, stake: &mut StakeState) -> LadderStep {
        let step = if stake.consecutive_losses >= self.config.loss_streak_to_double {
            stake.current_bet = self.config.max_doubled_bet.min(stake.current_bet * 2);
            LadderStep::Doubled
        } else {
            stake.current_bet += 1;
            LadderStep::SteppedUp
        };
        debug!(
            losses = stake.consecutive_losses,
            bet = stake.current_bet,
            step = ?step,
            "Ladder stepped up"
        );
        step
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
