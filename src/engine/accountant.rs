//! Accountant: settles last round's bet against the new outcome.
//!
//! Applies the win or loss to the bankroll, raises the profit lock when
//! the bankroll reaches a new high, and otherwise moves the staking
//! ladder.

use serde::Serialize;
use tracing::{debug, info};

use crate::strategy::{LadderStep, StakingLadder};
use crate::types::{DominanceVerdict, Outcome, StakeState};

// ---------------------------------------------------------------------------
// Settlement
// ---------------------------------------------------------------------------

/// Result of settling one bet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settlement {
    /// Side the previous prediction backed.
    pub backed: Outcome,
    /// Verdict that produced the prediction.
    pub verdict: DominanceVerdict,
    pub outcome: Outcome,
    pub stake: i64,
    pub won: bool,
    pub bankroll_after: i64,
    /// Set when this win pushed the bankroll to a new high.
    pub new_profit_lock: Option<i64>,
    /// Ladder movement; `None` when a profit lock resets betting instead.
    #[serde(skip)]
    pub ladder: Option<LadderStep>,
}

impl Settlement {
    /// Signed change to the bankroll.
    pub fn pnl(&self) -> i64 {
        if self.won {
            self.stake
        } else {
            -self.stake
        }
    }
}

// ---------------------------------------------------------------------------
// Accountant
// ---------------------------------------------------------------------------

pub struct Accountant;

impl Accountant {
    /// Settle a bet on `backed` against `outcome` at the current effective
    /// stake.
    pub fn settle(
        stake: &mut StakeState,
        backed: Outcome,
        verdict: DominanceVerdict,
        outcome: Outcome,
        ladder: &StakingLadder,
    ) -> Settlement {
        let amount = stake.effective_bet();
        let won = backed == outcome;

        let (new_profit_lock, step) = if won {
            stake.record_win(amount);
            if stake.lock_profit() {
                info!(
                    lock = stake.profit_lock,
                    stake = amount,
                    "New profit lock reached"
                );
                (Some(stake.profit_lock), None)
            } else {
                (None, Some(ladder.after_win(stake)))
            }
        } else {
            stake.record_loss(amount);
            (None, Some(ladder.after_loss(stake)))
        };

        debug!(
            backed = %backed,
            outcome = %outcome,
            verdict = %verdict,
            stake = amount,
            won,
            bankroll = stake.bankroll,
            next_bet = stake.current_bet,
            "Bet settled"
        );

        Settlement {
            backed,
            verdict,
            outcome,
            stake: amount,
            won,
            bankroll_after: stake.bankroll,
            new_profit_lock,
            ladder: step,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LadderConfig;

    fn ladder() -> StakingLadder {
        StakingLadder::new(LadderConfig::default())
    }

    fn make_stake(bankroll: i64, profit_lock: i64, current_bet: i64) -> StakeState {
        StakeState {
            bankroll,
            profit_lock,
            current_bet,
            ..StakeState::new(1)
        }
    }

    #[test]
    fn test_win_sets_new_lock() {
        let mut stake = make_stake(0, 0, 1);
        let s = Accountant::settle(
            &mut stake,
            Outcome::Player,
            DominanceVerdict::Odd,
            Outcome::Player,
            &ladder(),
        );
        assert!(s.won);
        assert_eq!(s.stake, 1);
        assert_eq!(s.new_profit_lock, Some(1));
        assert_eq!(s.ladder, None);
        assert_eq!(stake.profit_lock, 1);
        assert_eq!(stake.bankroll, 1);
    }

    #[test]
    fn test_win_below_lock_moves_ladder() {
        let mut stake = make_stake(-5, 2, 3);
        stake.consecutive_wins = 1;
        let s = Accountant::settle(
            &mut stake,
            Outcome::Banker,
            DominanceVerdict::Even,
            Outcome::Banker,
            &ladder(),
        );
        assert_eq!(s.bankroll_after, -2);
        assert_eq!(s.new_profit_lock, None);
        assert_eq!(s.ladder, Some(LadderStep::SteppedDown));
        assert_eq!(stake.current_bet, 2);
        assert_eq!(stake.profit_lock, 2);
    }

    #[test]
    fn test_loss_uses_effective_bet() {
        let mut stake = make_stake(0, 0, 0);
        let s = Accountant::settle(
            &mut stake,
            Outcome::Player,
            DominanceVerdict::Streak(Outcome::Player),
            Outcome::Banker,
            &ladder(),
        );
        assert!(!s.won);
        assert_eq!(s.stake, 1);
        assert_eq!(s.pnl(), -1);
        assert_eq!(stake.bankroll, -1);
        assert_eq!(stake.consecutive_losses, 1);
        assert_eq!(s.ladder, Some(LadderStep::SteppedUp));
        assert_eq!(stake.current_bet, 1);
    }

    #[test]
    fn test_third_loss_doubles() {
        let mut stake = make_stake(-3, 0, 3);
        stake.consecutive_losses = 2;
        let s = Accountant::settle(
            &mut stake,
            Outcome::Banker,
            DominanceVerdict::Odd,
            Outcome::Player,
            &ladder(),
        );
        assert_eq!(s.stake, 3);
        assert_eq!(s.bankroll_after, -6);
        assert_eq!(stake.consecutive_losses, 3);
        assert_eq!(s.ladder, Some(LadderStep::Doubled));
        assert_eq!(stake.current_bet, 5);
    }

    #[test]
    fn test_settlement_serializes() {
        let mut stake = make_stake(0, 0, 1);
        let s = Accountant::settle(
            &mut stake,
            Outcome::Player,
            DominanceVerdict::Odd,
            Outcome::Banker,
            &ladder(),
        );
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["backed"], "Player");
        assert_eq!(json["won"], false);
        assert!(json.get("ladder").is_none());
    }
}
