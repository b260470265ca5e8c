//! Replay runner.
//!
//! Pushes a recorded sequence of outcomes through a fresh engine and
//! reports how the predictions and the staking ladder performed: win
//! rate, bankroll path, profit locks reached, and hit counts per verdict.

use std::fmt;

use crate::config::AppConfig;
use crate::engine::{PredictionEngine, Settlement};
use crate::types::{DominanceVerdict, Outcome, TrackerError};

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse a road such as `"PBBPB"`, `"p b b"` or `"player, banker"`.
///
/// Tokens are separated by whitespace or commas. A token is either a full
/// outcome name or a run of `P`/`B` letters. The first bad token fails
/// the whole sequence.
pub fn parse_sequence(text: &str) -> Result<Vec<Outcome>, TrackerError> {
    let mut outcomes = Vec::new();
    for token in text.split(|c: char| c.is_whitespace() || c == ',') {
        if token.is_empty() {
            continue;
        }
        if let Ok(outcome) = token.parse::<Outcome>() {
            outcomes.push(outcome);
            continue;
        }
        for c in token.chars() {
            match c.to_ascii_uppercase() {
                'P' => outcomes.push(Outcome::Player),
                'B' => outcomes.push(Outcome::Banker),
                _ => return Err(TrackerError::InvalidOutcome(token.to_string())),
            }
        }
    }
    Ok(outcomes)
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Bets placed and won under one verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HitCount {
    pub bets: usize,
    pub wins: usize,
}

impl HitCount {
    pub fn hit_rate(&self) -> f64 {
        if self.bets == 0 {
            0.0
        } else {
            self.wins as f64 / self.bets as f64
        }
    }

    fn add(&mut self, won: bool) {
        self.bets += 1;
        if won {
            self.wins += 1;
        }
    }
}

impl fmt::Display for HitCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} ({:.0}%)",
            self.wins,
            self.bets,
            self.hit_rate() * 100.0
        )
    }
}

/// Hit counts split by the verdict behind each bet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VerdictStats {
    pub odd: HitCount,
    pub even: HitCount,
    pub streak: HitCount,
}

impl VerdictStats {
    fn record(&mut self, settlement: &Settlement) {
        match settlement.verdict {
            DominanceVerdict::Odd => self.odd.add(settlement.won),
            DominanceVerdict::Even => self.even.add(settlement.won),
            DominanceVerdict::Streak(_) => self.streak.add(settlement.won),
            DominanceVerdict::NotAvailable => {}
        }
    }
}

/// Complete replay report.
#[derive(Debug, Clone)]
pub struct ReplayReport {
    pub rounds: usize,
    pub settled: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub final_bankroll: i64,
    pub profit_lock: i64,
    pub locks_reached: usize,
    /// Largest stake put on a single settlement.
    pub max_stake: i64,
    pub by_verdict: VerdictStats,
    /// Engine bankroll after each settled round.
    pub bankroll_history: Vec<i64>,
    pub settlements: Vec<Settlement>,
}

impl fmt::Display for ReplayReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Replay: {} rounds | {} bets (W{}/L{}, {:.1}%)",
            self.rounds,
            self.settled,
            self.wins,
            self.losses,
            self.win_rate * 100.0,
        )?;
        writeln!(
            f,
            "Bankroll {:+}u | profit lock {}u ({} reached) | max stake {}u",
            self.final_bankroll, self.profit_lock, self.locks_reached, self.max_stake,
        )?;
        write!(
            f,
            "By verdict: odd {} | even {} | streak {}",
            self.by_verdict.odd, self.by_verdict.even, self.by_verdict.streak,
        )
    }
}

// ---------------------------------------------------------------------------
// Replayer
// ---------------------------------------------------------------------------

pub struct Replayer {
    config: AppConfig,
}

impl Replayer {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Run `outcomes` through a fresh engine, in order.
    pub fn run(&self, outcomes: &[Outcome]) -> ReplayReport {
        let mut engine = PredictionEngine::new(&self.config);
        let mut settlements = Vec::new();
        let mut bankroll_history = Vec::new();
        let mut by_verdict = VerdictStats::default();
        let mut locks_reached = 0;

        for outcome in outcomes {
            let report = engine.record_outcome(*outcome);
            if report.profit_lock().is_some() {
                locks_reached += 1;
            }
            if let Some(settlement) = report.settlement {
                by_verdict.record(&settlement);
                bankroll_history.push(engine.bankroll());
                settlements.push(settlement);
            }
        }

        let settled = settlements.len();
        let wins = settlements.iter().filter(|s| s.won).count();
        let max_stake = settlements.iter().map(|s| s.stake).max().unwrap_or(0);

        ReplayReport {
            rounds: engine.rounds_recorded(),
            settled,
            wins,
            losses: settled - wins,
            win_rate: if settled > 0 { wins as f64 / settled as f64 } else { 0.0 },
            final_bankroll: engine.bankroll(),
            profit_lock: engine.profit_lock(),
            locks_reached,
            max_stake,
            by_verdict,
            bankroll_history,
            settlements,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
