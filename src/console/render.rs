//! Text views for the console: status board, pair history, round lines.

use std::fmt::Write as _;

use crate::engine::{PredictionEngine, RoundReport};
use crate::types::Outcome;

/// Outcomes shown on the road line of the status board.
const ROAD_LENGTH: usize = 30;

const RULE: &str = "------------------------------------------------";

pub const HELP: &str = "\
Commands:
  p, player        record a Player win
  b, banker        record a Banker win
  u, undo          undo the last outcome
  r, reset         reset betting (keeps history and profit lock)
  n, new           start a new session
  s, status        show the status board
  j, json          show the status as JSON
  h, history       list recent pairs
  replay <seq>     record a sequence, e.g. replay PBBPB
  sim <seq>        replay a sequence on a scratch session
  ?, help          show this help
  q, quit          exit";

// ---------------------------------------------------------------------------
// Status board
// ---------------------------------------------------------------------------

/// Multi-line summary of the live session.
pub fn status_board(engine: &PredictionEngine) -> String {
    let status = engine.status();
    let session = status.session_id.to_string();
    let short_id = session.get(..8).unwrap_or(&session);

    let mut out = String::new();
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(
        out,
        " Session {short_id} (since {}) | round {} | {} pairs",
        status.started_at.format("%H:%M:%S"),
        status.rounds,
        status.pairs
    );
    let _ = writeln!(out, " Prediction : {}", status.prediction);
    let _ = writeln!(
        out,
        " Dominance  : {} (window odd {} / even {})",
        status.dominance, status.window_odd, status.window_even
    );
    let _ = writeln!(out, " Streak     : {}", status.streak);
    let _ = writeln!(out, " Next bet   : {}u", status.effective_bet);
    let _ = writeln!(
        out,
        " Bankroll   : {:+}u (lock {}u, {}u to go)",
        status.bankroll, status.profit_lock, status.distance_to_lock
    );
    let _ = writeln!(
        out,
        " Run        : W{} L{}",
        status.consecutive_wins, status.consecutive_losses
    );
    let _ = writeln!(out, " Road       : {}", road(engine));
    out.push_str(RULE);
    out
}

/// The last few outcomes as `P`/`B` symbols, oldest first.
fn road(engine: &PredictionEngine) -> String {
    let pairs = engine.pairs();
    let mut outcomes: Vec<Outcome> = Vec::with_capacity(pairs.len() + 1);
    match pairs.first() {
        Some(first) => {
            outcomes.push(first.previous);
            outcomes.extend(pairs.iter().map(|p| p.current));
        }
        None => outcomes.extend(engine.state().previous_outcome),
    }
    if outcomes.is_empty() {
        return "-".to_string();
    }
    let start = outcomes.len().saturating_sub(ROAD_LENGTH);
    outcomes[start..].iter().map(|o| o.symbol()).collect()
}

// ---------------------------------------------------------------------------
// History and rounds
// ---------------------------------------------------------------------------

pub fn history(engine: &PredictionEngine) -> String {
    let lines = engine.history_lines();
    if lines.is_empty() {
        return "No pairs recorded yet.".to_string();
    }
    let first = engine.pairs().len() - lines.len() + 1;
    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        let _ = writeln!(out, "{:>4}. {line}", first + i);
    }
    out.trim_end().to_string()
}

/// One round's result, with settlement and lock details when present.
pub fn round_line(report: &RoundReport) -> String {
    let mut out = match report.pair {
        Some(pair) => format!("{} recorded: {pair}", report.outcome),
        None => format!("{} recorded (opening outcome)", report.outcome),
    };
    if let Some(s) = &report.settlement {
        let _ = write!(
            out,
            "\n  Bet {} {}u on {}: {} {:+}u, bankroll {:+}u",
            s.backed,
            s.stake,
            s.verdict,
            if s.won { "WIN" } else { "LOSS" },
            s.pnl(),
            s.bankroll_after
        );
    }
    if let Some(lock) = report.profit_lock() {
        let _ = write!(out, "\n{}", profit_lock_notice(lock));
    }
    out
}

pub fn profit_lock_notice(lock: i64) -> String {
    format!("  *** New profit lock: {lock}u. Betting reset. ***")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use Outcome::{Banker as B, Player as P};

    fn make_engine(outcomes: &[Outcome]) -> PredictionEngine {
        let mut engine = PredictionEngine::default();
        for o in outcomes {
            engine.record_outcome(*o);
        }
        engine
    }

    #[test]
    fn test_fresh_board() {
        let board = status_board(&make_engine(&[]));
        assert!(board.contains(") | round 0 | 0 pairs"));
        assert!(board.contains("Prediction : N/A"));
        assert!(board.contains("Streak     : None"));
        assert!(board.contains("Next bet   : 1u"));
        assert!(board.contains("Road       : -"));
    }

    #[test]
    fn test_board_after_losing_run() {
        let board = status_board(&make_engine(&[P, B, P, B, P, B, B, B, P]));
        assert!(board.contains("Prediction : Banker"));
        assert!(board.contains("Bankroll   : -6u (lock 0u, 6u to go)"));
        assert!(board.contains("Next bet   : 5u"));
        assert!(board.contains("Run        : W0 L3"));
        assert!(board.contains("Road       : PBPBPBBBP"));
    }

    #[test]
    fn test_road_single_outcome() {
        assert!(status_board(&make_engine(&[B])).contains("Road       : B\n"));
    }

    #[test]
    fn test_history_numbered() {
        let text = history(&make_engine(&[P, P, B]));
        assert_eq!(
            text,
            "   1. (Player, Player) (Even)\n   2. (Player, Banker) (Odd)"
        );
        assert_eq!(history(&make_engine(&[P])), "No pairs recorded yet.");
    }

    #[test]
    fn test_round_line_with_settlement() {
        let mut engine = make_engine(&[P, B, P, B, P, B]);
        let report = engine.record_outcome(B);
        let line = round_line(&report);
        assert!(line.starts_with("Banker recorded: (Banker, Banker) (Even)"));
        assert!(line.contains("Bet Player 1u on Odd: LOSS -1u, bankroll -1u"));
        assert!(!line.contains("profit lock"));
    }

    #[test]
    fn test_round_line_with_profit_lock() {
        let mut engine = make_engine(&[P, B, P, B, P, B]);
        let line = round_line(&engine.record_outcome(P));
        assert!(line.contains("Bet Player 1u on Odd: WIN +1u, bankroll +1u"));
        assert!(line.contains("New profit lock: 1u"));
    }

    #[test]
    fn test_opening_round_line() {
        let mut engine = PredictionEngine::default();
        assert_eq!(
            round_line(&engine.record_outcome(P)),
            "Player recorded (opening outcome)"
        );
    }
}
