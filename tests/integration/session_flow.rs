//! End-to-end session behaviour: signals, settlement, locks and undo.

use baccarat_tracker::config::AppConfig;
use baccarat_tracker::engine::PredictionEngine;
use baccarat_tracker::types::{DominanceVerdict, Outcome, Prediction, TrackerError};

use crate::recording_observer::RecordingObserver;

use Outcome::{Banker as B, Player as P};

fn record_all(engine: &mut PredictionEngine, outcomes: &[Outcome]) {
    for outcome in outcomes {
        engine.record_outcome(*outcome);
    }
}

fn engine_with(toml: &str) -> PredictionEngine {
    let config = AppConfig::from_toml(toml).unwrap();
    PredictionEngine::new(&config)
}

#[test]
fn test_four_pairs_wait_for_signal() {
    let mut engine = PredictionEngine::default();
    record_all(&mut engine, &[P, B, P, B, P]);
    assert_eq!(engine.pairs().len(), 4);
    assert_eq!(engine.dominance(), DominanceVerdict::NotAvailable);
    assert_eq!(engine.prediction(), Prediction::NotAvailable);
}

#[test]
fn test_odd_dominance_with_lower_minimum() {
    let mut engine = engine_with("[signal]\nmin_pairs = 4\n");
    record_all(&mut engine, &[P, B, P, B, P]);
    assert_eq!(engine.dominance(), DominanceVerdict::Odd);
    assert_eq!(engine.prediction(), Prediction::Bet(B));
    assert_eq!(engine.prediction_text(), "Banker");
}

#[test]
fn test_streak_overrides_even() {
    let mut engine = engine_with("[signal]\nmin_pairs = 3\n");
    record_all(&mut engine, &[B, B, B, B]);
    assert_eq!(engine.streak(), Some(B));
    assert_eq!(engine.dominance(), DominanceVerdict::Streak(B));
    assert_eq!(engine.prediction(), Prediction::Bet(B));
}

#[test]
fn test_streak_flag_before_verdict() {
    let mut engine = PredictionEngine::default();
    record_all(&mut engine, &[B, B, B, B]);
    assert_eq!(engine.streak_label(), "Banker");
    assert_eq!(engine.prediction(), Prediction::NotAvailable);
}

#[test]
fn test_profit_lock_resets_betting() {
    let mut engine = PredictionEngine::default();
    let observer = RecordingObserver::new();
    engine.subscribe(Box::new(observer.clone()));

    record_all(&mut engine, &[P, B, P, B, P, B]);
    let pairs_before = engine.pairs().to_vec();
    let report = engine.record_outcome(P);

    assert_eq!(report.profit_lock(), Some(1));
    assert_eq!(observer.locks(), vec![1]);
    let stake = engine.stake();
    assert_eq!(stake.current_bet, 1);
    assert_eq!(stake.bankroll, 0);
    assert_eq!(stake.consecutive_wins, 0);
    assert_eq!(stake.consecutive_losses, 0);
    assert_eq!(&engine.pairs()[..6], &pairs_before[..]);
    assert_eq!(engine.pairs().len(), 7);
    assert_eq!(engine.undo_depth(), 0);
    assert_eq!(observer.refresh_count(), 7);
}

#[test]
fn test_undo_on_fresh_session() {
    let mut engine = PredictionEngine::default();
    let before = engine.state().clone();
    assert_eq!(engine.undo(), Err(TrackerError::EmptyHistory));
    assert_eq!(engine.state(), &before);
}

#[test]
fn test_three_losses_double_capped() {
    let mut engine = PredictionEngine::default();
    record_all(&mut engine, &[P, B, P, B, P, B, B, B, P]);
    let stake = engine.stake();
    assert_eq!(stake.consecutive_losses, 3);
    assert_eq!(stake.current_bet, 5);
    assert_eq!(stake.bankroll, -6);
}

#[test]
fn test_undo_walks_back_to_start() {
    let mut engine = PredictionEngine::default();
    let sequence = [P, B, P, B, P, B, B, B, P, P];
    let mut states = vec![engine.state().clone()];
    for outcome in sequence {
        engine.record_outcome(outcome);
        states.push(engine.state().clone());
    }
    states.pop();
    while let Some(expected) = states.pop() {
        engine.undo().unwrap();
        assert_eq!(engine.state(), &expected);
    }
    assert!(engine.undo().is_err());
}

#[test]
fn test_reset_session_after_play() {
    let mut engine = PredictionEngine::default();
    let observer = RecordingObserver::new();
    engine.subscribe(Box::new(observer.clone()));
    record_all(&mut engine, &[P, B, P, B, P, B, P]);
    let first_id = engine.session_id();

    engine.reset_session();
    assert_ne!(engine.session_id(), first_id);
    assert_eq!(engine.rounds_recorded(), 0);
    assert_eq!(engine.profit_lock(), 0);
    assert_eq!(engine.undo(), Err(TrackerError::EmptyHistory));

    let status = observer.last_status().unwrap();
    assert_eq!(status.session_id, engine.session_id());
    assert_eq!(status.rounds, 0);
}

#[test]
fn test_invalid_config_rejected() {
    assert!(AppConfig::from_toml("[session]\nunit_size = 0\n").is_err());
    assert!(AppConfig::from_toml("[signal]\nmin_pairs = 6\nsettle_after_pairs = 6\n").is_err());
}
