//! Replay runner and console driven with scripted input.

use baccarat_tracker::backtest::{parse_sequence, Replayer};
use baccarat_tracker::config::AppConfig;
use baccarat_tracker::console::{self, Console};
use baccarat_tracker::types::TrackerError;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_test::io::Builder;

#[test]
fn test_replay_matches_live_session() {
    let outcomes = parse_sequence("PBPBPB BBP PBBPPB").unwrap();
    let config = AppConfig::default();

    let report = Replayer::new(config.clone()).run(&outcomes);

    let mut console = Console::new(&config).unwrap();
    console.handle_line("replay PBPBPB BBP PBBPPB").unwrap();
    let engine = console.engine();

    assert_eq!(report.rounds, engine.rounds_recorded());
    assert_eq!(report.final_bankroll, engine.bankroll());
    assert_eq!(report.profit_lock, engine.profit_lock());
    assert_eq!(report.wins + report.losses, report.settled);
    assert_eq!(report.bankroll_history.len(), report.settled);
}

#[test]
fn test_replay_rejects_ties() {
    assert_eq!(
        parse_sequence("P B T"),
        Err(TrackerError::InvalidOutcome("T".to_string()))
    );
}

#[tokio::test]
async fn test_console_script() {
    let mut console = Console::new(&AppConfig::default()).unwrap();
    let input = Builder::new()
        .read(b"replay PBPBPB\n")
        .read(b"b\nu\ns\n")
        .read(b"n\ny\nq\n")
        .build();
    let mut out: Vec<u8> = Vec::new();

    console::run(&mut console, BufReader::new(input).lines(), &mut out)
        .await
        .unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Prediction : Player"));
    assert!(text.contains("Bet Player 1u on Odd: LOSS -1u"));
    assert!(text.contains("Undone."));
    assert!(text.contains("New session started."));
    assert!(text.ends_with("Bye.\n"));
    assert_eq!(console.engine().rounds_recorded(), 0);
}
