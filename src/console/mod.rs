//! Console front end.
//!
//! A line-oriented REPL over any async reader/writer pair. Each line is
//! parsed into a [`Command`], applied to the live [`PredictionEngine`],
//! and answered with text. Resets ask for confirmation first.
//!
//! Input arrives through a [`LineSource`]. The binary reads the terminal
//! on a plain thread feeding a channel, so shutdown never waits on a
//! pending read.

pub mod render;

use anyhow::{Context, Result};
use std::str::FromStr;
use std::io::BufRead;
use tokio::io::{AsyncBufRead, AsyncWrite, AsyncWriteExt, Lines};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::backtest::{parse_sequence, Replayer};
use crate::config::AppConfig;
use crate::engine::{PredictionEngine, SessionObserver, SessionStatus};
use crate::types::{Outcome, TrackerError};

const PROMPT: &[u8] = b"> ";

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Record(Outcome),
    Undo,
    ResetBetting,
    NewSession,
    Status,
    Json,
    History,
    Replay(Vec<Outcome>),
    Simulate(Vec<Outcome>),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Unknown command: {0:?} (type 'help' for commands)")]
    Unknown(String),

    #[error("'{0}' needs a sequence, e.g. '{0} PBBPB'")]
    MissingSequence(&'static str),

    #[error(transparent)]
    Outcome(#[from] TrackerError),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };
        let head = head.to_lowercase();

        match head.as_str() {
            "replay" => return Ok(Command::Replay(sequence_arg("replay", rest)?)),
            "sim" => return Ok(Command::Simulate(sequence_arg("sim", rest)?)),
            _ => {}
        }
        if !rest.is_empty() {
            return Err(CommandError::Unknown(line.to_string()));
        }

        let command = match head.as_str() {
            "p" | "player" => Command::Record(Outcome::Player),
            "b" | "banker" => Command::Record(Outcome::Banker),
            "u" | "undo" => Command::Undo,
            "r" | "reset" => Command::ResetBetting,
            "n" | "new" => Command::NewSession,
            "s" | "status" => Command::Status,
            "j" | "json" => Command::Json,
            "h" | "history" => Command::History,
            "?" | "help" => Command::Help,
            "q" | "quit" | "exit" => Command::Quit,
            _ => return Err(CommandError::Unknown(line.to_string())),
        };
        Ok(command)
    }
}

fn sequence_arg(name: &'static str, text: &str) -> Result<Vec<Outcome>, CommandError> {
    let outcomes = parse_sequence(text)?;
    if outcomes.is_empty() {
        return Err(CommandError::MissingSequence(name));
    }
    Ok(outcomes)
}

// ---------------------------------------------------------------------------
// Console
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Text to print plus whether the loop keeps going.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub flow: Flow,
}

impl Reply {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            flow: Flow::Continue,
        }
    }
}

/// Destructive action waiting for a y/n answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    ResetBetting,
    NewSession,
}

pub struct Console {
    engine: PredictionEngine,
    replayer: Replayer,
    pending: Option<Pending>,
}

impl Console {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let mut engine = PredictionEngine::try_new(config)?;
        engine.subscribe(Box::new(TraceObserver));
        Ok(Self {
            engine,
            replayer: Replayer::new(config.clone()),
            pending: None,
        })
    }

    pub fn engine(&self) -> &PredictionEngine {
        &self.engine
    }

    /// Apply one line of input.
    pub fn handle_line(&mut self, line: &str) -> Result<Reply> {
        if let Some(pending) = self.pending.take() {
            return Ok(self.confirm(pending, line));
        }
        if line.trim().is_empty() {
            return Ok(Reply::text(""));
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => return Ok(Reply::text(e.to_string())),
        };
        debug!(?command, "Console command");

        let reply = match command {
            Command::Record(outcome) => {
                let report = self.engine.record_outcome(outcome);
                Reply::text(format!(
                    "{}\n{}",
                    render::round_line(&report),
                    render::status_board(&self.engine)
                ))
            }
            Command::Undo => match self.engine.undo() {
                Ok(()) => Reply::text(format!(
                    "Undone.\n{}",
                    render::status_board(&self.engine)
                )),
                Err(e) => Reply::text(e.to_string()),
            },
            Command::ResetBetting => {
                self.pending = Some(Pending::ResetBetting);
                Reply::text("Reset betting? Ladder and streak are cleared; history and profit lock are kept. [y/N]")
            }
            Command::NewSession => {
                self.pending = Some(Pending::NewSession);
                Reply::text("Start a new session? All history and the profit lock are discarded. [y/N]")
            }
            Command::Status => Reply::text(render::status_board(&self.engine)),
            Command::Json => {
                let json = serde_json::to_string_pretty(&self.engine.status())
                    .context("Failed to serialize session status")?;
                Reply::text(json)
            }
            Command::History => Reply::text(render::history(&self.engine)),
            Command::Replay(outcomes) => {
                let lines: Vec<String> = outcomes
                    .iter()
                    .map(|o| render::round_line(&self.engine.record_outcome(*o)))
                    .collect();
                info!(rounds = outcomes.len(), "Sequence recorded");
                Reply::text(format!(
                    "{}\n{}",
                    lines.join("\n"),
                    render::status_board(&self.engine)
                ))
            }
            Command::Simulate(outcomes) => {
                Reply::text(self.replayer.run(&outcomes).to_string())
            }
            Command::Help => Reply::text(render::HELP),
            Command::Quit => Reply {
                text: "Bye.".to_string(),
                flow: Flow::Quit,
            },
        };
        Ok(reply)
    }

    fn confirm(&mut self, pending: Pending, answer: &str) -> Reply {
        if !matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
            return Reply::text("Cancelled.");
        }
        let done = match pending {
            Pending::ResetBetting => {
                self.engine.reset_betting();
                "Betting reset."
            }
            Pending::NewSession => {
                self.engine.new_session();
                "New session started."
            }
        };
        Reply::text(format!("{done}\n{}", render::status_board(&self.engine)))
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Where console input lines come from. `None` means input is closed.
#[allow(async_fn_in_trait)]
pub trait LineSource {
    async fn next_line(&mut self) -> Result<Option<String>>;
}

impl<R: AsyncBufRead + Unpin> LineSource for Lines<R> {
    async fn next_line(&mut self) -> Result<Option<String>> {
        Lines::next_line(self).await.context("Failed to read input")
    }
}

impl LineSource for mpsc::Receiver<String> {
    async fn next_line(&mut self) -> Result<Option<String>> {
        Ok(self.recv().await)
    }
}

/// Read stdin on a detached thread and forward each line.
///
/// The channel closes at end of input. The reader thread lives outside
/// the runtime, so runtime shutdown never waits on a pending read.
pub fn stdin_lines() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || forward_lines(std::io::stdin().lock(), tx));
    rx
}

fn forward_lines<R: BufRead>(reader: R, tx: mpsc::Sender<String>) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "Failed to read input");
                break;
            }
        };
        if tx.blocking_send(line).is_err() {
            break;
        }
    }
}

/// Read commands from `source` until it closes or `quit`, answering on
/// `writer`.
pub async fn run<S, W>(console: &mut Console, mut source: S, writer: &mut W) -> Result<()>
where
    S: LineSource,
    W: AsyncWrite + Unpin,
{
    writer.write_all(PROMPT).await?;
    writer.flush().await?;

    while let Some(line) = source.next_line().await? {
        let reply = console.handle_line(&line)?;
        if !reply.text.is_empty() {
            writer.write_all(reply.text.as_bytes()).await?;
            writer.write_all(b"\n").await?;
        }
        if reply.flow == Flow::Quit {
            writer.flush().await?;
            return Ok(());
        }
        writer.write_all(PROMPT).await?;
        writer.flush().await?;
    }

    info!("Input closed");
    Ok(())
}

// ---------------------------------------------------------------------------
// Observers
// ---------------------------------------------------------------------------

/// Mirrors engine notifications into the log.
struct TraceObserver;

impl SessionObserver for TraceObserver {
    fn on_refresh(&mut self, status: &SessionStatus) {
        debug!(
            rounds = status.rounds,
            prediction = %status.prediction,
            bet = status.effective_bet,
            bankroll = status.bankroll,
            "Session refreshed"
        );
    }

    fn on_profit_lock(&mut self, lock: i64) {
        info!(lock, "Profit lock notice");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
