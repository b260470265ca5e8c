//! Core engine: session state, settlement and undo.

pub mod accountant;
pub mod history;
pub mod session;

pub use accountant::{Accountant, Settlement};
pub use history::{SessionSnapshot, SessionState, UndoStack};
pub use session::{PredictionEngine, RoundReport, SessionStatus};

/// Receives change notifications from a [`PredictionEngine`].
///
/// Views subscribe instead of polling. `on_refresh` follows every mutating
/// operation; `on_profit_lock` fires once per new lock, before the refresh
/// for that round.
#[cfg_attr(test, mockall::automock)]
pub trait SessionObserver: Send {
    /// Engine state changed.
    fn on_refresh(&mut self, status: &SessionStatus);

    /// A win pushed the bankroll to a new high and betting was reset.
    fn on_profit_lock(&mut self, lock: i64);
}
