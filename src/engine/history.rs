//! Session state and the undo stack.
//!
//! The live state and its snapshots share one type, so restoring a
//! snapshot is a plain move.

use serde::Serialize;

use crate::types::{DominanceVerdict, Outcome, PairRecord, Prediction, StakeState};

/// Everything a recorded outcome can change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionState {
    pub pairs: Vec<PairRecord>,
    pub previous_outcome: Option<Outcome>,
    pub stake: StakeState,
    pub dominance: DominanceVerdict,
    pub prediction: Prediction,
    pub streak: Option<Outcome>,
}

/// State captured immediately before an outcome was recorded.
pub type SessionSnapshot = SessionState;

impl SessionState {
    pub fn new(unit_size: i64) -> Self {
        Self {
            pairs: Vec::new(),
            previous_outcome: None,
            stake: StakeState::new(unit_size),
            dominance: DominanceVerdict::NotAvailable,
            prediction: Prediction::NotAvailable,
            streak: None,
        }
    }

    /// Outcomes recorded so far. The first one seeds `previous_outcome`
    /// without forming a pair.
    pub fn rounds(&self) -> usize {
        if self.previous_outcome.is_none() && self.pairs.is_empty() {
            0
        } else {
            self.pairs.len() + 1
        }
    }
}

/// LIFO stack of snapshots, one per outcome since the last reset.
#[derive(Debug, Clone, Default)]
pub struct UndoStack {
    snapshots: Vec<SessionSnapshot>,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, snapshot: SessionSnapshot) {
        self.snapshots.push(snapshot);
    }

    pub fn pop(&mut self) -> Option<SessionSnapshot> {
        self.snapshots.pop()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
