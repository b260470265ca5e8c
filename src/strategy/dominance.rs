//! Odd/even dominance and streak detection.
//!
//! Tallies the trailing window of pairs and turns the tally, plus any
//! active streak, into a verdict and a next-round prediction.

use tracing::debug;

use crate::config::SignalConfig;
use crate::types::{DominanceVerdict, Outcome, PairRecord, Prediction};

// ---------------------------------------------------------------------------
// Tally
// ---------------------------------------------------------------------------

/// Odd and even pair counts over a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PairTally {
    pub odd: usize,
    pub even: usize,
}

impl PairTally {
    pub fn margin(&self) -> usize {
        self.odd.abs_diff(self.even)
    }
}

// ---------------------------------------------------------------------------
// Signal
// ---------------------------------------------------------------------------

/// Verdict and prediction computed together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Signal {
    pub dominance: DominanceVerdict,
    pub prediction: Prediction,
}

impl Signal {
    pub fn not_available() -> Self {
        Self::default()
    }
}

// ---------------------------------------------------------------------------
// Detector
// ---------------------------------------------------------------------------

pub struct DominanceDetector {
    config: SignalConfig,
}

impl DominanceDetector {
    pub fn new(config: SignalConfig) -> Self {
        Self { config }
    }

    /// Count odd and even pairs among the most recent `window` pairs.
    pub fn tally(&self, pairs: &[PairRecord]) -> PairTally {
        let start = pairs.len().saturating_sub(self.config.window);
        pairs[start..]
            .iter()
            .fold(PairTally::default(), |mut tally, pair| {
                if pair.is_even() {
                    tally.even += 1;
                } else {
                    tally.odd += 1;
                }
                tally
            })
    }

    /// A streak exists when the last `streak_length` recorded outcomes all
    /// equal `reference`.
    pub fn detect_streak(&self, pairs: &[PairRecord], reference: Outcome) -> Option<Outcome> {
        let len = self.config.streak_length;
        if pairs.len() < len {
            return None;
        }
        pairs[pairs.len() - len..]
            .iter()
            .all(|pair| pair.current == reference)
            .then_some(reference)
    }

    /// Compute the verdict and prediction for the latest round.
    ///
    /// Returns `None` until `min_pairs` pairs exist. A streak overrides the
    /// tally. Odd dominance bets against the latest outcome, Even dominance
    /// bets with it.
    pub fn evaluate(
        &self,
        pairs: &[PairRecord],
        streak: Option<Outcome>,
        reference: Outcome,
    ) -> Option<Signal> {
        if pairs.len() < self.config.min_pairs {
            return None;
        }

        let tally = self.tally(pairs);

        let signal = if let Some(side) = streak {
            Signal {
                dominance: DominanceVerdict::Streak(side),
                prediction: Prediction::Bet(side),
            }
        } else if tally.margin() < self.config.hold_margin {
            Signal {
                dominance: DominanceVerdict::NotAvailable,
                prediction: Prediction::Hold,
            }
        } else if tally.odd > tally.even {
            Signal {
                dominance: DominanceVerdict::Odd,
                prediction: Prediction::Bet(reference.opposite()),
            }
        } else {
            Signal {
                dominance: DominanceVerdict::Even,
                prediction: Prediction::Bet(reference),
            }
        };

        debug!(
            pairs = pairs.len(),
            odd = tally.odd,
            even = tally.even,
            streak = ?streak,
            dominance = %signal.dominance,
            prediction = %signal.prediction,
            "Signal evaluated"
        );

        Some(signal)
    }

    /// Rebuild streak and signal from history alone, using the last
    /// recorded outcome as the reference.
    pub fn recompute(&self, pairs: &[PairRecord]) -> (Option<Outcome>, Signal) {
        let Some(last) = pairs.last() else {
            return (None, Signal::not_available());
        };
        if pairs.len() < self.config.min_pairs {
            return (None, Signal::not_available());
        }
        let streak = self.detect_streak(pairs, last.current);
        let signal = self
            .evaluate(pairs, streak, last.current)
            .unwrap_or_else(Signal::not_available);
        (streak, signal)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
