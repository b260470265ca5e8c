//! Offline replay of recorded outcome sequences.

pub mod runner;

pub use runner::{parse_sequence, HitCount, ReplayReport, Replayer, VerdictStats};
