//! Strategy: dominance/streak signals and the staking ladder.

pub mod dominance;
pub mod ladder;

pub use dominance::{DominanceDetector, PairTally, Signal};
pub use ladder::{LadderStep, StakingLadder};
