//! Baccarat tracker: pair dominance signals, staking ladder and profit lock
//! for a live Player/Banker session.
//!
//! Library crate exposing all modules for use by integration tests
//! and the console binary.

pub mod backtest;
pub mod config;
pub mod console;
pub mod engine;
pub mod strategy;
pub mod types;
