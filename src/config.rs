//! Configuration loading from TOML.
//!
//! Reads `tracker.toml` (or the file named by `TRACKER_CONFIG`) and
//! deserializes into strongly-typed structs. Every field has a default, so
//! a missing file or a partial file is fine.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

/// Default config file, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "tracker.toml";

/// Env var overriding the config path.
pub const CONFIG_PATH_ENV: &str = "TRACKER_CONFIG";

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub session: SessionConfig,
    pub signal: SignalConfig,
    pub ladder: LadderConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// Betting unit. Fixed for the lifetime of a session.
    pub unit_size: i64,
    /// How many pairs the history view shows.
    pub history_limit: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            unit_size: 1,
            history_limit: 100,
        }
    }
}

/// Dominance and streak detection parameters.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SignalConfig {
    /// Trailing pairs considered for the odd/even tally.
    pub window: usize,
    /// Pairs required before any verdict is issued.
    pub min_pairs: usize,
    /// Pairs required before a prediction is settled.
    pub settle_after_pairs: usize,
    /// Odd/even difference below which the engine holds.
    pub hold_margin: usize,
    /// Identical trailing outcomes that make a streak.
    pub streak_length: usize,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            window: 10,
            min_pairs: 5,
            settle_after_pairs: 6,
            hold_margin: 2,
            streak_length: 3,
        }
    }
}

/// Staking ladder parameters.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LadderConfig {
    /// Floor when stepping the bet down after wins.
    pub min_bet: i64,
    /// Ceiling applied when a losing run doubles the bet.
    pub max_doubled_bet: i64,
    /// Consecutive wins before the bet steps down.
    pub win_streak_to_reduce: u32,
    /// Consecutive losses before the bet doubles instead of stepping up.
    pub loss_streak_to_double: u32,
}

impl Default for LadderConfig {
    fn default() -> Self {
        Self {
            min_bet: 1,
            max_doubled_bet: 5,
            win_streak_to_reduce: 2,
            loss_streak_to_double: 3,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            info!(path, "No config file found, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Resolve the config path from the environment, falling back to
    /// [`DEFAULT_CONFIG_FILE`].
    pub fn resolve_path() -> String {
        std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string())
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject parameter combinations the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.session.unit_size < 1 {
            bail!("session.unit_size must be at least 1, got {}", self.session.unit_size);
        }
        if self.signal.window < 1 {
            bail!("signal.window must be at least 1");
        }
        if self.signal.min_pairs < 1 {
            bail!("signal.min_pairs must be at least 1");
        }
        if self.signal.streak_length < 1 {
            bail!("signal.streak_length must be at least 1");
        }
        if self.signal.settle_after_pairs <= self.signal.min_pairs {
            bail!(
                "signal.settle_after_pairs ({}) must exceed signal.min_pairs ({})",
                self.signal.settle_after_pairs,
                self.signal.min_pairs
            );
        }
        if self.ladder.max_doubled_bet < self.ladder.min_bet {
            bail!(
                "ladder.max_doubled_bet ({}) must be at least ladder.min_bet ({})",
                self.ladder.max_doubled_bet,
                self.ladder.min_bet
            );
        }
        Ok(())
    }
}
