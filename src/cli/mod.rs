//! CLI command implementations for dronefield.

pub(crate) mod run;
pub(crate) mod tournament;

mod output;

use clap::ValueEnum;
use dronefield::agent::{Agent, AgentError, AgentKind};
use dronefield::strategy::{ConfigError, StrategyConfig};
use dronefield::tournament::TournamentError;
use std::error::Error;
use std::fmt;
use std::path::Path;

/// Output format for the `run` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Output format for the `tournament` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum TournamentFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// CSV format.
    Csv,
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<TournamentError> for CliError {
    fn from(e: TournamentError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<AgentError> for CliError {
    fn from(e: AgentError) -> Self {
        Self::new(e.to_string())
    }
}

/// Load the strategy configuration, or the defaults when no file is given.
pub(crate) fn load_strategy(path: Option<&Path>) -> Result<StrategyConfig, CliError> {
    match path {
        Some(path) => Ok(StrategyConfig::from_path(path)?),
        None => Ok(StrategyConfig::default()),
    }
}

/// Build one fresh agent per team.
pub(crate) fn build_agents(
    kinds: &[AgentKind],
    config: &StrategyConfig,
) -> Result<Vec<Box<dyn Agent>>, AgentError> {
    kinds.iter().map(|kind| kind.build(config)).collect()
}

/// Seed from the clock when none is given.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn seed_or_clock(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42)
    })
}
