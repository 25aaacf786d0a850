//! Agents: whatever picks destinations for one team.
//!
//! The match driver only talks to the [`Agent`] trait. Each agent sees the
//! same frozen pre-turn snapshot and answers with one destination per drone.

mod corner;
mod task_based;

pub use corner::CornerAgent;
pub use task_based::TaskBasedAgent;

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::game::{GameState, Point, TeamId};
use crate::strategy::{ConfigError, StrategyConfig};

/// A participant in a match.
pub trait Agent: Send {
    /// Display name used in logs and results.
    fn name(&self) -> &str;

    /// Called once before the first turn.
    ///
    /// # Errors
    ///
    /// Returns an [`AgentError`] if the agent cannot play `team` on this field.
    fn initialize(&mut self, team: TeamId, state: &GameState) -> Result<(), AgentError>;

    /// Destinations for every drone of the agent's team, in drone id order.
    ///
    /// # Errors
    ///
    /// Returns an [`AgentError`] if no orders can be produced this turn. The
    /// team then holds position.
    fn play(&mut self, state: &GameState) -> Result<Vec<Point>, AgentError>;

    /// Called once after the last turn.
    fn dispose(&mut self) {}
}

/// Why an agent could not play.
#[derive(Debug)]
pub enum AgentError {
    /// `play` was called before `initialize`.
    NotInitialized,
    /// The team does not exist in the match.
    UnknownTeam(TeamId),
    /// The strategy configuration was rejected.
    Config(ConfigError),
}

impl fmt::Display for AgentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInitialized => write!(f, "agent played before being initialized"),
            Self::UnknownTeam(team) => write!(f, "team {team} is not part of this match"),
            Self::Config(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for AgentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for AgentError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Built-in agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgentKind {
    /// The strategic pipeline.
    TaskBased,
    /// Drives everything into the bottom-right corner.
    Corner,
}

impl AgentKind {
    /// Short name, as accepted on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::TaskBased => "task-based",
            Self::Corner => "corner",
        }
    }

    /// Create a fresh agent of this kind.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Config`] if `config` does not validate.
    pub fn build(self, config: &StrategyConfig) -> Result<Box<dyn Agent>, AgentError> {
        Ok(match self {
            Self::TaskBased => Box::new(TaskBasedAgent::new(*config)?),
            Self::Corner => Box::new(CornerAgent::new()),
        })
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_every_kind() {
        let config = StrategyConfig::default();
        for kind in [AgentKind::TaskBased, AgentKind::Corner] {
            let agent = kind.build(&config).unwrap();
            assert_eq!(agent.name(), kind.name());
        }
    }

    #[test]
    fn test_build_rejects_bad_config() {
        let config = StrategyConfig {
            horizon: 0,
            ..StrategyConfig::default()
        };
        let err = AgentKind::TaskBased.build(&config).err().unwrap();
        assert!(matches!(err, AgentError::Config(_)));
        assert!(err.to_string().contains("horizon"));
    }

    #[test]
    fn test_kind_serde_names() {
        let json = serde_json::to_string(&AgentKind::TaskBased).unwrap();
        assert_eq!(json, "\"task-based\"");
        assert_eq!(AgentKind::Corner.to_string(), "corner");
    }
}
