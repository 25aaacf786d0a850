use tracing::debug;

use crate::agent::{Agent, AgentError};
use crate::game::{GameState, Point, TeamId};
use crate::strategy::{AgentState, Pipeline, StrategyConfig};

/// Plays with the strategic pipeline.
///
/// Zone values are computed in [`Agent::initialize`]; every later turn runs
/// observe, organize, allocate and command against the snapshot it is given.
#[derive(Debug, Clone)]
pub struct TaskBasedAgent {
    pipeline: Pipeline,
    memory: Option<AgentState>,
}

impl TaskBasedAgent {
    /// Create an agent from a strategy configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Config`] if the configuration does not validate.
    pub fn new(config: StrategyConfig) -> Result<Self, AgentError> {
        Ok(Self {
            pipeline: Pipeline::new(config)?,
            memory: None,
        })
    }

    /// What the agent remembers from the last turn, if it has started a match.
    #[must_use]
    pub const fn memory(&self) -> Option<&AgentState> {
        self.memory.as_ref()
    }
}

impl Agent for TaskBasedAgent {
    fn name(&self) -> &str {
        "task-based"
    }

    fn initialize(&mut self, team: TeamId, state: &GameState) -> Result<(), AgentError> {
        if state.team(team).is_none() {
            return Err(AgentError::UnknownTeam(team));
        }
        self.memory = Some(self.pipeline.initialize(state, team));
        Ok(())
    }

    fn play(&mut self, state: &GameState) -> Result<Vec<Point>, AgentError> {
        let memory = self.memory.as_mut().ok_or(AgentError::NotInitialized)?;
        Ok(self.pipeline.plan(state, memory))
    }

    fn dispose(&mut self) {
        if let Some(memory) = self.memory.take() {
            debug!(team = memory.team, turns = memory.turns_planned, "task-based agent done");
        }
    }
}
