use crate::agent::{Agent, AgentError};
use crate::game::{GameState, Point, TeamId, FIELD_HEIGHT, FIELD_WIDTH};

/// Sends every drone to the bottom-right corner, every turn.
///
/// Useful as a baseline opponent and for smoke tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct CornerAgent {
    team: Option<TeamId>,
}

impl CornerAgent {
    /// Create an uninitialized agent.
    #[must_use]
    pub const fn new() -> Self {
        Self { team: None }
    }
}

impl Agent for CornerAgent {
    fn name(&self) -> &str {
        "corner"
    }

    fn initialize(&mut self, team: TeamId, state: &GameState) -> Result<(), AgentError> {
        if state.team(team).is_none() {
            return Err(AgentError::UnknownTeam(team));
        }
        self.team = Some(team);
        Ok(())
    }

    fn play(&mut self, state: &GameState) -> Result<Vec<Point>, AgentError> {
        let team = self.team.ok_or(AgentError::NotInitialized)?;
        let corner = Point::new(FIELD_WIDTH - 1, FIELD_HEIGHT - 1);
        Ok(vec![corner; state.drones_of(team).len()])
    }

    fn dispose(&mut self) {
        self.team = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Team, Zone};

    fn state() -> GameState {
        let zones = vec![Zone::new(0, Point::new(1000, 1000))];
        let teams = vec![
            Team::new(0, &[Point::new(0, 0), Point::new(10, 10)]),
            Team::new(1, &[Point::new(0, 0), Point::new(10, 10)]),
        ];
        GameState::new(zones, teams).unwrap()
    }

    #[test]
    fn test_corner_orders() {
        let state = state();
        let mut agent = CornerAgent::new();
        assert!(matches!(agent.play(&state), Err(AgentError::NotInitialized)));

        agent.initialize(1, &state).unwrap();
        let orders = agent.play(&state).unwrap();
        assert_eq!(orders, vec![Point::new(3999, 1799); 2]);

        agent.dispose();
        assert!(agent.play(&state).is_err());
    }

    #[test]
    fn test_copies_keep_their_own_team() {
        let state = state();
        let mut agent = CornerAgent::new();
        agent.initialize(0, &state).unwrap();

        let mut spare = agent;
        spare.dispose();
        assert!(agent.play(&state).is_ok());
        assert!(spare.play(&state).is_err());
    }

    #[test]
    fn test_unknown_team() {
        let mut agent = CornerAgent::new();
        assert!(matches!(
            agent.initialize(5, &state()),
            Err(AgentError::UnknownTeam(5))
        ));
    }
}
