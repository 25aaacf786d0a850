//! Turn simulation.
//!
//! [`Simulation`] owns the canonical [`GameState`] and advances it one turn
//! at a time from every team's destinations. Moves are simultaneous: the
//! caller gathers all orders against the same pre-turn snapshot, then hands
//! them over in one [`Simulation::step`].

use tracing::{debug, warn};

use crate::error::OrderRejection;
use crate::game::{
    reachable_point, resolve_zone_ownership, GameState, OwnershipChange, Point, TeamId,
};

/// Destinations with a coordinate beyond this magnitude are rejected outright.
pub const MAX_ORDER_COORDINATE: i32 = 1_000_000;

/// One team's orders for a turn: a destination per drone in drone id order,
/// or the reason the agent could not produce them.
pub type TeamOrders = Result<Vec<Point>, OrderRejection>;

/// What happened during one turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnReport {
    /// Turn number that was played (0-indexed).
    pub turn: u32,
    /// Teams whose orders were thrown away, with the reason.
    pub rejected: Vec<(TeamId, OrderRejection)>,
    /// Zones that changed hands.
    pub ownership_changes: Vec<OwnershipChange>,
}

/// Check a team's orders against the current state.
///
/// # Errors
///
/// Returns the [`OrderRejection`] carried by `orders`, or one describing a
/// wrong destination count or an out-of-range coordinate.
#[allow(clippy::cast_possible_truncation)]
pub fn validate_orders(
    state: &GameState,
    team: TeamId,
    orders: TeamOrders,
) -> Result<Vec<Point>, OrderRejection> {
    let destinations = orders?;
    let expected = state.drones_of(team).len();
    if destinations.len() != expected {
        return Err(OrderRejection::WrongCount {
            expected,
            found: destinations.len(),
        });
    }
    if let Some((drone, &point)) = destinations.iter().enumerate().find(|(_, p)| {
        p.x.unsigned_abs() > MAX_ORDER_COORDINATE.unsigned_abs()
            || p.y.unsigned_abs() > MAX_ORDER_COORDINATE.unsigned_abs()
    }) {
        return Err(OrderRejection::CoordinateOutOfRange {
            drone: drone as u8,
            point,
        });
    }
    Ok(destinations)
}

/// The canonical match state plus cumulative scores.
#[derive(Debug, Clone)]
pub struct Simulation {
    state: GameState,
    scores: Vec<u32>,
}

impl Simulation {
    /// Start simulating from `state`, with every score at zero.
    #[must_use]
    pub fn new(state: GameState) -> Self {
        let scores = vec![0; state.teams.len()];
        Self { state, scores }
    }

    /// The current state.
    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// Cumulative scores, indexed by team id.
    #[must_use]
    pub fn scores(&self) -> &[u32] {
        &self.scores
    }

    /// Whether the turn budget is spent.
    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.state.is_over()
    }

    /// Play one turn.
    ///
    /// `orders[t]` holds team `t`'s orders. Missing or invalid orders make that
    /// team hold position for the turn; they never stop the match. Once the
    /// match is over this does nothing and returns an empty report.
    #[allow(clippy::cast_possible_truncation)]
    pub fn step(&mut self, orders: Vec<TeamOrders>) -> TurnReport {
        if self.state.is_over() {
            return TurnReport::default();
        }

        let turn = self.state.turn();
        let mut report = TurnReport {
            turn,
            ..TurnReport::default()
        };

        let mut orders = orders.into_iter();
        let mut resolved: Vec<Option<Vec<Point>>> = Vec::with_capacity(self.state.teams.len());
        for team in 0..self.state.teams.len() {
            let team = team as TeamId;
            let team_orders = orders.next().unwrap_or(Err(OrderRejection::WrongCount {
                expected: self.state.drones_of(team).len(),
                found: 0,
            }));
            match validate_orders(&self.state, team, team_orders) {
                Ok(destinations) => resolved.push(Some(destinations)),
                Err(reason) => {
                    warn!(turn, team, %reason, "orders rejected, team holds position");
                    report.rejected.push((team, reason));
                    resolved.push(None);
                }
            }
        }

        for (team, destinations) in self.state.teams.iter_mut().zip(&resolved) {
            for drone in &mut team.drones {
                let destination = destinations
                    .as_ref()
                    .and_then(|d| d.get(usize::from(drone.id)).copied())
                    .unwrap_or(drone.position);
                drone.move_to(reachable_point(drone.position, destination));
            }
        }

        report.ownership_changes = resolve_zone_ownership(&mut self.state);
        for change in &report.ownership_changes {
            debug!(
                turn,
                zone = change.zone,
                from = ?change.from,
                to = change.to,
                "zone changed hands"
            );
        }

        for owner in self.state.zones.iter().filter_map(|z| z.owner) {
            if let Some(score) = self.scores.get_mut(usize::from(owner)) {
                *score += 1;
            }
        }

        self.state.remaining_turns -= 1;
        report
    }

    /// The team with the highest cumulative score. Ties go to the lowest team id.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn winner(&self) -> Option<TeamId> {
        let mut best: Option<(usize, u32)> = None;
        for (team, &score) in self.scores.iter().enumerate() {
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((team, score));
            }
        }
        best.map(|(team, _)| team as TeamId)
    }

    /// Give back the final state and scores.
    #[must_use]
    pub fn into_parts(self) -> (GameState, Vec<u32>) {
        (self.state, self.scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Team, Zone, MAX_TURNS};

    fn two_team_game() -> Simulation {
        let zones = vec![Zone::new(0, Point::new(2000, 900))];
        let teams = vec![
            Team::new(0, &[Point::new(1850, 900), Point::new(100, 100)]),
            Team::new(1, &[Point::new(2300, 900), Point::new(3900, 1700)]),
        ];
        Simulation::new(GameState::new(zones, teams).unwrap())
    }

    fn hold(sim: &Simulation, team: TeamId) -> TeamOrders {
        Ok(sim.state().team(team).unwrap().positions())
    }

    #[test]
    fn test_step_moves_and_captures() {
        let mut sim = two_team_game();
        let orders = vec![
            Ok(vec![Point::new(2000, 900), Point::new(100, 100)]),
            hold(&sim, 1),
        ];

        let report = sim.step(orders);
        assert_eq!(report.turn, 0);
        assert!(report.rejected.is_empty());

        let drone = sim.state().drones_of(0)[0];
        assert_eq!(drone.position, Point::new(1950, 900));
        assert_eq!(drone.previous, Point::new(1850, 900));
        assert_eq!(sim.state().zones[0].owner, Some(0));
        assert_eq!(sim.scores(), &[1, 0]);
        assert_eq!(sim.state().remaining_turns, MAX_TURNS - 1);
    }

    #[test]
    fn test_wrong_count_holds_position() {
        let mut sim = two_team_game();
        let orders = vec![Ok(vec![Point::new(2000, 900)]), hold(&sim, 1)];

        let report = sim.step(orders);
        assert_eq!(
            report.rejected,
            vec![(0, OrderRejection::WrongCount { expected: 2, found: 1 })]
        );
        assert_eq!(sim.state().drones_of(0)[0].position, Point::new(1850, 900));
        assert_eq!(sim.state().zones[0].owner, None);
    }

    #[test]
    fn test_missing_orders_and_agent_failure() {
        let mut sim = two_team_game();
        let report = sim.step(vec![Err(OrderRejection::AgentFailure("boom".into()))]);
        assert_eq!(report.rejected.len(), 2);
        assert_eq!(report.rejected[1].0, 1);
        assert!(!sim.is_over());
    }

    #[test]
    fn test_out_of_range_coordinate_rejected() {
        let sim = two_team_game();
        let orders = Ok(vec![Point::new(0, 0), Point::new(i32::MIN, 5)]);
        assert!(matches!(
            validate_orders(sim.state(), 0, orders),
            Err(OrderRejection::CoordinateOutOfRange { drone: 1, .. })
        ));
    }

    #[test]
    fn test_match_ends_after_turn_budget() {
        let mut sim = two_team_game();
        for _ in 0..MAX_TURNS {
            let orders = vec![hold(&sim, 0), hold(&sim, 1)];
            sim.step(orders);
        }
        assert!(sim.is_over());

        let before = sim.state().clone();
        let report = sim.step(vec![hold(&sim, 0), hold(&sim, 1)]);
        assert_eq!(report, TurnReport::default());
        assert_eq!(sim.state(), &before);
    }

    #[test]
    fn test_winner_tie_goes_to_lowest_id() {
        let mut sim = two_team_game();
        assert_eq!(sim.winner(), Some(0));
        sim.scores = vec![4, 7];
        assert_eq!(sim.winner(), Some(1));
        sim.scores = vec![7, 7];
        assert_eq!(sim.winner(), Some(0));
    }
}
