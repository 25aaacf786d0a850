//! Game state management.

use serde::{Deserialize, Serialize};

use crate::error::SetupError;
use crate::game::{Drone, Team, TeamId, Zone, ZoneId};

/// Field width in distance units.
pub const FIELD_WIDTH: i32 = 4000;

/// Field height in distance units.
pub const FIELD_HEIGHT: i32 = 1800;

/// Radius of every zone.
pub const ZONE_RADIUS: i32 = 100;

/// How far inside the zone boundary drones aim when heading for a zone.
pub const ZONE_BORDER_MARGIN: i32 = 5;

/// Maximum distance a drone travels in one turn.
pub const MAX_MOVE_DISTANCE: i32 = 100;

/// Number of turns in a match.
pub const MAX_TURNS: u32 = 200;

/// Maximum number of teams in a match.
pub const MAX_TEAMS: usize = 4;

/// Complete shared game state.
///
/// Created once at match start and mutated in place by the
/// [`Simulation`](crate::game::Simulation). Agents only ever see clones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Turns left before the match ends.
    pub remaining_turns: u32,
    /// All zones, indexed by zone id.
    pub zones: Vec<Zone>,
    /// All teams, indexed by team id.
    pub teams: Vec<Team>,
}

impl GameState {
    /// Create a new game state with a full turn budget.
    ///
    /// # Errors
    ///
    /// Returns a [`SetupError`] if there are no teams or zones, too many
    /// teams, uneven or empty teams, ids that don't match their index, or
    /// anything placed outside the field.
    pub fn new(zones: Vec<Zone>, teams: Vec<Team>) -> Result<Self, SetupError> {
        if teams.is_empty() {
            return Err(SetupError::NoTeams);
        }
        if teams.len() > MAX_TEAMS {
            return Err(SetupError::TooManyTeams(teams.len()));
        }
        if zones.is_empty() {
            return Err(SetupError::NoZones);
        }

        let expected = teams[0].drones.len();
        if expected == 0 {
            return Err(SetupError::NoDrones);
        }

        for (index, team) in teams.iter().enumerate() {
            if usize::from(team.id) != index {
                return Err(SetupError::IdMismatch {
                    entity: "team",
                    index,
                    id: usize::from(team.id),
                });
            }
            if team.drones.len() != expected {
                return Err(SetupError::UnevenTeams {
                    team: team.id,
                    expected,
                    found: team.drones.len(),
                });
            }
            for (i, drone) in team.drones.iter().enumerate() {
                if usize::from(drone.id) != i || drone.team != team.id {
                    return Err(SetupError::IdMismatch {
                        entity: "drone",
                        index: i,
                        id: usize::from(drone.id),
                    });
                }
                if !drone.position.is_in_field() || !drone.previous.is_in_field() {
                    return Err(SetupError::DroneOutsideField {
                        team: team.id,
                        drone: drone.id,
                        position: drone.position,
                    });
                }
            }
        }

        for (index, zone) in zones.iter().enumerate() {
            if usize::from(zone.id) != index {
                return Err(SetupError::IdMismatch {
                    entity: "zone",
                    index,
                    id: usize::from(zone.id),
                });
            }
            if !zone.center.is_in_field() {
                return Err(SetupError::ZoneOutsideField {
                    zone: zone.id,
                    center: zone.center,
                });
            }
        }

        Ok(Self {
            remaining_turns: MAX_TURNS,
            zones,
            teams,
        })
    }

    /// Check if the match is over.
    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.remaining_turns == 0
    }

    /// Number of turns already played.
    #[must_use]
    pub const fn turn(&self) -> u32 {
        MAX_TURNS.saturating_sub(self.remaining_turns)
    }

    /// Number of drones per team.
    #[must_use]
    pub fn drone_count(&self) -> usize {
        self.teams.first().map_or(0, |t| t.drones.len())
    }

    /// Get a team by id.
    #[must_use]
    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.get(usize::from(id))
    }

    /// Get a zone by id.
    #[must_use]
    pub fn zone(&self, id: ZoneId) -> Option<&Zone> {
        self.zones.get(usize::from(id))
    }

    /// Drones of one team, in drone id order. Empty for an unknown team.
    #[must_use]
    pub fn drones_of(&self, team: TeamId) -> &[Drone] {
        self.team(team).map_or(&[], |t| t.drones.as_slice())
    }

    /// Every drone not owned by `team`, ordered by team then drone id.
    pub fn enemy_drones(&self, team: TeamId) -> impl Iterator<Item = &Drone> {
        self.teams
            .iter()
            .filter(move |t| t.id != team)
            .flat_map(|t| t.drones.iter())
    }

    /// Every drone in the match, ordered by team then drone id.
    pub fn all_drones(&self) -> impl Iterator<Item = &Drone> {
        self.teams.iter().flat_map(|t| t.drones.iter())
    }

    /// Drones of any team inside `zone`.
    pub fn drones_in_zone<'a>(&'a self, zone: &'a Zone) -> impl Iterator<Item = &'a Drone> {
        self.all_drones().filter(move |d| zone.contains(d.position))
    }

    /// Number of zones currently owned by `team`.
    #[must_use]
    pub fn owned_zone_count(&self, team: TeamId) -> usize {
        self.zones.iter().filter(|z| z.is_owned_by(team)).count()
    }
}
