//! Error types for the game layer.

use std::fmt;

use crate::game::{DroneId, Point, TeamId, ZoneId};

/// Fatal problems found while building a [`GameState`](crate::game::GameState).
///
/// These only happen at match setup. Once a state exists, nothing in the
/// turn loop produces a `SetupError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupError {
    /// The match has no teams.
    NoTeams,
    /// More teams than the contest allows.
    TooManyTeams(usize),
    /// The match has no zones.
    NoZones,
    /// Teams have no drones.
    NoDrones,
    /// A team's drone count differs from the first team's.
    UnevenTeams {
        /// Offending team.
        team: TeamId,
        /// Drone count of team 0.
        expected: usize,
        /// Drone count of the offending team.
        found: usize,
    },
    /// A team or drone id does not match its index.
    IdMismatch {
        /// What kind of entity is misnumbered.
        entity: &'static str,
        /// Position in its list.
        index: usize,
        /// The id it carries.
        id: usize,
    },
    /// A drone starts outside the field.
    DroneOutsideField {
        /// Owning team.
        team: TeamId,
        /// Drone id.
        drone: DroneId,
        /// Offending position.
        position: Point,
    },
    /// A zone center lies outside the field.
    ZoneOutsideField {
        /// Zone id.
        zone: ZoneId,
        /// Offending center.
        center: Point,
    },
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoTeams => write!(f, "a match needs at least one team"),
            Self::TooManyTeams(n) => {
                write!(f, "too many teams: {n} (maximum {})", crate::game::MAX_TEAMS)
            }
            Self::NoZones => write!(f, "a match needs at least one zone"),
            Self::NoDrones => write!(f, "teams must have at least one drone"),
            Self::UnevenTeams {
                team,
                expected,
                found,
            } => write!(
                f,
                "team {team} has {found} drones, expected {expected} like every other team"
            ),
            Self::IdMismatch { entity, index, id } => {
                write!(f, "{entity} at index {index} carries id {id}")
            }
            Self::DroneOutsideField {
                team,
                drone,
                position,
            } => write!(f, "drone {team}/{drone} starts outside the field at {position}"),
            Self::ZoneOutsideField { zone, center } => {
                write!(f, "zone {zone} is centered outside the field at {center}")
            }
        }
    }
}

impl std::error::Error for SetupError {}

/// Why a team's orders were thrown away for one turn.
///
/// A rejection is never fatal: the team simply holds position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderRejection {
    /// The agent returned a different number of destinations than it has drones.
    WrongCount {
        /// Drones owned by the team.
        expected: usize,
        /// Destinations returned.
        found: usize,
    },
    /// A destination coordinate is absurdly far outside the field.
    CoordinateOutOfRange {
        /// Drone the destination was meant for.
        drone: DroneId,
        /// The offending destination.
        point: Point,
    },
    /// The agent itself failed this turn.
    AgentFailure(String),
}

impl fmt::Display for OrderRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongCount { expected, found } => {
                write!(f, "expected {expected} destinations, got {found}")
            }
            Self::CoordinateOutOfRange { drone, point } => {
                write!(f, "destination {point} for drone {drone} is out of range")
            }
            Self::AgentFailure(reason) => write!(f, "agent failed: {reason}"),
        }
    }
}

impl std::error::Error for OrderRejection {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tournament::FieldGenError;

    #[test]
    fn test_setup_error_display() {
        let err = SetupError::UnevenTeams {
            team: 2,
            expected: 5,
            found: 4,
        };
        assert_eq!(
            err.to_string(),
            "team 2 has 4 drones, expected 5 like every other team"
        );
        assert!(SetupError::TooManyTeams(9).to_string().contains("maximum 4"));
    }

    #[test]
    fn test_setup_error_passes_by_value() {
        let err = SetupError::ZoneOutsideField {
            zone: 1,
            center: Point::new(-5, 0),
        };
        let wrapped = FieldGenError::from(err);
        assert_eq!(wrapped, FieldGenError::Setup(err));
        assert!(err.to_string().contains("zone 1"));
    }

    #[test]
    fn test_order_rejection_display() {
        let err = OrderRejection::CoordinateOutOfRange {
            drone: 3,
            point: Point::new(5_000_000, 0),
        };
        assert!(err.to_string().contains("(5000000, 0)"));
        assert!(err.to_string().contains("drone 3"));
    }
}
