//! Drones and the teams that own them.

use serde::{Deserialize, Serialize};

use crate::game::Point;

/// Unique identifier for a team. Equal to the team's index in the match.
pub type TeamId = u8;

/// Identifier of a drone inside its team. Equal to its index in the team.
pub type DroneId = u8;

/// A single drone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drone {
    /// Owning team.
    pub team: TeamId,
    /// Id within the team.
    pub id: DroneId,
    /// Where the drone is now.
    pub position: Point,
    /// Where the drone was before its last move.
    pub previous: Point,
}

impl Drone {
    /// Create a drone standing still at `position`.
    #[must_use]
    pub const fn new(team: TeamId, id: DroneId, position: Point) -> Self {
        Self {
            team,
            id,
            position,
            previous: position,
        }
    }

    /// Move to `position`, remembering where the drone came from.
    pub fn move_to(&mut self, position: Point) {
        self.previous = self.position;
        self.position = position;
    }

    /// Put the drone at `position` with no movement history.
    pub fn place(&mut self, position: Point) {
        self.position = position;
        self.previous = position;
    }

    /// Distance covered by the last move.
    #[must_use]
    pub fn displacement(&self) -> f64 {
        self.previous.distance_to(self.position)
    }
}

/// A team and its drones, ordered by drone id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Team identifier.
    pub id: TeamId,
    /// Drones owned by this team.
    pub drones: Vec<Drone>,
}

impl Team {
    /// Create a team whose drones start at the given positions.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(id: TeamId, starts: &[Point]) -> Self {
        let drones = starts
            .iter()
            .enumerate()
            .map(|(i, &p)| Drone::new(id, i as DroneId, p))
            .collect();
        Self { id, drones }
    }

    /// Current drone positions in drone id order.
    #[must_use]
    pub fn positions(&self) -> Vec<Point> {
        self.drones.iter().map(|d| d.position).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drone_move_tracks_previous() {
        let mut drone = Drone::new(1, 0, Point::new(10, 10));
        assert_eq!(drone.previous, Point::new(10, 10));

        drone.move_to(Point::new(40, 50));
        assert_eq!(drone.previous, Point::new(10, 10));
        assert_eq!(drone.position, Point::new(40, 50));
        assert!((drone.displacement() - 50.0).abs() < 1e-9);

        drone.place(Point::new(0, 0));
        assert!(drone.displacement().abs() < 1e-9);
    }

    #[test]
    fn test_team_numbering() {
        let team = Team::new(2, &[Point::new(1, 1), Point::new(2, 2), Point::new(3, 3)]);
        assert_eq!(team.drones.len(), 3);
        for (i, drone) in team.drones.iter().enumerate() {
            assert_eq!(usize::from(drone.id), i);
            assert_eq!(drone.team, 2);
        }
        assert_eq!(team.positions()[2], Point::new(3, 3));
    }
}
