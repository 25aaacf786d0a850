//! Opponent intent inference from the last observed move.

use crate::game::{dot, Drone, GameState, TeamId, Zone, ZONE_RADIUS};
use crate::strategy::{fan_out, ActivityObserver, EnemyIntel, TaskType};

/// Reads each opposing drone's last move as a heading toward a zone.
///
/// A drone that barely moved is tied to the zone it sits in. A moving drone
/// is tied to the nearest zone lying ahead of it inside a corridor around
/// its heading.
#[derive(Debug, Clone, Copy)]
pub struct MotionObserver {
    motion_threshold: f64,
    corridor: f64,
    parallel: bool,
}

impl MotionObserver {
    /// `corridor_factor` is the corridor half-width in zone radii.
    #[must_use]
    pub fn new(motion_threshold: f64, corridor_factor: f64, parallel: bool) -> Self {
        Self {
            motion_threshold,
            corridor: corridor_factor * f64::from(ZONE_RADIUS),
            parallel,
        }
    }

    /// Zone a single drone is believed to be heading for, if any.
    #[must_use]
    pub fn target_of(&self, drone: &Drone, zones: &[Zone]) -> Option<usize> {
        if drone.displacement() < self.motion_threshold {
            return zones.iter().position(|z| z.contains(drone.position));
        }

        let (from, to) = (drone.previous, drone.position);
        let mut best: Option<(usize, f64)> = None;
        for (i, zone) in zones.iter().enumerate() {
            if zone.center.distance_to_line(from, to) >= self.corridor
                || dot(from, to, from, zone.center) <= 0
            {
                continue;
            }
            let d = to.distance_to(zone.center);
            if best.is_none_or(|(_, closest)| d < closest) {
                best = Some((i, d));
            }
        }
        best.map(|(i, _)| i)
    }
}

impl ActivityObserver for MotionObserver {
    fn observe(&self, state: &GameState, team: TeamId) -> Vec<EnemyIntel> {
        let enemies: Vec<Drone> = state.enemy_drones(team).copied().collect();
        fan_out(&enemies, self.parallel, |drone| {
            let target = self.target_of(drone, &state.zones).map(|i| &state.zones[i]);
            let intent = match target {
                Some(zone) if zone.is_owned_by(drone.team) => TaskType::Defend,
                Some(_) => TaskType::Attack,
                None => TaskType::Unknown,
            };
            EnemyIntel {
                team: drone.team,
                drone: drone.id,
                target: target.map(|z| z.id),
                intent,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Point, Team};

    fn observer() -> MotionObserver {
        MotionObserver::new(2.0, 1.5, false)
    }

    fn state_with_enemy(previous: Point, position: Point) -> GameState {
        let zones = vec![
            Zone::new(0, Point::new(1000, 500)),
            Zone::new(1, Point::new(2000, 500)),
            Zone::new(2, Point::new(200, 500)),
        ];
        let teams = vec![
            Team::new(0, &[Point::new(3000, 1500)]),
            Team::new(1, &[previous]),
        ];
        let mut state = GameState::new(zones, teams).unwrap();
        state.teams[1].drones[0].move_to(position);
        state
    }

    #[test]
    fn test_moving_drone_targets_nearest_ahead() {
        // Heading right along y = 500: zones 0 and 1 are ahead, 2 is behind
        let state = state_with_enemy(Point::new(400, 500), Point::new(500, 500));
        let intel = observer().observe(&state, 0);
        assert_eq!(intel.len(), 1);
        assert_eq!(intel[0].target, Some(0));
        assert_eq!(intel[0].intent, TaskType::Attack);
    }

    #[test]
    fn test_corridor_is_strict() {
        // Zone 0 sits exactly 150 off the heading line y = 650
        let state = state_with_enemy(Point::new(400, 650), Point::new(500, 650));
        assert_eq!(observer().target_of(&state.teams[1].drones[0], &state.zones), None);

        let state = state_with_enemy(Point::new(400, 649), Point::new(500, 649));
        assert_eq!(observer().target_of(&state.teams[1].drones[0], &state.zones), Some(0));
    }

    #[test]
    fn test_moving_away_has_no_target() {
        let state = state_with_enemy(Point::new(3500, 1500), Point::new(3600, 1500));
        let intel = observer().observe(&state, 0);
        assert_eq!(intel[0].target, None);
        assert_eq!(intel[0].intent, TaskType::Unknown);
    }

    #[test]
    fn test_stationary_drone_defends_own_zone() {
        let mut state = state_with_enemy(Point::new(2000, 520), Point::new(2001, 520));
        state.zones[1].owner = Some(1);
        let intel = observer().observe(&state, 0);
        assert_eq!(intel[0].target, Some(1));
        assert_eq!(intel[0].intent, TaskType::Defend);
    }

    #[test]
    fn test_stationary_outside_zones() {
        let state = state_with_enemy(Point::new(1500, 1500), Point::new(1500, 1500));
        assert_eq!(observer().observe(&state, 0)[0].intent, TaskType::Unknown);
    }
}
