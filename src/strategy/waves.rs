//! Wave simulation: who arrives at a zone, when, and what that means.
//!
//! Drones are bucketed by ETA into waves. Walking the waves in arrival order
//! while keeping running totals tells when an attack first gains the upper
//! hand, or when a defense is first overrun.

#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use std::collections::BTreeMap;

use tracing::trace;

use crate::game::{Point, MAX_MOVE_DISTANCE, ZONE_RADIUS};

/// Turns a drone at `from` needs to get inside a zone centered at `center`.
#[must_use]
pub fn eta(from: Point, center: Point) -> u32 {
    let outside = (from.distance_to(center) - f64::from(ZONE_RADIUS)).max(0.0);
    (outside / f64::from(MAX_MOVE_DISTANCE)).ceil() as u32
}

/// Result of a wave simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    /// Drones needed: to win for an attack, on hand for a defense.
    pub required: usize,
    /// Turn the outcome is decided, or the horizon if never.
    pub turn: u32,
}

impl Outcome {
    /// Nothing happens within the horizon.
    #[must_use]
    pub const fn undecided(horizon: u32) -> Self {
        Self {
            required: 0,
            turn: horizon,
        }
    }
}

/// Waves within `horizon`, as `(eta, allies, enemies)` in arrival order.
fn waves(allies: &[u32], enemies: &[u32], horizon: u32) -> Vec<(u32, usize, usize)> {
    let mut buckets: BTreeMap<u32, (usize, usize)> = BTreeMap::new();
    for &t in allies {
        buckets.entry(t).or_default().0 += 1;
    }
    for &t in enemies {
        buckets.entry(t).or_default().1 += 1;
    }
    buckets
        .range(..=horizon)
        .map(|(&t, &(a, e))| (t, a, e))
        .collect()
}

/// First wave at which our accumulated drones outnumber theirs.
///
/// `required` is the enemy count at that point plus one.
#[must_use]
pub fn attack_outcome(allies: &[u32], enemies: &[u32], horizon: u32) -> Outcome {
    let (mut ours, mut theirs) = (0, 0);
    for (t, a, e) in waves(allies, enemies, horizon) {
        trace!(eta = t, allies = a, enemies = e, ours, theirs, "attack wave");
        if ours + a > theirs + e {
            return Outcome {
                required: theirs + e + 1,
                turn: t,
            };
        }
        ours += a;
        theirs += e;
    }
    Outcome::undecided(horizon)
}

/// First wave at which their accumulated drones outnumber ours.
///
/// `required` is the number of our drones already there before that wave.
#[must_use]
pub fn defend_outcome(allies: &[u32], enemies: &[u32], horizon: u32) -> Outcome {
    let (mut ours, mut theirs) = (0, 0);
    for (t, a, e) in waves(allies, enemies, horizon) {
        trace!(eta = t, allies = a, enemies = e, ours, theirs, "defense wave");
        if ours + a < theirs + e {
            return Outcome {
                required: ours,
                turn: t,
            };
        }
        ours += a;
        theirs += e;
    }
    Outcome::undecided(horizon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eta() {
        let c = Point::new(1000, 1000);
        assert_eq!(eta(Point::new(1050, 1000), c), 0);
        assert_eq!(eta(Point::new(1100, 1000), c), 0);
        assert_eq!(eta(Point::new(1101, 1000), c), 1);
        assert_eq!(eta(Point::new(1300, 1000), c), 2);
        assert_eq!(eta(Point::new(1301, 1000), c), 3);
    }

    #[test]
    fn test_attack_unopposed() {
        assert_eq!(
            attack_outcome(&[4, 2], &[], 15),
            Outcome { required: 1, turn: 2 }
        );
    }

    #[test]
    fn test_attack_needs_to_outnumber() {
        // t=1: 1 vs 1, t=3: 3 vs 1
        let outcome = attack_outcome(&[1, 3, 3], &[1], 15);
        assert_eq!(outcome, Outcome { required: 2, turn: 3 });
    }

    #[test]
    fn test_attack_beyond_horizon() {
        assert_eq!(attack_outcome(&[16], &[], 15), Outcome::undecided(15));
        assert_eq!(attack_outcome(&[15], &[], 15), Outcome { required: 1, turn: 15 });
        assert_eq!(attack_outcome(&[], &[2], 15), Outcome::undecided(15));
    }

    #[test]
    fn test_defense_overrun() {
        // t=0: one defender, t=2: two attackers arrive together
        let outcome = defend_outcome(&[0], &[2, 2], 15);
        assert_eq!(outcome, Outcome { required: 1, turn: 2 });
    }

    #[test]
    fn test_defense_holds() {
        assert_eq!(defend_outcome(&[0, 1], &[1, 5], 15), Outcome::undecided(15));
        assert_eq!(defend_outcome(&[0], &[], 15), Outcome::undecided(15));
    }

    #[test]
    fn test_defense_empty_zone_falls_immediately() {
        assert_eq!(
            defend_outcome(&[6], &[0], 15),
            Outcome { required: 0, turn: 0 }
        );
    }
}
