//! Game invariants - sanity checks that detect bugs.
//!
//! The movement resolver and ownership rules should make every one of these
//! impossible. If one triggers, something upstream is broken.

use crate::game::{GameState, MAX_MOVE_DISTANCE, MAX_TURNS};

/// Slack allowed on a single move, for float noise in the distance check.
const MOVE_EPSILON: f64 = 1e-6;

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all game invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(state: &GameState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    if state.remaining_turns > MAX_TURNS {
        violations.push(InvariantViolation {
            message: format!(
                "Remaining turns {} exceeds match length {MAX_TURNS}",
                state.remaining_turns
            ),
        });
    }

    for drone in state.all_drones() {
        if !drone.position.is_in_field() {
            violations.push(InvariantViolation {
                message: format!(
                    "Drone {}/{} is outside the field at {}",
                    drone.team, drone.id, drone.position
                ),
            });
        }

        let step = drone.displacement();
        if step > f64::from(MAX_MOVE_DISTANCE) + MOVE_EPSILON {
            violations.push(InvariantViolation {
                message: format!(
                    "Drone {}/{} moved {step:.2} in one turn, more than {MAX_MOVE_DISTANCE}",
                    drone.team, drone.id
                ),
            });
        }
    }

    for zone in &state.zones {
        let Some(owner) = zone.owner else { continue };
        if usize::from(owner) >= state.teams.len() {
            violations.push(InvariantViolation {
                message: format!("Zone {} is owned by unknown team {owner}", zone.id),
            });
        }
    }

    violations
}

/// Check that cumulative scores are reachable after the turns played so far.
///
/// A team earns at most one point per zone per turn.
#[must_use]
pub fn check_scores(state: &GameState, scores: &[u32]) -> Vec<InvariantViolation> {
    let ceiling = u64::from(state.turn()) * state.zones.len() as u64;
    let total: u64 = scores.iter().map(|&s| u64::from(s)).sum();

    let mut violations = Vec::new();
    if total > ceiling {
        violations.push(InvariantViolation {
            message: format!(
                "Scores add up to {total}, more than {ceiling} zone-turns played"
            ),
        });
    }
    if scores.len() != state.teams.len() {
        violations.push(InvariantViolation {
            message: format!(
                "{} scores recorded for {} teams",
                scores.len(),
                state.teams.len()
            ),
        });
    }
    violations
}

/// Assert all game invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(state: &GameState) {
    let violations = check_invariants(state);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Game invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_state: &GameState) {}
