//! Tasks and the small vocabulary the pipeline stages share.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::{DroneId, TeamId, ZoneId};

/// What a drone (ours or theirs) is trying to do with a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskType {
    /// Take a zone owned by someone else (or nobody).
    Attack,
    /// Keep a zone the team already owns.
    Defend,
    /// No idea.
    Unknown,
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attack => write!(f, "attack"),
            Self::Defend => write!(f, "defend"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Three-step scale used for zone strategic value and task importance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Level {
    /// Lowest tier.
    Low = 0,
    /// Middle tier.
    Medium = 1,
    /// Highest tier.
    High = 2,
}

impl Level {
    /// Numeric weight of the tier in priority formulas.
    #[must_use]
    pub const fn weight(self) -> f64 {
        match self {
            Self::Low => 0.0,
            Self::Medium => 1.0,
            Self::High => 2.0,
        }
    }
}

/// A per-zone, per-turn unit of intent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Task {
    /// Zone the task is about.
    pub zone: ZoneId,
    /// Attack or Defend.
    pub kind: TaskType,
    /// Drones needed to carry it out.
    pub required: usize,
    /// Turn at which the outcome is decided (success for attacks, failure for defenses).
    pub turn: u32,
    /// Expected fraction of the horizon the zone is held favorably, in `[0, 1]`.
    pub payoff: f64,
    /// How much the team currently cares about this kind of task.
    pub importance: Level,
    /// Static value of the zone.
    pub strategic: Level,
    /// Ranking used by the allocator, higher first.
    pub priority: f64,
}

/// What the observer believes an opposing drone is up to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EnemyIntel {
    /// Owning team.
    pub team: TeamId,
    /// Drone id within that team.
    pub drone: DroneId,
    /// Zone the drone seems to be heading for or sitting in.
    pub target: Option<ZoneId>,
    /// Defend if the target is the drone's own zone, Attack otherwise.
    pub intent: TaskType,
}

impl EnemyIntel {
    /// Whether this drone is believed to be doing `intent` on `zone`.
    #[must_use]
    pub fn is_committed_to(&self, zone: ZoneId, intent: TaskType) -> bool {
        self.target == Some(zone) && self.intent == intent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering_and_weight() {
        assert!(Level::Low < Level::Medium && Level::Medium < Level::High);
        assert!((Level::High.weight() - 2.0).abs() < f64::EPSILON);
        assert!(Level::Low.weight().abs() < f64::EPSILON);
    }

    #[test]
    fn test_intel_commitment() {
        let intel = EnemyIntel {
            team: 1,
            drone: 0,
            target: Some(2),
            intent: TaskType::Attack,
        };
        assert!(intel.is_committed_to(2, TaskType::Attack));
        assert!(!intel.is_committed_to(2, TaskType::Defend));
        assert!(!intel.is_committed_to(1, TaskType::Attack));
    }
}
