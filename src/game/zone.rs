//! Contested zones.

use serde::{Deserialize, Serialize};

use crate::game::{Point, TeamId, ZONE_RADIUS};

/// Identifier of a zone. Equal to its index in the match.
pub type ZoneId = u8;

/// A circular zone of fixed radius. Only its owner ever changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    /// Zone identifier.
    pub id: ZoneId,
    /// Fixed center.
    pub center: Point,
    /// Current owner (`None` until some team captures it).
    pub owner: Option<TeamId>,
}

impl Zone {
    /// Create an unowned zone.
    #[must_use]
    pub const fn new(id: ZoneId, center: Point) -> Self {
        Self {
            id,
            center,
            owner: None,
        }
    }

    /// Whether `point` is inside the zone. The boundary counts as inside.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        self.center.distance_to(point) <= f64::from(ZONE_RADIUS)
    }

    /// Whether `team` currently owns the zone.
    #[must_use]
    pub fn is_owned_by(&self, team: TeamId) -> bool {
        self.owner == Some(team)
    }
}
