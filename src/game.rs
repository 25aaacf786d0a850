//! Game layer for dronefield.
//!
//! Implements the contest rules:
//! - Field, zones, teams and drones
//! - Movement constraints (travel budget and field edges)
//! - Zone ownership resolution
//! - Turn simulation and scoring

mod drone;
mod engine;
mod geometry;
mod invariants;
mod movement;
mod ownership;
mod state;
mod zone;

pub use drone::{Drone, DroneId, Team, TeamId};
pub use engine::{validate_orders, Simulation, TeamOrders, TurnReport, MAX_ORDER_COORDINATE};
pub use geometry::{dot, median_point, Point};
pub use invariants::{assert_invariants, check_invariants, check_scores, InvariantViolation};
pub use movement::reachable_point;
pub use ownership::{resolve_owner, resolve_zone_ownership, zone_occupants, OwnershipChange};
pub use state::{
    GameState, FIELD_HEIGHT, FIELD_WIDTH, MAX_MOVE_DISTANCE, MAX_TEAMS, MAX_TURNS,
    ZONE_BORDER_MARGIN, ZONE_RADIUS,
};
pub use zone::{Zone, ZoneId};
