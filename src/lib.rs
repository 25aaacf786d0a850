// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Dronefield: a deterministic zone-control contest between teams of drones.
//!
//! This crate provides:
//! - A turn simulation engine with simultaneous moves and zone ownership
//! - A strategic pipeline that plays one team from a frozen snapshot
//! - A match driver and seeded field generation for tournaments
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │     Match Driver (tournament)       │
//! ├─────────────────────────────────────┤
//! │   Agents  ->  Strategic Pipeline    │
//! ├─────────────────────────────────────┤
//! │   Game Engine (movement, ownership) │
//! └─────────────────────────────────────┘
//! ```

pub mod agent;
pub mod error;
pub mod game;
pub mod strategy;
pub mod tournament;

pub use error::{OrderRejection, SetupError};

// Re-export key types at crate root for convenience
pub use agent::{Agent, AgentError, AgentKind};
pub use game::{
    Drone, DroneId, GameState, Point, Simulation, Team, TeamId, TurnReport, Zone, ZoneId,
};
pub use strategy::{Pipeline, StrategyConfig, Task, TaskType};
pub use tournament::{run_match, MatchConfig, MatchResult, TournamentError};
