//! Match driver for dronefield.
//!
//! Provides a pure function interface: `(seed, agents) -> MatchResult`
//!
//! The driver handles:
//! - Deterministic field generation
//! - Agent lifecycle (initialize, play, dispose)
//! - Parallel agent evaluation with rayon against a frozen snapshot
//! - Simultaneous order application and scoring

// Team indices are bounded by MAX_TEAMS
#![allow(clippy::cast_possible_truncation)]

mod mapgen;

pub use mapgen::{generate_field, generate_spaced_field, FieldGenError, MIN_ZONE_SPACING};

use std::fmt;

use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::agent::{Agent, AgentError};
use crate::error::OrderRejection;
use crate::game::{
    assert_invariants, GameState, Simulation, TeamId, TeamOrders, MAX_TEAMS, MAX_TURNS,
};
use mapgen::Rng;

/// Configuration for generated matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchConfig {
    /// Turns to play, at most [`MAX_TURNS`].
    pub turns: u32,
    /// Fewest drones per team.
    pub min_drones: usize,
    /// Most drones per team.
    pub max_drones: usize,
    /// Fewest zones. Raised to `teams + 1` when lower.
    pub min_zones: usize,
    /// Most zones.
    pub max_zones: usize,
    /// Minimum distance between zone centers.
    pub zone_spacing: i32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            turns: MAX_TURNS,
            min_drones: 3,
            max_drones: 11,
            min_zones: 4,
            max_zones: 8,
            zone_spacing: MIN_ZONE_SPACING,
        }
    }
}

impl MatchConfig {
    /// Check the configuration for a match between `teams` teams.
    ///
    /// # Errors
    ///
    /// Returns [`TournamentError::TeamCount`] for a team count outside
    /// `1..=MAX_TEAMS` and [`TournamentError::InvalidConfig`] for a bad range.
    pub fn validate(&self, teams: usize) -> Result<(), TournamentError> {
        if teams == 0 || teams > MAX_TEAMS {
            return Err(TournamentError::TeamCount(teams));
        }
        if self.turns == 0 || self.turns > MAX_TURNS {
            return Err(TournamentError::InvalidConfig(format!(
                "turns must be in 1..={MAX_TURNS}, got {}",
                self.turns
            )));
        }
        if self.min_drones == 0 || self.min_drones > self.max_drones {
            return Err(TournamentError::InvalidConfig(format!(
                "drone range {}..={} is empty",
                self.min_drones, self.max_drones
            )));
        }
        if self.min_zones == 0 || self.min_zones > self.max_zones {
            return Err(TournamentError::InvalidConfig(format!(
                "zone range {}..={} is empty",
                self.min_zones, self.max_zones
            )));
        }
        if self.max_drones > usize::from(u8::MAX) || self.max_zones > usize::from(u8::MAX) {
            return Err(TournamentError::InvalidConfig(
                "at most 255 drones per team and 255 zones".into(),
            ));
        }
        Ok(())
    }

    /// Zone count range for `teams` teams.
    #[must_use]
    pub fn zone_range(&self, teams: usize) -> (usize, usize) {
        let lo = self.min_zones.max(teams + 1);
        (lo, self.max_zones.max(lo))
    }
}

/// Final result of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    /// The seed used for this match.
    pub seed: u64,
    /// Agent names, by team.
    pub agents: Vec<String>,
    /// Final scores, by team.
    pub scores: Vec<u32>,
    /// Highest score, lowest team id on ties.
    pub winner: Option<TeamId>,
    /// Total turns played.
    pub turns_played: u32,
    /// Turns on which each team's orders were thrown away.
    pub rejected_turns: Vec<u32>,
    /// Zones on the field.
    pub zones: usize,
    /// Drones per team.
    pub drones: usize,
}

/// Error type for match operations.
#[derive(Debug)]
pub enum TournamentError {
    /// Team count outside `1..=MAX_TEAMS`.
    TeamCount(usize),
    /// Agents do not match the teams on the field.
    AgentCount {
        /// Teams on the field.
        expected: usize,
        /// Agents supplied.
        found: usize,
    },
    /// Match configuration rejected.
    InvalidConfig(String),
    /// Field generation failed.
    Field(FieldGenError),
    /// An agent could not start.
    Agent {
        /// Team the agent was to play.
        team: TeamId,
        /// Error details.
        error: AgentError,
    },
}

impl fmt::Display for TournamentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TeamCount(n) => write!(f, "Unsupported team count: {n} (1 to {MAX_TEAMS})"),
            Self::AgentCount { expected, found } => {
                write!(f, "Field has {expected} teams but {found} agents were given")
            }
            Self::InvalidConfig(msg) => write!(f, "Invalid match config: {msg}"),
            Self::Field(e) => write!(f, "{e}"),
            Self::Agent { team, error } => write!(f, "Agent for team {team} failed: {error}"),
        }
    }
}

impl std::error::Error for TournamentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Field(e) => Some(e),
            Self::Agent { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<FieldGenError> for TournamentError {
    fn from(e: FieldGenError) -> Self {
        Self::Field(e)
    }
}

/// Run a complete match with the given seed and agents.
///
/// Zone and drone counts are drawn from the seed within the ranges of
/// `config`, then the field is generated from the same seed stream.
///
/// # Determinism
///
/// Given the same seed, agents and config, this function always produces
/// the same `MatchResult`, whatever the rayon pool size.
///
/// # Errors
///
/// Returns an error if the config is invalid, the field cannot be generated
/// or an agent fails to initialize.
pub fn run_match(
    seed: u64,
    agents: &mut [Box<dyn Agent>],
    config: &MatchConfig,
) -> Result<MatchResult, TournamentError> {
    let teams = agents.len();
    config.validate(teams)?;

    let mut rng = Rng::new(seed);
    let (lo, hi) = config.zone_range(teams);
    let zones = rng.next_inclusive(lo, hi);
    let drones = rng.next_inclusive(config.min_drones, config.max_drones);
    let mut state =
        generate_spaced_field(rng.next_u64(), teams, drones, zones, config.zone_spacing)?;
    state.remaining_turns = config.turns;

    let mut result = run_match_on(state, agents)?;
    result.seed = seed;
    Ok(result)
}

/// Play a prepared state to the end.
///
/// `agents[t]` plays team `t`. The returned seed is zero.
///
/// # Errors
///
/// Returns an error if the agent count does not match the teams, or an
/// agent fails to initialize.
pub fn run_match_on(
    state: GameState,
    agents: &mut [Box<dyn Agent>],
) -> Result<MatchResult, TournamentError> {
    let teams = state.teams.len();
    if agents.len() != teams {
        return Err(TournamentError::AgentCount {
            expected: teams,
            found: agents.len(),
        });
    }

    let zones = state.zones.len();
    let drones = state.drones_of(0).len();
    let names: Vec<String> = agents.iter().map(|a| a.name().to_string()).collect();
    info!(teams, zones, drones, turns = state.remaining_turns, agents = ?names, "match started");

    for (team, agent) in agents.iter_mut().enumerate() {
        agent
            .initialize(team as TeamId, &state)
            .map_err(|error| TournamentError::Agent {
                team: team as TeamId,
                error,
            })?;
    }

    let mut sim = Simulation::new(state);
    let mut rejected_turns = vec![0u32; teams];
    let mut turns_played = 0;

    while !sim.is_over() {
        // Every agent sees the same pre-turn snapshot
        let snapshot = sim.state();
        let orders: Vec<TeamOrders> = agents
            .par_iter_mut()
            .map(|agent| {
                agent
                    .play(snapshot)
                    .map_err(|e| OrderRejection::AgentFailure(e.to_string()))
            })
            .collect();

        let report = sim.step(orders);
        for (team, _) in &report.rejected {
            if let Some(count) = rejected_turns.get_mut(usize::from(*team)) {
                *count += 1;
            }
        }
        turns_played += 1;
        assert_invariants(sim.state());
    }

    for agent in agents.iter_mut() {
        agent.dispose();
    }

    let winner = sim.winner();
    let scores = sim.scores().to_vec();
    info!(?winner, ?scores, turns_played, "match finished");

    Ok(MatchResult {
        seed: 0,
        agents: names,
        scores,
        winner,
        turns_played,
        rejected_turns,
        zones,
        drones,
    })
}
