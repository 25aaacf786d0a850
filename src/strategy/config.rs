//! Strategy configuration.
//!
//! Every tunable of the pipeline lives here so that weights and thresholds
//! can be changed from a JSON file without touching the algorithms.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::strategy::Level;

/// Which zone evaluator to run once at match start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluatorKind {
    /// Edge proximity plus clustering.
    #[default]
    Positional,
    /// Every zone is worth the same.
    Flat,
}

/// Which task organizer to run every turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrganizerKind {
    /// One task per zone from a wave simulation.
    #[default]
    Wave,
    /// Several tasks per zone, one per useful drone count.
    Marginal,
}

/// Which allocator hands tasks to drones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocatorKind {
    /// Greedy by priority, then spread leftovers.
    Priority,
    /// Concentrate on a handful of zones.
    Focused,
    /// Focused with more than two teams, Priority otherwise.
    #[default]
    Auto,
}

impl AllocatorKind {
    /// Pick a concrete allocator for a match with `teams` teams.
    #[must_use]
    pub const fn resolve(self, teams: usize) -> Self {
        match self {
            Self::Auto if teams > 2 => Self::Focused,
            Self::Auto => Self::Priority,
            other => other,
        }
    }
}

/// Weights of the task priority formula.
///
/// `priority = payoff·p + importance·i + strategic·s - penalty(required)·r`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriorityWeights {
    /// Weight of the normalized payoff.
    pub payoff: f64,
    /// Weight of the importance tier.
    pub importance: f64,
    /// Weight of the zone's strategic tier.
    pub strategic: f64,
    /// Weight of the required-drone penalty.
    pub required: f64,
}

impl PriorityWeights {
    /// Weights used by the wave and marginal organizers.
    pub const ORGANIZER: Self = Self {
        payoff: 4.0,
        importance: 2.0,
        strategic: 0.5,
        required: 1.0,
    };

    /// Weights used by the focused allocator when it re-scores tasks.
    pub const FOCUS: Self = Self {
        payoff: 2.0,
        importance: 4.0,
        strategic: 0.5,
        required: 50.0,
    };

    /// Combine the terms of a task into a priority.
    ///
    /// `penalty` is the already-shaped required-drone term.
    #[must_use]
    pub fn score(&self, payoff: f64, importance: Level, strategic: Level, penalty: f64) -> f64 {
        self.payoff * payoff + self.importance * importance.weight()
            + self.strategic * strategic.weight()
            - self.required * penalty
    }

    fn is_finite(&self) -> bool {
        [self.payoff, self.importance, self.strategic, self.required]
            .iter()
            .all(|w| w.is_finite())
    }
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self::ORGANIZER
    }
}

/// Look-ahead windows of the marginal organizer, in turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarginalWindow {
    /// Enemy drones this close always count.
    pub near: u32,
    /// Enemy drones this close count when heading for the zone or unreadable.
    pub moderate: u32,
    /// Length of the simulated window, and the reach of our own drones.
    pub far: u32,
}

impl Default for MarginalWindow {
    fn default() -> Self {
        Self {
            near: 3,
            moderate: 12,
            far: 25,
        }
    }
}

/// Full configuration of the strategic pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// Zone evaluator.
    pub evaluator: EvaluatorKind,
    /// Task organizer.
    pub organizer: OrganizerKind,
    /// Drone allocator.
    pub allocator: AllocatorKind,
    /// Turns the wave simulation looks ahead.
    pub horizon: u32,
    /// Enemy drones within this ETA are always relevant to a zone.
    pub surrounding_eta: u32,
    /// Displacements below this count as standing still.
    pub motion_threshold: f64,
    /// Corridor half-width around a drone's heading, in zone radii.
    pub corridor_factor: f64,
    /// Marginal organizer windows.
    pub marginal: MarginalWindow,
    /// Organizer priority weights.
    pub priority: PriorityWeights,
    /// Focused allocator weights.
    pub focus: PriorityWeights,
    /// Fan per-zone and per-drone work out on the rayon pool.
    pub parallel: bool,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            evaluator: EvaluatorKind::default(),
            organizer: OrganizerKind::default(),
            allocator: AllocatorKind::default(),
            horizon: 15,
            surrounding_eta: 3,
            motion_threshold: 2.0,
            corridor_factor: 1.5,
            marginal: MarginalWindow::default(),
            priority: PriorityWeights::ORGANIZER,
            focus: PriorityWeights::FOCUS,
            parallel: true,
        }
    }
}

impl StrategyConfig {
    /// Parse and validate a JSON configuration. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed JSON and
    /// [`ConfigError::Invalid`] when a value is out of range.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise the
    /// same errors as [`StrategyConfig::from_json_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Check that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.horizon == 0 {
            return Err(ConfigError::Invalid("horizon must be at least one turn".into()));
        }
        if !self.priority.is_finite() || !self.focus.is_finite() {
            return Err(ConfigError::Invalid("priority weights must be finite".into()));
        }
        if !self.motion_threshold.is_finite() || self.motion_threshold < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "motion threshold {} must be a non-negative number",
                self.motion_threshold
            )));
        }
        if !self.corridor_factor.is_finite() || self.corridor_factor <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "corridor factor {} must be positive",
                self.corridor_factor
            )));
        }
        let MarginalWindow { near, moderate, far } = self.marginal;
        if far == 0 || near > moderate || moderate > far {
            return Err(ConfigError::Invalid(format!(
                "marginal windows must satisfy near <= moderate <= far, far > 0 (got {near}, {moderate}, {far})"
            )));
        }
        Ok(())
    }
}

/// Error loading a [`StrategyConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read.
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// The JSON was malformed or had the wrong shape.
    Parse(serde_json::Error),
    /// A value was out of range.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read config {}: {source}", path.display())
            }
            Self::Parse(e) => write!(f, "malformed config: {e}"),
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(e) => Some(e),
            Self::Invalid(_) => None,
        }
    }
}
