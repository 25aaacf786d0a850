//! Strategic pipeline.
//!
//! Every turn an agent runs the same fixed sequence of phases over a frozen
//! snapshot of the game:
//! - Evaluate zones (once, at match start)
//! - Observe opposing drones and guess what they are after
//! - Organize prioritized tasks, per zone
//! - Allocate our drones to tasks
//! - Command each drone to a destination
//!
//! Each phase is a trait so variants can be swapped from [`StrategyConfig`].
//! Per-zone and per-drone work inside a phase may fan out on rayon, but a
//! phase only starts once the previous one has finished. Allocation is
//! always sequential.

mod allocator;
mod commander;
pub mod config;
mod evaluator;
mod observer;
mod organizer;
mod task;
mod waves;

use rayon::prelude::*;
use tracing::debug;

use crate::game::{Drone, DroneId, GameState, Point, TeamId, Zone, ZoneId};

pub use allocator::{FocusedAllocator, PriorityAllocator};
pub use commander::HoldingCommander;
pub use config::{
    AllocatorKind, ConfigError, EvaluatorKind, MarginalWindow, OrganizerKind, PriorityWeights,
    StrategyConfig,
};
pub use evaluator::{FlatEvaluator, PositionalEvaluator};
pub use observer::MotionObserver;
pub use organizer::{importance, MarginalOrganizer, WaveOrganizer};
pub use task::{EnemyIntel, Level, Task, TaskType};
pub use waves::{attack_outcome, defend_outcome, eta, Outcome};

/// Assigns every zone a strategic value. Runs once per match.
pub trait ZoneEvaluator {
    /// One level per zone, in zone order.
    fn evaluate(&self, zones: &[Zone]) -> Vec<Level>;
}

/// Infers what opposing drones are doing.
pub trait ActivityObserver {
    /// One entry per drone not on `team`, ordered by team then drone id.
    fn observe(&self, state: &GameState, team: TeamId) -> Vec<EnemyIntel>;
}

/// Builds the turn's tasks.
pub trait TaskOrganizer {
    /// Tasks in zone order.
    fn organize(&self, input: &PipelineInput<'_>) -> Vec<Task>;
}

/// Hands tasks to drones.
pub trait DroneAllocator {
    /// For each of our drones, in id order, the index of its task in `tasks`.
    fn allocate(&self, input: &PipelineInput<'_>, tasks: &[Task]) -> Vec<Option<usize>>;
}

/// Turns assignments into destinations.
pub trait DroneCommander {
    /// One destination per own drone, in id order.
    fn command(
        &self,
        input: &PipelineInput<'_>,
        tasks: &[Task],
        assignments: &[Option<usize>],
    ) -> Vec<Point>;
}

/// Everything a phase may read: the frozen snapshot plus the results of
/// earlier phases.
#[derive(Debug, Clone, Copy)]
pub struct PipelineInput<'a> {
    /// Pre-turn snapshot.
    pub state: &'a GameState,
    /// Team being played.
    pub team: TeamId,
    /// Strategic value per zone.
    pub strategic: &'a [Level],
    /// Intel on every opposing drone.
    pub intel: &'a [EnemyIntel],
}

impl PipelineInput<'_> {
    /// Our drones, in id order.
    #[must_use]
    pub fn own_drones(&self) -> &[Drone] {
        self.state.drones_of(self.team)
    }

    /// Strategic value of `zone`, `Low` if unknown.
    #[must_use]
    pub fn strategic_of(&self, zone: &Zone) -> Level {
        self.strategic
            .get(usize::from(zone.id))
            .copied()
            .unwrap_or(Level::Low)
    }

    /// Intel gathered on one opposing drone.
    #[must_use]
    pub fn intel_for(&self, team: TeamId, drone: DroneId) -> Option<EnemyIntel> {
        self.intel
            .iter()
            .find(|i| i.team == team && i.drone == drone)
            .copied()
    }
}

/// Map `f` over `items`, on the rayon pool when `parallel` is set.
///
/// Output order always matches input order.
pub(crate) fn fan_out<T, R, F>(items: &[T], parallel: bool, f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync + Send,
{
    if parallel {
        items.par_iter().map(f).collect()
    } else {
        items.iter().map(f).collect()
    }
}

/// Zone evaluator chosen by configuration.
#[derive(Debug, Clone, Copy)]
pub enum Evaluator {
    /// See [`PositionalEvaluator`].
    Positional(PositionalEvaluator),
    /// See [`FlatEvaluator`].
    Flat(FlatEvaluator),
}

impl ZoneEvaluator for Evaluator {
    fn evaluate(&self, zones: &[Zone]) -> Vec<Level> {
        match self {
            Self::Positional(e) => e.evaluate(zones),
            Self::Flat(e) => e.evaluate(zones),
        }
    }
}

/// Task organizer chosen by configuration.
#[derive(Debug, Clone, Copy)]
pub enum Organizer {
    /// See [`WaveOrganizer`].
    Wave(WaveOrganizer),
    /// See [`MarginalOrganizer`].
    Marginal(MarginalOrganizer),
}

impl TaskOrganizer for Organizer {
    fn organize(&self, input: &PipelineInput<'_>) -> Vec<Task> {
        match self {
            Self::Wave(o) => o.organize(input),
            Self::Marginal(o) => o.organize(input),
        }
    }
}

/// Drone allocator chosen by configuration.
#[derive(Debug, Clone, Copy)]
pub enum Allocator {
    /// See [`PriorityAllocator`].
    Priority(PriorityAllocator),
    /// See [`FocusedAllocator`].
    Focused(FocusedAllocator),
}

impl DroneAllocator for Allocator {
    fn allocate(&self, input: &PipelineInput<'_>, tasks: &[Task]) -> Vec<Option<usize>> {
        match self {
            Self::Priority(a) => a.allocate(input, tasks),
            Self::Focused(a) => a.allocate(input, tasks),
        }
    }
}

/// Per-match memory of one agent, threaded through every phase.
///
/// Holds the strategic values computed at match start and what the last
/// turn produced, so it can be inspected between turns.
#[derive(Debug, Clone, Default)]
pub struct AgentState {
    /// Team being played.
    pub team: TeamId,
    /// Strategic value per zone.
    pub strategic: Vec<Level>,
    /// Last turn's intel.
    pub intel: Vec<EnemyIntel>,
    /// Last turn's tasks.
    pub tasks: Vec<Task>,
    /// Last turn's assignment per own drone (index into `tasks`).
    pub assignments: Vec<Option<usize>>,
    /// Last turn's destinations.
    pub destinations: Vec<Point>,
    /// Turns planned so far.
    pub turns_planned: u32,
}

impl AgentState {
    /// Tasks targeting `zone` in the last planned turn.
    #[must_use]
    pub fn tasks_for(&self, zone: ZoneId) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.zone == zone).collect()
    }
}

/// The full pipeline, built from a [`StrategyConfig`].
#[derive(Debug, Clone, Copy)]
pub struct Pipeline {
    config: StrategyConfig,
    evaluator: Evaluator,
    observer: MotionObserver,
    organizer: Organizer,
    commander: HoldingCommander,
}

impl Pipeline {
    /// Build a pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the configuration does not validate.
    pub fn new(config: StrategyConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let evaluator = match config.evaluator {
            EvaluatorKind::Positional => {
                Evaluator::Positional(PositionalEvaluator::new(config.parallel))
            }
            EvaluatorKind::Flat => Evaluator::Flat(FlatEvaluator),
        };
        let organizer = match config.organizer {
            OrganizerKind::Wave => Organizer::Wave(WaveOrganizer::from_config(&config)),
            OrganizerKind::Marginal => Organizer::Marginal(MarginalOrganizer::from_config(&config)),
        };
        let observer = MotionObserver::new(
            config.motion_threshold,
            config.corridor_factor,
            config.parallel,
        );
        Ok(Self {
            config,
            evaluator,
            observer,
            organizer,
            commander: HoldingCommander,
        })
    }

    /// The configuration this pipeline was built from.
    #[must_use]
    pub const fn config(&self) -> &StrategyConfig {
        &self.config
    }

    /// Allocator for a match with `teams` teams.
    #[must_use]
    pub const fn allocator(&self, teams: usize) -> Allocator {
        match self.config.allocator.resolve(teams) {
            AllocatorKind::Focused => Allocator::Focused(FocusedAllocator::from_config(&self.config)),
            AllocatorKind::Priority | AllocatorKind::Auto => Allocator::Priority(PriorityAllocator),
        }
    }

    /// Start a match: evaluate the zones once.
    #[must_use]
    pub fn initialize(&self, state: &GameState, team: TeamId) -> AgentState {
        let strategic = self.evaluator.evaluate(&state.zones);
        debug!(team, ?strategic, "zones evaluated");
        AgentState {
            team,
            strategic,
            ..AgentState::default()
        }
    }

    /// Run one turn of the pipeline and return a destination per own drone.
    pub fn plan(&self, state: &GameState, memory: &mut AgentState) -> Vec<Point> {
        let team = memory.team;
        let intel = self.observer.observe(state, team);
        for i in &intel {
            debug!(team = i.team, drone = i.drone, target = ?i.target, intent = %i.intent, "intel");
        }

        let (tasks, assignments, destinations) = {
            let input = PipelineInput {
                state,
                team,
                strategic: &memory.strategic,
                intel: &intel,
            };
            let tasks = self.organizer.organize(&input);
            for t in &tasks {
                debug!(
                    zone = t.zone,
                    kind = %t.kind,
                    required = t.required,
                    turn = t.turn,
                    payoff = t.payoff,
                    priority = t.priority,
                    "task"
                );
            }
            let assignments = self.allocator(state.teams.len()).allocate(&input, &tasks);
            let destinations = self.commander.command(&input, &tasks, &assignments);
            (tasks, assignments, destinations)
        };

        memory.intel = intel;
        memory.tasks = tasks;
        memory.assignments = assignments;
        memory.destinations.clone_from(&destinations);
        memory.turns_planned += 1;
        destinations
    }
}
