//! Drone allocators: hand prioritized tasks to our drones.
//!
//! Allocation is a single sequential pass. Each pick removes the nearest
//! drone from a shared pool, so order matters and nothing here runs in
//! parallel.

#![allow(clippy::cast_precision_loss)]

use std::cmp::Ordering;

use tracing::debug;

use crate::game::{median_point, Drone, Point, ZoneId};
use crate::strategy::config::{PriorityWeights, StrategyConfig};
use crate::strategy::{DroneAllocator, Level, PipelineInput, Task, TaskType};

/// Task indices sorted by descending priority. Equal priorities keep task order.
fn by_priority(scores: &[(usize, f64)]) -> Vec<usize> {
    let mut order = scores.to_vec();
    order.sort_by(|a, b| b.1.total_cmp(&a.1));
    order.into_iter().map(|(i, _)| i).collect()
}

/// Remove from `pool` the drone nearest to `target` and return its index.
///
/// `pool` is kept in drone id order, so the lowest id wins ties.
fn take_nearest(pool: &mut Vec<usize>, drones: &[Drone], target: Point) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (slot, &drone) in pool.iter().enumerate() {
        let d = drones[drone].position.distance_to(target);
        if best.is_none_or(|(_, closest)| d < closest) {
            best = Some((slot, d));
        }
    }
    best.map(|(slot, _)| pool.remove(slot))
}

fn zone_center(input: &PipelineInput<'_>, zone: ZoneId) -> Option<Point> {
    input.state.zone(zone).map(|z| z.center)
}

fn log_assignments(assignments: &[Option<usize>], tasks: &[Task]) {
    for (drone, task) in assignments.iter().enumerate() {
        let task = task.and_then(|i| tasks.get(i));
        debug!(
            drone,
            zone = ?task.map(|t| t.zone),
            kind = ?task.map(|t| t.kind),
            "assignment"
        );
    }
}

/// Greedy allocation by priority with a leftover spread.
///
/// Tasks are staffed best first with their nearest free drones. A task the
/// pool cannot fully staff is skipped when the next one could be. Drones
/// still free afterwards are dealt out one per task, best task first, until
/// none are left.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriorityAllocator;

impl DroneAllocator for PriorityAllocator {
    fn allocate(&self, input: &PipelineInput<'_>, tasks: &[Task]) -> Vec<Option<usize>> {
        let drones = input.own_drones();
        let mut assignments = vec![None; drones.len()];
        let mut pool: Vec<usize> = (0..drones.len()).collect();

        let scores: Vec<(usize, f64)> = tasks.iter().map(|t| t.priority).enumerate().collect();
        let order = by_priority(&scores);

        for (rank, &ti) in order.iter().enumerate() {
            if pool.is_empty() {
                break;
            }
            let task = &tasks[ti];
            if pool.len() < task.required
                && order
                    .get(rank + 1)
                    .is_some_and(|&next| tasks[next].required <= pool.len())
            {
                continue;
            }
            let Some(center) = zone_center(input, task.zone) else {
                continue;
            };
            for _ in 0..task.required {
                let Some(drone) = take_nearest(&mut pool, drones, center) else {
                    break;
                };
                assignments[drone] = Some(ti);
            }
        }

        let targets: Vec<(usize, Point)> = order
            .iter()
            .filter_map(|&ti| zone_center(input, tasks[ti].zone).map(|c| (ti, c)))
            .collect();
        if !targets.is_empty() {
            while !pool.is_empty() {
                for &(ti, center) in &targets {
                    let Some(drone) = take_nearest(&mut pool, drones, center) else {
                        break;
                    };
                    assignments[drone] = Some(ti);
                }
            }
        }

        log_assignments(&assignments, tasks);
        assignments
    }
}

/// Concentrates the team on a few zones near the ones it already holds.
///
/// Aims for `1 + ceil(zones / teams)` zones and only staffs tasks it can
/// staff completely. Drones left over stay unassigned.
#[derive(Debug, Clone, Copy)]
pub struct FocusedAllocator {
    weights: PriorityWeights,
}

impl FocusedAllocator {
    /// Build from a validated configuration.
    #[must_use]
    pub const fn from_config(config: &StrategyConfig) -> Self {
        Self {
            weights: config.focus,
        }
    }

    /// Zones worth fighting for this turn, nearest to our holdings first.
    fn focus_zones(input: &PipelineInput<'_>, target: usize) -> Vec<ZoneId> {
        let zones = &input.state.zones;
        let owned: Vec<Point> = zones
            .iter()
            .filter(|z| z.is_owned_by(input.team))
            .map(|z| z.center)
            .collect();
        let Some(median) = median_point(&owned) else {
            return zones.iter().map(|z| z.id).collect();
        };
        let mut nearest: Vec<(ZoneId, f64)> = zones
            .iter()
            .map(|z| (z.id, z.center.distance_to(median)))
            .collect();
        nearest.sort_by(|a, b| a.1.total_cmp(&b.1));
        nearest.into_iter().take(target).map(|(id, _)| id).collect()
    }
}

impl DroneAllocator for FocusedAllocator {
    fn allocate(&self, input: &PipelineInput<'_>, tasks: &[Task]) -> Vec<Option<usize>> {
        let state = input.state;
        let drones = input.own_drones();
        let mut assignments = vec![None; drones.len()];
        let mut pool: Vec<usize> = (0..drones.len()).collect();

        let target = 1 + state.zones.len().div_ceil(state.teams.len().max(1));
        let (defense, attack) = match state.owned_zone_count(input.team).cmp(&target) {
            Ordering::Greater => (Level::High, Level::Low),
            Ordering::Equal => (Level::High, Level::Medium),
            Ordering::Less => (Level::Medium, Level::High),
        };

        let focus = Self::focus_zones(input, target);
        let fleet = drones.len().max(1) as f64;
        let scores: Vec<(usize, f64)> = tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| focus.contains(&t.zone))
            .map(|(i, t)| {
                let importance = if t.kind == TaskType::Defend { defense } else { attack };
                let penalty = (t.required as f64 / fleet).sqrt();
                (i, self.weights.score(t.payoff, importance, t.strategic, penalty))
            })
            .collect();

        let mut staffed: Vec<ZoneId> = Vec::with_capacity(target);
        for ti in by_priority(&scores) {
            if staffed.len() >= target || pool.is_empty() {
                break;
            }
            let task = &tasks[ti];
            if staffed.contains(&task.zone) || pool.len() < task.required {
                continue;
            }
            let Some(center) = zone_center(input, task.zone) else {
                continue;
            };
            for _ in 0..task.required {
                let Some(drone) = take_nearest(&mut pool, drones, center) else {
                    break;
                };
                assignments[drone] = Some(ti);
            }
            staffed.push(task.zone);
        }

        debug!(target, staffed = ?staffed, idle = pool.len(), "focused allocation");
        log_assignments(&assignments, tasks);
        assignments
    }
}
