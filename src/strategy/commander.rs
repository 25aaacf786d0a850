//! Turn task assignments into destinations.

use crate::game::Point;
use crate::strategy::{DroneCommander, PipelineInput, Task, TaskType};

/// Sends each drone just inside the boundary of its task's zone.
///
/// A defender already inside its zone holds, as does any drone without a task.
#[derive(Debug, Clone, Copy, Default)]
pub struct HoldingCommander;

impl DroneCommander for HoldingCommander {
    fn command(
        &self,
        input: &PipelineInput<'_>,
        tasks: &[Task],
        assignments: &[Option<usize>],
    ) -> Vec<Point> {
        input
            .own_drones()
            .iter()
            .enumerate()
            .map(|(i, drone)| {
                let task = assignments.get(i).copied().flatten().and_then(|t| tasks.get(t));
                let Some((task, zone)) = task.and_then(|t| input.state.zone(t.zone).map(|z| (t, z)))
                else {
                    return drone.position;
                };
                if task.kind == TaskType::Defend && zone.contains(drone.position) {
                    drone.position
                } else {
                    drone.position.zone_border_point(zone.center)
                }
            })
            .collect()
    }
}
