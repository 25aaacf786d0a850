//! Zone ownership resolution.
//!
//! An unowned zone goes to whichever team has the most drones inside it,
//! lowest team id first on ties. An owned zone only changes hands when some
//! team has strictly more drones inside than the current owner has this
//! same turn. Empty zones keep their owner.

use crate::game::{GameState, TeamId, ZoneId};

/// A zone that changed owner during resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnershipChange {
    /// The zone.
    pub zone: ZoneId,
    /// Owner before resolution.
    pub from: Option<TeamId>,
    /// Owner after resolution.
    pub to: TeamId,
}

/// Decide the owner of a single zone from per-team occupant counts.
///
/// `occupants[t]` is the number of team `t` drones inside the zone.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn resolve_owner(current: Option<TeamId>, occupants: &[u32]) -> Option<TeamId> {
    let Some(&max) = occupants.iter().max() else {
        return current;
    };
    if max == 0 {
        return current;
    }

    // First index wins ties, i.e. the lowest team id
    let leader = occupants.iter().position(|&n| n == max).map(|i| i as TeamId);

    match current {
        None => leader,
        Some(owner) => {
            let owner_count = occupants.get(usize::from(owner)).copied().unwrap_or(0);
            if owner_count < max { leader } else { current }
        }
    }
}

/// Count, for one zone, the drones of each team inside it.
#[must_use]
pub fn zone_occupants(state: &GameState, zone: ZoneId) -> Vec<u32> {
    let mut counts = vec![0u32; state.teams.len()];
    if let Some(zone) = state.zone(zone) {
        for drone in state.drones_in_zone(zone) {
            if let Some(slot) = counts.get_mut(usize::from(drone.team)) {
                *slot += 1;
            }
        }
    }
    counts
}

/// Resolve ownership of every zone in place.
///
/// Returns the zones that changed owner, in zone order.
pub fn resolve_zone_ownership(state: &mut GameState) -> Vec<OwnershipChange> {
    let occupants: Vec<Vec<u32>> = state
        .zones
        .iter()
        .map(|z| zone_occupants(state, z.id))
        .collect();

    let mut changes = Vec::new();
    for (zone, counts) in state.zones.iter_mut().zip(&occupants) {
        let owner = resolve_owner(zone.owner, counts);
        if owner == zone.owner {
            continue;
        }
        if let Some(to) = owner {
            changes.push(OwnershipChange {
                zone: zone.id,
                from: zone.owner,
                to,
            });
            zone.owner = owner;
        }
    }
    changes
}
