//! Task organizers: turn the current situation into prioritized tasks.

#![allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]

use std::collections::BTreeMap;

use crate::game::{resolve_owner, TeamId, Zone, MAX_TEAMS};
use crate::strategy::config::{MarginalWindow, PriorityWeights, StrategyConfig};
use crate::strategy::waves::{attack_outcome, defend_outcome, eta, Outcome};
use crate::strategy::{fan_out, EnemyIntel, Level, PipelineInput, Task, TaskOrganizer, TaskType};

/// Importance of a task of `kind` given how the team is doing overall.
///
/// A team holding well above its fair share `1 / teams` of the zones leans
/// toward defense, one well below leans toward attack.
#[must_use]
pub fn importance(kind: TaskType, owned: usize, zones: usize, teams: usize) -> Level {
    if zones == 0 || teams == 0 {
        return Level::Medium;
    }
    let ratio = owned as f64 / zones as f64;
    let fair = 1.0 / teams as f64;
    let (defense, attack) = if ratio > 0.8 * fair {
        (Level::High, Level::Low)
    } else if ratio < 0.4 * fair {
        (Level::Low, Level::High)
    } else {
        (Level::Medium, Level::Medium)
    };
    match kind {
        TaskType::Defend => defense,
        TaskType::Attack | TaskType::Unknown => attack,
    }
}

/// An opposing drone as seen from one zone.
#[derive(Debug, Clone, Copy)]
struct Contact {
    team: TeamId,
    eta: u32,
    intel: Option<EnemyIntel>,
}

impl Contact {
    fn is_committed_to(&self, zone: &Zone, intent: TaskType) -> bool {
        self.intel
            .is_some_and(|i| i.is_committed_to(zone.id, intent))
    }

    fn targets(&self, zone: &Zone) -> bool {
        self.intel.is_some_and(|i| i.target == Some(zone.id))
    }

    fn is_unreadable(&self) -> bool {
        self.intel.is_none_or(|i| i.intent == TaskType::Unknown)
    }
}

fn contacts(input: &PipelineInput<'_>, zone: &Zone) -> Vec<Contact> {
    input
        .state
        .enemy_drones(input.team)
        .map(|d| Contact {
            team: d.team,
            eta: eta(d.position, zone.center),
            intel: input.intel_for(d.team, d.id),
        })
        .collect()
}

fn own_etas(input: &PipelineInput<'_>, zone: &Zone) -> Vec<u32> {
    input
        .own_drones()
        .iter()
        .map(|d| eta(d.position, zone.center))
        .collect()
}

/// ETAs of the contacts matching `keep`, grouped by team in ascending order.
fn squads(contacts: &[Contact], keep: impl Fn(&Contact) -> bool) -> BTreeMap<TeamId, Vec<u32>> {
    let mut squads: BTreeMap<TeamId, Vec<u32>> = BTreeMap::new();
    for c in contacts.iter().filter(|c| keep(c)) {
        squads.entry(c.team).or_default().push(c.eta);
    }
    squads
}

/// One task per zone, sized by a wave simulation against the drones that
/// matter to that zone.
#[derive(Debug, Clone, Copy)]
pub struct WaveOrganizer {
    horizon: u32,
    surrounding_eta: u32,
    weights: PriorityWeights,
    parallel: bool,
}

impl WaveOrganizer {
    /// Build from a validated configuration.
    #[must_use]
    pub const fn from_config(config: &StrategyConfig) -> Self {
        Self {
            horizon: config.horizon,
            surrounding_eta: config.surrounding_eta,
            weights: config.priority,
            parallel: config.parallel,
        }
    }

    fn zone_task(&self, input: &PipelineInput<'_>, zone: &Zone) -> Task {
        let h = self.horizon;
        let kind = if zone.is_owned_by(input.team) {
            TaskType::Defend
        } else {
            TaskType::Attack
        };
        let ours = own_etas(input, zone);
        let enemies = contacts(input, zone);
        let near = |c: &Contact| c.eta <= self.surrounding_eta;

        let outcome = match kind {
            TaskType::Defend => {
                let attackers =
                    squads(&enemies, |c| near(c) || c.is_committed_to(zone, TaskType::Attack));
                let mut worst: Option<Outcome> = None;
                for squad in attackers.values() {
                    let threat = defend_outcome(&ours, squad, h);
                    if worst.is_none_or(|w| {
                        threat.turn < w.turn
                            || (threat.turn == w.turn && threat.required > w.required)
                    }) {
                        worst = Some(threat);
                    }
                }
                worst.unwrap_or(Outcome::undecided(h))
            }
            TaskType::Attack | TaskType::Unknown => {
                let defenders: Vec<u32> = enemies
                    .iter()
                    .filter(|c| {
                        zone.owner == Some(c.team)
                            && (near(c) || c.is_committed_to(zone, TaskType::Defend))
                    })
                    .map(|c| c.eta)
                    .collect();
                let mut hardest = attack_outcome(&ours, &defenders, h);

                let rivals = squads(&enemies, |c| {
                    zone.owner != Some(c.team)
                        && (near(c) || c.is_committed_to(zone, TaskType::Attack))
                });
                for squad in rivals.values() {
                    let rival = attack_outcome(&ours, squad, h);
                    if rival.turn > hardest.turn
                        || (rival.turn == hardest.turn && rival.required > hardest.required)
                    {
                        hardest = rival;
                    }
                }
                hardest
            }
        };

        let turn = outcome.turn.min(h);
        let payoff = match kind {
            TaskType::Defend => f64::from(turn) / f64::from(h),
            TaskType::Attack | TaskType::Unknown => f64::from(h - turn) / f64::from(h),
        };
        let importance = importance(
            kind,
            input.state.owned_zone_count(input.team),
            input.state.zones.len(),
            input.state.teams.len(),
        );
        let strategic = input.strategic_of(zone);
        Task {
            zone: zone.id,
            kind,
            required: outcome.required,
            turn,
            payoff,
            importance,
            strategic,
            priority: self
                .weights
                .score(payoff, importance, strategic, outcome.required as f64),
        }
    }
}

impl TaskOrganizer for WaveOrganizer {
    fn organize(&self, input: &PipelineInput<'_>) -> Vec<Task> {
        fan_out(&input.state.zones, self.parallel, |zone| {
            self.zone_task(input, zone)
        })
    }
}

/// Several tasks per zone: simulates who holds the zone over a window for
/// each number of our drones sent, and emits a task for every count that
/// adds held turns.
#[derive(Debug, Clone, Copy)]
pub struct MarginalOrganizer {
    window: MarginalWindow,
    weights: PriorityWeights,
    parallel: bool,
}

impl MarginalOrganizer {
    /// Build from a validated configuration.
    #[must_use]
    pub const fn from_config(config: &StrategyConfig) -> Self {
        Self {
            window: config.marginal,
            weights: config.priority,
            parallel: config.parallel,
        }
    }

    /// Turns held by `team` over the window, replaying ownership on presence counts.
    fn turns_held(zone: &Zone, team: TeamId, presence: &[[u32; MAX_TEAMS]]) -> u32 {
        let mut owner = zone.owner;
        let mut held = 0;
        for row in presence {
            owner = resolve_owner(owner, row);
            if owner == Some(team) {
                held += 1;
            }
        }
        held
    }

    /// Held turns for 0, 1, 2... of our drones, nearest first.
    fn held_by_count(&self, input: &PipelineInput<'_>, zone: &Zone) -> Vec<u32> {
        let MarginalWindow { near, moderate, far } = self.window;
        let teams = input.state.teams.len().min(MAX_TEAMS);
        let mut presence = vec![[0u32; MAX_TEAMS]; far as usize];
        let arrive = |presence: &mut [[u32; MAX_TEAMS]], team: TeamId, from: u32| {
            if usize::from(team) >= teams {
                return;
            }
            for row in presence.iter_mut().skip(from as usize) {
                row[usize::from(team)] += 1;
            }
        };

        for c in contacts(input, zone) {
            let counted = c.eta <= near
                || (c.eta <= moderate && (c.targets(zone) || c.is_unreadable()));
            if counted {
                arrive(&mut presence, c.team, c.eta);
            }
        }

        let mut ours: Vec<u32> = own_etas(input, zone)
            .into_iter()
            .filter(|&t| t <= far)
            .collect();
        ours.sort_unstable();

        let mut held = Vec::with_capacity(ours.len() + 1);
        held.push(Self::turns_held(zone, input.team, &presence[..]));
        for t in ours {
            arrive(&mut presence, input.team, t);
            held.push(Self::turns_held(zone, input.team, &presence[..]));
        }
        held
    }

    fn zone_tasks(&self, input: &PipelineInput<'_>, zone: &Zone) -> Vec<Task> {
        let far = self.window.far;
        let kind = if zone.is_owned_by(input.team) {
            TaskType::Defend
        } else {
            TaskType::Attack
        };
        let importance = importance(
            kind,
            input.state.owned_zone_count(input.team),
            input.state.zones.len(),
            input.state.teams.len(),
        );
        let strategic = input.strategic_of(zone);

        let held = self.held_by_count(input, zone);
        let mut tasks = Vec::new();
        let mut previous = 0;
        for (required, &turns) in held.iter().enumerate() {
            let added = turns.saturating_sub(previous);
            previous = turns;
            if added == 0 {
                continue;
            }
            let payoff = f64::from(turns) / f64::from(far);
            tasks.push(Task {
                zone: zone.id,
                kind,
                required,
                turn: far - turns,
                payoff,
                importance,
                strategic,
                priority: self
                    .weights
                    .score(payoff, importance, strategic, required as f64),
            });
        }
        tasks
    }
}

impl TaskOrganizer for MarginalOrganizer {
    fn organize(&self, input: &PipelineInput<'_>) -> Vec<Task> {
        fan_out(&input.state.zones, self.parallel, |zone| {
            self.zone_tasks(input, zone)
        })
        .into_iter()
        .flatten()
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameState, Point, Team};

    fn input<'a>(
        state: &'a GameState,
        strategic: &'a [Level],
        intel: &'a [EnemyIntel],
    ) -> PipelineInput<'a> {
        PipelineInput {
            state,
            team: 0,
            strategic,
            intel,
        }
    }

    /// Two teams, three drones each, one zone in the middle.
    fn duel() -> GameState {
        let zones = vec![Zone::new(0, Point::new(2000, 900))];
        let teams = vec![
            Team::new(0, &[Point::new(1700, 900), Point::new(1600, 900), Point::new(200, 200)]),
            Team::new(1, &[Point::new(2250, 900), Point::new(3900, 1700), Point::new(3900, 100)]),
        ];
        GameState::new(zones, teams).unwrap()
    }

    #[test]
    fn test_importance_tiers() {
        // Fair share with 2 teams and 5 zones is 0.5
        assert_eq!(importance(TaskType::Defend, 3, 5, 2), Level::High);
        assert_eq!(importance(TaskType::Attack, 3, 5, 2), Level::Low);
        assert_eq!(importance(TaskType::Attack, 0, 5, 2), Level::High);
        assert_eq!(importance(TaskType::Defend, 0, 5, 2), Level::Low);
        assert_eq!(importance(TaskType::Attack, 1, 5, 2), Level::Medium);
        assert_eq!(importance(TaskType::Defend, 2, 5, 2), Level::Medium);
    }

    #[test]
    fn test_wave_attack_against_near_enemy() {
        let state = duel();
        let strategic = [Level::Medium];
        let organizer = WaveOrganizer::from_config(&StrategyConfig::default());
        let tasks = organizer.organize(&input(&state, &strategic, &[]));

        assert_eq!(tasks.len(), 1);
        let task = tasks[0];
        // Our ETAs 2, 3; the enemy at ETA 2 is near and unowned zones have no
        // defenders, so the rival squad {2} decides: 1 vs 1 at t=2, 2 vs 1 at t=3
        assert_eq!(task.kind, TaskType::Attack);
        assert_eq!(task.required, 2);
        assert_eq!(task.turn, 3);
        assert!((task.payoff - 12.0 / 15.0).abs() < 1e-12);
        // Nobody owns anything: ratio 0 is below 0.4 x fair share
        assert_eq!(task.importance, Level::High);
        let expected = 4.0 * 0.8 + 2.0 * 2.0 + 0.5 * 1.0 - 2.0;
        assert!((task.priority - expected).abs() < 1e-12);
    }

    #[test]
    fn test_wave_unreachable_attack() {
        let zones = vec![Zone::new(0, Point::new(3800, 1600))];
        let teams = vec![Team::new(0, &[Point::new(0, 0)]), Team::new(1, &[Point::new(10, 0)])];
        let state = GameState::new(zones, teams).unwrap();
        let organizer = WaveOrganizer::from_config(&StrategyConfig::default());
        let task = organizer.organize(&input(&state, &[Level::Low], &[]))[0];
        assert_eq!(task.required, 0);
        assert_eq!(task.turn, 15);
        assert!(task.payoff.abs() < 1e-12);
    }

    #[test]
    fn test_wave_safe_defense() {
        let mut state = duel();
        state.zones[0].owner = Some(0);
        state.teams[1].drones[0].place(Point::new(3000, 900));
        let organizer = WaveOrganizer::from_config(&StrategyConfig::default());
        let task = organizer.organize(&input(&state, &[Level::Low], &[]))[0];
        assert_eq!(task.kind, TaskType::Defend);
        assert_eq!(task.required, 0);
        assert_eq!(task.turn, 15);
        assert!((task.payoff - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_wave_threatened_defense() {
        let mut state = duel();
        state.zones[0].owner = Some(0);
        // Attackers at ETA 1 and 2 while our nearest drones arrive at 2 and 3
        state.teams[1].drones[1].place(Point::new(2200, 900));
        let organizer = WaveOrganizer::from_config(&StrategyConfig::default());
        let task = organizer.organize(&input(&state, &[Level::Low], &[]))[0];
        assert_eq!(task.kind, TaskType::Defend);
        assert_eq!(task.turn, 1);
        assert_eq!(task.required, 0);
    }

    #[test]
    fn test_far_enemy_counts_when_committed() {
        let mut state = duel();
        state.zones[0].owner = Some(0);
        for d in &mut state.teams[0].drones {
            d.place(Point::new(2000, 900));
        }
        // Far attacker heading for the zone: ETA 14
        state.teams[1].drones[0].place(Point::new(3500, 900));
        let intel = [EnemyIntel {
            team: 1,
            drone: 0,
            target: Some(0),
            intent: TaskType::Attack,
        }];
        let organizer = WaveOrganizer::from_config(&StrategyConfig::default());
        // 3 defenders against 1 attacker holds
        let task = organizer.organize(&input(&state, &[Level::Low], &intel))[0];
        assert_eq!(task.turn, 15);

        // With only that drone counted and no defenders, the zone falls at 14
        for d in &mut state.teams[0].drones {
            d.place(Point::new(100, 1700));
        }
        let task = organizer.organize(&input(&state, &[Level::Low], &intel))[0];
        assert_eq!(task.turn, 14);
    }

    /// Field corners, all 20 turns away from the middle zone.
    const PARKED: [Point; 3] = [Point::new(100, 100), Point::new(3900, 1700), Point::new(100, 1700)];

    /// Three teams of three around one zone at (2000, 900).
    fn melee(ours: [Point; 3], first: [Point; 3], second: [Point; 3]) -> GameState {
        let zones = vec![Zone::new(0, Point::new(2000, 900))];
        let teams = vec![Team::new(0, &ours), Team::new(1, &first), Team::new(2, &second)];
        GameState::new(zones, teams).unwrap()
    }

    fn organize_one(state: &GameState) -> Task {
        let organizer = WaveOrganizer::from_config(&StrategyConfig::default());
        let tasks = organizer.organize(&input(state, &[Level::Low], &[]));
        assert_eq!(tasks.len(), 1);
        tasks[0]
    }

    #[test]
    fn test_defense_against_two_squads_takes_first_to_break_through() {
        // One defender on the spot. Team 1 sends one drone at ETA 2, which
        // ties and holds. Team 2 sends two at ETA 3 and overruns us at t=3
        let mut state = melee(
            [Point::new(2000, 900), PARKED[0], PARKED[1]],
            [Point::new(2250, 900), PARKED[1], PARKED[2]],
            [Point::new(2350, 900), Point::new(1650, 900), PARKED[0]],
        );
        state.zones[0].owner = Some(0);
        let task = organize_one(&state);
        assert_eq!(task.kind, TaskType::Defend);
        assert_eq!(task.required, 1);
        assert_eq!(task.turn, 3);
        assert!((task.payoff - 3.0 / 15.0).abs() < 1e-12);

        // Swap the threats: team 2 now breaks through first, at t=2
        let mut state = melee(
            [Point::new(2000, 900), PARKED[0], PARKED[1]],
            [Point::new(2350, 900), Point::new(1650, 900), PARKED[2]],
            [Point::new(2250, 900), Point::new(1750, 900), PARKED[0]],
        );
        state.zones[0].owner = Some(0);
        let task = organize_one(&state);
        assert_eq!(task.kind, TaskType::Defend);
        assert_eq!(task.required, 1);
        assert_eq!(task.turn, 2);
    }

    #[test]
    fn test_attack_against_two_squads_takes_latest_win() {
        // Our ETAs 1, 2, 3. Team 1 (two at ETA 2) is beaten at t=1, team 2
        // (one at ETA 1) only at t=2 with two drones
        let state = melee(
            [Point::new(2150, 900), Point::new(2250, 900), Point::new(2350, 900)],
            [Point::new(1750, 900), Point::new(2000, 650), PARKED[0]],
            [Point::new(1850, 900), PARKED[1], PARKED[2]],
        );
        let task = organize_one(&state);
        assert_eq!(task.kind, TaskType::Attack);
        assert_eq!(task.required, 2);
        assert_eq!(task.turn, 2);
        assert!((task.payoff - 13.0 / 15.0).abs() < 1e-12);
    }

    #[test]
    fn test_attack_equal_turns_keep_larger_requirement() {
        // All three of ours arrive at t=2. Both squads are beaten at t=2:
        // team 1 (two at ETA 1) needs 3, team 2 (one at ETA 1) needs 2
        let state = melee(
            [Point::new(2250, 900), Point::new(1750, 900), Point::new(2000, 650)],
            [Point::new(2150, 900), Point::new(1850, 900), PARKED[0]],
            [Point::new(2000, 1050), PARKED[1], PARKED[2]],
        );
        let task = organize_one(&state);
        assert_eq!(task.kind, TaskType::Attack);
        assert_eq!(task.required, 3);
        assert_eq!(task.turn, 2);

        // Same squads with the teams swapped: the order they are met in
        // does not matter
        let state = melee(
            [Point::new(2250, 900), Point::new(1750, 900), Point::new(2000, 650)],
            [Point::new(2000, 1050), PARKED[1], PARKED[2]],
            [Point::new(2150, 900), Point::new(1850, 900), PARKED[0]],
        );
        let task = organize_one(&state);
        assert_eq!(task.required, 3);
        assert_eq!(task.turn, 2);
    }

    #[test]
    fn test_marginal_tasks() {
        let state = duel();
        let organizer = MarginalOrganizer::from_config(&StrategyConfig::default());
        let tasks = organizer.organize(&input(&state, &[Level::Low], &[]));

        // Enemy arrives at t=2. One drone ties it at t=2 and the lowest id
        // (us) takes the unowned zone: held from t=2 on
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].required, 1);
        assert_eq!(tasks[0].turn, 2);
        assert!((tasks[0].payoff - 23.0 / 25.0).abs() < 1e-12);
    }

    #[test]
    fn test_marginal_owned_zone_held_without_help() {
        let mut state = duel();
        state.zones[0].owner = Some(0);
        state.teams[1].drones[0].place(Point::new(3900, 900));
        let organizer = MarginalOrganizer::from_config(&StrategyConfig::default());
        let tasks = organizer.organize(&input(&state, &[Level::Low], &[]));

        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].required, 0);
        assert!((tasks[0].payoff - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let state = duel();
        let strategic = [Level::High];
        let mut config = StrategyConfig::default();
        let parallel = WaveOrganizer::from_config(&config).organize(&input(&state, &strategic, &[]));
        config.parallel = false;
        let sequential =
            WaveOrganizer::from_config(&config).organize(&input(&state, &strategic, &[]));
        assert_eq!(parallel, sequential);
    }
}
