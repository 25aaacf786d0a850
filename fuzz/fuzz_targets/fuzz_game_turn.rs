#![no_main]

//! Full game turn fuzzer.
//!
//! Steps a simulation with arbitrary orders from every team:
//! 1. Validate orders (wrong counts, huge coordinates)
//! 2. Resolve movement
//! 3. Resolve zone ownership and score
//!
//! Invariants must hold after every turn, whatever the orders.

use arbitrary::Arbitrary;
use dronefield::game::{check_invariants, check_scores, Point, Simulation, TeamOrders};
use dronefield::tournament::generate_field;
use dronefield::OrderRejection;
use libfuzzer_sys::fuzz_target;

/// One team's fuzzer-generated orders for a turn.
#[derive(Arbitrary, Debug, Clone)]
enum FuzzOrders {
    /// A destination list, possibly of the wrong length.
    Destinations(Vec<(i32, i32)>),
    /// The agent failed to answer.
    Failure,
}

#[derive(Arbitrary, Debug)]
struct GameTurnInput {
    seed: u64,
    teams: u8,
    drones: u8,
    zones: u8,
    turns: Vec<Vec<FuzzOrders>>,
}

fuzz_target!(|input: GameTurnInput| {
    let teams = usize::from(input.teams % 4) + 1;
    let drones = usize::from(input.drones % 11) + 1;
    let zones = usize::from(input.zones % 8) + 1;

    let Ok(state) = generate_field(input.seed, teams, drones, zones) else {
        return;
    };
    let mut sim = Simulation::new(state);

    for (turn, fuzz_orders) in input.turns.iter().take(20).enumerate() {
        let orders: Vec<TeamOrders> = fuzz_orders
            .iter()
            .take(teams)
            .map(|o| match o {
                FuzzOrders::Destinations(points) => Ok(points
                    .iter()
                    .take(16)
                    .map(|&(x, y)| Point::new(x, y))
                    .collect()),
                FuzzOrders::Failure => Err(OrderRejection::AgentFailure("fuzz".into())),
            })
            .collect();

        sim.step(orders);

        let mut violations = check_invariants(sim.state());
        violations.extend(check_scores(sim.state(), sim.scores()));
        assert!(
            violations.is_empty(),
            "Invariants violated after turn {turn}: {violations:?}"
        );
    }
});
