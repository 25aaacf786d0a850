#![no_main]

//! Movement resolver fuzzer.
//!
//! Any in-field position and any destination must land inside the field,
//! within one move of the start.

use arbitrary::Arbitrary;
use dronefield::game::{reachable_point, Point, FIELD_HEIGHT, FIELD_WIDTH, MAX_MOVE_DISTANCE};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct MoveInput {
    from_x: u16,
    from_y: u16,
    to_x: i32,
    to_y: i32,
}

fuzz_target!(|input: MoveInput| {
    let from = Point::new(
        i32::from(input.from_x) % FIELD_WIDTH,
        i32::from(input.from_y) % FIELD_HEIGHT,
    );
    // Orders past this range are rejected before they reach the resolver
    let to = Point::new(input.to_x % 1_000_000, input.to_y % 1_000_000);

    let landed = reachable_point(from, to);
    assert!(landed.is_in_field(), "{from} -> {to} landed outside at {landed}");
    assert!(
        from.distance_to(landed) <= f64::from(MAX_MOVE_DISTANCE) + 1e-6,
        "{from} -> {to} moved too far to {landed}"
    );
    if from.distance_to(to) <= f64::from(MAX_MOVE_DISTANCE) && to.is_in_field() {
        assert_eq!(landed, to, "reachable destination {to} was altered");
    }
});
