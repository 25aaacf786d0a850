//! Movement constraint resolution.
//!
//! A drone asked to go somewhere travels at most [`MAX_MOVE_DISTANCE`] along
//! the straight line to its destination and never leaves the field. If the
//! line would cross a field edge, the drone stops on that edge, still on the
//! same line.

#![allow(clippy::cast_possible_truncation)]

use crate::game::{Point, FIELD_HEIGHT, FIELD_WIDTH, MAX_MOVE_DISTANCE};

/// Resolve where a drone at `position` actually ends up this turn when it asks
/// for `destination`.
///
/// `position` must be inside the field. The result is within
/// [`MAX_MOVE_DISTANCE`] of `position` and inside the field. A destination that
/// is already reachable and in bounds is returned unchanged.
///
/// Fractional steps are truncated toward zero, never rounded.
#[must_use]
pub fn reachable_point(position: Point, destination: Point) -> Point {
    if position.x == destination.x {
        let y = if position.y < destination.y {
            destination
                .y
                .min(position.y + MAX_MOVE_DISTANCE)
                .min(FIELD_HEIGHT - 1)
        } else {
            destination.y.max(position.y - MAX_MOVE_DISTANCE).max(0)
        };
        return Point::new(position.x, y);
    }

    if position.y == destination.y {
        let x = if position.x < destination.x {
            destination
                .x
                .min(position.x + MAX_MOVE_DISTANCE)
                .min(FIELD_WIDTH - 1)
        } else {
            destination.x.max(position.x - MAX_MOVE_DISTANCE).max(0)
        };
        return Point::new(x, position.y);
    }

    let px = f64::from(position.x);
    let py = f64::from(position.y);
    let mut dx = f64::from(destination.x) - px;
    let mut dy = f64::from(destination.y) - py;
    let slope = dy / dx;
    let max_move = f64::from(MAX_MOVE_DISTANCE);

    // Travel budget
    if position.distance_to(destination) > max_move {
        dx = max_move / (1.0 + slope * slope).sqrt() * dx.signum();
        dy = slope * dx;
    }

    // Field edges, x first then y
    let landing_x = i64::from(position.x) + dx as i64;
    if landing_x < 0 {
        dx = -px;
        dy = slope * dx;
    } else if landing_x >= i64::from(FIELD_WIDTH) {
        dx = f64::from(FIELD_WIDTH - 1) - px;
        dy = slope * dx;
    }

    let landing_y = i64::from(position.y) + dy as i64;
    if landing_y < 0 {
        dy = -py;
        dx = dy / slope;
    } else if landing_y >= i64::from(FIELD_HEIGHT) {
        dy = f64::from(FIELD_HEIGHT - 1) - py;
        dx = dy / slope;
    }

    Point::new(position.x + dx as i32, position.y + dy as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reachable_destination_unchanged() {
        let from = Point::new(1000, 1000);
        for to in [
            Point::new(1060, 1080),
            Point::new(1000, 1100),
            Point::new(900, 1000),
            Point::new(1000, 1000),
            Point::new(1001, 999),
        ] {
            assert_eq!(reachable_point(from, to), to);
        }
    }

    #[test]
    fn test_far_destination_scaled_to_budget() {
        // 3-4-5 direction: a full step is (60, 80)
        let p = reachable_point(Point::new(1000, 1000), Point::new(1300, 1400));
        assert_eq!(p, Point::new(1060, 1080));

        let p = reachable_point(Point::new(1000, 1000), Point::new(700, 600));
        assert_eq!(p, Point::new(940, 920));
    }

    #[test]
    fn test_axis_moves() {
        let from = Point::new(500, 500);
        assert_eq!(reachable_point(from, Point::new(500, 2000)), Point::new(500, 600));
        assert_eq!(reachable_point(from, Point::new(500, -400)), Point::new(500, 400));
        assert_eq!(reachable_point(from, Point::new(9000, 500)), Point::new(600, 500));
        assert_eq!(reachable_point(from, Point::new(-9000, 500)), Point::new(400, 500));
    }

    #[test]
    fn test_axis_moves_clamped_to_field() {
        let near_bottom = Point::new(500, FIELD_HEIGHT - 20);
        assert_eq!(
            reachable_point(near_bottom, Point::new(500, FIELD_HEIGHT + 500)),
            Point::new(500, FIELD_HEIGHT - 1)
        );
        let near_left = Point::new(30, 700);
        assert_eq!(reachable_point(near_left, Point::new(-500, 700)), Point::new(0, 700));
    }

    #[test]
    fn test_diagonal_clamped_to_edge() {
        // Heading up-left from (10, 500) on slope 1: x hits 0 first
        let p = reachable_point(Point::new(10, 500), Point::new(-990, -500));
        assert_eq!(p, Point::new(0, 490));

        // Heading down-right into the bottom-right corner region
        let p = reachable_point(
            Point::new(FIELD_WIDTH - 5, FIELD_HEIGHT - 50),
            Point::new(FIELD_WIDTH + 1000, FIELD_HEIGHT + 1000),
        );
        assert_eq!(p, Point::new(FIELD_WIDTH - 1, FIELD_HEIGHT - 46));
    }

    #[test]
    fn test_y_edge_recomputes_x() {
        // Slope 2 upwards from y = 20: y hits 0 after dx = 10
        let p = reachable_point(Point::new(500, 20), Point::new(400, -180));
        assert_eq!(p, Point::new(490, 0));
    }
}
