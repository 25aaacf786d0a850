//! Integer points and the handful of planar helpers the rules and the
//! strategy need.
//!
//! Positions are integers on the field. Intermediate math runs in `f64`
//! (or `i64` where exact), and every conversion back to integers truncates
//! toward zero. Reference traces depend on that truncation, so helpers here
//! must not round.

#![allow(clippy::cast_possible_truncation)]

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::{FIELD_HEIGHT, FIELD_WIDTH, ZONE_BORDER_MARGIN, ZONE_RADIUS};

/// A position on the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate, growing to the right.
    pub x: i32,
    /// Vertical coordinate, growing downwards.
    pub y: i32,
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance_to(self, other: Point) -> f64 {
        let dx = f64::from(self.x) - f64::from(other.x);
        let dy = f64::from(self.y) - f64::from(other.y);
        (dx * dx + dy * dy).sqrt()
    }

    /// Perpendicular distance from this point to the infinite line through `a` and `b`.
    ///
    /// Vertical and horizontal lines are measured directly so no slope is ever
    /// divided by zero. If `a == b` the line degenerates to a vertical one.
    #[must_use]
    pub fn distance_to_line(self, a: Point, b: Point) -> f64 {
        if a.x == b.x {
            return (f64::from(a.x) - f64::from(self.x)).abs();
        }
        if a.y == b.y {
            return (f64::from(a.y) - f64::from(self.y)).abs();
        }

        let slope = (f64::from(b.y) - f64::from(a.y)) / (f64::from(b.x) - f64::from(a.x));
        let offset = slope * f64::from(a.x) - f64::from(a.y);
        ((slope * f64::from(self.x) - f64::from(self.y)) - offset).abs()
            / (1.0 + slope * slope).sqrt()
    }

    /// Point on the line from `self` towards `destination` that lies
    /// `distance_from_destination` away from `destination`, on `self`'s side.
    ///
    /// When `self` is already closer than that, the result sits behind `self`.
    #[must_use]
    pub fn intermediate_point(self, destination: Point, distance_from_destination: i32) -> Point {
        if self.x == destination.x {
            let y = if self.y < destination.y {
                destination.y - distance_from_destination
            } else {
                destination.y + distance_from_destination
            };
            return Point::new(destination.x, y);
        }

        if self.y == destination.y {
            let x = if self.x < destination.x {
                destination.x - distance_from_destination
            } else {
                destination.x + distance_from_destination
            };
            return Point::new(x, destination.y);
        }

        let dx = f64::from(destination.x) - f64::from(self.x);
        let dy = f64::from(destination.y) - f64::from(self.y);
        let slope = dy / dx;
        let dist = (dx * dx + dy * dy).sqrt();

        let step_x = (dist - f64::from(distance_from_destination)) / (1.0 + slope * slope).sqrt()
            * dx.signum();
        let step_y = slope * step_x;

        Point::new(self.x + step_x as i32, self.y + step_y as i32)
    }

    /// Where a drone at `self` should aim to end up just inside a zone centered at `center`.
    #[must_use]
    pub fn zone_border_point(self, center: Point) -> Point {
        self.intermediate_point(center, ZONE_RADIUS - ZONE_BORDER_MARGIN)
    }

    /// Whether the point is on the field.
    #[must_use]
    pub const fn is_in_field(self) -> bool {
        0 <= self.x && self.x < FIELD_WIDTH && 0 <= self.y && self.y < FIELD_HEIGHT
    }
}

/// Dot product of the vectors `v1a -> v1b` and `v2a -> v2b`.
#[must_use]
pub fn dot(v1a: Point, v1b: Point, v2a: Point, v2b: Point) -> i64 {
    let x1 = i64::from(v1b.x) - i64::from(v1a.x);
    let y1 = i64::from(v1b.y) - i64::from(v1a.y);
    let x2 = i64::from(v2b.x) - i64::from(v2a.x);
    let y2 = i64::from(v2b.y) - i64::from(v2a.y);
    x1 * x2 + y1 * y2
}

/// Mean of the given points, truncated toward zero. `None` for an empty slice.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn median_point(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let sum_x: i64 = points.iter().map(|p| i64::from(p.x)).sum();
    let sum_y: i64 = points.iter().map(|p| i64::from(p.y)).sum();
    Some(Point::new(
        (sum_x as f64 / n) as i32,
        (sum_y as f64 / n) as i32,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        assert!((Point::new(0, 0).distance_to(Point::new(3, 4)) - 5.0).abs() < 1e-9);
        assert!(Point::new(7, 7).distance_to(Point::new(7, 7)).abs() < 1e-9);
    }

    #[test]
    fn test_distance_to_axis_lines() {
        let p = Point::new(10, 20);
        // Vertical line x = 4
        assert!((p.distance_to_line(Point::new(4, 0), Point::new(4, 100)) - 6.0).abs() < 1e-9);
        // Horizontal line y = 50
        assert!((p.distance_to_line(Point::new(0, 50), Point::new(9, 50)) - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_distance_to_diagonal_line() {
        // Line y = x, point (0, 10): distance 10 / sqrt(2)
        let d = Point::new(0, 10).distance_to_line(Point::new(0, 0), Point::new(5, 5));
        assert!((d - 10.0 / 2f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_dot_sign() {
        let a = Point::new(0, 0);
        let b = Point::new(10, 0);
        assert!(dot(a, b, a, Point::new(50, 30)) > 0);
        assert!(dot(a, b, a, Point::new(-50, 30)) < 0);
        assert_eq!(dot(a, b, a, Point::new(0, 30)), 0);
    }

    #[test]
    fn test_median_point_truncates() {
        let m = median_point(&[Point::new(0, 0), Point::new(3, 1)]).unwrap();
        assert_eq!(m, Point::new(1, 0));
        assert_eq!(median_point(&[]), None);
    }

    #[test]
    fn test_intermediate_point_axis() {
        let center = Point::new(1000, 500);
        assert_eq!(
            Point::new(1000, 100).intermediate_point(center, 95),
            Point::new(1000, 405)
        );
        assert_eq!(
            Point::new(1500, 500).intermediate_point(center, 95),
            Point::new(1095, 500)
        );
    }

    #[test]
    fn test_zone_border_point_diagonal() {
        // 3-4-5 triangle scaled: distance 500, stop 95 short => travel 405
        let from = Point::new(0, 0);
        let center = Point::new(300, 400);
        let p = from.zone_border_point(center);
        assert_eq!(p, Point::new(243, 324));
        assert!(p.distance_to(center) <= f64::from(ZONE_RADIUS));
    }

    #[test]
    fn test_zone_border_point_from_inside_stays_inside() {
        let center = Point::new(1000, 1000);
        let p = Point::new(1030, 1040).zone_border_point(center);
        assert!(p.distance_to(center) <= f64::from(ZONE_RADIUS));
    }

    #[test]
    fn test_in_field() {
        assert!(Point::new(0, 0).is_in_field());
        assert!(Point::new(FIELD_WIDTH - 1, FIELD_HEIGHT - 1).is_in_field());
        assert!(!Point::new(FIELD_WIDTH, 0).is_in_field());
        assert!(!Point::new(0, -1).is_in_field());
    }
}
