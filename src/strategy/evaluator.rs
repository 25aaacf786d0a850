//! Zone strategic value, computed once before the first turn.

#![allow(clippy::cast_precision_loss)]

use crate::game::Zone;
use crate::strategy::{fan_out, Level, ZoneEvaluator};

/// Ratio used when a normalization span is zero.
const BASELINE_RATIO: f64 = 0.5;

/// Scores zones by how close they sit to the edge the cluster leans toward,
/// plus how close they are to the other zones.
#[derive(Debug, Clone, Copy)]
pub struct PositionalEvaluator {
    parallel: bool,
}

impl PositionalEvaluator {
    /// Create an evaluator. `parallel` fans per-zone scoring out on rayon.
    #[must_use]
    pub const fn new(parallel: bool) -> Self {
        Self { parallel }
    }

    /// Raw scores before tiering, one per zone.
    #[must_use]
    pub fn scores(&self, zones: &[Zone]) -> Vec<f64> {
        let n = zones.len() as f64;
        let Some(x_min) = zones.iter().map(|z| z.center.x).min() else {
            return Vec::new();
        };
        let x_max = zones.iter().map(|z| z.center.x).max().unwrap_or(x_min);
        let x_min = f64::from(x_min);
        let x_span = f64::from(x_max) - x_min;
        let x_avg = zones.iter().map(|z| f64::from(z.center.x)).sum::<f64>() / n;
        let prefer_left = x_avg < x_min + x_span / 2.0;

        let mut d_min = f64::INFINITY;
        let mut d_max = f64::NEG_INFINITY;
        for (i, a) in zones.iter().enumerate() {
            for b in &zones[i + 1..] {
                let d = a.center.distance_to(b.center);
                d_min = d_min.min(d);
                d_max = d_max.max(d);
            }
        }
        let d_span = d_max - d_min;

        fan_out(zones, self.parallel, |zone| {
            let x = f64::from(zone.center.x);
            let edge_ratio = if x_span > 0.0 {
                if prefer_left {
                    (x - x_min) / x_span
                } else {
                    (x_min + x_span - x) / x_span
                }
            } else {
                BASELINE_RATIO
            };
            let edge = (1.0 - edge_ratio) * 100.0 * n;

            let cluster: f64 = zones
                .iter()
                .filter(|other| other.id != zone.id)
                .map(|other| {
                    let ratio = if d_span > 0.0 {
                        (zone.center.distance_to(other.center) - d_min) / d_span
                    } else {
                        BASELINE_RATIO
                    };
                    (1.0 - ratio) * 100.0
                })
                .sum();

            edge + cluster
        })
    }
}

impl ZoneEvaluator for PositionalEvaluator {
    fn evaluate(&self, zones: &[Zone]) -> Vec<Level> {
        let n = zones.len() as f64;
        self.scores(zones)
            .into_iter()
            .map(|score| {
                if score >= 1.2 * 100.0 * n {
                    Level::High
                } else if score < 0.6 * 100.0 * n {
                    Level::Low
                } else {
                    Level::Medium
                }
            })
            .collect()
    }
}

/// Every zone is `Low`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatEvaluator;

impl ZoneEvaluator for FlatEvaluator {
    fn evaluate(&self, zones: &[Zone]) -> Vec<Level> {
        vec![Level::Low; zones.len()]
    }
}
