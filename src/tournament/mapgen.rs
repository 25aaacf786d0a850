//! Deterministic field generation.

// Field generation uses intentional casts for coordinate/RNG operations
#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use std::fmt;

use crate::error::SetupError;
use crate::game::{
    GameState, Point, Team, Zone, FIELD_HEIGHT, FIELD_WIDTH, MAX_TEAMS, ZONE_RADIUS,
};

/// Default minimum distance between two zone centers.
pub const MIN_ZONE_SPACING: i32 = 300;

/// Attempts at placing a single zone before giving up.
const MAX_PLACEMENT_ATTEMPTS: u32 = 10_000;

/// Deterministic PRNG using xorshift64.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Rng {
    state: u64,
}

impl Rng {
    /// Create a new RNG with the given seed.
    pub(crate) const fn new(seed: u64) -> Self {
        // Ensure non-zero state
        let state = if seed == 0 { 0x5555_5555_5555_5555 } else { seed };
        Self { state }
    }

    /// Generate next random u64.
    pub(crate) fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Generate random i32 in `[lo, hi)`. Returns `lo` for an empty range.
    pub(crate) fn next_i32(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        let span = (i64::from(hi) - i64::from(lo)) as u64;
        lo + (self.next_u64() % span) as i32
    }

    /// Generate random usize in `[lo, hi]`.
    pub(crate) fn next_inclusive(&mut self, lo: usize, hi: usize) -> usize {
        if hi <= lo {
            return lo;
        }
        lo + (self.next_u64() % (hi - lo + 1) as u64) as usize
    }
}

/// Error type for field generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldGenError {
    /// No room left for another zone at the requested spacing.
    Crowded {
        /// Zones requested.
        zones: usize,
        /// Zones placed before giving up.
        placed: usize,
        /// Minimum spacing between centers.
        spacing: i32,
    },
    /// The generated field was rejected.
    Setup(SetupError),
}

impl fmt::Display for FieldGenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Crowded {
                zones,
                placed,
                spacing,
            } => write!(
                f,
                "Field generation error: placed {placed} of {zones} zones at spacing {spacing}"
            ),
            Self::Setup(e) => write!(f, "Field generation error: {e}"),
        }
    }
}

impl std::error::Error for FieldGenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Setup(e) => Some(e),
            Self::Crowded { .. } => None,
        }
    }
}

impl From<SetupError> for FieldGenError {
    fn from(e: SetupError) -> Self {
        Self::Setup(e)
    }
}

/// Generate a field with the default zone spacing.
///
/// # Errors
///
/// See [`generate_spaced_field`].
pub fn generate_field(
    seed: u64,
    teams: usize,
    drones: usize,
    zones: usize,
) -> Result<GameState, FieldGenError> {
    generate_spaced_field(seed, teams, drones, zones, MIN_ZONE_SPACING)
}

/// Generate zones and starting positions for every team.
///
/// Zone centers are drawn from `[R, W - 2R) x [R, H - 2R)` and kept at least
/// `spacing` apart. One set of drone starting points is drawn over the whole
/// field and copied to every team.
///
/// # Errors
///
/// Returns [`FieldGenError::Crowded`] if the zones do not fit, or
/// [`FieldGenError::Setup`] if the counts make an invalid match.
pub fn generate_spaced_field(
    seed: u64,
    teams: usize,
    drones: usize,
    zones: usize,
    spacing: i32,
) -> Result<GameState, FieldGenError> {
    if teams == 0 {
        return Err(SetupError::NoTeams.into());
    }
    if teams > MAX_TEAMS {
        return Err(SetupError::TooManyTeams(teams).into());
    }
    if zones == 0 {
        return Err(SetupError::NoZones.into());
    }
    if drones == 0 {
        return Err(SetupError::NoDrones.into());
    }

    let mut rng = Rng::new(seed);
    let spacing_f = f64::from(spacing);

    let mut centers: Vec<Point> = Vec::with_capacity(zones);
    while centers.len() < zones {
        let mut attempts = 0;
        let center = loop {
            if attempts == MAX_PLACEMENT_ATTEMPTS {
                return Err(FieldGenError::Crowded {
                    zones,
                    placed: centers.len(),
                    spacing,
                });
            }
            attempts += 1;
            let candidate = Point::new(
                rng.next_i32(ZONE_RADIUS, FIELD_WIDTH - 2 * ZONE_RADIUS),
                rng.next_i32(ZONE_RADIUS, FIELD_HEIGHT - 2 * ZONE_RADIUS),
            );
            if centers.iter().all(|c| c.distance_to(candidate) >= spacing_f) {
                break candidate;
            }
        };
        centers.push(center);
    }

    let starts: Vec<Point> = (0..drones)
        .map(|_| {
            Point::new(
                rng.next_i32(0, FIELD_WIDTH),
                rng.next_i32(0, FIELD_HEIGHT),
            )
        })
        .collect();

    let zones = centers
        .into_iter()
        .enumerate()
        .map(|(id, center)| Zone::new(id as u8, center))
        .collect();
    let teams = (0..teams).map(|id| Team::new(id as u8, &starts)).collect();
    Ok(GameState::new(zones, teams)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_determinism() {
        let mut a = Rng::new(12345);
        let mut b = Rng::new(12345);
        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn test_rng_ranges() {
        let mut rng = Rng::new(7);
        for _ in 0..1000 {
            let x = rng.next_i32(100, 3800);
            assert!((100..3800).contains(&x));
            let n = rng.next_inclusive(3, 11);
            assert!((3..=11).contains(&n));
        }
        assert_eq!(rng.next_i32(5, 5), 5);
        assert_eq!(rng.next_inclusive(4, 4), 4);
    }

    #[test]
    fn test_field_generation_determinism() {
        let a = generate_field(42, 2, 5, 6).unwrap();
        let b = generate_field(42, 2, 5, 6).unwrap();
        assert_eq!(a, b);
        let c = generate_field(43, 2, 5, 6).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_field_layout() {
        let state = generate_field(9, 3, 7, 8).unwrap();
        assert_eq!(state.zones.len(), 8);
        assert_eq!(state.teams.len(), 3);

        for (i, a) in state.zones.iter().enumerate() {
            assert!((ZONE_RADIUS..FIELD_WIDTH - 2 * ZONE_RADIUS).contains(&a.center.x));
            assert!((ZONE_RADIUS..FIELD_HEIGHT - 2 * ZONE_RADIUS).contains(&a.center.y));
            assert_eq!(a.owner, None);
            for b in &state.zones[i + 1..] {
                assert!(a.center.distance_to(b.center) >= f64::from(MIN_ZONE_SPACING));
            }
        }

        // Every team starts from the same points
        let first = state.teams[0].positions();
        assert_eq!(first.len(), 7);
        for team in &state.teams {
            assert_eq!(team.positions(), first);
        }
    }

    #[test]
    fn test_bad_counts() {
        assert_eq!(generate_field(1, 0, 3, 4), Err(FieldGenError::Setup(SetupError::NoTeams)));
        assert_eq!(
            generate_field(1, MAX_TEAMS + 1, 3, 4),
            Err(FieldGenError::Setup(SetupError::TooManyTeams(MAX_TEAMS + 1)))
        );
        assert!(generate_field(1, 2, 0, 4).is_err());
        assert!(generate_field(1, 2, 3, 0).is_err());
    }

    #[test]
    fn test_crowded_field() {
        let err = generate_spaced_field(1, 2, 3, 3, 5000).unwrap_err();
        assert!(matches!(err, FieldGenError::Crowded { placed: 1, .. }));
        assert!(err.to_string().contains("1 of 3"));
    }
}
