//! Bounded random marker offsets for activities that share a site.
//!
//! The random source is injected so that a seeded generator reproduces the
//! same layout for the same data on every load. Offsets are computed once
//! per load by [`crate::dataset::Dataset::build`] and cached on each record;
//! filter and render passes never recompute them.

use engagement_map_activity_models::Location;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Default offset bound in decimal degrees (roughly 100 m at mid-latitudes).
pub const DEFAULT_JITTER_SCALE: f64 = 0.001;

/// Largest offset bound [`jitter`] applies, in decimal degrees. Larger
/// scales are clamped to it.
pub const MAX_JITTER_SCALE: f64 = 1.0;

/// Default generator seed, so repeated loads of unchanged data keep every
/// marker in place.
pub const DEFAULT_JITTER_SEED: u64 = 42;

/// Jitter settings for one data load.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JitterConfig {
    /// Maximum per-axis offset in decimal degrees.
    pub scale: f64,
    /// Generator seed. `None` draws from OS entropy, which produces a new
    /// marker layout on every load.
    pub seed: Option<u64>,
}

impl Default for JitterConfig {
    fn default() -> Self {
        Self {
            scale: DEFAULT_JITTER_SCALE,
            seed: Some(DEFAULT_JITTER_SEED),
        }
    }
}

impl JitterConfig {
    /// Creates the generator for a single load.
    #[must_use]
    pub fn rng(&self) -> StdRng {
        self.seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64)
    }
}

/// Offsets `location` on each axis by a value drawn uniformly from
/// `[-scale, scale]`.
///
/// An absent location stays absent. A negative `scale` is treated as its
/// magnitude and clamped to [`MAX_JITTER_SCALE`]. A scale that is not a
/// normal float returns the location unchanged.
#[must_use]
pub fn jitter<R: Rng + ?Sized>(
    location: Option<Location>,
    scale: f64,
    rng: &mut R,
) -> Option<Location> {
    let location = location?;
    let scale = scale.abs();
    if !scale.is_normal() {
        return Some(location);
    }
    let scale = scale.min(MAX_JITTER_SCALE);

    let latitude = location.latitude + rng.gen_range(-scale..=scale);
    let longitude = location.longitude + rng.gen_range(-scale..=scale);

    // Sites near the poles or antimeridian can be pushed out of range.
    Some(Location::new(latitude, longitude).unwrap_or(location))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NB: Location = Location {
        latitude: 40.5008,
        longitude: -74.4474,
    };

    #[test]
    fn absent_location_is_never_jittered() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(jitter(None, DEFAULT_JITTER_SCALE, &mut rng).is_none());
    }

    #[test]
    fn offsets_stay_within_scale() {
        let mut rng = StdRng::seed_from_u64(7);
        for scale in [0.001, 0.01, 0.5] {
            for _ in 0..1_000 {
                let moved = jitter(Some(NB), scale, &mut rng).unwrap();
                assert!(
                    (moved.latitude - NB.latitude).abs() <= scale,
                    "latitude moved more than {scale}"
                );
                assert!(
                    (moved.longitude - NB.longitude).abs() <= scale,
                    "longitude moved more than {scale}"
                );
            }
        }
    }

    #[test]
    fn jitter_actually_moves_points() {
        let mut rng = StdRng::seed_from_u64(7);
        let moved = (0..100)
            .filter_map(|_| jitter(Some(NB), DEFAULT_JITTER_SCALE, &mut rng))
            .filter(|loc| *loc != NB)
            .count();
        assert_eq!(moved, 100);
    }

    #[test]
    fn same_seed_reproduces_layout() {
        let config = JitterConfig::default();
        let mut a = config.rng();
        let mut b = config.rng();
        for _ in 0..50 {
            assert_eq!(
                jitter(Some(NB), config.scale, &mut a),
                jitter(Some(NB), config.scale, &mut b)
            );
        }
    }

    #[test]
    fn zero_scale_is_identity() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(jitter(Some(NB), 0.0, &mut rng), Some(NB));
    }

    #[test]
    fn negative_scale_uses_magnitude() {
        let mut rng = StdRng::seed_from_u64(3);
        let moved = jitter(Some(NB), -0.002, &mut rng).unwrap();
        assert!((moved.latitude - NB.latitude).abs() <= 0.002);
    }

    #[test]
    fn huge_scale_is_clamped() {
        let mut rng = StdRng::seed_from_u64(3);
        for scale in [1e308, f64::MAX, 90.0] {
            let moved = jitter(Some(NB), scale, &mut rng).unwrap();
            assert!((moved.latitude - NB.latitude).abs() <= MAX_JITTER_SCALE);
            assert!((moved.longitude - NB.longitude).abs() <= MAX_JITTER_SCALE);
        }
    }
}
