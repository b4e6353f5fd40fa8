//! Vertical jitter for the payload-vs-outcome scatter.
//!
//! Outcome classes are either 0 or 1, so points pile up on two lines.
//! A small uniform offset separates them visually. This is a display
//! transform only; the pipeline always returns exact classes.

use crate::models::{JitteredPoint, ScatterPoint};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Offset each point's class by a value in `[-amplitude / 2, amplitude / 2)`.
///
/// The same seed always produces the same offsets. A non-positive
/// amplitude leaves the classes unchanged.
pub fn apply_jitter(points: Vec<ScatterPoint>, amplitude: f64, seed: u64) -> Vec<JitteredPoint> {
    let mut rng = StdRng::seed_from_u64(seed);

    points
        .into_iter()
        .map(|point| {
            let base = point.class.value() as f64;
            let offset = if amplitude > 0.0 {
                (rng.gen::<f64>() - 0.5) * amplitude
            } else {
                0.0
            };
            JitteredPoint {
                point,
                class_jittered: base + offset,
            }
        })
        .collect()
}
