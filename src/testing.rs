//! Testing utilities for foldboost.
//!
//! Assertion helpers and synthetic datasets shared by unit tests,
//! integration tests, and benchmarks.
//!
//! ```
//! use foldboost::testing::{linear_ramp, assert_slice_approx_eq};
//!
//! let data = linear_ramp(4);
//! assert_slice_approx_eq(data.targets().as_slice().unwrap(), &[0.0, 2.0, 4.0, 6.0], 1e-6, "ramp");
//! ```

use approx::AbsDiffEq;
use ndarray::{Array1, Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::data::Dataset;

// =============================================================================
// Constants
// =============================================================================

/// Default tolerance for floating point comparisons of O(1) values.
pub const DEFAULT_TOLERANCE: f32 = 1e-5;

/// Same tolerance as f64, for metric comparisons.
pub const DEFAULT_TOLERANCE_F64: f64 = 1e-5;

// =============================================================================
// Floating Point Assertions
// =============================================================================

/// Assert that two floating point values are approximately equal.
///
/// # Examples
///
/// ```
/// # use foldboost::assert_approx_eq;
/// assert_approx_eq!(1.0f32, 1.0001f32, 0.001);
/// assert_approx_eq!(2.0f64, 2.0, 1e-12, "metric for fold {}", 3);
/// ```
///
/// # Panics
///
/// Panics if the absolute difference exceeds tolerance.
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $tolerance:expr) => {{
        let left_val = $left;
        let right_val = $right;
        let tol = $tolerance;
        let diff = (left_val - right_val).abs();
        if diff > tol {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`\n right: `{:?}`\n  diff: `{:?}` > tolerance `{:?}`",
                left_val, right_val, diff, tol
            );
        }
    }};
    ($left:expr, $right:expr, $tolerance:expr, $($arg:tt)+) => {{
        let left_val = $left;
        let right_val = $right;
        let tol = $tolerance;
        let diff = (left_val - right_val).abs();
        if diff > tol {
            panic!(
                "assertion failed: `(left ≈ right)` - {}\n  left: `{:?}`\n right: `{:?}`\n  diff: `{:?}` > tolerance `{:?}`",
                format_args!($($arg)+), left_val, right_val, diff, tol
            );
        }
    }};
}

/// Assert that two slices of f32 values are approximately equal element-wise.
///
/// # Panics
///
/// Panics if lengths differ or any element differs by more than tolerance.
pub fn assert_slice_approx_eq(actual: &[f32], expected: &[f32], tolerance: f32, context: &str) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "{context}: length mismatch - got {}, expected {}",
        actual.len(),
        expected.len()
    );

    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        let diff = (a - e).abs();
        assert!(
            diff <= tolerance,
            "{context}[{i}]: {a} ≠ {e} (diff={diff}, tolerance={tolerance})"
        );
    }
}

/// Assert that two prediction vectors are approximately equal.
///
/// On failure, shows a diff of the rows that differ.
///
/// # Panics
///
/// Panics if lengths differ or if any value differs by more than `epsilon`.
pub fn assert_predictions_eq(
    actual: ArrayView1<f32>,
    expected: ArrayView1<f32>,
    epsilon: f32,
    context: &str,
) {
    if actual.len() != expected.len() {
        panic!(
            "\n{context}: length mismatch\n- {}  (expected)\n+ {}  (actual)\n",
            expected.len(),
            actual.len()
        );
    }

    if !actual.abs_diff_eq(&expected, epsilon) {
        let mut diff = String::new();
        let mut n_diff = 0;
        for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
            if !a.abs_diff_eq(e, epsilon) {
                n_diff += 1;
                diff.push_str(&format!("[{i:3}] - {e:>12.6}  (expected)\n"));
                diff.push_str(&format!("      + {a:>12.6}  (actual, Δ={:+.2e})\n", a - e));
            }
        }
        panic!(
            "\n{context}: {n_diff}/{} values differ (epsilon {epsilon:.0e})\n\n{diff}",
            actual.len()
        );
    }
}

// =============================================================================
// Synthetic Data
// =============================================================================

/// Single-feature dataset with feature `i` and target `2 * i` for `i in 0..n`.
pub fn linear_ramp(n: usize) -> Dataset {
    let features = Array2::from_shape_fn((n, 1), |(i, _)| i as f32);
    let targets = Array1::from_shape_fn(n, |i| 2.0 * i as f32);
    Dataset::new(features, targets).expect("ramp shapes agree")
}

/// Sample-major `[n_rows, n_features]` matrix of uniform values in `[min, max)`.
pub fn random_dense_f32(n_rows: usize, n_features: usize, seed: u64, min: f32, max: f32) -> Array2<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array2::from_shape_fn((n_rows, n_features), |_| rng.gen_range(min..max))
}

/// Linear regression targets `x · w + b + noise` with seeded weights.
///
/// Weights are uniform in `[-1, 1)`, the bias is uniform in `[-0.5, 0.5)`,
/// and noise is uniform in `[-noise, noise)`.
pub fn synthetic_linear_targets(features: &Array2<f32>, seed: u64, noise: f32) -> Array1<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    let weights: Array1<f32> = (0..features.ncols()).map(|_| rng.gen_range(-1.0..1.0)).collect();
    let bias: f32 = rng.gen_range(-0.5..0.5);
    features
        .rows()
        .into_iter()
        .map(|row| {
            let jitter = if noise > 0.0 { rng.gen_range(-noise..noise) } else { 0.0 };
            row.dot(&weights) + bias + jitter
        })
        .collect()
}

/// Seeded synthetic regression dataset with features in `[-1, 1)`.
pub fn synthetic_regression(n_rows: usize, n_features: usize, seed: u64) -> Dataset {
    let features = random_dense_f32(n_rows, n_features, seed, -1.0, 1.0);
    let targets = synthetic_linear_targets(&features, seed.wrapping_add(1), 0.05);
    Dataset::new(features, targets).expect("synthetic shapes agree")
}
