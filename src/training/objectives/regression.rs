//! Regression objective functions.

use ndarray::ArrayView1;

use super::ObjectiveFn;
use crate::training::GradsTuple;
use crate::utils::quantile;

// =============================================================================
// Squared Loss
// =============================================================================

/// Squared error loss (L2 loss) for regression.
///
/// - Loss: `0.5 * (pred - target)²`
/// - Gradient: `pred - target`
/// - Hessian: `1.0`
#[derive(Debug, Clone, Copy, Default)]
pub struct SquaredLoss;

impl ObjectiveFn for SquaredLoss {
    fn compute_gradients_into(
        &self,
        predictions: ArrayView1<f32>,
        targets: ArrayView1<f32>,
        grad_hess: &mut [GradsTuple],
    ) {
        for ((gh, &pred), &target) in grad_hess.iter_mut().zip(predictions).zip(targets) {
            gh.grad = pred - target;
            gh.hess = 1.0;
        }
    }

    fn compute_base_score(&self, targets: ArrayView1<f32>) -> f32 {
        if targets.is_empty() {
            return 0.0;
        }
        let sum: f64 = targets.iter().map(|&y| y as f64).sum();
        (sum / targets.len() as f64) as f32
    }

    fn name(&self) -> &'static str {
        "reg:squarederror"
    }
}

// =============================================================================
// Absolute Loss (MAE / L1)
// =============================================================================

/// Absolute error loss (L1 loss) for robust regression.
///
/// - Loss: `|pred - target|`
/// - Gradient: `sign(pred - target)`
/// - Hessian: `1.0` (constant for Newton step stability)
#[derive(Debug, Clone, Copy, Default)]
pub struct AbsoluteLoss;

impl ObjectiveFn for AbsoluteLoss {
    fn compute_gradients_into(
        &self,
        predictions: ArrayView1<f32>,
        targets: ArrayView1<f32>,
        grad_hess: &mut [GradsTuple],
    ) {
        for ((gh, &pred), &target) in grad_hess.iter_mut().zip(predictions).zip(targets) {
            let diff = pred - target;
            gh.grad = if diff == 0.0 { 0.0 } else { diff.signum() };
            gh.hess = 1.0;
        }
    }

    fn compute_base_score(&self, targets: ArrayView1<f32>) -> f32 {
        if targets.is_empty() {
            return 0.0;
        }
        // Median is optimal for L1 loss
        let values = targets.to_vec();
        let mut scratch = Vec::with_capacity(values.len());
        quantile(&values, 0.5, &mut scratch)
    }

    fn name(&self) -> &'static str {
        "reg:absoluteerror"
    }
}
