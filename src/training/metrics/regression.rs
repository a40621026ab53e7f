//! Regression metrics.

use ndarray::ArrayView1;

use super::MetricFn;

// =============================================================================
// RMSE (Root Mean Squared Error)
// =============================================================================

/// Root Mean Squared Error: sqrt(mean((pred - label)²))
///
/// Lower is better. Used for regression tasks.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rmse;

impl MetricFn for Rmse {
    fn compute(&self, predictions: ArrayView1<f32>, targets: ArrayView1<f32>) -> f64 {
        let n_rows = predictions.len();
        if n_rows == 0 {
            return 0.0;
        }

        let sum_sq = predictions
            .iter()
            .zip(targets.iter())
            .fold(0.0f64, |ss, (&p, &l)| {
                let diff = (p as f64) - (l as f64);
                ss + diff * diff
            });

        (sum_sq / n_rows as f64).sqrt()
    }

    fn higher_is_better(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "rmse"
    }
}

// =============================================================================
// MAE (Mean Absolute Error)
// =============================================================================

/// Mean Absolute Error: mean(|pred - label|)
///
/// Lower is better. More robust to outliers than RMSE.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mae;

impl MetricFn for Mae {
    fn compute(&self, predictions: ArrayView1<f32>, targets: ArrayView1<f32>) -> f64 {
        let n_rows = predictions.len();
        if n_rows == 0 {
            return 0.0;
        }

        let sum_ae = predictions
            .iter()
            .zip(targets.iter())
            .fold(0.0f64, |sa, (&p, &l)| sa + ((p as f64) - (l as f64)).abs());

        sum_ae / n_rows as f64
    }

    fn higher_is_better(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "mae"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::arr1;

    #[test]
    fn rmse_perfect() {
        let preds = arr1(&[1.0f32, 2.0, 3.0]);
        assert_eq!(Rmse.compute(preds.view(), preds.view()), 0.0);
    }

    #[test]
    fn rmse_known_value() {
        // errors 1, -1, 2 -> mean sq = 2
        let preds = arr1(&[2.0f32, 1.0, 5.0]);
        let targets = arr1(&[1.0f32, 2.0, 3.0]);
        assert_abs_diff_eq!(Rmse.compute(preds.view(), targets.view()), 2.0f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn mae_known_value() {
        let preds = arr1(&[2.0f32, 1.0, 5.0]);
        let targets = arr1(&[1.0f32, 2.0, 3.0]);
        assert_abs_diff_eq!(Mae.compute(preds.view(), targets.view()), 4.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn empty_is_zero() {
        let empty = arr1(&[] as &[f32]);
        assert_eq!(Rmse.compute(empty.view(), empty.view()), 0.0);
        assert_eq!(Mae.compute(empty.view(), empty.view()), 0.0);
    }

    #[test]
    fn lower_is_better() {
        assert!(!Rmse.higher_is_better());
        assert!(!Mae.higher_is_better());
    }
}
