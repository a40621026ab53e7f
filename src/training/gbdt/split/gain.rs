//! Gain computation and regularization parameters.

// =============================================================================
// Gain Parameters
// =============================================================================

/// Parameters for split gain computation and leaf weight calculation.
///
/// These parameters are static for the lifetime of training and control
/// regularization and splitting constraints.
#[derive(Clone, Debug, PartialEq)]
pub struct GainParams {
    /// L2 regularization (lambda).
    pub reg_lambda: f32,
    /// L1 regularization (alpha).
    pub reg_alpha: f32,
    /// Minimum split gain (gamma).
    pub min_gain: f32,
    /// Minimum sum of hessians per child.
    pub min_child_weight: f32,
    /// Minimum samples per child.
    pub min_samples_leaf: u32,
}

impl Default for GainParams {
    fn default() -> Self {
        Self {
            reg_lambda: 1.0,
            reg_alpha: 0.0,
            min_gain: 0.0,
            min_child_weight: 1.0,
            min_samples_leaf: 1,
        }
    }
}

impl GainParams {
    /// Compute the split gain using XGBoost formula.
    ///
    /// ```text
    /// gain = 0.5 * [G_L²/(H_L + λ) + G_R²/(H_R + λ) - G_P²/(H_P + λ)] - γ
    /// ```
    #[inline]
    pub fn compute_gain(
        &self,
        grad_left: f64,
        hess_left: f64,
        grad_right: f64,
        hess_right: f64,
        grad_parent: f64,
        hess_parent: f64,
    ) -> f32 {
        let lambda = self.reg_lambda as f64;

        let score_left = grad_left * grad_left / (hess_left + lambda);
        let score_right = grad_right * grad_right / (hess_right + lambda);
        let score_parent = grad_parent * grad_parent / (hess_parent + lambda);

        let gain = 0.5 * (score_left + score_right - score_parent) - self.min_gain as f64;

        gain as f32
    }

    /// Check if a split satisfies minimum child constraints.
    #[inline]
    pub fn is_valid_split(
        &self,
        hess_left: f64,
        hess_right: f64,
        count_left: u32,
        count_right: u32,
    ) -> bool {
        let min_weight = self.min_child_weight as f64;
        let min_samples = self.min_samples_leaf;

        hess_left >= min_weight
            && hess_right >= min_weight
            && count_left >= min_samples
            && count_right >= min_samples
    }

    /// Compute leaf weight with L1 and L2 regularization.
    ///
    /// ```text
    /// weight = -sign(G) × max(0, |G| - α) / (H + λ)
    /// ```
    ///
    /// The learning rate is applied by the caller.
    #[inline]
    pub fn compute_leaf_weight(&self, grad_sum: f64, hess_sum: f64) -> f32 {
        let lambda = self.reg_lambda as f64;
        let alpha = self.reg_alpha as f64;
        let denom = hess_sum + lambda;
        if denom <= 0.0 {
            return 0.0;
        }

        if alpha == 0.0 {
            (-grad_sum / denom) as f32
        } else {
            let abs_grad = grad_sum.abs();
            if abs_grad <= alpha {
                0.0
            } else {
                let sign = if grad_sum > 0.0 { -1.0 } else { 1.0 };
                (sign * (abs_grad - alpha) / denom) as f32
            }
        }
    }
}
