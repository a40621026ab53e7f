//! Nested parameter groups for GBDT configuration.
//!
//! Parameters are grouped by concern:
//! - [`TreeParams`]: Tree structure
//! - [`RegularizationParams`]: L1/L2 regularization and split constraints
//! - [`SamplingParams`]: Row and column subsampling rates
//!
//! Each group has sensible defaults and validation methods. When
//! deserialized, groups are flattened into the parent config so that
//! XGBoost-style flat hyperparameter files (`{"max_depth": 5, "eta": 0.2}`)
//! load directly.

use serde::{Deserialize, Serialize};

// =============================================================================
// TreeParams
// =============================================================================

/// Tree structure parameters.
///
/// # Example
///
/// ```
/// use foldboost::model::gbdt::TreeParams;
///
/// let params = TreeParams::depth_wise(8);
/// assert_eq!(params.max_depth, 8);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeParams {
    /// Maximum depth of each tree (root is depth 0). Default: 6.
    pub max_depth: u32,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self { max_depth: 6 }
    }
}

impl TreeParams {
    /// Create depth-wise growth with specified max depth.
    pub fn depth_wise(max_depth: u32) -> Self {
        Self { max_depth }
    }

    /// Validate parameters.
    pub fn validate(&self) -> Result<(), ParamValidationError> {
        if self.max_depth == 0 {
            return Err(ParamValidationError::InvalidMaxDepth(self.max_depth));
        }
        Ok(())
    }
}

// =============================================================================
// RegularizationParams
// =============================================================================

/// Regularization parameters.
///
/// Controls L1/L2 regularization and split constraints. These prevent overfitting
/// and control tree complexity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegularizationParams {
    /// L2 regularization term on leaf weights. Default: 1.0.
    #[serde(alias = "reg_lambda")]
    pub lambda: f32,

    /// L1 regularization term on leaf weights. Default: 0.0.
    #[serde(alias = "reg_alpha")]
    pub alpha: f32,

    /// Minimum sum of hessians required in a leaf. Default: 1.0.
    pub min_child_weight: f32,

    /// Minimum gain required to make a split. Default: 0.0.
    #[serde(alias = "gamma", alias = "min_split_loss")]
    pub min_gain: f32,

    /// Minimum number of samples required in a leaf. Default: 1.
    pub min_samples_leaf: u32,
}

impl Default for RegularizationParams {
    fn default() -> Self {
        Self {
            lambda: 1.0,
            alpha: 0.0,
            min_child_weight: 1.0,
            min_gain: 0.0,
            min_samples_leaf: 1,
        }
    }
}

impl RegularizationParams {
    /// Validate parameters.
    ///
    /// # Errors
    ///
    /// Returns error if any parameter is negative or not finite.
    pub fn validate(&self) -> Result<(), ParamValidationError> {
        if !(self.lambda >= 0.0 && self.lambda.is_finite()) {
            return Err(ParamValidationError::InvalidLambda(self.lambda));
        }
        if !(self.alpha >= 0.0 && self.alpha.is_finite()) {
            return Err(ParamValidationError::InvalidAlpha(self.alpha));
        }
        if !(self.min_child_weight >= 0.0 && self.min_child_weight.is_finite()) {
            return Err(ParamValidationError::InvalidMinChildWeight(self.min_child_weight));
        }
        if !(self.min_gain >= 0.0 && self.min_gain.is_finite()) {
            return Err(ParamValidationError::InvalidMinGain(self.min_gain));
        }
        Ok(())
    }
}

// =============================================================================
// SamplingParams
// =============================================================================

/// Sampling parameters.
///
/// All rates are in the range (0, 1]. A rate of 1.0 means no sampling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingParams {
    /// Row subsampling ratio per round. Default: 1.0 (no sampling).
    pub subsample: f32,

    /// Column subsampling ratio per tree. Default: 1.0 (no sampling).
    pub colsample_bytree: f32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            subsample: 1.0,
            colsample_bytree: 1.0,
        }
    }
}

impl SamplingParams {
    /// Validate parameters.
    ///
    /// # Errors
    ///
    /// Returns error if any sampling rate is not in (0, 1].
    pub fn validate(&self) -> Result<(), ParamValidationError> {
        if !(self.subsample > 0.0 && self.subsample <= 1.0) {
            return Err(ParamValidationError::InvalidSubsample(self.subsample));
        }
        if !(self.colsample_bytree > 0.0 && self.colsample_bytree <= 1.0) {
            return Err(ParamValidationError::InvalidColsampleBytree(self.colsample_bytree));
        }
        Ok(())
    }

    /// Check if any row sampling is configured.
    pub fn has_row_sampling(&self) -> bool {
        self.subsample < 1.0
    }

    /// Check if any column sampling is configured.
    pub fn has_col_sampling(&self) -> bool {
        self.colsample_bytree < 1.0
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Parameter validation error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParamValidationError {
    #[error("max_depth must be >= 1, got {0}")]
    InvalidMaxDepth(u32),

    #[error("lambda must be >= 0, got {0}")]
    InvalidLambda(f32),

    #[error("alpha must be >= 0, got {0}")]
    InvalidAlpha(f32),

    #[error("min_child_weight must be >= 0, got {0}")]
    InvalidMinChildWeight(f32),

    #[error("min_gain must be >= 0, got {0}")]
    InvalidMinGain(f32),

    #[error("subsample must be in (0, 1], got {0}")]
    InvalidSubsample(f32),

    #[error("colsample_bytree must be in (0, 1], got {0}")]
    InvalidColsampleBytree(f32),
}

// =============================================================================
// Tests
// =============================================================================
