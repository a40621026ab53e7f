//! High-level GBDT configuration with builder pattern.
//!
//! [`GBDTConfig`] provides a unified configuration for GBDT model training.
//! It composes nested parameter groups for semantic organization and uses
//! the `bon` crate for builder pattern generation with validation.
//!
//! The config also deserializes from flat XGBoost-style hyperparameter maps,
//! accepting the usual aliases (`eta`, `num_round`, `gamma`, `lambda`, `alpha`).
//!
//! # Example
//!
//! ```
//! use foldboost::model::gbdt::{GBDTConfig, TreeParams, SamplingParams};
//! use foldboost::training::Objective;
//!
//! // All defaults
//! let config = GBDTConfig::builder().build().unwrap();
//!
//! // Customize objective and hyperparameters
//! let config = GBDTConfig::builder()
//!     .objective(Objective::absolute())
//!     .n_trees(200)
//!     .learning_rate(0.1)
//!     .tree(TreeParams::depth_wise(8))
//!     .sampling(SamplingParams { subsample: 0.8, ..Default::default() })
//!     .build()
//!     .unwrap();
//!
//! // From a hyperparameter file
//! let config: GBDTConfig = serde_json::from_str(r#"{"max_depth": 5, "eta": 0.2, "num_round": 10}"#).unwrap();
//! assert_eq!(config.tree.max_depth, 5);
//! ```

use bon::Builder;
use serde::{Deserialize, Serialize};

use super::{ParamValidationError, RegularizationParams, SamplingParams, TreeParams};
use crate::training::gbdt::{GBDTParams, GainParams};
use crate::training::{Objective, Verbosity};

// =============================================================================
// ConfigError
// =============================================================================

/// Errors that can occur during configuration validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Learning rate must be positive.
    #[error("learning_rate must be positive, got {0}")]
    InvalidLearningRate(f32),

    /// Number of trees must be at least 1.
    #[error("n_trees must be at least 1")]
    InvalidNTrees,

    /// Tree depth must be at least 1.
    #[error("max_depth must be at least 1")]
    InvalidMaxDepth,

    /// Invalid sampling ratio (must be in (0, 1]).
    #[error("{field} must be in (0, 1], got {value}")]
    InvalidSamplingRatio { field: &'static str, value: f32 },

    /// Invalid regularization parameter.
    #[error("{field} must be non-negative, got {value}")]
    InvalidRegularization { field: &'static str, value: f32 },
}

impl From<ParamValidationError> for ConfigError {
    fn from(e: ParamValidationError) -> Self {
        match e {
            ParamValidationError::InvalidMaxDepth(_) => ConfigError::InvalidMaxDepth,
            ParamValidationError::InvalidLambda(v) => ConfigError::InvalidRegularization {
                field: "lambda",
                value: v,
            },
            ParamValidationError::InvalidAlpha(v) => ConfigError::InvalidRegularization {
                field: "alpha",
                value: v,
            },
            ParamValidationError::InvalidMinChildWeight(v) => ConfigError::InvalidRegularization {
                field: "min_child_weight",
                value: v,
            },
            ParamValidationError::InvalidMinGain(v) => ConfigError::InvalidRegularization {
                field: "min_gain",
                value: v,
            },
            ParamValidationError::InvalidSubsample(v) => ConfigError::InvalidSamplingRatio {
                field: "subsample",
                value: v,
            },
            ParamValidationError::InvalidColsampleBytree(v) => ConfigError::InvalidSamplingRatio {
                field: "colsample_bytree",
                value: v,
            },
        }
    }
}

// =============================================================================
// GBDTConfig
// =============================================================================

/// High-level configuration for GBDT model training.
///
/// # Structure
///
/// - **Objective**: What to optimize
/// - **Boosting**: Core parameters like `n_trees` and `learning_rate`
/// - **Tree**: Tree structure via [`TreeParams`]
/// - **Regularization**: Overfitting control via [`RegularizationParams`]
/// - **Sampling**: Data subsampling via [`SamplingParams`]
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
#[serde(default)]
pub struct GBDTConfig {
    // === Objective ===
    /// Loss function for training. Default: squared error.
    #[builder(default)]
    pub objective: Objective,

    // === Boosting parameters ===
    /// Number of boosting rounds (trees to train). Default: 100.
    #[builder(default = 100)]
    #[serde(alias = "num_round", alias = "num_boost_round", alias = "n_estimators")]
    pub n_trees: u32,

    /// Learning rate (shrinkage). Default: 0.3.
    #[builder(default = 0.3)]
    #[serde(alias = "eta")]
    pub learning_rate: f32,

    // === Nested parameter groups ===
    /// Tree structure parameters.
    #[builder(default)]
    #[serde(flatten)]
    pub tree: TreeParams,

    /// Regularization parameters.
    #[builder(default)]
    #[serde(flatten)]
    pub regularization: RegularizationParams,

    /// Row and column sampling parameters.
    #[builder(default)]
    #[serde(flatten)]
    pub sampling: SamplingParams,

    // === Reproducibility ===
    /// Random seed. Default: 42.
    #[builder(default = 42)]
    pub seed: u64,

    // === Logging ===
    /// Verbosity level. Default: `Warning`.
    #[builder(default)]
    pub verbosity: Verbosity,
}

/// Custom finishing function that validates the config.
impl<S: g_b_d_t_config_builder::IsComplete> GBDTConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any parameter is invalid:
    /// - `learning_rate <= 0`
    /// - `n_trees == 0`
    /// - `max_depth == 0`
    /// - Sampling ratios outside (0, 1]
    /// - Negative regularization parameters
    pub fn build(self) -> Result<GBDTConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl GBDTConfig {
    /// Validate the configuration.
    ///
    /// Configs created through the builder are already validated; this is for
    /// configs deserialized from files or mutated after construction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(ConfigError::InvalidLearningRate(self.learning_rate));
        }
        if self.n_trees == 0 {
            return Err(ConfigError::InvalidNTrees);
        }

        self.tree.validate()?;
        self.sampling.validate()?;
        self.regularization.validate()?;

        Ok(())
    }

    /// Convert to mid-level trainer parameters.
    pub(crate) fn to_trainer_params(&self) -> GBDTParams {
        let reg = &self.regularization;
        GBDTParams {
            n_trees: self.n_trees,
            learning_rate: self.learning_rate,
            max_depth: self.tree.max_depth,
            gain: GainParams {
                reg_lambda: reg.lambda,
                reg_alpha: reg.alpha,
                min_gain: reg.min_gain,
                min_child_weight: reg.min_child_weight,
                min_samples_leaf: reg.min_samples_leaf,
            },
            subsample: self.sampling.subsample,
            colsample_bytree: self.sampling.colsample_bytree,
            verbosity: self.verbosity,
            seed: self.seed,
        }
    }
}

impl Default for GBDTConfig {
    fn default() -> Self {
        Self::builder().__build_internal()
    }
}

// =============================================================================
// Tests
// =============================================================================
