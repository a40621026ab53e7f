//! The fit/predict seam used by the cross-validator.

use ndarray::{Array1, ArrayView1, ArrayView2};

use crate::model::{GBDTConfig, GBDTModel};
use crate::training::TrainError;
use crate::utils::Parallelism;

/// A fitted model that can score a feature matrix.
pub trait Predict {
    /// Predict one value per row of `features` (`[n_rows, n_features]`).
    fn predict_batch(&self, features: ArrayView2<f32>, parallelism: Parallelism) -> Array1<f32>;
}

/// Something that fits a model from features and targets.
///
/// Implementations must be deterministic for identical inputs so that
/// cross-validation results are reproducible.
pub trait Learner: Sync {
    type Model: Predict + Send;

    /// Fit a model on `features` (`[n_rows, n_features]`) and `targets`.
    fn fit(
        &self,
        features: ArrayView2<f32>,
        targets: ArrayView1<f32>,
        parallelism: Parallelism,
    ) -> Result<Self::Model, TrainError>;
}

/// Gradient boosted tree learner with a fixed configuration.
#[derive(Debug, Clone)]
pub struct GBDTLearner {
    config: GBDTConfig,
}

impl GBDTLearner {
    pub fn new(config: GBDTConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GBDTConfig {
        &self.config
    }
}

impl Learner for GBDTLearner {
    type Model = GBDTModel;

    fn fit(
        &self,
        features: ArrayView2<f32>,
        targets: ArrayView1<f32>,
        parallelism: Parallelism,
    ) -> Result<GBDTModel, TrainError> {
        GBDTModel::train_inner(features, targets, self.config.clone(), parallelism)
    }
}

impl Predict for GBDTModel {
    fn predict_batch(&self, features: ArrayView2<f32>, parallelism: Parallelism) -> Array1<f32> {
        self.predict_inner(features, parallelism)
    }
}
