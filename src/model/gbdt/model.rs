//! GBDT model implementation.
//!
//! High-level wrapper around [`Forest`] with training and prediction.
//! Access components via [`forest()`](GBDTModel::forest), [`meta()`](GBDTModel::meta),
//! and [`config()`](GBDTModel::config).

use ndarray::{Array1, ArrayView1, ArrayView2};

use crate::model::meta::ModelMeta;
use crate::repr::gbdt::Forest;
use crate::training::gbdt::{GBDTTrainer, TrainError};
use crate::training::Rmse;
use crate::utils::{run_with_threads, Parallelism};

use super::GBDTConfig;

/// High-level GBDT regression model with training and prediction.
#[derive(Clone, PartialEq)]
pub struct GBDTModel {
    /// The underlying forest.
    forest: Forest,
    /// Model metadata.
    meta: ModelMeta,
    /// Training configuration.
    config: GBDTConfig,
}

impl GBDTModel {
    /// Create a model from all its parts.
    ///
    /// Used when loading a persisted model.
    pub fn from_parts(forest: Forest, meta: ModelMeta, config: GBDTConfig) -> Self {
        Self {
            forest,
            meta,
            config,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get reference to the underlying forest.
    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    /// Get reference to model metadata.
    pub fn meta(&self) -> &ModelMeta {
        &self.meta
    }

    /// Get reference to training configuration.
    pub fn config(&self) -> &GBDTConfig {
        &self.config
    }

    /// Number of features the model expects.
    pub fn n_features(&self) -> usize {
        self.meta.n_features
    }

    /// Set feature names.
    pub fn with_feature_names(mut self, names: Vec<String>) -> Self {
        self.meta.feature_names = Some(names);
        self
    }

    // =========================================================================
    // Training
    // =========================================================================

    /// Train a new GBDT model.
    ///
    /// # Arguments
    ///
    /// * `features` - Feature matrix with shape `[n_samples, n_features]` (sample-major)
    /// * `targets` - Target values, one per sample
    /// * `config` - Training configuration (validated before training starts)
    /// * `n_threads` - Thread count: 0 = auto, 1 = sequential, >1 = exact count
    pub fn train(
        features: ArrayView2<f32>,
        targets: ArrayView1<f32>,
        config: GBDTConfig,
        n_threads: usize,
    ) -> Result<Self, TrainError> {
        run_with_threads(n_threads, |parallelism| {
            Self::train_inner(features, targets, config, parallelism)
        })
    }

    /// Internal training implementation (no thread pool management).
    ///
    /// The caller is responsible for any thread pool; `parallelism` only says
    /// whether rayon may be used.
    pub(crate) fn train_inner(
        features: ArrayView2<f32>,
        targets: ArrayView1<f32>,
        config: GBDTConfig,
        parallelism: Parallelism,
    ) -> Result<Self, TrainError> {
        config.validate()?;

        let params = config.to_trainer_params();
        let trainer = GBDTTrainer::new(config.objective, Rmse, params);
        let forest = trainer.train(features, targets, parallelism)?;

        let meta = ModelMeta {
            n_features: features.ncols(),
            objective: config.objective,
            n_train_rows: features.nrows(),
            ..Default::default()
        };

        Ok(Self {
            forest,
            meta,
            config,
        })
    }

    // =========================================================================
    // Prediction
    // =========================================================================

    /// Predict for multiple rows.
    ///
    /// # Arguments
    ///
    /// * `features` - Feature matrix with shape `[n_samples, n_features]` (sample-major)
    /// * `n_threads` - Thread count: 0 = auto, 1 = sequential, >1 = exact count
    ///
    /// Missing (NaN) values follow each split's default direction; columns
    /// beyond those present in `features` are treated as missing.
    pub fn predict(&self, features: ArrayView2<f32>, n_threads: usize) -> Array1<f32> {
        run_with_threads(n_threads, |parallelism| self.predict_inner(features, parallelism))
    }

    /// Prediction without thread pool management.
    pub(crate) fn predict_inner(
        &self,
        features: ArrayView2<f32>,
        parallelism: Parallelism,
    ) -> Array1<f32> {
        let mut output = Array1::<f32>::zeros(features.nrows());
        if !output.is_empty() {
            self.forest.predict_into(features, output.view_mut(), parallelism);
        }
        output
    }

    /// Predict a single row.
    pub fn predict_row(&self, row: &[f32]) -> f32 {
        self.forest.predict_row(row)
    }
}

impl std::fmt::Debug for GBDTModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GBDTModel")
            .field("n_trees", &self.forest.n_trees())
            .field("n_features", &self.meta.n_features)
            .field("objective", &self.meta.objective)
            .field("base_score", &self.forest.base_score())
            .finish()
    }
}
