//! foldboost: k-fold cross-validation of gradient boosted tree regressors.
//!
//! The crate trains depth-wise, exact-greedy regression tree ensembles and
//! estimates their generalization error by k-fold cross-validation.
//!
//! # Quick start
//!
//! ```
//! use foldboost::cv::cross_validate;
//! use foldboost::data::Dataset;
//! use foldboost::model::GBDTConfig;
//!
//! // Rows are `[target, feature_0, ...]`.
//! let rows: Vec<[f32; 2]> = (0..10).map(|i| [2.0 * i as f32, i as f32]).collect();
//! let data = Dataset::from_rows(&rows).unwrap();
//!
//! let config = GBDTConfig::builder().n_trees(50).learning_rate(0.2).build().unwrap();
//! let cv = cross_validate(&data, 5, &config).unwrap();
//!
//! println!("RMSE average across folds: {}", cv.mean());
//! ```
//!
//! # Modules
//!
//! - [`data`]: in-memory datasets and delimited-text loading
//! - [`model`]: [`GBDTConfig`] and the trained [`GBDTModel`]
//! - [`cv`]: fold planning and the cross-validation driver
//! - [`persist`]: versioned JSON model files
//! - [`training`]: objectives, metrics, tree growing
//! - [`repr`]: canonical tree and forest representations

pub mod cv;
pub mod data;
pub mod model;
pub mod persist;
pub mod repr;
pub mod testing;
pub mod training;
pub mod utils;

pub use cv::{cross_validate, CrossValidation, CrossValidator, CvError, ModelRetention};
pub use data::Dataset;
pub use model::{GBDTConfig, GBDTModel};
pub use persist::PersistError;
pub use training::{Metric, Objective, TrainError};
pub use utils::Parallelism;
