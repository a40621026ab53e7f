//! Gradient boosted decision tree model.
//!
//! - [`GBDTConfig`]: validated training configuration
//! - [`GBDTModel`]: trained model with prediction

mod config;
mod model;
mod params;

pub use config::{ConfigError, GBDTConfig, GBDTConfigBuilder};
pub use model::GBDTModel;
pub use params::{ParamValidationError, RegularizationParams, SamplingParams, TreeParams};
