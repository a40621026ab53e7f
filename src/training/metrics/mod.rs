//! Evaluation metrics for model quality.
//!
//! Metrics are separate from loss functions: a model might be trained with
//! one loss but evaluated with a different metric. Cross-validation scores
//! each held-out fold with a metric from this module.
//!
//! # Available Metrics
//!
//! - [`Rmse`]: Root Mean Squared Error
//! - [`Mae`]: Mean Absolute Error

mod regression;

pub use regression::{Mae, Rmse};

use std::fmt;
use std::str::FromStr;

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

// =============================================================================
// MetricFn Trait
// =============================================================================

/// A metric comparing predictions to targets.
pub trait MetricFn: Send + Sync {
    /// Compute the metric value.
    ///
    /// Returns `0.0` for empty input.
    fn compute(&self, predictions: ArrayView1<f32>, targets: ArrayView1<f32>) -> f64;

    /// Whether higher values indicate better performance.
    fn higher_is_better(&self) -> bool;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

// =============================================================================
// Metric Enum
// =============================================================================

/// Error returned when a metric name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported metric {0:?} (expected rmse or mae)")]
pub struct UnknownMetric(pub String);

/// Metric selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Metric {
    #[default]
    Rmse,
    Mae,
}

impl MetricFn for Metric {
    fn compute(&self, predictions: ArrayView1<f32>, targets: ArrayView1<f32>) -> f64 {
        match self {
            Metric::Rmse => Rmse.compute(predictions, targets),
            Metric::Mae => Mae.compute(predictions, targets),
        }
    }

    fn higher_is_better(&self) -> bool {
        match self {
            Metric::Rmse => Rmse.higher_is_better(),
            Metric::Mae => Mae.higher_is_better(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Metric::Rmse => Rmse.name(),
            Metric::Mae => Mae.name(),
        }
    }
}

impl FromStr for Metric {
    type Err = UnknownMetric;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rmse" => Ok(Metric::Rmse),
            "mae" => Ok(Metric::Mae),
            _ => Err(UnknownMetric(s.to_string())),
        }
    }
}

impl TryFrom<String> for Metric {
    type Error = UnknownMetric;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Metric> for String {
    fn from(value: Metric) -> Self {
        value.name().to_string()
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
