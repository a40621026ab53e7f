//! Objective (loss) functions for gradient boosting.
//!
//! Objectives compute per-sample gradients and hessians and the initial base
//! score. Only single-output regression objectives are provided.
//!
//! # Available Objectives
//!
//! - [`SquaredLoss`]: squared error (`reg:squarederror`)
//! - [`AbsoluteLoss`]: absolute error (`reg:absoluteerror`)

mod regression;

pub use regression::{AbsoluteLoss, SquaredLoss};

use std::fmt;
use std::str::FromStr;

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use crate::training::GradsTuple;

// =============================================================================
// Objective Trait
// =============================================================================

/// An objective (loss) function for training gradient boosted models.
pub trait ObjectiveFn: Send + Sync {
    /// Compute gradients and hessians for the given predictions.
    ///
    /// `predictions`, `targets` and `grad_hess` all have one entry per sample.
    fn compute_gradients_into(
        &self,
        predictions: ArrayView1<f32>,
        targets: ArrayView1<f32>,
        grad_hess: &mut [GradsTuple],
    );

    /// Compute the initial base score (bias) from targets.
    fn compute_base_score(&self, targets: ArrayView1<f32>) -> f32;

    /// Canonical name of this objective.
    fn name(&self) -> &'static str;
}

// =============================================================================
// Objective Enum
// =============================================================================

/// Error returned when an objective name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported objective {0:?} (expected reg:squarederror or reg:absoluteerror)")]
pub struct UnknownObjective(pub String);

/// Objective selection for configuration.
///
/// Parses and serializes the XGBoost-style names used by training scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Objective {
    /// Squared error regression.
    #[default]
    SquaredError,
    /// Absolute error regression.
    AbsoluteError,
}

impl Objective {
    /// Squared error objective.
    pub fn squared() -> Self {
        Objective::SquaredError
    }

    /// Absolute error objective.
    pub fn absolute() -> Self {
        Objective::AbsoluteError
    }
}

impl ObjectiveFn for Objective {
    fn compute_gradients_into(
        &self,
        predictions: ArrayView1<f32>,
        targets: ArrayView1<f32>,
        grad_hess: &mut [GradsTuple],
    ) {
        match self {
            Objective::SquaredError => {
                SquaredLoss.compute_gradients_into(predictions, targets, grad_hess)
            }
            Objective::AbsoluteError => {
                AbsoluteLoss.compute_gradients_into(predictions, targets, grad_hess)
            }
        }
    }

    fn compute_base_score(&self, targets: ArrayView1<f32>) -> f32 {
        match self {
            Objective::SquaredError => SquaredLoss.compute_base_score(targets),
            Objective::AbsoluteError => AbsoluteLoss.compute_base_score(targets),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Objective::SquaredError => SquaredLoss.name(),
            Objective::AbsoluteError => AbsoluteLoss.name(),
        }
    }
}

impl FromStr for Objective {
    type Err = UnknownObjective;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reg:squarederror" | "reg:squared_error" | "reg:linear" | "squared" | "l2" => {
                Ok(Objective::SquaredError)
            }
            "reg:absoluteerror" | "reg:absolute_error" | "absolute" | "l1" => {
                Ok(Objective::AbsoluteError)
            }
            _ => Err(UnknownObjective(s.to_string())),
        }
    }
}

impl TryFrom<String> for Objective {
    type Error = UnknownObjective;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Objective> for String {
    fn from(value: Objective) -> Self {
        value.name().to_string()
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_xgboost_names() {
        assert_eq!("reg:squarederror".parse::<Objective>(), Ok(Objective::SquaredError));
        assert_eq!("REG:SquaredError".parse::<Objective>(), Ok(Objective::SquaredError));
        assert_eq!("reg:absoluteerror".parse::<Objective>(), Ok(Objective::AbsoluteError));
        assert_eq!(
            "binary:logistic".parse::<Objective>(),
            Err(UnknownObjective("binary:logistic".into()))
        );
    }

    #[test]
    fn display_round_trips() {
        for obj in [Objective::SquaredError, Objective::AbsoluteError] {
            assert_eq!(obj.to_string().parse::<Objective>(), Ok(obj));
        }
    }

    #[test]
    fn serde_uses_names() {
        let json = serde_json::to_string(&Objective::SquaredError).unwrap();
        assert_eq!(json, "\"reg:squarederror\"");
        let parsed: Objective = serde_json::from_str("\"reg:absoluteerror\"").unwrap();
        assert_eq!(parsed, Objective::AbsoluteError);
        assert!(serde_json::from_str::<Objective>("\"multi:softmax\"").is_err());
    }
}
