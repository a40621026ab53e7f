//! Training infrastructure for gradient boosting.
//!
//! This module provides the core types needed for training:
//!
//! - [`Gradients`]: Per-sample gradient storage
//! - [`ObjectiveFn`], [`Objective`]: Computing gradients and base scores
//! - [`MetricFn`], [`Metric`]: Evaluating model quality
//! - [`TrainingLogger`], [`Verbosity`]: Structured logging
//! - [`gbdt`]: Tree growing and the boosting loop
//!
//! ## Objectives (Loss Functions)
//!
//! - [`SquaredLoss`]: Squared error for regression (L2)
//! - [`AbsoluteLoss`]: Absolute error for regression (L1)
//!
//! ## Metrics
//!
//! - [`Rmse`], [`Mae`]: Regression metrics

pub mod gbdt;
mod gradients;
mod logger;
mod metrics;
mod objectives;
pub mod sampling;

pub use gradients::{GradsTuple, Gradients};
pub use logger::{TrainingLogger, Verbosity};
pub use metrics::{Mae, Metric, MetricFn, Rmse, UnknownMetric};
pub use objectives::{AbsoluteLoss, Objective, ObjectiveFn, SquaredLoss, UnknownObjective};

pub use gbdt::{GBDTParams, GBDTTrainer, GainParams, TrainError};
