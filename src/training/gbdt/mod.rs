//! Gradient Boosted Decision Tree (GBDT) training module.
//!
//! - [`grower`] - Depth-wise tree growing
//! - [`split`] - Gain computation and exact split search
//! - [`trainer`] - GBDT training loop

pub mod grower;
pub mod split;
pub mod trainer;

pub use grower::{GrowerParams, TreeGrower};
pub use split::{GainParams, SplitInfo};
pub use trainer::{GBDTParams, GBDTTrainer, TrainError};
