//! High-level model types.

pub mod gbdt;
mod meta;

pub use gbdt::{GBDTConfig, GBDTModel};
pub use meta::ModelMeta;
