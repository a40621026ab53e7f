//! Shared helpers for integration tests.
//!
//! For assertion helpers and synthetic data, use `foldboost::testing`.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use foldboost::model::gbdt::RegularizationParams;
use foldboost::model::GBDTConfig;

#[allow(unused_imports)]
pub use foldboost::assert_approx_eq;
#[allow(unused_imports)]
pub use foldboost::testing::{
    assert_predictions_eq, linear_ramp, synthetic_regression, DEFAULT_TOLERANCE,
    DEFAULT_TOLERANCE_F64,
};

/// Small, fast configuration with the CLI's default depth and learning rate.
pub fn small_config(n_trees: u32) -> GBDTConfig {
    GBDTConfig::builder()
        .n_trees(n_trees)
        .learning_rate(0.2)
        .tree(foldboost::model::gbdt::TreeParams::depth_wise(5))
        .build()
        .expect("valid config")
}

/// Configuration that lets single rows form leaves.
pub fn unconstrained_config(n_trees: u32) -> GBDTConfig {
    GBDTConfig::builder()
        .n_trees(n_trees)
        .regularization(RegularizationParams {
            min_child_weight: 0.0,
            ..Default::default()
        })
        .build()
        .expect("valid config")
}

/// CSV text of the ramp dataset: `2i,i` per line.
pub fn ramp_csv(n: usize) -> String {
    (0..n).map(|i| format!("{},{}\n", 2 * i, i)).collect()
}

/// Write `contents` to `dir/name` and return the path.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write test file");
    path
}
