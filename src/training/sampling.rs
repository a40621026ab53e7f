//! Row and column sampling for training.
//!
//! # Row Sampling
//!
//! `subsample`: sample a fraction of rows without replacement at the start of
//! each boosting round. Unsampled rows do not take part in growing that
//! round's tree, but still receive its predictions.
//!
//! # Column Sampling
//!
//! `colsample_bytree`: sample a fraction of features per tree.
//!
//! Both samplers draw from a [`StdRng`] seeded once per training run, so a
//! fixed seed reproduces the same sequence of samples.

use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;

// ============================================================================
// RowSampler
// ============================================================================

/// Samples rows without replacement for each boosting round.
///
/// Row indices are sorted after sampling for cache-friendly access.
#[derive(Debug)]
pub struct RowSampler {
    n_rows: usize,
    subsample: f32,
    rng: StdRng,
}

impl RowSampler {
    /// Create a new row sampler.
    ///
    /// `subsample` must be in (0, 1]; this is checked by config validation.
    pub fn new(n_rows: usize, subsample: f32, seed: u64) -> Self {
        Self {
            n_rows,
            subsample,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Returns true if sampling is enabled (subsample < 1.0).
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.subsample < 1.0
    }

    /// Sample row indices for the next round.
    ///
    /// Returns all indices if sampling is disabled.
    pub fn sample(&mut self) -> Vec<usize> {
        if !self.is_enabled() {
            return (0..self.n_rows).collect();
        }
        let amount = sample_size(self.n_rows, self.subsample);
        let mut rows = index::sample(&mut self.rng, self.n_rows, amount).into_vec();
        rows.sort_unstable();
        rows
    }
}

// ============================================================================
// ColSampler
// ============================================================================

/// Samples features per tree.
#[derive(Debug)]
pub struct ColSampler {
    n_features: usize,
    colsample_bytree: f32,
    rng: StdRng,
}

impl ColSampler {
    pub fn new(n_features: usize, colsample_bytree: f32, seed: u64) -> Self {
        Self {
            n_features,
            colsample_bytree,
            // Offset so row and column streams differ for the same seed.
            rng: StdRng::seed_from_u64(seed.wrapping_add(0x9E37_79B9_7F4A_7C15)),
        }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.colsample_bytree < 1.0
    }

    /// Sample the features available to the next tree, in ascending order.
    pub fn sample_tree(&mut self) -> Vec<u32> {
        if !self.is_enabled() {
            return (0..self.n_features as u32).collect();
        }
        let amount = sample_size(self.n_features, self.colsample_bytree);
        let mut features: Vec<u32> = index::sample(&mut self.rng, self.n_features, amount)
            .into_iter()
            .map(|f| f as u32)
            .collect();
        features.sort_unstable();
        features
    }
}

/// Slack absorbing f32 representation error before rounding up.
const ROUNDING_SLACK: f64 = 1e-6;

/// `ceil(n * fraction)` clamped to `[1, n]` (0 when `n == 0`).
///
/// `fraction` is an f32, so products that are exact in decimal
/// (`100 * 0.3`) land slightly above the integer and must not round up.
fn sample_size(n: usize, fraction: f32) -> usize {
    if n == 0 {
        return 0;
    }
    ((n as f64 * fraction as f64 - ROUNDING_SLACK).ceil() as usize).clamp(1, n)
}
