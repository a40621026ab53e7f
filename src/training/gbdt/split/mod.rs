//! Exact split finding.
//!
//! For a node, each candidate feature is scanned over its sorted values and
//! every boundary between two distinct values is evaluated with
//! [`GainParams::compute_gain`]. The best split over all features is then
//! chosen by [`select_best`].

mod gain;

pub use gain::GainParams;

use ndarray::ArrayView2;

use crate::training::Gradients;

/// A candidate numeric split.
#[derive(Clone, Debug, PartialEq)]
pub struct SplitInfo {
    /// Feature index.
    pub feature: u32,
    /// Rows with `value < threshold` go left.
    pub threshold: f32,
    /// Regularized gain (already reduced by `min_gain`).
    pub gain: f32,
    pub grad_left: f64,
    pub hess_left: f64,
    pub count_left: u32,
}

/// Threshold strictly between `lo` and `hi`, or `hi` if no such f32 midpoint exists.
#[inline]
pub(crate) fn split_threshold(lo: f32, hi: f32) -> f32 {
    let mid = ((lo as f64 + hi as f64) * 0.5) as f32;
    if mid > lo { mid } else { hi }
}

/// Find the best split of `rows` on a single feature.
///
/// `scratch` is reused across calls to avoid reallocating the sorted buffer.
/// Returns `None` when no boundary satisfies the child constraints.
pub fn find_best_split_for_feature(
    features: ArrayView2<f32>,
    feature: u32,
    rows: &[usize],
    gradients: &Gradients,
    parent: (f64, f64),
    params: &GainParams,
    scratch: &mut Vec<(f32, f32, f32)>,
) -> Option<SplitInfo> {
    let column = features.column(feature as usize);
    let pairs = gradients.pairs();

    scratch.clear();
    scratch.extend(rows.iter().map(|&r| (column[r], pairs[r].grad, pairs[r].hess)));
    scratch.sort_by(|a, b| a.0.total_cmp(&b.0));

    let (grad_parent, hess_parent) = parent;
    let n = scratch.len();
    let mut best: Option<SplitInfo> = None;
    let mut grad_left = 0.0f64;
    let mut hess_left = 0.0f64;

    for i in 0..n.saturating_sub(1) {
        let (value, grad, hess) = scratch[i];
        grad_left += grad as f64;
        hess_left += hess as f64;

        let next = scratch[i + 1].0;
        if next <= value {
            continue;
        }

        let count_left = (i + 1) as u32;
        let count_right = (n - i - 1) as u32;
        let grad_right = grad_parent - grad_left;
        let hess_right = hess_parent - hess_left;
        if !params.is_valid_split(hess_left, hess_right, count_left, count_right) {
            continue;
        }

        let gain = params.compute_gain(
            grad_left,
            hess_left,
            grad_right,
            hess_right,
            grad_parent,
            hess_parent,
        );
        if best.as_ref().is_none_or(|b| gain > b.gain) {
            best = Some(SplitInfo {
                feature,
                threshold: split_threshold(value, next),
                gain,
                grad_left,
                hess_left,
                count_left,
            });
        }
    }

    best
}

/// Pick the split with the highest positive gain.
///
/// Candidates are expected in ascending feature order; ties keep the earlier one.
pub fn select_best(candidates: impl IntoIterator<Item = Option<SplitInfo>>) -> Option<SplitInfo> {
    candidates
        .into_iter()
        .flatten()
        .filter(|s| s.gain > 0.0)
        .fold(None, |best: Option<SplitInfo>, s| match best {
            Some(b) if b.gain >= s.gain => Some(b),
            _ => Some(s),
        })
}
