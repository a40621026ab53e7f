//! Depth-wise tree grower.
//!
//! Grows one regression tree from per-row gradients using exact greedy split
//! search. Nodes are expanded level by level; a node becomes a leaf when it
//! reaches `max_depth`, has too few rows to split, or no split has positive
//! gain.

use std::collections::VecDeque;

use ndarray::ArrayView2;

use super::split::{find_best_split_for_feature, select_best, GainParams, SplitInfo};
use crate::repr::gbdt::{MutableTree, NodeId, Tree};
use crate::training::Gradients;
use crate::utils::Parallelism;

/// Parameters for tree growth.
#[derive(Clone, Debug)]
pub struct GrowerParams {
    /// Regularization and split constraints.
    pub gain: GainParams,
    /// Shrinkage applied to every leaf weight.
    pub learning_rate: f32,
    /// Maximum depth (root is depth 0).
    pub max_depth: u32,
}

impl Default for GrowerParams {
    fn default() -> Self {
        Self {
            gain: GainParams::default(),
            learning_rate: 0.3,
            max_depth: 6,
        }
    }
}

struct PendingNode {
    id: NodeId,
    rows: Vec<usize>,
    depth: u32,
}

/// Tree grower.
#[derive(Debug)]
pub struct TreeGrower {
    params: GrowerParams,
    parallelism: Parallelism,
}

impl TreeGrower {
    pub fn new(params: GrowerParams, parallelism: Parallelism) -> Self {
        Self { params, parallelism }
    }

    #[inline]
    pub fn params(&self) -> &GrowerParams {
        &self.params
    }

    /// Grow a tree over `rows` using only `allowed_features`.
    ///
    /// `allowed_features` must be sorted ascending so that gain ties resolve
    /// to the lowest feature index.
    pub fn grow(
        &self,
        features: ArrayView2<f32>,
        gradients: &Gradients,
        rows: Vec<usize>,
        allowed_features: &[u32],
    ) -> Tree {
        let mut tree = MutableTree::with_capacity(2usize.pow(self.params.max_depth.min(10) + 1));
        let root = tree.add_node();

        let mut queue = VecDeque::new();
        queue.push_back(PendingNode {
            id: root,
            rows,
            depth: 0,
        });

        while let Some(node) = queue.pop_front() {
            let (grad_sum, hess_sum) = gradients.sum(&node.rows);

            let split = if self.can_split(&node) {
                self.find_split(features, gradients, &node.rows, (grad_sum, hess_sum), allowed_features)
            } else {
                None
            };

            match split {
                Some(split) => {
                    let column = features.column(split.feature as usize);
                    let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = node
                        .rows
                        .iter()
                        .partition(|&&r| column[r] < split.threshold);
                    debug_assert_eq!(left_rows.len(), split.count_left as usize);

                    let left = tree.add_node();
                    let right = tree.add_node();
                    tree.set_numeric_split(node.id, split.feature, split.threshold, true, left, right);
                    tree.set_stats(node.id, split.gain, hess_sum as f32);

                    queue.push_back(PendingNode {
                        id: left,
                        rows: left_rows,
                        depth: node.depth + 1,
                    });
                    queue.push_back(PendingNode {
                        id: right,
                        rows: right_rows,
                        depth: node.depth + 1,
                    });
                }
                None => {
                    let weight = self.params.gain.compute_leaf_weight(grad_sum, hess_sum)
                        * self.params.learning_rate;
                    tree.make_leaf(node.id, weight);
                    tree.set_stats(node.id, 0.0, hess_sum as f32);
                }
            }
        }

        tree.freeze()
    }

    fn can_split(&self, node: &PendingNode) -> bool {
        let min_rows = 2 * self.params.gain.min_samples_leaf.max(1) as usize;
        node.depth < self.params.max_depth && node.rows.len() >= min_rows
    }

    fn find_split(
        &self,
        features: ArrayView2<f32>,
        gradients: &Gradients,
        rows: &[usize],
        parent: (f64, f64),
        allowed_features: &[u32],
    ) -> Option<SplitInfo> {
        let gain = &self.params.gain;
        let candidates = self.parallelism.maybe_par_map(allowed_features, |&feature| {
            let mut scratch = Vec::with_capacity(rows.len());
            find_best_split_for_feature(features, feature, rows, gradients, parent, gain, &mut scratch)
        });
        select_best(candidates)
    }
}
