//! Canonical tree representation (SoA).
//!
//! - [`Tree`]: immutable SoA storage for traversal
//! - [`SampleAccessor`]: feature lookup for a single sample
//! - [`TreeValidationError`]: structural validation errors
//!
//! For construction during training, see [`super::MutableTree`].

#![allow(clippy::too_many_arguments)]

use ndarray::ArrayView1;

use super::NodeId;

// ============================================================================
// SampleAccessor
// ============================================================================

/// Feature values of a single sample.
pub trait SampleAccessor {
    /// Get the feature value at the given index.
    ///
    /// Returns `f32::NAN` for missing values.
    fn feature(&self, index: usize) -> f32;

    /// Number of features in this sample.
    fn n_features(&self) -> usize;
}

impl SampleAccessor for [f32] {
    #[inline]
    fn feature(&self, index: usize) -> f32 {
        self.get(index).copied().unwrap_or(f32::NAN)
    }

    #[inline]
    fn n_features(&self) -> usize {
        self.len()
    }
}

impl<const N: usize> SampleAccessor for [f32; N] {
    #[inline]
    fn feature(&self, index: usize) -> f32 {
        self.as_slice().feature(index)
    }

    #[inline]
    fn n_features(&self) -> usize {
        N
    }
}

impl SampleAccessor for ArrayView1<'_, f32> {
    #[inline]
    fn feature(&self, index: usize) -> f32 {
        self.get(index).copied().unwrap_or(f32::NAN)
    }

    #[inline]
    fn n_features(&self) -> usize {
        self.len()
    }
}

// ============================================================================
// TreeValidationError
// ============================================================================

/// Structural validation errors for [`Tree`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeValidationError {
    #[error("tree has no nodes")]
    EmptyTree,

    #[error("node {node} has {side} child {child} outside of {n_nodes} nodes")]
    ChildOutOfBounds {
        node: NodeId,
        side: &'static str,
        child: NodeId,
        n_nodes: usize,
    },

    #[error("node {node} references itself as a child")]
    SelfLoop { node: NodeId },

    #[error("node {node} is reachable through more than one path")]
    DuplicateVisit { node: NodeId },

    #[error("cycle detected at node {node}")]
    CycleDetected { node: NodeId },

    #[error("node {node} is unreachable from the root")]
    UnreachableNode { node: NodeId },

    #[error("array {field} has length {len}, expected {n_nodes}")]
    LenMismatch {
        field: &'static str,
        len: usize,
        n_nodes: usize,
    },
}

// ============================================================================
// Tree
// ============================================================================

/// Structure-of-Arrays regression tree.
///
/// Child indices are local to this tree (0 = root). Numeric splits send a
/// sample left when `value < threshold`; missing values (NaN) follow the
/// node's default direction.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    split_indices: Box<[u32]>,
    split_thresholds: Box<[f32]>,
    left_children: Box<[u32]>,
    right_children: Box<[u32]>,
    default_left: Box<[bool]>,
    is_leaf: Box<[bool]>,
    leaf_values: Box<[f32]>,
    /// Optional gain at each split node (0 for leaves).
    gains: Option<Box<[f32]>>,
    /// Optional cover (hessian sum) at each node.
    covers: Option<Box<[f32]>>,
}

impl Tree {
    /// Create a new tree from parallel arrays.
    ///
    /// All arrays must have the same length (number of nodes); call
    /// [`validate`](Self::validate) on untrusted input.
    pub fn new(
        split_indices: Vec<u32>,
        split_thresholds: Vec<f32>,
        left_children: Vec<u32>,
        right_children: Vec<u32>,
        default_left: Vec<bool>,
        is_leaf: Vec<bool>,
        leaf_values: Vec<f32>,
    ) -> Self {
        Self {
            split_indices: split_indices.into_boxed_slice(),
            split_thresholds: split_thresholds.into_boxed_slice(),
            left_children: left_children.into_boxed_slice(),
            right_children: right_children.into_boxed_slice(),
            default_left: default_left.into_boxed_slice(),
            is_leaf: is_leaf.into_boxed_slice(),
            leaf_values: leaf_values.into_boxed_slice(),
            gains: None,
            covers: None,
        }
    }

    /// A tree with a single leaf.
    pub fn constant(value: f32) -> Self {
        Self::new(vec![0], vec![0.0], vec![0], vec![0], vec![true], vec![true], vec![value])
    }

    // =========================================================================
    // Node accessors
    // =========================================================================

    /// Number of nodes in the tree.
    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.is_leaf.len()
    }

    /// Number of leaves in the tree.
    pub fn n_leaves(&self) -> usize {
        self.is_leaf.iter().filter(|&&l| l).count()
    }

    #[inline]
    pub fn is_leaf(&self, node: NodeId) -> bool {
        self.is_leaf[node as usize]
    }

    #[inline]
    pub fn split_index(&self, node: NodeId) -> u32 {
        self.split_indices[node as usize]
    }

    #[inline]
    pub fn split_threshold(&self, node: NodeId) -> f32 {
        self.split_thresholds[node as usize]
    }

    #[inline]
    pub fn left_child(&self, node: NodeId) -> NodeId {
        self.left_children[node as usize]
    }

    #[inline]
    pub fn right_child(&self, node: NodeId) -> NodeId {
        self.right_children[node as usize]
    }

    #[inline]
    pub fn default_left(&self, node: NodeId) -> bool {
        self.default_left[node as usize]
    }

    #[inline]
    pub fn leaf_value(&self, node: NodeId) -> f32 {
        self.leaf_values[node as usize]
    }

    /// Raw SoA arrays, in node order. Used by serialization.
    pub(crate) fn arrays(&self) -> TreeArrays<'_> {
        TreeArrays {
            split_indices: &self.split_indices,
            split_thresholds: &self.split_thresholds,
            left_children: &self.left_children,
            right_children: &self.right_children,
            default_left: &self.default_left,
            is_leaf: &self.is_leaf,
            leaf_values: &self.leaf_values,
        }
    }

    /// Maximum depth of any leaf (a single-leaf tree has depth 0).
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(0 as NodeId, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            if self.is_leaf(node) {
                max_depth = max_depth.max(depth);
            } else {
                stack.push((self.left_child(node), depth + 1));
                stack.push((self.right_child(node), depth + 1));
            }
        }
        max_depth
    }

    // =========================================================================
    // Gains and covers
    // =========================================================================

    /// Set the gains for this tree (builder pattern).
    pub fn with_gains(mut self, gains: Vec<f32>) -> Self {
        debug_assert_eq!(gains.len(), self.n_nodes());
        self.gains = Some(gains.into_boxed_slice());
        self
    }

    /// Set the covers for this tree (builder pattern).
    pub fn with_covers(mut self, covers: Vec<f32>) -> Self {
        debug_assert_eq!(covers.len(), self.n_nodes());
        self.covers = Some(covers.into_boxed_slice());
        self
    }

    /// Leaf nodes have gain=0, split nodes have the loss reduction of their split.
    pub fn gains(&self) -> Option<&[f32]> {
        self.gains.as_deref()
    }

    /// Cover is the sum of hessians for training samples reaching each node.
    pub fn covers(&self) -> Option<&[f32]> {
        self.covers.as_deref()
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Validate basic structural invariants for this tree.
    pub fn validate(&self) -> Result<(), TreeValidationError> {
        let n_nodes = self.n_nodes();
        if n_nodes == 0 {
            return Err(TreeValidationError::EmptyTree);
        }

        let lens = [
            ("split_indices", self.split_indices.len()),
            ("split_thresholds", self.split_thresholds.len()),
            ("left_children", self.left_children.len()),
            ("right_children", self.right_children.len()),
            ("default_left", self.default_left.len()),
            ("leaf_values", self.leaf_values.len()),
        ];
        let optional = [
            ("gains", self.gains.as_ref().map(|g| g.len())),
            ("covers", self.covers.as_ref().map(|c| c.len())),
        ];
        let mismatch = lens
            .into_iter()
            .chain(optional.into_iter().filter_map(|(f, l)| l.map(|l| (f, l))))
            .find(|&(_, len)| len != n_nodes);
        if let Some((field, len)) = mismatch {
            return Err(TreeValidationError::LenMismatch { field, len, n_nodes });
        }

        // Iterative DFS with color marking: 0 = unvisited, 1 = visiting, 2 = done
        let mut color = vec![0u8; n_nodes];
        let mut stack: Vec<(NodeId, u8)> = vec![(0, 0)];

        while let Some((node, phase)) = stack.pop() {
            let idx = node as usize;
            if phase == 1 {
                color[idx] = 2;
                continue;
            }

            match color[idx] {
                1 => return Err(TreeValidationError::CycleDetected { node }),
                2 => return Err(TreeValidationError::DuplicateVisit { node }),
                _ => {}
            }
            color[idx] = 1;
            stack.push((node, 1));

            if self.is_leaf(node) {
                continue;
            }

            let left = self.left_child(node);
            let right = self.right_child(node);
            if left == node || right == node {
                return Err(TreeValidationError::SelfLoop { node });
            }
            for (side, child) in [("left", left), ("right", right)] {
                if child as usize >= n_nodes {
                    return Err(TreeValidationError::ChildOutOfBounds {
                        node,
                        side,
                        child,
                        n_nodes,
                    });
                }
            }
            stack.push((right, 0));
            stack.push((left, 0));
        }

        if let Some(i) = color.iter().position(|&c| c == 0) {
            return Err(TreeValidationError::UnreachableNode { node: i as NodeId });
        }

        Ok(())
    }

    // =========================================================================
    // Prediction
    // =========================================================================

    /// Traverse the tree to the leaf reached by `sample`.
    #[inline]
    pub fn traverse_to_leaf<S: SampleAccessor + ?Sized>(&self, sample: &S) -> NodeId {
        let mut node: NodeId = 0;
        while !self.is_leaf(node) {
            let fvalue = sample.feature(self.split_index(node) as usize);
            let go_left = if fvalue.is_nan() {
                self.default_left(node)
            } else {
                fvalue < self.split_threshold(node)
            };
            node = if go_left {
                self.left_child(node)
            } else {
                self.right_child(node)
            };
        }
        node
    }

    /// Leaf value for a single sample.
    #[inline]
    pub fn predict_row<S: SampleAccessor + ?Sized>(&self, sample: &S) -> f32 {
        self.leaf_value(self.traverse_to_leaf(sample))
    }
}

/// Borrowed SoA arrays of a [`Tree`].
pub(crate) struct TreeArrays<'a> {
    pub split_indices: &'a [u32],
    pub split_thresholds: &'a [f32],
    pub left_children: &'a [u32],
    pub right_children: &'a [u32],
    pub default_left: &'a [bool],
    pub is_leaf: &'a [bool],
    pub leaf_values: &'a [f32],
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;

    /// x0 < 0.5 -> 1.0; else (x1 < 0.3 -> 2.0; else 3.0)
    fn sample_tree() -> Tree {
        Tree::new(
            vec![0, 0, 1, 0, 0],
            vec![0.5, 0.0, 0.3, 0.0, 0.0],
            vec![1, 0, 3, 0, 0],
            vec![2, 0, 4, 0, 0],
            vec![true, true, false, true, true],
            vec![false, true, false, true, true],
            vec![0.0, 1.0, 0.0, 2.0, 3.0],
        )
    }

    #[test]
    fn traversal() {
        let tree = sample_tree();
        assert_eq!(tree.predict_row(&[0.3, 0.9]), 1.0);
        assert_eq!(tree.predict_row(&[0.7, 0.1]), 2.0);
        assert_eq!(tree.predict_row(&[0.7, 0.5]), 3.0);
        // threshold itself goes right
        assert_eq!(tree.predict_row(&[0.5, 0.3]), 3.0);
    }

    #[test]
    fn missing_values_follow_default_direction() {
        let tree = sample_tree();
        assert_eq!(tree.predict_row(&[f32::NAN, 0.0]), 1.0);
        // node 2 defaults right
        assert_eq!(tree.predict_row(&[0.9, f32::NAN]), 3.0);
    }

    #[test]
    fn ndarray_row_accessor() {
        let tree = sample_tree();
        let row = arr1(&[0.9f32, 0.1]);
        assert_eq!(tree.predict_row(&row.view()), 2.0);
    }

    #[test]
    fn shape_queries() {
        let tree = sample_tree();
        assert_eq!(tree.n_nodes(), 5);
        assert_eq!(tree.n_leaves(), 3);
        assert_eq!(tree.depth(), 2);
        assert_eq!(Tree::constant(1.5).depth(), 0);
        assert_eq!(Tree::constant(1.5).predict_row(&[9.0]), 1.5);
    }

    #[test]
    fn validate_ok() {
        assert_eq!(sample_tree().validate(), Ok(()));
        assert_eq!(Tree::constant(0.0).validate(), Ok(()));
    }

    #[test]
    fn validate_child_out_of_bounds() {
        let tree = Tree::new(
            vec![0, 0, 0],
            vec![0.5, 0.0, 0.0],
            vec![1, 0, 0],
            vec![7, 0, 0],
            vec![true; 3],
            vec![false, true, true],
            vec![0.0; 3],
        );
        assert!(matches!(
            tree.validate(),
            Err(TreeValidationError::ChildOutOfBounds { side: "right", child: 7, .. })
        ));
    }

    #[test]
    fn validate_self_loop_and_unreachable() {
        let looped = Tree::new(
            vec![0, 0],
            vec![0.5, 0.0],
            vec![0, 0],
            vec![1, 0],
            vec![true; 2],
            vec![false, true],
            vec![0.0; 2],
        );
        assert_eq!(looped.validate(), Err(TreeValidationError::SelfLoop { node: 0 }));

        let orphan = Tree::new(
            vec![0, 0],
            vec![0.0, 0.0],
            vec![0, 0],
            vec![0, 0],
            vec![true; 2],
            vec![true, true],
            vec![1.0, 2.0],
        );
        assert_eq!(orphan.validate(), Err(TreeValidationError::UnreachableNode { node: 1 }));
    }

    #[test]
    fn validate_len_mismatch() {
        let tree = sample_tree().with_gains(vec![0.0; 5]);
        assert_eq!(tree.validate(), Ok(()));

        let bad = Tree::new(
            vec![0],
            vec![0.0],
            vec![0],
            vec![0],
            vec![true],
            vec![true],
            vec![],
        );
        assert!(matches!(
            bad.validate(),
            Err(TreeValidationError::LenMismatch { field: "leaf_values", .. })
        ));
    }
}
