//! Mutable tree used while growing.
//!
//! Nodes are allocated on demand and filled in as the grower decides whether
//! they become splits or leaves. [`MutableTree::freeze`] produces the
//! immutable [`Tree`].

use super::{NodeId, Tree};

/// Growable tree storage with the same SoA layout as [`Tree`].
#[derive(Debug, Clone, Default)]
pub struct MutableTree {
    split_indices: Vec<u32>,
    split_thresholds: Vec<f32>,
    left_children: Vec<u32>,
    right_children: Vec<u32>,
    default_left: Vec<bool>,
    is_leaf: Vec<bool>,
    leaf_values: Vec<f32>,
    gains: Vec<f32>,
    covers: Vec<f32>,
}

impl MutableTree {
    /// Create an empty tree with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            split_indices: Vec::with_capacity(capacity),
            split_thresholds: Vec::with_capacity(capacity),
            left_children: Vec::with_capacity(capacity),
            right_children: Vec::with_capacity(capacity),
            default_left: Vec::with_capacity(capacity),
            is_leaf: Vec::with_capacity(capacity),
            leaf_values: Vec::with_capacity(capacity),
            gains: Vec::with_capacity(capacity),
            covers: Vec::with_capacity(capacity),
        }
    }

    /// Number of allocated nodes.
    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.is_leaf.len()
    }

    /// Allocate a new node (initialized as a zero-valued leaf) and return its id.
    pub fn add_node(&mut self) -> NodeId {
        let id = self.n_nodes() as NodeId;
        self.split_indices.push(0);
        self.split_thresholds.push(0.0);
        self.left_children.push(0);
        self.right_children.push(0);
        self.default_left.push(true);
        self.is_leaf.push(true);
        self.leaf_values.push(0.0);
        self.gains.push(0.0);
        self.covers.push(0.0);
        id
    }

    /// Turn `node` into a numeric split `value < threshold -> left`.
    pub fn set_numeric_split(
        &mut self,
        node: NodeId,
        feature: u32,
        threshold: f32,
        default_left: bool,
        left: NodeId,
        right: NodeId,
    ) {
        let i = node as usize;
        self.split_indices[i] = feature;
        self.split_thresholds[i] = threshold;
        self.default_left[i] = default_left;
        self.left_children[i] = left;
        self.right_children[i] = right;
        self.is_leaf[i] = false;
        self.leaf_values[i] = 0.0;
    }

    /// Turn `node` into a leaf with the given value.
    pub fn make_leaf(&mut self, node: NodeId, value: f32) {
        let i = node as usize;
        self.is_leaf[i] = true;
        self.leaf_values[i] = value;
        self.gains[i] = 0.0;
    }

    /// Record split gain and cover for `node`.
    pub fn set_stats(&mut self, node: NodeId, gain: f32, cover: f32) {
        let i = node as usize;
        self.gains[i] = gain;
        self.covers[i] = cover;
    }

    /// Current leaf value of `node`.
    #[inline]
    pub fn leaf_value(&self, node: NodeId) -> f32 {
        self.leaf_values[node as usize]
    }

    /// Finish construction.
    pub fn freeze(self) -> Tree {
        Tree::new(
            self.split_indices,
            self.split_thresholds,
            self.left_children,
            self.right_children,
            self.default_left,
            self.is_leaf,
            self.leaf_values,
        )
        .with_gains(self.gains)
        .with_covers(self.covers)
    }
}
