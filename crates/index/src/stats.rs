//! Tree statistics.
//!
//! Computed on demand by walking the tree; nothing is tracked incrementally.

use crate::btree::{BPlusTree, Node};
use core::fmt;

/// A snapshot of the shape of a tree.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeStats {
    /// Total number of nodes.
    pub node_count: usize,
    /// Number of leaf nodes.
    pub leaf_count: usize,
    /// Number of index nodes.
    pub index_count: usize,
    /// Entries stored in leaves.
    pub data_entries: usize,
    /// Separator keys stored in index nodes.
    pub index_entries: usize,
    /// Root-to-leaf edge count.
    pub height: usize,
    /// Mean of `keys / max_keys` over all nodes.
    pub average_fill_factor: f64,
    /// Lowest fill factor of any non-root node, `None` for a single-node tree.
    pub min_fill_factor: Option<f64>,
}

impl TreeStats {
    /// Walks `tree` and collects its statistics.
    pub fn collect<V>(tree: &BPlusTree<V>) -> Self {
        let max_keys = tree.config().max_keys() as f64;
        let mut stats = Self {
            node_count: 0,
            leaf_count: 0,
            index_count: 0,
            data_entries: 0,
            index_entries: 0,
            height: tree.height(),
            average_fill_factor: 0.0,
            min_fill_factor: None,
        };

        let mut fill_sum = 0.0;
        let mut stack = alloc::vec![tree.root()];
        while let Some(id) = stack.pop() {
            let node = tree.node(id);
            let fill = node.key_count() as f64 / max_keys;

            stats.node_count += 1;
            fill_sum += fill;
            if id != tree.root() {
                stats.min_fill_factor = Some(match stats.min_fill_factor {
                    Some(min) if min <= fill => min,
                    _ => fill,
                });
            }

            match node {
                Node::Leaf(leaf) => {
                    stats.leaf_count += 1;
                    stats.data_entries += leaf.len();
                }
                Node::Index(index) => {
                    stats.index_count += 1;
                    stats.index_entries += index.keys().len();
                    stack.extend_from_slice(index.children());
                }
            }
        }

        stats.average_fill_factor = fill_sum / stats.node_count as f64;
        stats
    }
}

impl fmt::Display for TreeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total number of nodes: {}", self.node_count)?;
        writeln!(f, "Total number of data entries: {}", self.data_entries)?;
        writeln!(f, "Total number of index entries: {}", self.index_entries)?;
        writeln!(f, "Average fill factor: {:.3}", self.average_fill_factor)?;
        match self.min_fill_factor {
            Some(min) => writeln!(f, "Minimum fill factor: {:.3}", min)?,
            None => writeln!(f, "Minimum fill factor: n/a")?,
        }
        write!(f, "Height of tree: {}", self.height)
    }
}

impl<V> BPlusTree<V> {
    /// Collects statistics for this tree.
    pub fn stats(&self) -> TreeStats {
        TreeStats::collect(self)
    }
}
