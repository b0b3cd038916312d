//! Structural invariant checks.
//!
//! A failed check means the tree is corrupt, which is a bug in the engine or
//! a bad bulk-load image, never an expected runtime condition.

use crate::btree::{BPlusTree, Node, NodeId};
use alloc::format;
use alloc::vec::Vec;
use hashbrown::HashSet;
use leafchain_core::{Error, Key, Result};

/// State gathered while walking the tree.
#[derive(Default)]
struct Walk {
    visited: HashSet<NodeId>,
    leaves: Vec<NodeId>,
    leaf_depth: Option<usize>,
    entries: usize,
}

impl<V> BPlusTree<V> {
    /// Checks every structural invariant of the tree.
    ///
    /// - each node is owned by exactly one parent
    /// - non-root nodes hold between the minimum and maximum number of keys
    /// - keys are non-decreasing within a node and inside their separator bounds
    /// - index nodes have one more child than keys; leaves one value per key
    /// - all leaves are at the same depth
    /// - the leaf chain visits every leaf left to right with keys in order
    pub fn validate(&self) -> Result<()> {
        let mut walk = Walk::default();
        self.check_node(self.root, 0, None, None, &mut walk)?;

        if walk.entries != self.len {
            return Err(Error::invariant_violation(format!(
                "tree reports {} entries, leaves hold {}",
                self.len, walk.entries
            )));
        }

        self.check_chain(&walk.leaves)
    }

    fn check_node(
        &self,
        id: NodeId,
        depth: usize,
        lower: Option<Key>,
        upper: Option<Key>,
        walk: &mut Walk,
    ) -> Result<()> {
        if !walk.visited.insert(id) {
            return Err(Error::invariant_violation(format!(
                "node {} is reachable more than once",
                id
            )));
        }

        let node = self.node(id);
        let keys = node.keys();
        let is_root = id == self.root;

        if keys.len() > self.config.max_keys() {
            return Err(Error::invariant_violation(format!(
                "node {} holds {} keys, max is {}",
                id,
                keys.len(),
                self.config.max_keys()
            )));
        }

        let min_keys = self.config.min_keys(node.is_leaf());
        if !is_root && keys.len() < min_keys {
            return Err(Error::invariant_violation(format!(
                "node {} holds {} keys, min is {}",
                id,
                keys.len(),
                min_keys
            )));
        }

        if keys.windows(2).any(|pair| pair[0] > pair[1]) {
            return Err(Error::invariant_violation(format!(
                "keys of node {} are out of order",
                id
            )));
        }

        // Keys are sorted, so checking both ends covers the node.
        if let (Some(lower), Some(&first)) = (lower, keys.first()) {
            if first < lower {
                return Err(Error::invariant_violation(format!(
                    "node {} has key {} below its lower bound {}",
                    id, first, lower
                )));
            }
        }
        if let (Some(upper), Some(&last)) = (upper, keys.last()) {
            if last > upper {
                return Err(Error::invariant_violation(format!(
                    "node {} has key {} above its upper bound {}",
                    id, last, upper
                )));
            }
        }

        match node {
            Node::Leaf(leaf) => {
                if leaf.values().len() != keys.len() {
                    return Err(Error::invariant_violation(format!(
                        "leaf {} has {} keys but {} values",
                        id,
                        keys.len(),
                        leaf.values().len()
                    )));
                }

                match walk.leaf_depth {
                    None => walk.leaf_depth = Some(depth),
                    Some(expected) if expected != depth => {
                        return Err(Error::invariant_violation(format!(
                            "leaf {} is at depth {}, expected {}",
                            id, depth, expected
                        )));
                    }
                    Some(_) => {}
                }

                walk.leaves.push(id);
                walk.entries += leaf.len();
            }
            Node::Index(index) => {
                if keys.is_empty() {
                    return Err(Error::invariant_violation(format!(
                        "index node {} has no keys",
                        id
                    )));
                }
                if index.children().len() != keys.len() + 1 {
                    return Err(Error::invariant_violation(format!(
                        "index node {} has {} keys but {} children",
                        id,
                        keys.len(),
                        index.children().len()
                    )));
                }

                for (i, &child) in index.children().iter().enumerate() {
                    let child_lower = if i == 0 { lower } else { Some(keys[i - 1]) };
                    let child_upper = if i == keys.len() { upper } else { Some(keys[i]) };
                    self.check_node(child, depth + 1, child_lower, child_upper, walk)?;
                }
            }
        }

        Ok(())
    }

    fn check_chain(&self, leaves: &[NodeId]) -> Result<()> {
        let mut current = Some(self.leftmost_leaf());
        let mut previous: Option<Key> = None;

        for &expected in leaves {
            if current != Some(expected) {
                return Err(Error::invariant_violation(format!(
                    "leaf chain reaches {:?}, expected leaf {}",
                    current, expected
                )));
            }

            let leaf = self.leaf(expected);
            for &key in leaf.keys() {
                if previous.is_some_and(|prev| key < prev) {
                    return Err(Error::invariant_violation(format!(
                        "leaf chain key {} follows larger key {:?}",
                        key, previous
                    )));
                }
                previous = Some(key);
            }
            current = leaf.next();
        }

        if let Some(id) = current {
            return Err(Error::invariant_violation(format!(
                "leaf chain continues past the rightmost leaf to {}",
                id
            )));
        }

        Ok(())
    }
}
