//! Deletion: descent, underflow repair by redistribution or merge.

use super::node::{Entry, Node, NodeId};
use super::tree::{BPlusTree, PathStep};
use alloc::vec::Vec;
use leafchain_core::Key;

impl<V> BPlusTree<V> {
    /// Removes the first entry with the given key.
    ///
    /// Returns `None` if the key is not present; the tree is left untouched.
    pub fn delete(&mut self, key: Key) -> Option<Entry<V>> {
        let (descent, pos) = self.locate(key)?;
        let mut path = descent.path;
        let leaf_id = descent.leaf;

        let (key, value) = self.leaf_mut(leaf_id).remove_at(pos);
        self.len -= 1;

        // A root leaf has no minimum and may become empty.
        if leaf_id != self.root && self.leaf(leaf_id).len() < self.config.min_leaf_keys() {
            self.rebalance(&mut path, leaf_id);
        }

        Some(Entry { key, value })
    }

    /// Removes one entry for each of two keys, one after the other.
    ///
    /// Passing the same key twice removes two of its duplicates.
    pub fn delete_pair(&mut self, key1: Key, key2: Key) -> (Option<Entry<V>>, Option<Entry<V>>) {
        let first = self.delete(key1);
        let second = self.delete(key2);
        (first, second)
    }

    /// Repairs an underflowed non-root node using its parent from `path`.
    fn rebalance(&mut self, path: &mut Vec<PathStep>, node_id: NodeId) {
        let Some((parent_id, pos)) = path.pop() else {
            return;
        };

        let min_keys = self.config.min_keys(self.arena[node_id].is_leaf());
        let children = &self.index(parent_id).children;
        let left_id = pos.checked_sub(1).map(|p| children[p]);
        let right_id = children.get(pos + 1).copied();

        // Try to borrow from left sibling
        if let Some(left_id) = left_id {
            if self.arena[left_id].key_count() > min_keys {
                self.borrow_from_left(node_id, left_id, parent_id, pos);
                return;
            }
        }

        // Try to borrow from right sibling
        if let Some(right_id) = right_id {
            if self.arena[right_id].key_count() > min_keys {
                self.borrow_from_right(node_id, right_id, parent_id, pos);
                return;
            }
        }

        match (left_id, right_id) {
            (Some(left_id), _) => self.merge_nodes(left_id, node_id, parent_id, pos - 1),
            (None, Some(right_id)) => self.merge_nodes(node_id, right_id, parent_id, pos),
            (None, None) => unreachable!("index node {} has a single child", parent_id),
        }

        let parent_keys = self.index(parent_id).keys.len();
        if parent_id == self.root {
            if parent_keys == 0 {
                let child = self.index(parent_id).children[0];
                self.release(parent_id);
                self.root = child;
                tracing::debug!(root = child, height = self.height(), "root collapsed");
            }
        } else if parent_keys < self.config.min_index_keys() {
            self.rebalance(path, parent_id);
        }
    }

    /// Moves the last entry of the left sibling into `node_id`.
    fn borrow_from_left(&mut self, node_id: NodeId, left_id: NodeId, parent_id: NodeId, pos: usize) {
        if self.arena[node_id].is_leaf() {
            let (key, value) = self
                .leaf_mut(left_id)
                .pop()
                .unwrap_or_else(|| unreachable!("borrow from empty leaf {}", left_id));
            self.leaf_mut(node_id).insert_at(0, key, value);

            // The moved key is the new lower bound of node_id.
            self.index_mut(parent_id).keys[pos - 1] = key;
        } else {
            // Rotate: separator comes down, left's last key goes up.
            let separator = self.index(parent_id).keys[pos - 1];
            let left = self.index_mut(left_id);
            let (left_key, left_child) = match (left.keys.pop(), left.children.pop()) {
                (Some(key), Some(child)) => (key, child),
                _ => unreachable!("borrow from empty index node {}", left_id),
            };

            let node = self.index_mut(node_id);
            node.keys.insert(0, separator);
            node.children.insert(0, left_child);
            self.index_mut(parent_id).keys[pos - 1] = left_key;
        }

        tracing::trace!(node = node_id, sibling = left_id, "redistributed from left");
    }

    /// Moves the first entry of the right sibling into `node_id`.
    fn borrow_from_right(&mut self, node_id: NodeId, right_id: NodeId, parent_id: NodeId, pos: usize) {
        if self.arena[node_id].is_leaf() {
            let (key, value) = self.leaf_mut(right_id).remove_at(0);
            self.leaf_mut(node_id).push(key, value);

            let separator = self.leaf(right_id).keys[0];
            self.index_mut(parent_id).keys[pos] = separator;
        } else {
            let separator = self.index(parent_id).keys[pos];
            let right = self.index_mut(right_id);
            let right_key = right.keys.remove(0);
            let right_child = right.children.remove(0);

            let node = self.index_mut(node_id);
            node.keys.push(separator);
            node.children.push(right_child);
            self.index_mut(parent_id).keys[pos] = right_key;
        }

        tracing::trace!(node = node_id, sibling = right_id, "redistributed from right");
    }

    /// Folds `right_id` into `left_id` and drops separator `pos` from the parent.
    fn merge_nodes(&mut self, left_id: NodeId, right_id: NodeId, parent_id: NodeId, pos: usize) {
        let (separator, removed) = self.index_mut(parent_id).remove_child_at(pos);
        debug_assert_eq!(removed, right_id);

        match self.release(right_id) {
            // Splices right_id out of the leaf chain.
            Node::Leaf(right) => self.leaf_mut(left_id).absorb(right),
            Node::Index(right) => {
                let left = self.index_mut(left_id);
                left.keys.push(separator);
                left.keys.extend(right.keys);
                left.children.extend(right.children);
            }
        }

        tracing::trace!(left = left_id, right = right_id, "merged nodes");
    }
}
