//! Insertion: descent, leaf split with copy-up, index split with push-up.

use super::node::{IndexNode, Node, NodeId};
use super::tree::{BPlusTree, PathStep, Route};
use alloc::vec;
use alloc::vec::Vec;
use leafchain_core::Key;

impl<V> BPlusTree<V> {
    /// Inserts a key-value pair.
    ///
    /// Duplicate keys are kept: the new entry lands after every existing
    /// entry with the same key, so equal keys read back in insertion order.
    pub fn insert(&mut self, key: Key, value: V) {
        let descent = self.descend(key, Route::Insert);
        let mut path = descent.path;
        let leaf_id = descent.leaf;

        let leaf = self.leaf_mut(leaf_id);
        let pos = leaf.upper_bound(key);
        leaf.insert_at(pos, key, Some(value));
        self.len += 1;

        if self.leaf(leaf_id).len() > self.config.max_keys() {
            let (separator, right_id) = self.split_leaf(leaf_id);
            self.insert_into_parent(&mut path, leaf_id, separator, right_id);
        }
    }

    /// Splits an overfull leaf. Returns the copied-up separator and the new right leaf.
    fn split_leaf(&mut self, leaf_id: NodeId) -> (Key, NodeId) {
        let leaf = self.leaf_mut(leaf_id);
        // Left keeps the extra entry on odd counts.
        let mid = (leaf.len() + 1) / 2;
        let right = leaf.split_off(mid);
        let separator = right.keys[0];

        let right_id = self.alloc(Node::Leaf(right));
        self.leaf_mut(leaf_id).next = Some(right_id);

        tracing::trace!(leaf = leaf_id, right = right_id, separator, "split leaf");
        (separator, right_id)
    }

    /// Splits an overfull index node. Returns the pushed-up key and the new right node.
    fn split_index(&mut self, node_id: NodeId) -> (Key, NodeId) {
        let node = self.index_mut(node_id);
        let mid = node.keys.len() / 2;

        let keys = node.keys.split_off(mid + 1);
        let children = node.children.split_off(mid + 1);
        let pushed = node.keys.pop().unwrap_or_else(|| unreachable!("index split of empty node"));

        let right_id = self.alloc(Node::Index(IndexNode::from_parts(keys, children)));

        tracing::trace!(node = node_id, right = right_id, pushed, "split index node");
        (pushed, right_id)
    }

    /// Hooks `right` in next to `left` in the parent taken from `path`,
    /// splitting upward while nodes overflow.
    fn insert_into_parent(
        &mut self,
        path: &mut Vec<PathStep>,
        left_id: NodeId,
        key: Key,
        right_id: NodeId,
    ) {
        match path.pop() {
            None => {
                // The root split: grow by one level.
                let new_root = IndexNode::from_parts(vec![key], vec![left_id, right_id]);
                self.root = self.alloc(Node::Index(new_root));
                tracing::debug!(root = self.root, height = self.height(), "root split");
            }
            Some((parent_id, pos)) => {
                let max_keys = self.config.max_keys();
                let parent = self.index_mut(parent_id);
                parent.insert_child_at(pos, key, right_id);

                if parent.keys.len() > max_keys {
                    let (pushed, new_right) = self.split_index(parent_id);
                    self.insert_into_parent(path, parent_id, pushed, new_right);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tree::tests::{chain_keys, tree_with};
    use super::*;

    #[test]
    fn test_insert_into_empty_tree() {
        let tree = tree_with(4, [42]);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.height(), 0);
        assert_eq!(chain_keys(&tree), vec![vec![42]]);
    }

    #[test]
    fn test_insert_unsorted() {
        let tree = tree_with(4, [50, 10, 40, 20, 30]);
        assert_eq!(chain_keys(&tree).concat(), vec![10, 20, 30, 40, 50]);
        tree.validate().unwrap();
    }

    #[test]
    fn test_leaf_split_copies_up() {
        let tree = tree_with(3, [1, 2, 3]);
        // Left keeps two entries, the right leaf's first key is copied up.
        assert_eq!(chain_keys(&tree), vec![vec![1, 2], vec![3]]);
        assert_eq!(tree.node(tree.root()).keys(), &[3]);
    }

    #[test]
    fn test_index_split_pushes_up() {
        let tree = tree_with(3, 1..=7);
        // Height 2: the root key is pushed up and appears in no child index node.
        assert_eq!(tree.height(), 2);
        let root = tree.node(tree.root());
        assert_eq!(root.key_count(), 1);
        let pushed = root.keys()[0];
        for &child in root.children() {
            assert!(!tree.node(child).keys().contains(&pushed));
        }
        tree.validate().unwrap();
    }

    #[test]
    fn test_root_split_grows_height_by_one() {
        let mut tree = BPlusTree::with_degree(4).unwrap();
        let mut height = 0;
        for key in 0..500 {
            tree.insert(key, ());
            let now = tree.height();
            assert!(now == height || now == height + 1);
            height = now;
        }
        tree.validate().unwrap();
    }

    #[test]
    fn test_duplicates_keep_insertion_order() {
        let mut tree = BPlusTree::with_degree(3).unwrap();
        for i in 0..10u32 {
            tree.insert(7, i);
        }
        tree.insert(1, 100);
        tree.insert(9, 200);

        let values: Vec<u32> = tree.get_all(7).into_iter().flatten().copied().collect();
        assert_eq!(values, (0..10).collect::<Vec<_>>());
        assert_eq!(tree.len(), 12);
        tree.validate().unwrap();
    }

    #[test]
    fn test_insert_reverse_order() {
        let tree = tree_with(5, (0..200).rev());
        assert_eq!(chain_keys(&tree).concat(), (0..200).collect::<Vec<_>>());
        tree.validate().unwrap();
    }
}
