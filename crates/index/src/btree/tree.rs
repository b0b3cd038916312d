//! B+Tree implementation.

use super::node::{IndexNode, LeafNode, Node, NodeId};
use alloc::vec::Vec;
use leafchain_core::{Key, Result, TreeConfig};

/// One step of a top-down walk: an index node and the child index taken.
pub(crate) type PathStep = (NodeId, usize);

/// The index nodes passed on the way down, and the leaf reached.
///
/// Nodes carry no parent pointer, so anything that restructures upward
/// works from this path.
#[derive(Clone, Debug)]
pub(crate) struct Descent {
    pub(crate) path: Vec<PathStep>,
    pub(crate) leaf: NodeId,
}

/// How a descent picks a child at each index node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Route {
    /// A key equal to a separator routes right, past every existing duplicate.
    Insert,
    /// A key equal to a separator routes left, towards the first duplicate.
    Lookup,
}

/// An in-memory B+Tree mapping integer keys to values.
///
/// Nodes live in an arena and reference each other by [`NodeId`]. Index
/// nodes own their children; the leaf `next` links are plain IDs used for
/// ordered traversal only.
#[derive(Clone, Debug)]
pub struct BPlusTree<V> {
    /// Arena of all nodes, including released slots.
    pub(crate) arena: Vec<Node<V>>,
    /// Released slots available for reuse.
    pub(crate) free: Vec<NodeId>,
    /// Root node ID.
    pub(crate) root: NodeId,
    /// Capacity configuration.
    pub(crate) config: TreeConfig,
    /// Number of leaf entries.
    pub(crate) len: usize,
}

impl<V> BPlusTree<V> {
    /// Creates an empty tree: a single empty root leaf.
    pub fn new(config: TreeConfig) -> Self {
        let mut arena = Vec::new();
        arena.push(Node::Leaf(LeafNode::new()));
        Self {
            arena,
            free: Vec::new(),
            root: 0,
            config,
            len: 0,
        }
    }

    /// Creates an empty tree with the given degree.
    pub fn with_degree(degree: usize) -> Result<Self> {
        Ok(Self::new(TreeConfig::new(degree)?))
    }

    /// Returns the capacity configuration.
    pub fn config(&self) -> TreeConfig {
        self.config
    }

    /// Returns the degree.
    pub fn degree(&self) -> usize {
        self.config.degree()
    }

    /// Returns the number of entries stored in the leaves.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the root node ID.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the node with the given ID.
    ///
    /// `id` must come from this tree: [`root`](Self::root), a node's
    /// `children()` or `next()`, or a search result. Any other ID may name a
    /// released slot, which reads as an empty leaf.
    ///
    /// # Panics
    ///
    /// Panics if `id` is outside the arena. Use [`get_node`](Self::get_node)
    /// for IDs of unknown origin.
    pub fn node(&self, id: NodeId) -> &Node<V> {
        &self.arena[id]
    }

    /// Returns the node with the given ID, or `None` if the ID is out of
    /// range or names a released slot.
    pub fn get_node(&self, id: NodeId) -> Option<&Node<V>> {
        if self.free.contains(&id) {
            return None;
        }
        self.arena.get(id)
    }

    /// Root-to-leaf edge count. A lone root leaf has height 0.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut current = self.root;
        while let Node::Index(index) = &self.arena[current] {
            current = index.children[0];
            height += 1;
        }
        height
    }

    /// Returns the leftmost leaf, the head of the leaf chain.
    pub fn leftmost_leaf(&self) -> NodeId {
        let mut current = self.root;
        while let Node::Index(index) = &self.arena[current] {
            current = index.children[0];
        }
        current
    }

    /// Returns the rightmost leaf.
    pub fn rightmost_leaf(&self) -> NodeId {
        let mut current = self.root;
        while let Node::Index(index) = &self.arena[current] {
            current = index.children[index.children.len() - 1];
        }
        current
    }

    /// Drops every entry, leaving a single empty root leaf.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.free.clear();
        self.arena.push(Node::Leaf(LeafNode::new()));
        self.root = 0;
        self.len = 0;
    }

    /// Allocates a node, reusing a released slot if one is available.
    pub(crate) fn alloc(&mut self, node: Node<V>) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.arena[id] = node;
                id
            }
            None => {
                self.arena.push(node);
                self.arena.len() - 1
            }
        }
    }

    /// Takes a node out of the tree and marks its slot reusable.
    pub(crate) fn release(&mut self, id: NodeId) -> Node<V> {
        let node = core::mem::replace(&mut self.arena[id], Node::Leaf(LeafNode::new()));
        self.free.push(id);
        node
    }

    pub(crate) fn leaf(&self, id: NodeId) -> &LeafNode<V> {
        match &self.arena[id] {
            Node::Leaf(leaf) => leaf,
            Node::Index(_) => unreachable!("node {} is not a leaf", id),
        }
    }

    pub(crate) fn leaf_mut(&mut self, id: NodeId) -> &mut LeafNode<V> {
        match &mut self.arena[id] {
            Node::Leaf(leaf) => leaf,
            Node::Index(_) => unreachable!("node {} is not a leaf", id),
        }
    }

    pub(crate) fn index(&self, id: NodeId) -> &IndexNode {
        match &self.arena[id] {
            Node::Index(index) => index,
            Node::Leaf(_) => unreachable!("node {} is not an index node", id),
        }
    }

    pub(crate) fn index_mut(&mut self, id: NodeId) -> &mut IndexNode {
        match &mut self.arena[id] {
            Node::Index(index) => index,
            Node::Leaf(_) => unreachable!("node {} is not an index node", id),
        }
    }

    /// Walks from the root to a leaf, recording the child taken at each level.
    pub(crate) fn descend(&self, key: Key, route: Route) -> Descent {
        let mut path = Vec::new();
        let mut current = self.root;

        while let Node::Index(index) = &self.arena[current] {
            let pos = match route {
                Route::Insert => index.child_for_insert(key),
                Route::Lookup => index.child_for_lookup(key),
            };
            path.push((current, pos));
            current = index.children[pos];
        }

        Descent {
            path,
            leaf: current,
        }
    }

    /// Moves a descent to the next leaf in key order, or `None` past the last leaf.
    pub(crate) fn next_descent(&self, descent: &Descent) -> Option<Descent> {
        let mut path = descent.path.clone();

        while let Some((parent, pos)) = path.pop() {
            let index = self.index(parent);
            if pos + 1 < index.children.len() {
                path.push((parent, pos + 1));
                let mut current = index.children[pos + 1];
                while let Node::Index(child) = &self.arena[current] {
                    path.push((current, 0));
                    current = child.children[0];
                }
                return Some(Descent {
                    path,
                    leaf: current,
                });
            }
        }

        None
    }

    /// Finds the first entry equal to `key`, with the path leading to its leaf.
    pub(crate) fn locate(&self, key: Key) -> Option<(Descent, usize)> {
        let mut descent = self.descend(key, Route::Lookup);

        loop {
            let leaf = self.leaf(descent.leaf);
            let pos = leaf.lower_bound(key);
            if pos < leaf.len() {
                return (leaf.keys[pos] == key).then_some((descent, pos));
            }
            // Everything in this leaf is smaller; the run may start in the next one.
            descent = self.next_descent(&descent)?;
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use alloc::vec;

    /// Reads the leaf chain left to right, one key vector per leaf.
    pub(crate) fn chain_keys<V>(tree: &BPlusTree<V>) -> Vec<Vec<Key>> {
        let mut leaves = Vec::new();
        let mut current = Some(tree.leftmost_leaf());
        while let Some(id) = current {
            let leaf = tree.leaf(id);
            leaves.push(leaf.keys().to_vec());
            current = leaf.next();
        }
        leaves
    }

    /// Builds a tree with the given degree holding `keys`, value = key * 10.
    pub(crate) fn tree_with(degree: usize, keys: impl IntoIterator<Item = Key>) -> BPlusTree<Key> {
        let mut tree = BPlusTree::with_degree(degree).unwrap();
        for key in keys {
            tree.insert(key, key * 10);
        }
        tree
    }

    #[test]
    fn test_btree_new() {
        let tree: BPlusTree<u64> = BPlusTree::with_degree(5).unwrap();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.height(), 0);
        assert!(tree.node(tree.root()).is_leaf());
    }

    #[test]
    fn test_btree_rejects_small_degree() {
        assert!(BPlusTree::<u64>::with_degree(1).is_err());
        assert!(BPlusTree::<u64>::with_degree(0).is_err());
    }

    #[test]
    fn test_scenario_insert_in_order() {
        let mut tree = tree_with(4, 1..=4);
        assert_eq!(tree.height(), 1);
        assert_eq!(tree.node(tree.root()).keys(), &[3]);
        assert_eq!(chain_keys(&tree), vec![vec![1, 2], vec![3, 4]]);

        for key in 5..=7 {
            tree.insert(key, key * 10);
        }
        assert_eq!(tree.height(), 1);
        assert_eq!(tree.node(tree.root()).keys(), &[3, 5]);
        assert_eq!(chain_keys(&tree), vec![vec![1, 2], vec![3, 4], vec![5, 6, 7]]);
        tree.validate().unwrap();
    }

    #[test]
    fn test_scenario_delete_redistributes() {
        let mut tree = tree_with(4, 1..=7);
        let removed = tree.delete(4).unwrap();
        assert_eq!(removed.key, 4);
        assert_eq!(removed.value, Some(40));

        // [3] underflows, left sibling is at minimum, right sibling lends 5.
        assert_eq!(chain_keys(&tree), vec![vec![1, 2], vec![3, 5], vec![6, 7]]);
        assert_eq!(tree.node(tree.root()).keys(), &[3, 6]);
        assert_eq!(tree.height(), 1);
        tree.validate().unwrap();
    }

    #[test]
    fn test_scenario_duplicates() {
        let mut tree: BPlusTree<&str> = BPlusTree::with_degree(4).unwrap();
        tree.insert(5, "first");
        tree.insert(5, "second");

        let values: Vec<_> = tree.search_range(5, 5).into_iter().map(|(_, v)| v).collect();
        assert_eq!(values, vec![Some(&"first"), Some(&"second")]);
    }

    #[test]
    fn test_scenario_reversed_range() {
        let tree = tree_with(4, 1..=7);
        assert_eq!(tree.search_range(3, 2), tree.search_range(2, 3));
        assert_eq!(tree.search_range(3, 2).len(), 2);
    }

    #[test]
    fn test_scenario_delete_down_to_empty() {
        let mut tree = tree_with(4, 1..=20);
        assert!(tree.height() >= 2);

        for key in 1..20 {
            assert!(tree.delete(key).is_some());
            tree.validate().unwrap();
        }
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.height(), 0);
        assert_eq!(chain_keys(&tree), vec![vec![20]]);

        assert!(tree.delete(20).is_some());
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 0);
        assert_eq!(chain_keys(&tree), vec![Vec::<Key>::new()]);
        tree.validate().unwrap();

        assert!(tree.delete(20).is_none());
    }

    #[test]
    fn test_clear() {
        let mut tree = tree_with(4, 1..=50);
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 0);
        assert!(tree.search(1).is_none());
        tree.insert(1, 10);
        assert_eq!(tree.get(1), Some(&10));
    }

    #[test]
    fn test_released_slots_are_reused() {
        let mut tree = tree_with(3, 1..=30);
        let allocated = tree.arena.len();
        for key in 1..=30 {
            tree.delete(key);
        }
        for key in 1..=30 {
            tree.insert(key, key);
        }
        assert_eq!(tree.arena.len(), allocated);
        tree.validate().unwrap();
    }

    #[test]
    fn test_locate_crosses_leaf_boundary() {
        // Leaves [1, 2] [5, 5] under separator 5: a lookup for 5 starts on the left.
        let mut tree = tree_with(3, [1, 2, 5, 5]);
        let (descent, pos) = tree.locate(5).unwrap();
        assert_eq!(tree.leaf(descent.leaf).keys()[pos], 5);
        assert!(tree.locate(3).is_none());

        tree.delete(5);
        assert!(tree.locate(5).is_some());
        tree.delete(5);
        assert!(tree.locate(5).is_none());
    }

    #[test]
    fn test_next_descent_walks_all_leaves() {
        let tree = tree_with(3, 1..=40);
        let mut descent = tree.descend(Key::MIN, Route::Lookup);
        let mut count = 1;
        while let Some(next) = tree.next_descent(&descent) {
            assert_eq!(tree.leaf(descent.leaf).next(), Some(next.leaf));
            assert_eq!(next.path.len(), tree.height());
            descent = next;
            count += 1;
        }
        assert_eq!(count, chain_keys(&tree).len());
        assert_eq!(descent.leaf, tree.rightmost_leaf());
    }

    #[test]
    fn test_get_node_skips_released_slots() {
        let mut tree = tree_with(3, 1..=20);
        assert!(tree.get_node(tree.root()).is_some());
        assert!(tree.get_node(tree.arena.len()).is_none());

        for key in 1..=18 {
            tree.delete(key);
        }
        assert!(!tree.free.is_empty());
        for &id in &tree.free {
            assert!(tree.get_node(id).is_none());
        }

        let mut reachable = vec![tree.root()];
        while let Some(id) = reachable.pop() {
            let node = tree.get_node(id).unwrap();
            reachable.extend_from_slice(node.children());
        }
    }
}
