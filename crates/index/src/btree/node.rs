//! B+Tree node definitions.

use alloc::vec::Vec;
use leafchain_core::Key;

/// Node identifier in the B+Tree arena.
pub type NodeId = usize;

/// A key together with its value slot, as removed from a leaf.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry<V> {
    pub key: Key,
    pub value: Option<V>,
}

/// A leaf node: keys paired 1:1 with value slots, plus the forward link.
///
/// A `None` slot is a tombstone that a bulk load may carry. Equal keys sit
/// next to each other in insertion order.
#[derive(Clone, Debug)]
pub struct LeafNode<V> {
    pub(crate) keys: Vec<Key>,
    pub(crate) values: Vec<Option<V>>,
    /// Next leaf in key order. Traversal only, never ownership.
    pub(crate) next: Option<NodeId>,
}

impl<V> LeafNode<V> {
    /// Creates an empty leaf.
    pub fn new() -> Self {
        Self {
            keys: Vec::new(),
            values: Vec::new(),
            next: None,
        }
    }

    pub(crate) fn from_parts(keys: Vec<Key>, values: Vec<Option<V>>) -> Self {
        debug_assert_eq!(keys.len(), values.len());
        Self {
            keys,
            values,
            next: None,
        }
    }

    /// Returns the keys of this leaf.
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Returns the value slots of this leaf.
    pub fn values(&self) -> &[Option<V>] {
        &self.values
    }

    /// Returns the next leaf in key order.
    pub fn next(&self) -> Option<NodeId> {
        self.next
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if the leaf holds no entries.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// First position whose key is `>= key`.
    pub fn lower_bound(&self, key: Key) -> usize {
        self.keys.partition_point(|&k| k < key)
    }

    /// First position whose key is `> key`.
    pub fn upper_bound(&self, key: Key) -> usize {
        self.keys.partition_point(|&k| k <= key)
    }

    pub(crate) fn insert_at(&mut self, pos: usize, key: Key, value: Option<V>) {
        self.keys.insert(pos, key);
        self.values.insert(pos, value);
    }

    pub(crate) fn remove_at(&mut self, pos: usize) -> (Key, Option<V>) {
        let key = self.keys.remove(pos);
        let value = self.values.remove(pos);
        (key, value)
    }

    pub(crate) fn push(&mut self, key: Key, value: Option<V>) {
        self.keys.push(key);
        self.values.push(value);
    }

    pub(crate) fn pop(&mut self) -> Option<(Key, Option<V>)> {
        let key = self.keys.pop()?;
        let value = self.values.pop()?;
        Some((key, value))
    }

    /// Moves entries `at..` into a new leaf that inherits this leaf's `next`.
    pub(crate) fn split_off(&mut self, at: usize) -> Self {
        Self {
            keys: self.keys.split_off(at),
            values: self.values.split_off(at),
            next: self.next,
        }
    }

    /// Appends every entry of `right` and takes over its `next` link.
    pub(crate) fn absorb(&mut self, right: LeafNode<V>) {
        self.keys.extend(right.keys);
        self.values.extend(right.values);
        self.next = right.next;
    }
}

impl<V> Default for LeafNode<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// An index node: `n` separator keys interleaved with `n + 1` children.
///
/// `children[i]` holds keys in `[keys[i - 1], keys[i]]`. A duplicate run
/// split across leaves may put a key equal to a separator on either side.
#[derive(Clone, Debug)]
pub struct IndexNode {
    pub(crate) keys: Vec<Key>,
    pub(crate) children: Vec<NodeId>,
}

impl IndexNode {
    pub(crate) fn from_parts(keys: Vec<Key>, children: Vec<NodeId>) -> Self {
        debug_assert_eq!(keys.len() + 1, children.len());
        Self { keys, children }
    }

    /// Returns the separator keys.
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Returns the child node IDs.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Child to descend into when inserting: a key equal to a separator routes right.
    pub fn child_for_insert(&self, key: Key) -> usize {
        self.keys.partition_point(|&k| k <= key)
    }

    /// Child that may hold the first entry `>= key`.
    pub fn child_for_lookup(&self, key: Key) -> usize {
        self.keys.partition_point(|&k| k < key)
    }

    /// Inserts `key` right after `children[pos]`, with `child` as its right child.
    pub(crate) fn insert_child_at(&mut self, pos: usize, key: Key, child: NodeId) {
        self.keys.insert(pos, key);
        self.children.insert(pos + 1, child);
    }

    /// Removes separator `pos` together with the child to its right.
    pub(crate) fn remove_child_at(&mut self, pos: usize) -> (Key, NodeId) {
        let key = self.keys.remove(pos);
        let child = self.children.remove(pos + 1);
        (key, child)
    }
}

/// A node in the B+Tree.
#[derive(Clone, Debug)]
pub enum Node<V> {
    Leaf(LeafNode<V>),
    Index(IndexNode),
}

impl<V> Node<V> {
    /// Returns true if this is a leaf node.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    /// Returns the keys stored in this node.
    pub fn keys(&self) -> &[Key] {
        match self {
            Node::Leaf(leaf) => &leaf.keys,
            Node::Index(index) => &index.keys,
        }
    }

    /// Returns the number of keys in this node.
    pub fn key_count(&self) -> usize {
        self.keys().len()
    }

    /// Returns the children of an index node, or an empty slice for a leaf.
    pub fn children(&self) -> &[NodeId] {
        match self {
            Node::Leaf(_) => &[],
            Node::Index(index) => &index.children,
        }
    }

    /// Returns the next leaf link, always `None` for index nodes.
    pub fn next(&self) -> Option<NodeId> {
        match self {
            Node::Leaf(leaf) => leaf.next,
            Node::Index(_) => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&LeafNode<V>> {
        match self {
            Node::Leaf(leaf) => Some(leaf),
            Node::Index(_) => None,
        }
    }

    pub fn as_index(&self) -> Option<&IndexNode> {
        match self {
            Node::Leaf(_) => None,
            Node::Index(index) => Some(index),
        }
    }
}
