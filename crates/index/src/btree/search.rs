//! Point and inclusive-range search.

use super::iter::RangeIter;
use super::node::NodeId;
use super::tree::{BPlusTree, Route};
use alloc::vec::Vec;
use leafchain_core::Key;

/// Where a point search found its key.
#[derive(Debug, PartialEq, Eq)]
pub struct Found<'a, V> {
    /// Index node directly above the leaf, `None` when the leaf is the root.
    pub parent: Option<NodeId>,
    /// Leaf holding the first entry with the key.
    pub leaf: NodeId,
    /// Position of that entry within the leaf.
    pub position: usize,
    /// Its value, `None` for a tombstone slot.
    pub value: Option<&'a V>,
}

impl<V> BPlusTree<V> {
    /// Finds the first entry with the given key.
    pub fn search(&self, key: Key) -> Option<Found<'_, V>> {
        let (descent, position) = self.locate(key)?;
        Some(Found {
            parent: descent.path.last().map(|&(id, _)| id),
            leaf: descent.leaf,
            position,
            value: self.leaf(descent.leaf).values[position].as_ref(),
        })
    }

    /// Returns the value of the first entry with the given key.
    pub fn get(&self, key: Key) -> Option<&V> {
        self.search(key)?.value
    }

    pub fn contains_key(&self, key: Key) -> bool {
        self.locate(key).is_some()
    }

    /// Returns the value slots of every entry with the given key, in insertion order.
    pub fn get_all(&self, key: Key) -> Vec<Option<&V>> {
        self.range(key, key).map(|(_, value)| value).collect()
    }

    /// Iterates over entries with `key1 <= key <= key2`.
    ///
    /// A reversed pair is flipped, so `range(3, 2)` equals `range(2, 3)`.
    pub fn range(&self, key1: Key, key2: Key) -> RangeIter<'_, V> {
        let (lower, upper) = if key2 < key1 {
            tracing::warn!(key1, key2, "range bounds reversed, flipping");
            (key2, key1)
        } else {
            (key1, key2)
        };

        RangeIter::new(&self.arena, self.seek(lower), upper)
    }

    /// Collects every entry with a key between `key1` and `key2` inclusive.
    pub fn search_range(&self, key1: Key, key2: Key) -> Vec<(Key, Option<&V>)> {
        self.range(key1, key2).collect()
    }

    /// Iterates over all entries in key order.
    pub fn iter(&self) -> RangeIter<'_, V> {
        RangeIter::new(&self.arena, Some((self.leftmost_leaf(), 0)), Key::MAX)
    }

    /// Returns the smallest entry.
    pub fn min(&self) -> Option<(Key, Option<&V>)> {
        self.iter().next()
    }

    /// Returns the largest entry.
    pub fn max(&self) -> Option<(Key, Option<&V>)> {
        let leaf = self.leaf(self.rightmost_leaf());
        let last = leaf.len().checked_sub(1)?;
        Some((leaf.keys[last], leaf.values[last].as_ref()))
    }

    /// Finds the first leaf position holding a key `>= key`.
    fn seek(&self, key: Key) -> Option<(NodeId, usize)> {
        let mut leaf_id = self.descend(key, Route::Lookup).leaf;

        loop {
            let leaf = self.leaf(leaf_id);
            let pos = leaf.lower_bound(key);
            if pos < leaf.len() {
                return Some((leaf_id, pos));
            }
            leaf_id = leaf.next()?;
        }
    }
}
