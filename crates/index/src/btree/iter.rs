//! Ordered iteration along the leaf chain.

use super::node::{Node, NodeId};
use core::iter::FusedIterator;
use leafchain_core::Key;

/// Iterator over leaf entries in key order, up to an inclusive upper key.
///
/// Follows the `next` links, so a run of equal keys spread over several
/// leaves comes out whole.
pub struct RangeIter<'a, V> {
    /// Reference to the arena of nodes.
    arena: &'a [Node<V>],
    /// Current leaf ID.
    current_node: Option<NodeId>,
    /// Current position within the leaf.
    current_pos: usize,
    /// Inclusive upper key.
    upper: Key,
}

impl<'a, V> RangeIter<'a, V> {
    /// Creates an iterator starting at `start` (leaf, position).
    pub(crate) fn new(arena: &'a [Node<V>], start: Option<(NodeId, usize)>, upper: Key) -> Self {
        let (current_node, current_pos) = match start {
            Some((node_id, pos)) => (Some(node_id), pos),
            None => (None, 0),
        };

        Self {
            arena,
            current_node,
            current_pos,
            upper,
        }
    }
}

impl<'a, V> Iterator for RangeIter<'a, V> {
    type Item = (Key, Option<&'a V>);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let node_id = self.current_node?;
            let leaf = self.arena[node_id].as_leaf()?;

            if self.current_pos >= leaf.len() {
                // Move to next leaf
                self.current_node = leaf.next();
                self.current_pos = 0;
                continue;
            }

            let key = leaf.keys[self.current_pos];
            if key > self.upper {
                self.current_node = None;
                return None;
            }

            let value = leaf.values[self.current_pos].as_ref();
            self.current_pos += 1;
            return Some((key, value));
        }
    }
}

impl<V> FusedIterator for RangeIter<'_, V> {}
