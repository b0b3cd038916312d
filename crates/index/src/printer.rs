//! Human-readable dumps of a tree, for debugging.

use crate::btree::{BPlusTree, Node, NodeId};
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec;
use core::fmt;
use leafchain_core::Key;

/// Displays a whole tree, one node per line, indented by depth.
///
/// ```text
/// Index#6 [3, 5]
///   Leaf#0 [1, 2] -> #1
///   Leaf#1 [3, 4] -> #2
///   Leaf#2 [5, 6, 7] -> nil
/// ```
pub struct TreeDisplay<'a, V> {
    tree: &'a BPlusTree<V>,
}

/// Displays a single node without its subtree.
pub struct NodeDisplay<'a, V> {
    id: NodeId,
    node: &'a Node<V>,
}

impl<V> fmt::Display for NodeDisplay<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.node {
            Node::Leaf(leaf) => {
                write!(f, "Leaf#{} {:?} -> ", self.id, leaf.keys())?;
                match leaf.next() {
                    Some(next) => write!(f, "#{}", next),
                    None => write!(f, "nil"),
                }
            }
            Node::Index(index) => write!(f, "Index#{} {:?}", self.id, index.keys()),
        }
    }
}

impl<V> fmt::Display for TreeDisplay<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = vec![(self.tree.root(), 0usize)];
        let mut first = true;

        while let Some((id, depth)) = stack.pop() {
            if !first {
                writeln!(f)?;
            }
            first = false;

            write!(f, "{:width$}{}", "", self.tree.node_display(id), width = depth * 2)?;
            let children = self.tree.node(id).children();
            stack.extend(children.iter().rev().map(|&child| (child, depth + 1)));
        }

        Ok(())
    }
}

impl<V> BPlusTree<V> {
    /// Returns a displayable view of the whole tree.
    pub fn display(&self) -> TreeDisplay<'_, V> {
        TreeDisplay { tree: self }
    }

    /// Returns a displayable view of one node.
    pub fn node_display(&self, id: NodeId) -> NodeDisplay<'_, V> {
        NodeDisplay {
            id,
            node: self.node(id),
        }
    }

    /// Renders the whole tree as text.
    pub fn print_tree(&self) -> String {
        self.display().to_string()
    }

    /// Renders the leaf a point search for `key` lands on, and its parent.
    pub fn print_node(&self, key: Key) -> String {
        match self.search(key) {
            Some(found) => {
                let parent = match found.parent {
                    Some(parent) => self.node_display(parent).to_string(),
                    None => "nil".to_string(),
                };
                format!(
                    "Search Key: {}\n\nResult: {}\n\nParent Node: {}",
                    key,
                    self.node_display(found.leaf),
                    parent
                )
            }
            None => format!("Search Key: {}\n\nResult: nil\n\nParent Node: nil", key),
        }
    }
}
