//! Bulk import/export of a whole tree as nested node images.

use super::node::{IndexNode, LeafNode, Node, NodeId};
use super::tree::BPlusTree;
use alloc::format;
use alloc::string::ToString;
use alloc::vec::Vec;
use leafchain_core::{Error, Key, Result, TreeConfig};

/// An owned, nested picture of a subtree.
///
/// This is what interchange formats read and write. Leaf chain links are
/// not part of it; they are rebuilt on load.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeImage<V> {
    Leaf {
        keys: Vec<Key>,
        values: Vec<Option<V>>,
    },
    Index {
        keys: Vec<Key>,
        children: Vec<NodeImage<V>>,
    },
}

impl<V> NodeImage<V> {
    /// Returns the keys of this node.
    pub fn keys(&self) -> &[Key] {
        match self {
            NodeImage::Leaf { keys, .. } | NodeImage::Index { keys, .. } => keys,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, NodeImage::Leaf { .. })
    }
}

impl<V> BPlusTree<V> {
    /// Builds a tree from an image.
    ///
    /// The image is checked for shape (key/child and key/value counts) while
    /// it is loaded, then the finished tree must pass [`validate`](Self::validate).
    /// Any failure is a [`Error::MalformedInput`] and no tree is returned.
    pub fn from_image(config: TreeConfig, image: NodeImage<V>) -> Result<Self> {
        let mut tree = Self::new(config);
        tree.arena.clear();

        let root = tree.load_node(image)?;
        tree.root = root;
        tree.len = tree.count_entries();
        tree.relink_leaves();

        tree.validate()
            .map_err(|err| Error::malformed_input(err.to_string()))?;
        Ok(tree)
    }

    fn load_node(&mut self, image: NodeImage<V>) -> Result<NodeId> {
        match image {
            NodeImage::Leaf { keys, values } => {
                if keys.len() != values.len() {
                    return Err(Error::malformed_input(format!(
                        "leaf with {} keys has {} values",
                        keys.len(),
                        values.len()
                    )));
                }
                Ok(self.alloc(Node::Leaf(LeafNode::from_parts(keys, values))))
            }
            NodeImage::Index { keys, children } => {
                if children.len() != keys.len() + 1 {
                    return Err(Error::malformed_input(format!(
                        "index node with {} keys has {} children, expected {}",
                        keys.len(),
                        children.len(),
                        keys.len() + 1
                    )));
                }
                let children = children
                    .into_iter()
                    .map(|child| self.load_node(child))
                    .collect::<Result<Vec<_>>>()?;
                Ok(self.alloc(Node::Index(IndexNode::from_parts(keys, children))))
            }
        }
    }

    fn count_entries(&self) -> usize {
        let mut count = 0;
        let mut stack = alloc::vec![self.root];
        while let Some(id) = stack.pop() {
            match &self.arena[id] {
                Node::Leaf(leaf) => count += leaf.len(),
                Node::Index(index) => stack.extend_from_slice(&index.children),
            }
        }
        count
    }

    /// Rebuilds every leaf `next` link from the tree shape.
    ///
    /// Collects leaves left to right, then threads them right to left so the
    /// rightmost leaf ends with `None`.
    pub(crate) fn relink_leaves(&mut self) {
        let mut leaves = Vec::new();
        let mut stack = alloc::vec![self.root];
        while let Some(id) = stack.pop() {
            match &self.arena[id] {
                Node::Leaf(_) => leaves.push(id),
                Node::Index(index) => stack.extend(index.children.iter().rev()),
            }
        }

        let mut next = None;
        for &id in leaves.iter().rev() {
            self.leaf_mut(id).next = next;
            next = Some(id);
        }
    }

    /// Returns an owned image of the whole tree.
    pub fn to_image(&self) -> NodeImage<V>
    where
        V: Clone,
    {
        self.image_of(self.root)
    }

    fn image_of(&self, id: NodeId) -> NodeImage<V>
    where
        V: Clone,
    {
        match &self.arena[id] {
            Node::Leaf(leaf) => NodeImage::Leaf {
                keys: leaf.keys.clone(),
                values: leaf.values.clone(),
            },
            Node::Index(index) => NodeImage::Index {
                keys: index.keys.clone(),
                children: index.children.iter().map(|&child| self.image_of(child)).collect(),
            },
        }
    }
}
