//! B+Tree index implementation.
//!
//! Nodes live in an arena owned by [`BPlusTree`]. Insert, delete and search
//! each walk the tree top-down; delete carries the walked path instead of
//! relying on parent pointers.

mod delete;
mod image;
mod insert;
mod iter;
mod node;
mod search;
mod tree;

pub use image::NodeImage;
pub use iter::RangeIter;
pub use node::{Entry, IndexNode, LeafNode, Node, NodeId};
pub use search::Found;
pub use tree::BPlusTree;
