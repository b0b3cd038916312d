//! Leafchain Index - an in-memory B+Tree mapping integer keys to values.
//!
//! This crate provides:
//!
//! - `BPlusTree`: insert with split/push-up, delete with redistribution and
//!   merge, point search and inclusive range search along the leaf chain
//! - `NodeImage`: nested node pictures for bulk import/export
//! - `TreeStats`: node counts, entry counts, fill factors and height
//! - invariant validation and text dumps for debugging
//!
//! # Example
//!
//! ```rust
//! use leafchain_index::BPlusTree;
//!
//! let mut tree = BPlusTree::with_degree(4).unwrap();
//! tree.insert(10, "ten");
//! tree.insert(20, "twenty");
//! tree.insert(5, "five");
//! tree.insert(10, "another ten");
//!
//! // Point query
//! assert_eq!(tree.get(10), Some(&"ten"));
//!
//! // Range query, bounds inclusive
//! let keys: Vec<i64> = tree.range(5, 10).map(|(k, _)| k).collect();
//! assert_eq!(keys, vec![5, 10, 10]);
//!
//! // Delete removes the first matching entry
//! assert_eq!(tree.delete(10).unwrap().value, Some("ten"));
//! assert!(tree.validate().is_ok());
//! ```

#![no_std]

extern crate alloc;

pub mod btree;
pub mod printer;
pub mod stats;
mod validate;

pub use btree::{BPlusTree, Entry, Found, IndexNode, LeafNode, Node, NodeId, NodeImage, RangeIter};
pub use leafchain_core::{Error, Key, Result, TreeConfig};
pub use printer::{NodeDisplay, TreeDisplay};
pub use stats::TreeStats;
