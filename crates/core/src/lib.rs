//! Leafchain Core - shared types for the leafchain B+Tree index.
//!
//! This crate provides the pieces every other leafchain crate agrees on:
//!
//! - `Key`: the integer key type stored in the tree
//! - `TreeConfig`: the degree and the capacity thresholds derived from it
//! - `Error`: error types for tree construction, loading and validation
//!
//! # Example
//!
//! ```rust
//! use leafchain_core::TreeConfig;
//!
//! let config = TreeConfig::new(4).unwrap();
//! assert_eq!(config.max_keys(), 3);
//! assert_eq!(config.min_leaf_keys(), 2);
//!
//! assert!(TreeConfig::new(1).is_err());
//! ```

#![no_std]

extern crate alloc;

mod config;
mod error;

pub use config::{TreeConfig, DEFAULT_DEGREE, MIN_DEGREE};
pub use error::{Error, Result};

/// Key type stored in the tree.
pub type Key = i64;
