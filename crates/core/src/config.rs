//! Capacity configuration for the B+Tree.

use crate::error::{Error, Result};

/// Default degree (max children per index node).
pub const DEFAULT_DEGREE: usize = 64;

/// Smallest degree that still yields valid nodes on both sides of an index split.
pub const MIN_DEGREE: usize = 3;

/// Capacity configuration of a tree.
///
/// The degree `t` is the only tunable. A node holds at most `t - 1` keys and
/// an index node at most `t` children; the underflow thresholds derive from it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TreeConfig {
    degree: usize,
}

impl TreeConfig {
    /// Creates a configuration, rejecting degrees below [`MIN_DEGREE`].
    ///
    /// Degree 2 is refused even though leaves could work with it: an index
    /// node splits when it reaches `t` keys and pushes one up, so at `t = 2`
    /// one half is left with no keys at all.
    pub fn new(degree: usize) -> Result<Self> {
        if degree < MIN_DEGREE {
            return Err(Error::invalid_degree(degree));
        }
        Ok(Self { degree })
    }

    /// Returns the degree.
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Maximum number of keys a node may hold.
    pub fn max_keys(&self) -> usize {
        self.degree - 1
    }

    /// Minimum number of keys for a non-root leaf: `ceil((t - 1) / 2)`.
    pub fn min_leaf_keys(&self) -> usize {
        self.degree / 2
    }

    /// Minimum number of keys for a non-root index node: `floor((t - 1) / 2)`.
    ///
    /// Equal to [`min_leaf_keys`](Self::min_leaf_keys) for odd degrees. For
    /// even degrees an index split leaves `t - 1` keys (odd) to share after
    /// the push-up, so one side necessarily gets one key fewer.
    pub fn min_index_keys(&self) -> usize {
        (self.degree - 1) / 2
    }

    /// Minimum number of keys for a non-root node of the given kind.
    pub fn min_keys(&self, leaf: bool) -> usize {
        if leaf {
            self.min_leaf_keys()
        } else {
            self.min_index_keys()
        }
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            degree: DEFAULT_DEGREE,
        }
    }
}
