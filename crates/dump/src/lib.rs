//! Leafchain Dump - JSON interchange for leafchain B+Trees.
//!
//! A dump records the degree and the full node shape, so an import
//! reproduces the exported tree node for node:
//!
//! ```json
//! {
//!   "valueType": "alloc::string::String",
//!   "properties": { "degree": 4 },
//!   "rootNode": {
//!     "leaf": false,
//!     "keys": [3],
//!     "subItems": [
//!       { "leaf": true, "keys": [1, 2], "subItems": ["\"a\"", "\"b\""] },
//!       { "leaf": true, "keys": [3, 4], "subItems": ["\"c\"", null] }
//!     ]
//!   }
//! }
//! ```
//!
//! Leaf `subItems` are the value slots, each holding the value's own JSON
//! text, or `null` for an empty slot. Index `subItems` are the child nodes.
//! Leaf `next` links are not stored and are rebuilt on import.
//!
//! # Example
//!
//! ```rust
//! use leafchain_index::BPlusTree;
//!
//! let mut tree = BPlusTree::with_degree(4).unwrap();
//! for key in 1..=7 {
//!     tree.insert(key, key.to_string());
//! }
//!
//! let json = leafchain_dump::export_json(&tree).unwrap();
//! let loaded: BPlusTree<String> = leafchain_dump::import_json(&json).unwrap();
//! assert_eq!(loaded.search_range(1, 7), tree.search_range(1, 7));
//! ```

mod error;
mod format;

pub use error::{DumpError, Result};
pub use format::{NodeDump, PropertiesDump, TreeDump};

use leafchain_index::BPlusTree;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Serializes a tree as pretty-printed JSON.
pub fn export_json<V>(tree: &BPlusTree<V>) -> Result<String>
where
    V: Serialize,
{
    let dump = TreeDump::from_tree(tree)?;
    let json = serde_json::to_string_pretty(&dump)?;
    tracing::info!(entries = tree.len(), height = tree.height(), "exported tree as JSON");
    Ok(json)
}

/// Parses JSON produced by [`export_json`] back into a tree.
///
/// Fails without returning a partial tree if the JSON is invalid, a value
/// does not match `V`, or the node shape breaks a tree invariant.
pub fn import_json<V>(json: &str) -> Result<BPlusTree<V>>
where
    V: DeserializeOwned,
{
    let dump: TreeDump = serde_json::from_str(json)?;
    let tree = dump.into_tree()?;
    tracing::info!(entries = tree.len(), height = tree.height(), "imported tree from JSON");
    Ok(tree)
}

/// Writes a tree to `path` as JSON, replacing any existing file.
pub fn export_path<V>(tree: &BPlusTree<V>, path: impl AsRef<Path>) -> Result<()>
where
    V: Serialize,
{
    let json = export_json(tree)?;
    fs::write(path.as_ref(), json)?;
    Ok(())
}

/// Loads a tree from a JSON file at `path`.
pub fn import_path<V>(path: impl AsRef<Path>) -> Result<BPlusTree<V>>
where
    V: DeserializeOwned,
{
    let path = path.as_ref();
    if !path.is_file() {
        return Err(DumpError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let json = fs::read_to_string(path)?;
    import_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_path_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let err = import_path::<i64>(&path).unwrap_err();
        assert!(matches!(err, DumpError::NotFound { .. }));
        assert!(err.to_string().contains("missing.json"));
    }

    #[test]
    fn test_path_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tree.json");

        let mut tree = BPlusTree::with_degree(5).unwrap();
        for key in 0..200i64 {
            tree.insert(key % 50, key);
        }
        export_path(&tree, &path).unwrap();

        let loaded: BPlusTree<i64> = import_path(&path).unwrap();
        assert_eq!(loaded.degree(), 5);
        assert_eq!(loaded.len(), 200);
        assert_eq!(loaded.to_image(), tree.to_image());
    }

    #[test]
    fn test_import_invalid_json() {
        let err = import_json::<i64>("{ not json").unwrap_err();
        assert!(matches!(err, DumpError::Json(_)));
    }
}
