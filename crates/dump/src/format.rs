//! Serde model of the JSON dump format.

use crate::error::{DumpError, Result};
use leafchain_core::{Error, Key, TreeConfig};
use leafchain_index::{BPlusTree, Node, NodeId, NodeImage};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::type_name;

/// Top-level dump document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeDump {
    /// Rust type name of the values, informational.
    pub value_type: String,
    pub properties: PropertiesDump,
    pub root_node: NodeDump,
}

/// Tree configuration as stored in a dump.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertiesDump {
    pub degree: usize,
}

/// One node. `sub_items` holds value slots for a leaf and child nodes otherwise.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDump {
    pub leaf: bool,
    pub keys: Vec<Key>,
    pub sub_items: Vec<Value>,
}

impl TreeDump {
    /// Captures a tree through its read-only node traversal.
    pub fn from_tree<V: Serialize>(tree: &BPlusTree<V>) -> Result<Self> {
        Ok(Self {
            value_type: type_name::<V>().to_string(),
            properties: PropertiesDump {
                degree: tree.degree(),
            },
            root_node: NodeDump::from_node(tree, tree.root())?,
        })
    }

    /// Rebuilds the tree. Nothing is returned unless the whole dump is valid.
    pub fn into_tree<V: DeserializeOwned>(self) -> Result<BPlusTree<V>> {
        if self.value_type != type_name::<V>() {
            tracing::warn!(
                stored = %self.value_type,
                requested = type_name::<V>(),
                "dump value type differs from requested type"
            );
        }

        let config = TreeConfig::new(self.properties.degree)?;
        let image = self.root_node.into_image::<V>()?;
        Ok(BPlusTree::from_image(config, image)?)
    }
}

impl NodeDump {
    fn from_node<V: Serialize>(tree: &BPlusTree<V>, id: NodeId) -> Result<Self> {
        let node = tree.node(id);
        let sub_items = match node {
            Node::Leaf(leaf) => leaf
                .values()
                .iter()
                .map(encode_slot)
                .collect::<Result<Vec<_>>>()?,
            Node::Index(index) => index
                .children()
                .iter()
                .map(|&child| -> Result<Value> {
                    Ok(serde_json::to_value(Self::from_node(tree, child)?)?)
                })
                .collect::<Result<Vec<_>>>()?,
        };

        Ok(Self {
            leaf: node.is_leaf(),
            keys: node.keys().to_vec(),
            sub_items,
        })
    }

    fn into_image<V: DeserializeOwned>(self) -> Result<NodeImage<V>> {
        if self.leaf {
            let values = self
                .sub_items
                .into_iter()
                .map(decode_slot::<V>)
                .collect::<Result<Vec<_>>>()?;
            Ok(NodeImage::Leaf {
                keys: self.keys,
                values,
            })
        } else {
            let children = self
                .sub_items
                .into_iter()
                .map(|item| -> Result<NodeImage<V>> {
                    serde_json::from_value::<NodeDump>(item)
                        .map_err(|err| malformed(format!("index child is not a node: {}", err)))?
                        .into_image()
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(NodeImage::Index {
                keys: self.keys,
                children,
            })
        }
    }
}

/// Encodes a value slot: `null` for a tombstone, the value's JSON text otherwise.
///
/// Values that themselves serialize to `null` (`()`, `None`) stay
/// distinguishable from an empty slot.
fn encode_slot<V: Serialize>(slot: &Option<V>) -> Result<Value> {
    match slot {
        Some(value) => Ok(Value::String(serde_json::to_string(value)?)),
        None => Ok(Value::Null),
    }
}

fn decode_slot<V: DeserializeOwned>(item: Value) -> Result<Option<V>> {
    match item {
        Value::Null => Ok(None),
        Value::String(text) => serde_json::from_str::<V>(&text).map(Some).map_err(|err| {
            malformed(format!("leaf value is not a {}: {}", type_name::<V>(), err))
        }),
        other => Err(malformed(format!(
            "leaf value slot must be JSON text or null, got {}",
            other
        ))),
    }
}

fn malformed(message: String) -> DumpError {
    DumpError::Tree(Error::malformed_input(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dump(root: Value) -> String {
        json!({
            "valueType": "i64",
            "properties": { "degree": 4 },
            "rootNode": root,
        })
        .to_string()
    }

    fn import(root: Value) -> Result<BPlusTree<i64>> {
        crate::import_json(&dump(root))
    }

    #[test]
    fn test_layout_matches_format() {
        let mut tree = BPlusTree::with_degree(4).unwrap();
        for key in 1..=4 {
            tree.insert(key, key * 10);
        }

        let value: Value = serde_json::from_str(&crate::export_json(&tree).unwrap()).unwrap();
        assert_eq!(value["valueType"], "i64");
        assert_eq!(value["properties"]["degree"], 4);
        assert_eq!(value["rootNode"]["leaf"], false);
        assert_eq!(value["rootNode"]["keys"], json!([3]));
        assert_eq!(
            value["rootNode"]["subItems"][0],
            json!({ "leaf": true, "keys": [1, 2], "subItems": ["10", "20"] })
        );
    }

    #[test]
    fn test_import_rebuilds_chain_and_tombstones() {
        let tree = import(json!({
            "leaf": false,
            "keys": [3],
            "subItems": [
                { "leaf": true, "keys": [1, 2], "subItems": ["10", null] },
                { "leaf": true, "keys": [3, 4], "subItems": ["30", "40"] }
            ]
        }))
        .unwrap();

        assert_eq!(tree.len(), 4);
        assert_eq!(tree.get(2), None);
        assert!(tree.contains_key(2));
        let keys: Vec<Key> = tree.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_import_rejects_child_count_mismatch() {
        let err = import(json!({
            "leaf": false,
            "keys": [3, 5],
            "subItems": [
                { "leaf": true, "keys": [1, 2], "subItems": ["1", "2"] },
                { "leaf": true, "keys": [3, 4], "subItems": ["3", "4"] }
            ]
        }))
        .unwrap_err();
        assert!(matches!(err, DumpError::Tree(Error::MalformedInput { .. })));
    }

    #[test]
    fn test_import_rejects_wrong_value_type() {
        let err = import(json!({ "leaf": true, "keys": [1], "subItems": ["\"one\""] })).unwrap_err();
        assert!(matches!(err, DumpError::Tree(Error::MalformedInput { .. })));
        assert!(err.to_string().contains("leaf value is not a i64"));
    }

    #[test]
    fn test_import_rejects_bare_slot() {
        let err = import(json!({ "leaf": true, "keys": [1], "subItems": [7] })).unwrap_err();
        assert!(matches!(err, DumpError::Tree(Error::MalformedInput { .. })));
        assert!(err.to_string().contains("must be JSON text or null"));
    }

    #[test]
    fn test_slot_encoding() {
        assert_eq!(encode_slot(&Some(())).unwrap(), json!("null"));
        assert_eq!(encode_slot(&Some(Some(3u32))).unwrap(), json!("3"));
        assert_eq!(encode_slot::<u32>(&None).unwrap(), Value::Null);

        assert_eq!(decode_slot::<()>(json!("null")).unwrap(), Some(()));
        assert_eq!(decode_slot::<Option<u32>>(json!("null")).unwrap(), Some(None));
        assert_eq!(decode_slot::<Option<u32>>(Value::Null).unwrap(), None);
    }

    #[test]
    fn test_import_with_other_value_type_name() {
        let json = json!({
            "valueType": "u64",
            "properties": { "degree": 4 },
            "rootNode": { "leaf": true, "keys": [1, 2], "subItems": ["10", "20"] },
        })
        .to_string();
        let tree = crate::import_json::<i64>(&json).unwrap();
        assert_eq!(tree.get(2), Some(&20));
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_import_rejects_bad_child() {
        let err = import(json!({ "leaf": false, "keys": [], "subItems": [42] })).unwrap_err();
        assert!(matches!(err, DumpError::Tree(Error::MalformedInput { .. })));
    }

    #[test]
    fn test_import_rejects_bad_degree() {
        let json = json!({
            "valueType": "i64",
            "properties": { "degree": 1 },
            "rootNode": { "leaf": true, "keys": [], "subItems": [] },
        })
        .to_string();
        let err = crate::import_json::<i64>(&json).unwrap_err();
        assert!(matches!(err, DumpError::Tree(Error::InvalidDegree { degree: 1 })));
    }

    #[test]
    fn test_empty_tree_round_trip() {
        let tree: BPlusTree<String> = BPlusTree::with_degree(4).unwrap();
        let loaded: BPlusTree<String> =
            crate::import_json(&crate::export_json(&tree).unwrap()).unwrap();
        assert!(loaded.is_empty());
        assert_eq!(loaded.height(), 0);
    }
}
