// SPDX-License-Identifier: MIT OR Apache-2.0
//! The portable document model.
//!
//! A document is one JSON object with a platform tag, a file version, a
//! unit scale, and two id-keyed maps of node records. Record parsing is
//! lenient: a record that is not an object, or lacks a string type or
//! name, is dropped rather than failing the document. Fatal structure
//! problems are caught earlier by [`crate::format::validate`].

use crate::format::{self, key, BridgeError};
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// One flattened node
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRecord {
    /// Portable type tag
    pub node_type: String,
    /// Display name
    pub node_name: String,
    /// Field values keyed by portable alias
    pub params: Map<String, Value>,
}

impl NodeRecord {
    /// Create a record with empty params
    pub fn new(node_type: impl Into<String>, node_name: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            node_name: node_name.into(),
            params: Map::new(),
        }
    }

    fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let node_type = object.get(key::NODE_TYPE)?.as_str()?.to_owned();
        let node_name = object.get(key::NODE_NAME)?.as_str()?.to_owned();
        let params = match object.get(key::NODE_PARAMS) {
            Some(Value::Object(map)) => map.clone(),
            _ => Map::new(),
        };
        Some(Self {
            node_type,
            node_name,
            params,
        })
    }

    fn to_value(&self) -> Value {
        let mut object = Map::new();
        object.insert(key::NODE_TYPE.into(), Value::String(self.node_type.clone()));
        object.insert(key::NODE_NAME.into(), Value::String(self.node_name.clone()));
        object.insert(key::NODE_PARAMS.into(), Value::Object(self.params.clone()));
        Value::Object(object)
    }
}

/// A parsed portable document
#[derive(Debug, Clone)]
pub struct Document {
    /// Producing host and version
    pub platform: String,
    /// Document format version
    pub file_version: String,
    /// Producing host's unit scale relative to meters
    pub scale_factor: f64,
    /// Line-side records by id
    pub line_nodes: IndexMap<String, NodeRecord>,
    /// Material-side records by id
    pub material_nodes: IndexMap<String, NodeRecord>,
}

impl Document {
    /// Create an empty document stamped with this host's platform and
    /// version
    pub fn new() -> Self {
        Self {
            platform: format::platform_string(),
            file_version: format::version_string(),
            scale_factor: 1.0,
            line_nodes: IndexMap::new(),
            material_nodes: IndexMap::new(),
        }
    }

    /// Whether the document was produced by this host
    pub fn is_native_origin(&self) -> bool {
        self.platform.starts_with(format::PLATFORM_NAME)
    }

    /// Build a document from a validated top-level value
    pub fn from_value(root: &Value) -> Self {
        let platform = root
            .get(key::PLATFORM)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();
        let file_version = root
            .get(key::FILE_VERSION)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();
        let scale_factor = root
            .get(key::SCALE_FACTOR)
            .and_then(Value::as_f64)
            .unwrap_or(1.0);

        Self {
            platform,
            file_version,
            scale_factor,
            line_nodes: parse_record_map(root.get(key::LINE_NODE)),
            material_nodes: parse_record_map(root.get(key::MATERIAL_NODE)),
        }
    }

    /// Parse and validate document text
    pub fn from_json_text(text: &str) -> Result<Self, BridgeError> {
        let root: Value = serde_json::from_str(text)?;
        format::validate(&root)?;
        Ok(Self::from_value(&root))
    }

    /// Flatten back into a JSON value
    pub fn to_value(&self) -> Value {
        let mut root = Map::new();
        root.insert(key::PLATFORM.into(), Value::String(self.platform.clone()));
        root.insert(
            key::FILE_VERSION.into(),
            Value::String(self.file_version.clone()),
        );
        root.insert(key::SCALE_FACTOR.into(), self.scale_factor.into());
        root.insert(key::LINE_NODE.into(), record_map_to_value(&self.line_nodes));
        root.insert(
            key::MATERIAL_NODE.into(),
            record_map_to_value(&self.material_nodes),
        );
        Value::Object(root)
    }

    /// Pretty-print as document text
    pub fn to_json_text(&self) -> Result<String, BridgeError> {
        Ok(serde_json::to_string_pretty(&self.to_value())?)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_record_map(value: Option<&Value>) -> IndexMap<String, NodeRecord> {
    let Some(Value::Object(map)) = value else {
        return IndexMap::new();
    };
    map.iter()
        .filter_map(|(id, record)| Some((id.clone(), NodeRecord::from_value(record)?)))
        .collect()
}

fn record_map_to_value(records: &IndexMap<String, NodeRecord>) -> Value {
    let map: Map<String, Value> = records
        .iter()
        .map(|(id, record)| (id.clone(), record.to_value()))
        .collect();
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_round_trips_through_text() {
        let mut doc = Document::new();
        let mut record = NodeRecord::new("Line", "Line 1");
        record.params.insert("RenderPriority".into(), json!(3));
        doc.line_nodes.insert("id-1".into(), record);

        let text = doc.to_json_text().unwrap();
        let parsed = Document::from_json_text(&text).unwrap();
        assert_eq!(parsed.platform, doc.platform);
        assert_eq!(parsed.file_version, doc.file_version);
        assert_eq!(parsed.line_nodes, doc.line_nodes);
        assert!(parsed.is_native_origin());
    }

    #[test]
    fn test_malformed_records_are_dropped() {
        let root = json!({
            "FileVersion": "1.1",
            "LineNode": {
                "good": {"NodeType": "Line", "NodeName": "A", "Params": {}},
                "no-name": {"NodeType": "Line"},
                "not-an-object": 7,
                "numeric-type": {"NodeType": 1, "NodeName": "B"},
            },
            "MaterialNode": {},
        });
        let doc = Document::from_value(&root);
        assert_eq!(doc.line_nodes.len(), 1);
        assert!(doc.line_nodes.contains_key("good"));
    }

    #[test]
    fn test_missing_params_default_to_empty() {
        let root = json!({
            "FileVersion": "1.1",
            "LineNode": {"a": {"NodeType": "Line", "NodeName": "A"}},
            "MaterialNode": {},
        });
        let doc = Document::from_value(&root);
        assert!(doc.line_nodes["a"].params.is_empty());
    }

    #[test]
    fn test_invalid_text_fails_before_parsing_records() {
        assert!(Document::from_json_text("not json").is_err());
        assert!(Document::from_json_text(r#"{"FileVersion": "1.1", "LineNode": {}}"#).is_err());
    }

    #[test]
    fn test_foreign_platform_detected() {
        let root = json!({
            "Platform": "OtherDCC 9.0",
            "FileVersion": "1.0",
            "LineNode": {},
            "MaterialNode": {},
        });
        assert!(!Document::from_value(&root).is_native_origin());
    }
}
