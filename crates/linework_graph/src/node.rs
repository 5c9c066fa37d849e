// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for the line-rendering graph.

use crate::schema;
use crate::value::FieldValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Node kind, a closed set
///
/// The synthetic material record used by the portable document has no
/// counterpart here; it never becomes a live node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// The single root node owning every other node in a scene
    LineList,
    /// A renderable line
    Line,
    /// A named grouping of lines
    LineGroup,
    /// Edge-detection and brush wiring for a set of target objects
    LineSet,
    /// Per-material line function overrides
    LineFunctions,
    /// Brush stroke parameters
    BrushSettings,
    /// Detailed brush shape parameters
    BrushDetail,
    /// Distance-based size/alpha reduction
    ReductionSettings,
    /// A texture map reference with UV placement
    TextureMap,
}

impl NodeKind {
    /// The portable type tag written into documents
    pub fn type_tag(self) -> &'static str {
        match self {
            NodeKind::LineList => "LineList",
            NodeKind::Line => "Line",
            NodeKind::LineGroup => "LineGroup",
            NodeKind::LineSet => "LineSet",
            NodeKind::LineFunctions => "LineFunctions",
            NodeKind::BrushSettings => "BrushSettings",
            NodeKind::BrushDetail => "BrushDetail",
            NodeKind::ReductionSettings => "ReductionSettings",
            NodeKind::TextureMap => "TextureMap",
        }
    }

    /// Parse a portable type tag back into a kind
    pub fn from_type_tag(tag: &str) -> Option<Self> {
        match tag {
            "LineList" => Some(NodeKind::LineList),
            "Line" => Some(NodeKind::Line),
            "LineGroup" => Some(NodeKind::LineGroup),
            "LineSet" => Some(NodeKind::LineSet),
            "LineFunctions" => Some(NodeKind::LineFunctions),
            "BrushSettings" => Some(NodeKind::BrushSettings),
            "BrushDetail" => Some(NodeKind::BrushDetail),
            "ReductionSettings" => Some(NodeKind::ReductionSettings),
            "TextureMap" => Some(NodeKind::TextureMap),
            _ => None,
        }
    }
}

/// A node instance in the graph
#[derive(Debug, Clone)]
pub struct Node {
    /// Unique instance ID
    pub id: NodeId,
    /// Node kind
    pub kind: NodeKind,
    /// Display name
    pub name: String,
    /// Owning parent node, if any
    pub parent: Option<NodeId>,
    /// Field values keyed by portable alias
    values: IndexMap<&'static str, FieldValue>,
}

impl Node {
    /// Create a new node with every field at its declared default
    pub fn new(kind: NodeKind, name: impl Into<String>) -> Self {
        let values = schema::field_specs(kind)
            .iter()
            .map(|spec| (spec.alias, FieldValue::default_for(spec.kind)))
            .collect();
        Self {
            id: NodeId::new(),
            kind,
            name: name.into(),
            parent: None,
            values,
        }
    }

    /// Get a field value by alias
    pub fn value(&self, alias: &str) -> Option<&FieldValue> {
        self.values.get(alias)
    }

    /// Set a field value by alias
    ///
    /// Only aliases declared in the kind's field table are accepted;
    /// anything else is ignored.
    pub fn set_value(&mut self, alias: &str, value: FieldValue) {
        if let Some(spec) = schema::find_spec(self.kind, alias) {
            self.values.insert(spec.alias, value);
        }
    }

    /// Iterate over field values in declaration order
    pub fn values(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.values.iter().map(|(alias, value)| (*alias, value))
    }

    /// Get a single node reference field
    pub fn node_ref(&self, alias: &str) -> Option<NodeId> {
        match self.value(alias) {
            Some(FieldValue::NodeRef(id)) => *id,
            _ => None,
        }
    }

    /// Get a node reference list field, empty if absent
    pub fn node_list(&self, alias: &str) -> &[NodeId] {
        match self.value(alias) {
            Some(FieldValue::NodeList(ids)) => ids,
            _ => &[],
        }
    }

    /// Get a material reference list field, empty if absent
    pub fn material_list(&self, alias: &str) -> &[crate::assets::AssetId] {
        match self.value(alias) {
            Some(FieldValue::MaterialList(ids)) => ids,
            _ => &[],
        }
    }

    /// Get a name list field, empty if absent
    pub fn name_list(&self, alias: &str) -> &[String] {
        match self.value(alias) {
            Some(FieldValue::NameList(names)) => names,
            _ => &[],
        }
    }

    /// Get an integer field
    pub fn int(&self, alias: &str) -> Option<i32> {
        match self.value(alias) {
            Some(FieldValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    /// Get a float field
    pub fn float(&self, alias: &str) -> Option<f32> {
        match self.value(alias) {
            Some(FieldValue::Float(v)) => Some(*v),
            _ => None,
        }
    }

    /// Get a boolean field
    pub fn bool(&self, alias: &str) -> Option<bool> {
        match self.value(alias) {
            Some(FieldValue::Bool(v)) => Some(*v),
            _ => None,
        }
    }

    /// Get a 2D vector field
    pub fn vec2(&self, alias: &str) -> Option<[f32; 2]> {
        match self.value(alias) {
            Some(FieldValue::Vec2(v)) => Some(*v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::FieldKind;

    #[test]
    fn test_type_tag_round_trip() {
        for kind in [
            NodeKind::LineList,
            NodeKind::Line,
            NodeKind::LineGroup,
            NodeKind::LineSet,
            NodeKind::LineFunctions,
            NodeKind::BrushSettings,
            NodeKind::BrushDetail,
            NodeKind::ReductionSettings,
            NodeKind::TextureMap,
        ] {
            assert_eq!(NodeKind::from_type_tag(kind.type_tag()), Some(kind));
        }
        assert_eq!(NodeKind::from_type_tag("Material"), None);
    }

    #[test]
    fn test_new_node_has_declared_defaults() {
        let node = Node::new(NodeKind::Line, "Line 1");
        for spec in schema::field_specs(NodeKind::Line) {
            let value = node.value(spec.alias).expect("field initialized");
            assert_eq!(value.kind(), spec.kind);
        }
        assert_eq!(node.int("RenderPriority"), Some(0));
        assert!(node.node_list("LineSets").is_empty());
    }

    #[test]
    fn test_set_value_rejects_unknown_alias() {
        let mut node = Node::new(NodeKind::Line, "Line 1");
        node.set_value("NoSuchField", FieldValue::Bool(true));
        assert!(node.value("NoSuchField").is_none());
    }

    #[test]
    fn test_typed_getters_decline_on_kind_mismatch() {
        let node = Node::new(NodeKind::Line, "Line 1");
        // RenderPriority is an Int field
        assert_eq!(node.int("RenderPriority"), Some(0));
        assert_eq!(node.float("RenderPriority"), None);
        assert_eq!(node.value("RenderPriority").map(FieldValue::kind), Some(FieldKind::Int));
    }
}
