// SPDX-License-Identifier: MIT OR Apache-2.0
//! Typed field values and their closed kind set.

use crate::assets::AssetId;
use crate::curve::Curve;
use crate::node::NodeId;
use serde::{Deserialize, Serialize};

/// Declared kind of a field, used to pick codec behavior
///
/// Encoding and decoding dispatch on this tag, never on the runtime value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    /// Single reference to another node
    NodeRef,
    /// Ordered list of node references
    NodeList,
    /// List of host material references
    MaterialList,
    /// List of scene object names
    NameList,
    /// Scalar float
    Float,
    /// RGBA color
    Color,
    /// 2D vector
    Vec2,
    /// Tangent curve
    Curve,
    /// Host texture reference
    TextureRef,
    /// Integer or enum ordinal
    Int,
    /// Boolean flag
    Bool,
    /// Free-form text
    Text,
}

/// A typed field value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    /// Single reference to another node
    NodeRef(Option<NodeId>),
    /// Ordered list of node references
    NodeList(Vec<NodeId>),
    /// List of host material references
    MaterialList(Vec<AssetId>),
    /// List of scene object names
    NameList(Vec<String>),
    /// Scalar float
    Float(f32),
    /// RGBA color
    Color([f32; 4]),
    /// 2D vector
    Vec2([f32; 2]),
    /// Tangent curve
    Curve(Curve),
    /// Host texture reference
    TextureRef(Option<AssetId>),
    /// Integer or enum ordinal
    Int(i32),
    /// Boolean flag
    Bool(bool),
    /// Free-form text
    Text(String),
}

impl FieldValue {
    /// The kind tag of this value
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::NodeRef(_) => FieldKind::NodeRef,
            FieldValue::NodeList(_) => FieldKind::NodeList,
            FieldValue::MaterialList(_) => FieldKind::MaterialList,
            FieldValue::NameList(_) => FieldKind::NameList,
            FieldValue::Float(_) => FieldKind::Float,
            FieldValue::Color(_) => FieldKind::Color,
            FieldValue::Vec2(_) => FieldKind::Vec2,
            FieldValue::Curve(_) => FieldKind::Curve,
            FieldValue::TextureRef(_) => FieldKind::TextureRef,
            FieldValue::Int(_) => FieldKind::Int,
            FieldValue::Bool(_) => FieldKind::Bool,
            FieldValue::Text(_) => FieldKind::Text,
        }
    }

    /// The default value for a field of the given kind
    pub fn default_for(kind: FieldKind) -> Self {
        match kind {
            FieldKind::NodeRef => FieldValue::NodeRef(None),
            FieldKind::NodeList => FieldValue::NodeList(Vec::new()),
            FieldKind::MaterialList => FieldValue::MaterialList(Vec::new()),
            FieldKind::NameList => FieldValue::NameList(Vec::new()),
            FieldKind::Float => FieldValue::Float(0.0),
            FieldKind::Color => FieldValue::Color([0.0, 0.0, 0.0, 1.0]),
            FieldKind::Vec2 => FieldValue::Vec2([0.0, 0.0]),
            FieldKind::Curve => FieldValue::Curve(Curve::default()),
            FieldKind::TextureRef => FieldValue::TextureRef(None),
            FieldKind::Int => FieldValue::Int(0),
            FieldKind::Bool => FieldValue::Bool(false),
            FieldKind::Text => FieldValue::Text(String::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_kind() {
        for kind in [
            FieldKind::NodeRef,
            FieldKind::NodeList,
            FieldKind::MaterialList,
            FieldKind::NameList,
            FieldKind::Float,
            FieldKind::Color,
            FieldKind::Vec2,
            FieldKind::Curve,
            FieldKind::TextureRef,
            FieldKind::Int,
            FieldKind::Bool,
            FieldKind::Text,
        ] {
            assert_eq!(FieldValue::default_for(kind).kind(), kind);
        }
    }
}
