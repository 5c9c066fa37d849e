// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per-field-kind encode and decode.
//!
//! Both directions dispatch on the field's declared kind, never on the
//! runtime value. Decoding declines silently when the JSON value is
//! absent, null, or of the wrong JSON kind; only malformed nested curve
//! structures surface as [`DecodeError`], which the importer catches and
//! reports per field.

use crate::format::key;
use crate::resample;
use linework_graph::assets::{escape_name, AssetCatalog};
use linework_graph::curve::{Curve, CurveKey};
use linework_graph::graph::LineGraph;
use linework_graph::node::NodeId;
use linework_graph::schema::FieldSpec;
use linework_graph::value::{FieldKind, FieldValue};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Structural failure inside a nested param
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Curve key object lacks a required component
    #[error("curve key {index} is missing `{component}`")]
    MissingCurveComponent {
        /// Key index in the native key array
        index: usize,
        /// Component name
        component: &'static str,
    },

    /// Curve key component has the wrong JSON kind
    #[error("curve key {index} has a malformed `{component}`")]
    MalformedCurveComponent {
        /// Key index in the native key array
        index: usize,
        /// Component name
        component: &'static str,
    },

    /// Universal curve point is not an `[x, y]` number pair
    #[error("universal curve point {0} is not an [x, y] pair")]
    MalformedCurvePoint(usize),
}

/// Resolution context for decoding one field
pub struct DecodeCx<'a> {
    /// Active unit scale applied to scale-dependent floats
    pub scale: f32,
    /// Document id to materialized node map of the running import
    pub ids: &'a HashMap<String, NodeId>,
    /// The live graph, for name-resolved references
    pub graph: &'a LineGraph,
    /// Host assets, for material and texture lookup
    pub catalog: &'a AssetCatalog,
}

/// Encode one field value into its JSON representation
pub fn encode(
    value: &FieldValue,
    spec: &FieldSpec,
    graph: &LineGraph,
    catalog: &AssetCatalog,
) -> Value {
    match value {
        FieldValue::NodeRef(id) => match id {
            Some(id) if spec.owning => Value::String(id.to_string()),
            Some(id) => match graph.node(*id) {
                Some(node) => Value::String(node.name.clone()),
                None => Value::Null,
            },
            None => Value::Null,
        },
        FieldValue::NodeList(ids) => {
            let entries = ids
                .iter()
                .filter_map(|id| {
                    if spec.owning {
                        Some(Value::String(id.to_string()))
                    } else {
                        graph.node(*id).map(|n| Value::String(n.name.clone()))
                    }
                })
                .collect();
            Value::Array(entries)
        }
        FieldValue::MaterialList(ids) => {
            let entries = ids
                .iter()
                .filter_map(|id| catalog.material(*id))
                .map(|asset| {
                    let mut entry = Map::new();
                    entry.insert("Name".into(), Value::String(asset.name.clone()));
                    entry.insert("Id".into(), Value::Null);
                    entry.insert("MaterialType".into(), Value::String("Other".into()));
                    Value::Object(entry)
                })
                .collect();
            Value::Array(entries)
        }
        FieldValue::NameList(names) => Value::Array(
            names
                .iter()
                .map(|name| Value::String(name.clone()))
                .collect(),
        ),
        FieldValue::Float(v) => json_number(*v),
        FieldValue::Color(c) => Value::Array(c.iter().map(|v| json_number(*v)).collect()),
        FieldValue::Vec2(v) => Value::Array(v.iter().map(|v| json_number(*v)).collect()),
        FieldValue::Curve(curve) => encode_curve(curve),
        FieldValue::TextureRef(id) => id
            .and_then(|id| catalog.texture(id))
            .map_or(Value::Null, |asset| Value::String(asset.name.clone())),
        FieldValue::Int(v) => {
            let v = if spec.flipped_enum { flip_ordinal(*v) } else { *v };
            Value::from(v)
        }
        FieldValue::Bool(v) => Value::Bool(*v),
        FieldValue::Text(v) => Value::String(v.clone()),
    }
}

/// Decode one JSON param into a field value
///
/// `Ok(None)` means the value was declined and the field keeps its
/// default.
pub fn decode(
    value: &Value,
    spec: &FieldSpec,
    cx: &DecodeCx<'_>,
) -> Result<Option<FieldValue>, DecodeError> {
    if value.is_null() {
        return Ok(None);
    }

    let decoded = match spec.kind {
        FieldKind::NodeRef => {
            let Some(id) = value.as_str() else {
                return Ok(None);
            };
            let resolved = if spec.owning {
                cx.ids.get(id).copied()
            } else {
                cx.graph.find_by_name(id).map(|n| n.id)
            };
            match resolved {
                Some(node_id) => FieldValue::NodeRef(Some(node_id)),
                None => return Ok(None),
            }
        }
        FieldKind::NodeList => {
            let Some(entries) = value.as_array() else {
                return Ok(None);
            };
            let mut ids = Vec::new();
            if spec.owning {
                // Unresolvable ids are dropped, not fatal
                ids.extend(
                    entries
                        .iter()
                        .filter_map(Value::as_str)
                        .filter_map(|id| cx.ids.get(id).copied()),
                );
            } else {
                for name in distinct_strings(entries) {
                    ids.extend(
                        cx.graph
                            .nodes()
                            .filter(|n| n.name == name)
                            .map(|n| n.id),
                    );
                }
            }
            FieldValue::NodeList(ids)
        }
        FieldKind::MaterialList => {
            let Some(entries) = value.as_array() else {
                return Ok(None);
            };
            let mut ids = Vec::new();
            for entry in entries {
                let Some(name) = entry.get("Name").and_then(Value::as_str) else {
                    continue;
                };
                let escaped = escape_name(name);
                ids.extend(cx.catalog.materials_named(&escaped).map(|a| a.id));
            }
            FieldValue::MaterialList(ids)
        }
        FieldKind::NameList => {
            let Some(entries) = value.as_array() else {
                return Ok(None);
            };
            FieldValue::NameList(distinct_strings(entries))
        }
        FieldKind::Float => {
            let Some(v) = value.as_f64() else {
                return Ok(None);
            };
            let v = v as f32;
            FieldValue::Float(if spec.scale_dependent { v * cx.scale } else { v })
        }
        FieldKind::Color => match number_array::<4>(value) {
            Some(c) => FieldValue::Color(c),
            None => return Ok(None),
        },
        FieldKind::Vec2 => match number_array::<2>(value) {
            Some(v) => FieldValue::Vec2(v),
            None => return Ok(None),
        },
        FieldKind::Curve => match decode_curve(value)? {
            Some(curve) => FieldValue::Curve(curve),
            None => return Ok(None),
        },
        FieldKind::TextureRef => {
            let Some(name) = value.as_str() else {
                return Ok(None);
            };
            match cx.catalog.find_texture(name) {
                Some(asset) => FieldValue::TextureRef(Some(asset.id)),
                None => return Ok(None),
            }
        }
        FieldKind::Int => {
            let Some(v) = value.as_i64() else {
                return Ok(None);
            };
            let v = v as i32;
            FieldValue::Int(if spec.flipped_enum { flip_ordinal(v) } else { v })
        }
        FieldKind::Bool => match value.as_bool() {
            Some(v) => FieldValue::Bool(v),
            None => return Ok(None),
        },
        FieldKind::Text => match value.as_str() {
            Some(v) => FieldValue::Text(v.to_owned()),
            None => return Ok(None),
        },
    };

    Ok(Some(decoded))
}

/// Invert a two-valued enum ordinal
fn flip_ordinal(v: i32) -> i32 {
    if v == 0 {
        1
    } else {
        0
    }
}

fn json_number(v: f32) -> Value {
    Value::from(f64::from(v))
}

fn distinct_strings(entries: &[Value]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for name in entries.iter().filter_map(Value::as_str) {
        if !out.iter().any(|seen| seen == name) {
            out.push(name.to_owned());
        }
    }
    out
}

fn number_array<const N: usize>(value: &Value) -> Option<[f32; N]> {
    let entries = value.as_array()?;
    if entries.len() < N {
        return None;
    }
    let mut out = [0.0; N];
    for (slot, entry) in out.iter_mut().zip(entries) {
        *slot = entry.as_f64()? as f32;
    }
    Some(out)
}

fn encode_curve(curve: &Curve) -> Value {
    let mut object = Map::new();

    let native: Vec<Value> = curve
        .keys()
        .iter()
        .map(|key| serde_json::to_value(key).unwrap_or(Value::Null))
        .collect();
    object.insert(key::NATIVE_CURVE_KEYS.into(), Value::Array(native));

    let universal: Vec<Value> = resample::universal_points(curve)
        .iter()
        .map(|p| Value::Array(vec![json_number(p[0]), json_number(p[1])]))
        .collect();
    object.insert(key::UNIVERSAL_CURVE_KEYS.into(), Value::Array(universal));

    Value::Object(object)
}

fn decode_curve(value: &Value) -> Result<Option<Curve>, DecodeError> {
    let Some(object) = value.as_object() else {
        return Ok(None);
    };
    if let Some(native) = object.get(key::NATIVE_CURVE_KEYS) {
        return decode_native_curve(native);
    }
    if let Some(universal) = object.get(key::UNIVERSAL_CURVE_KEYS) {
        return decode_universal_curve(universal);
    }
    Ok(None)
}

fn decode_native_curve(value: &Value) -> Result<Option<Curve>, DecodeError> {
    let Some(entries) = value.as_array() else {
        return Ok(None);
    };

    let mut keys = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let component = |name: &'static str| -> Result<f64, DecodeError> {
            let v = entry
                .get(name)
                .ok_or(DecodeError::MissingCurveComponent { index, component: name })?;
            v.as_f64()
                .ok_or(DecodeError::MalformedCurveComponent { index, component: name })
        };

        let mut key = CurveKey::new(
            component(key::CURVE_TIME)? as f32,
            component(key::CURVE_VALUE)? as f32,
            component(key::CURVE_IN_TANGENT)? as f32,
            component(key::CURVE_OUT_TANGENT)? as f32,
        );

        // The weight trio travels together or not at all
        if let (Some(in_weight), Some(out_weight), Some(mode)) = (
            entry.get(key::CURVE_IN_WEIGHT).and_then(Value::as_f64),
            entry.get(key::CURVE_OUT_WEIGHT).and_then(Value::as_f64),
            entry.get(key::CURVE_WEIGHTED_MODE).and_then(Value::as_i64),
        ) {
            key.in_weight = in_weight as f32;
            key.out_weight = out_weight as f32;
            key.weighted_mode = mode as i32;
        }

        if let Some(broken) = entry.get(key::CURVE_KEY_BROKEN).and_then(Value::as_bool) {
            key.broken = broken;
        }
        if let Some(mode) = entry
            .get(key::CURVE_LEFT_TANGENT_MODE)
            .and_then(Value::as_i64)
        {
            key.left_tangent_mode = mode as i32;
        }
        if let Some(mode) = entry
            .get(key::CURVE_RIGHT_TANGENT_MODE)
            .and_then(Value::as_i64)
        {
            key.right_tangent_mode = mode as i32;
        }

        keys.push(key);
    }

    Ok(Some(Curve::from_keys(keys)))
}

fn decode_universal_curve(value: &Value) -> Result<Option<Curve>, DecodeError> {
    let Some(entries) = value.as_array() else {
        return Ok(None);
    };

    let mut points = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let pair = entry
            .as_array()
            .filter(|pair| pair.len() >= 2)
            .ok_or(DecodeError::MalformedCurvePoint(index))?;
        let x = pair[0]
            .as_f64()
            .ok_or(DecodeError::MalformedCurvePoint(index))?;
        let y = pair[1]
            .as_f64()
            .ok_or(DecodeError::MalformedCurvePoint(index))?;
        points.push([x as f32, y as f32]);
    }

    Ok(Some(resample::curve_from_universal(&points)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use linework_graph::node::{Node, NodeKind};
    use linework_graph::schema::find_spec;
    use serde_json::json;

    fn empty_cx<'a>(
        ids: &'a HashMap<String, NodeId>,
        graph: &'a LineGraph,
        catalog: &'a AssetCatalog,
    ) -> DecodeCx<'a> {
        DecodeCx {
            scale: 1.0,
            ids,
            graph,
            catalog,
        }
    }

    #[test]
    fn test_scale_dependent_float_scales_on_decode_only() {
        let spec = find_spec(NodeKind::ReductionSettings, "ReductionStart").unwrap();
        let graph = LineGraph::new("root");
        let catalog = AssetCatalog::new();
        let ids = HashMap::new();

        let encoded = encode(&FieldValue::Float(2.0), spec, &graph, &catalog);
        assert_eq!(encoded, json!(2.0));

        let mut cx = empty_cx(&ids, &graph, &catalog);
        cx.scale = 100.0;
        let decoded = decode(&encoded, spec, &cx).unwrap().unwrap();
        assert_eq!(decoded, FieldValue::Float(200.0));
    }

    #[test]
    fn test_wrong_json_kind_is_declined() {
        let spec = find_spec(NodeKind::Line, "RenderPriority").unwrap();
        let graph = LineGraph::new("root");
        let catalog = AssetCatalog::new();
        let ids = HashMap::new();
        let cx = empty_cx(&ids, &graph, &catalog);

        assert_eq!(decode(&json!("three"), spec, &cx).unwrap(), None);
        assert_eq!(decode(&json!(2.5), spec, &cx).unwrap(), None);
        assert_eq!(decode(&Value::Null, spec, &cx).unwrap(), None);
        assert_eq!(
            decode(&json!(3), spec, &cx).unwrap(),
            Some(FieldValue::Int(3))
        );
    }

    #[test]
    fn test_flipped_enum_inverts_both_ways() {
        let spec = find_spec(NodeKind::BrushDetail, "LoopDirection").unwrap();
        let graph = LineGraph::new("root");
        let catalog = AssetCatalog::new();
        let ids = HashMap::new();
        let cx = empty_cx(&ids, &graph, &catalog);

        let encoded = encode(&FieldValue::Int(0), spec, &graph, &catalog);
        assert_eq!(encoded, json!(1));
        assert_eq!(
            decode(&encoded, spec, &cx).unwrap(),
            Some(FieldValue::Int(0))
        );
    }

    #[test]
    fn test_short_color_array_is_declined() {
        let spec = find_spec(NodeKind::LineFunctions, "OutlineColor").unwrap();
        let graph = LineGraph::new("root");
        let catalog = AssetCatalog::new();
        let ids = HashMap::new();
        let cx = empty_cx(&ids, &graph, &catalog);

        assert_eq!(decode(&json!([1.0, 0.5]), spec, &cx).unwrap(), None);
        assert_eq!(decode(&json!([1.0, 0.5, 0.0, "x"]), spec, &cx).unwrap(), None);
        assert_eq!(
            decode(&json!([1.0, 0.5, 0.0, 1.0]), spec, &cx).unwrap(),
            Some(FieldValue::Color([1.0, 0.5, 0.0, 1.0]))
        );
    }

    #[test]
    fn test_owning_list_drops_unresolved_ids() {
        let spec = find_spec(NodeKind::Line, "LineSets").unwrap();
        let graph = LineGraph::new("root");
        let catalog = AssetCatalog::new();
        let target = NodeId::new();
        let mut ids = HashMap::new();
        ids.insert("known".to_owned(), target);
        let cx = empty_cx(&ids, &graph, &catalog);

        let decoded = decode(&json!(["known", "unknown"]), spec, &cx).unwrap();
        assert_eq!(decoded, Some(FieldValue::NodeList(vec![target])));
    }

    #[test]
    fn test_name_resolved_list_collects_every_match() {
        let spec = find_spec(NodeKind::LineGroup, "TargetLines").unwrap();
        let mut graph = LineGraph::new("root");
        let a = graph.add_node(Node::new(NodeKind::Line, "A"));
        let a2 = graph.add_node(Node::new(NodeKind::Line, "A"));
        let catalog = AssetCatalog::new();
        let ids = HashMap::new();
        let cx = empty_cx(&ids, &graph, &catalog);

        // Duplicate names in the document collapse before lookup
        let decoded = decode(&json!(["A", "A", "missing"]), spec, &cx).unwrap();
        assert_eq!(decoded, Some(FieldValue::NodeList(vec![a, a2])));
    }

    #[test]
    fn test_material_list_round_trip_escapes_names() {
        let spec = find_spec(NodeKind::LineSet, "Materials").unwrap();
        let graph = LineGraph::new("root");
        let mut catalog = AssetCatalog::new();
        let id = catalog.add_material("Skin_01");
        let ids = HashMap::new();
        let cx = empty_cx(&ids, &graph, &catalog);

        let encoded = encode(&FieldValue::MaterialList(vec![id]), spec, &graph, &catalog);
        assert_eq!(
            encoded,
            json!([{"Name": "Skin_01", "Id": null, "MaterialType": "Other"}])
        );

        // The incoming name is escaped before lookup
        let incoming = json!([{"Name": "Skin:01", "Id": null, "MaterialType": "Other"}]);
        let decoded = decode(&incoming, spec, &cx).unwrap();
        assert_eq!(decoded, Some(FieldValue::MaterialList(vec![id])));
    }

    #[test]
    fn test_texture_ref_resolves_by_name() {
        let spec = find_spec(NodeKind::TextureMap, "Texture").unwrap();
        let graph = LineGraph::new("root");
        let mut catalog = AssetCatalog::new();
        let id = catalog.add_texture("paper");
        let ids = HashMap::new();
        let cx = empty_cx(&ids, &graph, &catalog);

        let encoded = encode(&FieldValue::TextureRef(Some(id)), spec, &graph, &catalog);
        assert_eq!(encoded, json!("paper"));
        assert_eq!(
            decode(&encoded, spec, &cx).unwrap(),
            Some(FieldValue::TextureRef(Some(id)))
        );
        assert_eq!(decode(&json!("missing"), spec, &cx).unwrap(), None);
    }

    #[test]
    fn test_native_curve_round_trip() {
        let spec = find_spec(NodeKind::ReductionSettings, "ReductionCurve").unwrap();
        let graph = LineGraph::new("root");
        let catalog = AssetCatalog::new();
        let ids = HashMap::new();
        let cx = empty_cx(&ids, &graph, &catalog);

        let mut key = CurveKey::new(0.25, 0.75, 1.5, -1.5);
        key.broken = true;
        key.weighted_mode = 3;
        key.in_weight = 0.2;
        key.out_weight = 0.4;
        let curve = Curve::from_keys(vec![CurveKey::flat(0.0, 0.0), key]);

        let encoded = encode(&FieldValue::Curve(curve.clone()), spec, &graph, &catalog);
        let decoded = decode(&encoded, spec, &cx).unwrap().unwrap();
        assert_eq!(decoded, FieldValue::Curve(curve));
    }

    #[test]
    fn test_universal_only_curve_is_reconstructed() {
        let spec = find_spec(NodeKind::ReductionSettings, "ReductionCurve").unwrap();
        let graph = LineGraph::new("root");
        let catalog = AssetCatalog::new();
        let ids = HashMap::new();
        let cx = empty_cx(&ids, &graph, &catalog);

        let incoming = json!({"UniversalKeys": [[0.0, 0.0], [1.0, 1.0]]});
        let decoded = decode(&incoming, spec, &cx).unwrap().unwrap();
        let FieldValue::Curve(curve) = decoded else {
            panic!("expected a curve");
        };
        assert_eq!(curve.keys().len(), 2);
        assert!((curve.evaluate(0.5) - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_malformed_native_curve_is_a_structural_error() {
        let spec = find_spec(NodeKind::ReductionSettings, "ReductionCurve").unwrap();
        let graph = LineGraph::new("root");
        let catalog = AssetCatalog::new();
        let ids = HashMap::new();
        let cx = empty_cx(&ids, &graph, &catalog);

        let missing = json!({"NativeCurveKeys": [{"Time": 0.0, "Value": 1.0, "InTangent": 0.0}]});
        assert!(matches!(
            decode(&missing, spec, &cx),
            Err(DecodeError::MissingCurveComponent { .. })
        ));

        let malformed = json!({"UniversalKeys": [[0.0, 0.0], [1.0]]});
        assert!(matches!(
            decode(&malformed, spec, &cx),
            Err(DecodeError::MalformedCurvePoint(1))
        ));
    }
}
