// SPDX-License-Identifier: MIT OR Apache-2.0
//! Dependency closure over a document.
//!
//! Given the caller-selected line ids, computes every record id that has
//! to travel with them: the referenced line sets, their brush and
//! reduction settings (honoring the disabled-setting policy flags), the
//! brush details behind the brush settings, and the texture maps behind
//! both. Unresolvable or malformed references are skipped, never fatal.

use crate::document::{Document, NodeRecord};
use crate::format::key;
use serde_json::Value;
use std::collections::HashSet;

/// Record types imported regardless of selection
pub const MANDATORY_NODE_TYPES: &[&str] = &["LineList", "LineGroup"];

/// Line-set brush fields and their guarding "specific on" flags
///
/// The two base brushes are unconditional.
const BRUSH_SETTING_FIELDS: &[(&str, Option<&str>)] = &[
    ("VBrushSettings", None),
    ("HBrushSettings", None),
    ("VOutline", Some("VOutlineSpecificOn")),
    ("VObject", Some("VObjectSpecificOn")),
    ("VIntersection", Some("VIntersectionSpecificOn")),
    ("VSmooth", Some("VSmoothSpecificOn")),
    ("VMaterial", Some("VMaterialSpecificOn")),
    ("VSelected", Some("VSelectedSpecificOn")),
    ("VNormalAngle", Some("VNormalAngleSpecificOn")),
    ("VWireframe", Some("VWireframeSpecificOn")),
    ("HOutline", Some("HOutlineSpecificOn")),
    ("HObject", Some("HObjectSpecificOn")),
    ("HIntersection", Some("HIntersectionSpecificOn")),
    ("HSmooth", Some("HSmoothSpecificOn")),
    ("HMaterial", Some("HMaterialSpecificOn")),
    ("HSelected", Some("HSelectedSpecificOn")),
    ("HNormalAngle", Some("HNormalAngleSpecificOn")),
    ("HWireframe", Some("HWireframeSpecificOn")),
];

/// Line-set reduction fields and their guarding "on" flags
const REDUCTION_SETTING_FIELDS: &[(&str, &str)] = &[
    ("VSizeReduction", "VSizeReductionOn"),
    ("VAlphaReduction", "VAlphaReductionOn"),
    ("HSizeReduction", "HSizeReductionOn"),
    ("HAlphaReduction", "HAlphaReductionOn"),
];

/// Texture map fields per record type
const TEXTURE_MAP_FIELDS: &[(&str, &[&str])] = &[
    ("BrushSettings", &["ColorMap", "SizeMap"]),
    ("BrushDetail", &["BrushMap", "DistortionMap"]),
];

/// Compute the full id set to import for the selected lines
pub fn collect_import_ids(
    doc: &Document,
    selected: &HashSet<String>,
    include_disabled_specific_brush: bool,
    include_disabled_reduction: bool,
) -> HashSet<String> {
    let mut ids: HashSet<String> = selected.clone();

    let line_set_ids: Vec<&str> = selected
        .iter()
        .filter_map(|id| doc.line_nodes.get(id))
        .filter_map(|record| record.params.get(key::LINE_SETS))
        .filter_map(Value::as_array)
        .flatten()
        .filter_map(Value::as_str)
        .collect();

    for line_set_id in &line_set_ids {
        ids.insert((*line_set_id).to_owned());
    }

    let line_set_records = line_set_ids
        .iter()
        .filter_map(|id| doc.line_nodes.get(*id))
        .filter(|record| record.node_type == "LineSet");

    for line_set in line_set_records {
        for (field, guard) in BRUSH_SETTING_FIELDS {
            if let Some((brush_id, detail_id)) =
                fetch_brush_setting(doc, line_set, field, *guard, include_disabled_specific_brush)
            {
                ids.insert(brush_id.to_owned());
                ids.insert(detail_id.to_owned());
            }
        }
        for (field, guard) in REDUCTION_SETTING_FIELDS {
            if let Some(id) =
                fetch_reduction_setting(line_set, field, guard, include_disabled_reduction)
            {
                ids.insert(id.to_owned());
            }
        }
    }

    let texture_ids: Vec<String> = ids
        .iter()
        .flat_map(|id| collect_texture_map_ids(doc, id))
        .collect();
    ids.extend(texture_ids);

    ids
}

/// Whether a guarded setting is switched off and therefore excluded
fn guarded_off(record: &NodeRecord, guard: Option<&str>, include_disabled: bool) -> bool {
    if include_disabled {
        return false;
    }
    match guard.and_then(|g| record.params.get(g)) {
        Some(Value::Bool(on)) => !on,
        _ => false,
    }
}

fn fetch_brush_setting<'a>(
    doc: &'a Document,
    line_set: &NodeRecord,
    field: &str,
    guard: Option<&str>,
    include_disabled: bool,
) -> Option<(&'a str, &'a str)> {
    if guarded_off(line_set, guard, include_disabled) {
        return None;
    }

    let brush_id = line_set.params.get(field)?.as_str()?;
    let (brush_id, brush) = doc.line_nodes.get_key_value(brush_id)?;
    let detail_id = brush.params.get("BrushDetail")?.as_str()?;
    Some((brush_id.as_str(), detail_id))
}

fn fetch_reduction_setting<'a>(
    line_set: &'a NodeRecord,
    field: &str,
    guard: &str,
    include_disabled: bool,
) -> Option<&'a str> {
    if guarded_off(line_set, Some(guard), include_disabled) {
        return None;
    }
    line_set.params.get(field)?.as_str()
}

fn collect_texture_map_ids<'a>(doc: &'a Document, id: &str) -> Vec<String> {
    let Some(record) = doc.line_nodes.get(id) else {
        return Vec::new();
    };
    TEXTURE_MAP_FIELDS
        .iter()
        .filter(|(node_type, _)| *node_type == record.node_type)
        .flat_map(|(_, fields)| *fields)
        .filter_map(|field| record.params.get(*field))
        .filter_map(Value::as_str)
        .map(str::to_owned)
        .collect()
}
