// SPDX-License-Identifier: MIT OR Apache-2.0
//! Statically declared field tables, one per node kind.
//!
//! Each table lists a node kind's fields under their portable aliases,
//! together with the declared kind and the codec modifiers:
//! - `owning`: a node reference field that owns (and re-parents) its target,
//!   as opposed to a same-shaped field resolved by display name
//! - `scale_dependent`: a float multiplied by the active unit scale when
//!   materialized into the host, never when written out
//! - `flipped_enum`: a two-valued enum whose portable ordinal is the
//!   inverse of the in-memory one

use crate::node::NodeKind;
use crate::value::FieldKind;

/// Declaration of a single field
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Portable alias used as the document param key
    pub alias: &'static str,
    /// Declared kind
    pub kind: FieldKind,
    /// Whether a node reference field owns its target
    pub owning: bool,
    /// Whether the float is multiplied by the unit scale on decode
    pub scale_dependent: bool,
    /// Whether the enum ordinal is inverted in the portable form
    pub flipped_enum: bool,
}

impl FieldSpec {
    const fn new(alias: &'static str, kind: FieldKind) -> Self {
        Self {
            alias,
            kind,
            owning: false,
            scale_dependent: false,
            flipped_enum: false,
        }
    }

    const fn owning(mut self) -> Self {
        self.owning = true;
        self
    }

    const fn scale_dependent(mut self) -> Self {
        self.scale_dependent = true;
        self
    }

    const fn flipped_enum(mut self) -> Self {
        self.flipped_enum = true;
        self
    }
}

const LINE_LIST_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("LineList", FieldKind::NodeList).owning(),
    FieldSpec::new("LineFunctionsList", FieldKind::NodeList).owning(),
    FieldSpec::new("DoubleSidedMaterials", FieldKind::MaterialList),
    FieldSpec::new("IgnoreObjectList", FieldKind::NameList),
    FieldSpec::new("LineGroupList", FieldKind::NodeList).owning(),
];

const LINE_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("LineSets", FieldKind::NodeList).owning(),
    FieldSpec::new("RenderPriority", FieldKind::Int),
    FieldSpec::new("LineSizeType", FieldKind::Int),
    FieldSpec::new("OverSampling", FieldKind::Int),
    FieldSpec::new("Antialiasing", FieldKind::Float),
    FieldSpec::new("OffscreenDistance", FieldKind::Float).scale_dependent(),
    FieldSpec::new("RandomSeed", FieldKind::Int),
];

const LINE_GROUP_FIELDS: &[FieldSpec] = &[
    // Grouped lines are resolved by display name, not identity
    FieldSpec::new("TargetLines", FieldKind::NodeList),
];

const LINE_SET_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("Objects", FieldKind::NameList),
    FieldSpec::new("Materials", FieldKind::MaterialList),
    FieldSpec::new("WeldEdges", FieldKind::Bool),
    FieldSpec::new("MaskHiddenLines", FieldKind::Bool),
    // Base brushes, always exported with the line set
    FieldSpec::new("VBrushSettings", FieldKind::NodeRef).owning(),
    FieldSpec::new("HBrushSettings", FieldKind::NodeRef).owning(),
    // Per-edge-kind specific brushes, each guarded by its "specific on" flag
    FieldSpec::new("VOutline", FieldKind::NodeRef).owning(),
    FieldSpec::new("VOutlineSpecificOn", FieldKind::Bool),
    FieldSpec::new("VObject", FieldKind::NodeRef).owning(),
    FieldSpec::new("VObjectSpecificOn", FieldKind::Bool),
    FieldSpec::new("VIntersection", FieldKind::NodeRef).owning(),
    FieldSpec::new("VIntersectionSpecificOn", FieldKind::Bool),
    FieldSpec::new("VSmooth", FieldKind::NodeRef).owning(),
    FieldSpec::new("VSmoothSpecificOn", FieldKind::Bool),
    FieldSpec::new("VMaterial", FieldKind::NodeRef).owning(),
    FieldSpec::new("VMaterialSpecificOn", FieldKind::Bool),
    FieldSpec::new("VSelected", FieldKind::NodeRef).owning(),
    FieldSpec::new("VSelectedSpecificOn", FieldKind::Bool),
    FieldSpec::new("VNormalAngle", FieldKind::NodeRef).owning(),
    FieldSpec::new("VNormalAngleSpecificOn", FieldKind::Bool),
    FieldSpec::new("VWireframe", FieldKind::NodeRef).owning(),
    FieldSpec::new("VWireframeSpecificOn", FieldKind::Bool),
    FieldSpec::new("HOutline", FieldKind::NodeRef).owning(),
    FieldSpec::new("HOutlineSpecificOn", FieldKind::Bool),
    FieldSpec::new("HObject", FieldKind::NodeRef).owning(),
    FieldSpec::new("HObjectSpecificOn", FieldKind::Bool),
    FieldSpec::new("HIntersection", FieldKind::NodeRef).owning(),
    FieldSpec::new("HIntersectionSpecificOn", FieldKind::Bool),
    FieldSpec::new("HSmooth", FieldKind::NodeRef).owning(),
    FieldSpec::new("HSmoothSpecificOn", FieldKind::Bool),
    FieldSpec::new("HMaterial", FieldKind::NodeRef).owning(),
    FieldSpec::new("HMaterialSpecificOn", FieldKind::Bool),
    FieldSpec::new("HSelected", FieldKind::NodeRef).owning(),
    FieldSpec::new("HSelectedSpecificOn", FieldKind::Bool),
    FieldSpec::new("HNormalAngle", FieldKind::NodeRef).owning(),
    FieldSpec::new("HNormalAngleSpecificOn", FieldKind::Bool),
    FieldSpec::new("HWireframe", FieldKind::NodeRef).owning(),
    FieldSpec::new("HWireframeSpecificOn", FieldKind::Bool),
    // Distance reductions, each guarded by its "on" flag
    FieldSpec::new("VSizeReduction", FieldKind::NodeRef).owning(),
    FieldSpec::new("VSizeReductionOn", FieldKind::Bool),
    FieldSpec::new("VAlphaReduction", FieldKind::NodeRef).owning(),
    FieldSpec::new("VAlphaReductionOn", FieldKind::Bool),
    FieldSpec::new("HSizeReduction", FieldKind::NodeRef).owning(),
    FieldSpec::new("HSizeReductionOn", FieldKind::Bool),
    FieldSpec::new("HAlphaReduction", FieldKind::NodeRef).owning(),
    FieldSpec::new("HAlphaReductionOn", FieldKind::Bool),
];

const LINE_FUNCTIONS_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("TargetMaterials", FieldKind::MaterialList),
    FieldSpec::new("OutlineOn", FieldKind::Bool),
    FieldSpec::new("OutlineColor", FieldKind::Color),
    FieldSpec::new("OutlineAmount", FieldKind::Float),
    FieldSpec::new("ObjectOn", FieldKind::Bool),
    FieldSpec::new("ObjectColor", FieldKind::Color),
    FieldSpec::new("ObjectAmount", FieldKind::Float),
    FieldSpec::new("IntersectionOn", FieldKind::Bool),
    FieldSpec::new("IntersectionColor", FieldKind::Color),
    FieldSpec::new("IntersectionAmount", FieldKind::Float),
    FieldSpec::new("SmoothOn", FieldKind::Bool),
    FieldSpec::new("SmoothColor", FieldKind::Color),
    FieldSpec::new("SmoothAmount", FieldKind::Float),
    FieldSpec::new("MaterialOn", FieldKind::Bool),
    FieldSpec::new("MaterialColor", FieldKind::Color),
    FieldSpec::new("MaterialAmount", FieldKind::Float),
    FieldSpec::new("DisableIntersection", FieldKind::Bool),
    FieldSpec::new("DrawHiddenLines", FieldKind::Bool),
];

const BRUSH_SETTINGS_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("BrushDetail", FieldKind::NodeRef).owning(),
    FieldSpec::new("BlendAmount", FieldKind::Float),
    FieldSpec::new("BrushColor", FieldKind::Color),
    FieldSpec::new("ColorMap", FieldKind::NodeRef).owning(),
    FieldSpec::new("ColorMapOpacity", FieldKind::Float),
    FieldSpec::new("Size", FieldKind::Float),
    FieldSpec::new("SizeMap", FieldKind::NodeRef).owning(),
    FieldSpec::new("SizeMapAmount", FieldKind::Float),
    FieldSpec::new("Stretch", FieldKind::Float),
    FieldSpec::new("Angle", FieldKind::Float),
];

const BRUSH_DETAIL_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("BrushType", FieldKind::Int),
    FieldSpec::new("BrushMap", FieldKind::NodeRef).owning(),
    FieldSpec::new("MapOpacity", FieldKind::Float),
    FieldSpec::new("Stretch", FieldKind::Float),
    FieldSpec::new("StretchRandom", FieldKind::Float),
    FieldSpec::new("Angle", FieldKind::Float),
    FieldSpec::new("AngleRandom", FieldKind::Float),
    FieldSpec::new("Groove", FieldKind::Float),
    FieldSpec::new("GrooveNumber", FieldKind::Int),
    FieldSpec::new("Size", FieldKind::Float),
    FieldSpec::new("SizeRandom", FieldKind::Float),
    FieldSpec::new("DistortionEnable", FieldKind::Bool),
    FieldSpec::new("DistortionMap", FieldKind::NodeRef).owning(),
    FieldSpec::new("DistortionMapAmount", FieldKind::Float),
    FieldSpec::new("DistortionRandom", FieldKind::Float),
    // The loop direction ordinal is inverted on other platforms
    FieldSpec::new("LoopDirection", FieldKind::Int).flipped_enum(),
];

const REDUCTION_SETTINGS_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("ReductionStart", FieldKind::Float).scale_dependent(),
    FieldSpec::new("ReductionEnd", FieldKind::Float).scale_dependent(),
    FieldSpec::new("ReferObject", FieldKind::Bool),
    FieldSpec::new("ReductionCurve", FieldKind::Curve),
];

const TEXTURE_MAP_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("TextureUV", FieldKind::Int),
    FieldSpec::new("Tiling", FieldKind::Vec2),
    FieldSpec::new("Offset", FieldKind::Vec2),
    FieldSpec::new("WrapModeU", FieldKind::Int),
    FieldSpec::new("WrapModeV", FieldKind::Int),
    FieldSpec::new("Texture", FieldKind::TextureRef),
];

/// The field table for a node kind
pub fn field_specs(kind: NodeKind) -> &'static [FieldSpec] {
    match kind {
        NodeKind::LineList => LINE_LIST_FIELDS,
        NodeKind::Line => LINE_FIELDS,
        NodeKind::LineGroup => LINE_GROUP_FIELDS,
        NodeKind::LineSet => LINE_SET_FIELDS,
        NodeKind::LineFunctions => LINE_FUNCTIONS_FIELDS,
        NodeKind::BrushSettings => BRUSH_SETTINGS_FIELDS,
        NodeKind::BrushDetail => BRUSH_DETAIL_FIELDS,
        NodeKind::ReductionSettings => REDUCTION_SETTINGS_FIELDS,
        NodeKind::TextureMap => TEXTURE_MAP_FIELDS,
    }
}

/// Look up one field declaration by alias
pub fn find_spec(kind: NodeKind, alias: &str) -> Option<&'static FieldSpec> {
    field_specs(kind).iter().find(|spec| spec.alias == alias)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_unique_per_kind() {
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
            let specs = field_specs(kind);
            let mut seen = std::collections::HashSet::new();
            for spec in specs {
                assert!(seen.insert(spec.alias), "duplicate alias {} on {kind:?}", spec.alias);
            }
        }
    }

    #[test]
    fn test_line_set_brush_table_complete() {
        // Two base brushes plus eight guarded specific brushes per direction
        let refs = field_specs(NodeKind::LineSet)
            .iter()
            .filter(|s| s.kind == FieldKind::NodeRef && s.owning)
            .count();
        assert_eq!(refs, 2 + 16 + 4);
    }

    #[test]
    fn test_find_spec() {
        let spec = find_spec(NodeKind::ReductionSettings, "ReductionStart").unwrap();
        assert!(spec.scale_dependent);
        assert!(find_spec(NodeKind::Line, "ReductionStart").is_none());
    }

    #[test]
    fn test_loop_direction_is_flipped() {
        let spec = find_spec(NodeKind::BrushDetail, "LoopDirection").unwrap();
        assert!(spec.flipped_enum);
        assert_eq!(spec.kind, FieldKind::Int);
    }
}
