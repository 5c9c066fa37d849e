// SPDX-License-Identifier: MIT OR Apache-2.0
//! Synthetic material records.
//!
//! Materials are host-managed resources, not graph nodes. The exporter
//! represents each material targeted by a line-function node as a
//! standalone record carrying the host's default material parameters
//! plus a back-reference to the owning line-function node. The importer
//! consumes these records for field linking only; they never become
//! live nodes.

use crate::document::NodeRecord;
use serde::Serialize;
use serde_json::Value;

/// Record type tag of synthetic material records
pub const MATERIAL_NODE_TYPE: &str = "Material";

/// Alias of the back-reference to the owning line-function node
pub const LINE_FUNCTIONS_PARAM: &str = "LineFunctions";

/// Default parameter set of a synthetic material record
#[derive(Debug, Clone, Serialize)]
pub struct MaterialParams {
    /// Base surface color
    #[serde(rename = "BasicMaterial")]
    pub basic_material: [f32; 4],
    /// Optional advanced material reference, unused here
    #[serde(rename = "AdvancedMaterial")]
    pub advanced_material: Option<String>,
    /// Shading blend mode ordinal
    #[serde(rename = "BlendMode")]
    pub blend_mode: i32,
    /// Shading blend amount
    #[serde(rename = "BlendAmount")]
    pub blend_amount: f32,
    /// Highlight color
    #[serde(rename = "HighlightColor")]
    pub highlight_color: [f32; 4],
    /// Whether the color map is applied
    #[serde(rename = "ColorMapOn")]
    pub color_map_on: bool,
    /// Color map reference, unused here
    #[serde(rename = "ColorMap")]
    pub color_map: Option<String>,
    /// Color map opacity
    #[serde(rename = "MapOpacity")]
    pub map_opacity: f32,
    /// Specular level
    #[serde(rename = "SpecularLevel")]
    pub specular_level: f32,
    /// Specular glossiness
    #[serde(rename = "Glossiness")]
    pub glossiness: f32,
    /// Anisotropic shaping of the highlight
    #[serde(rename = "Anisotropic")]
    pub anisotropic: f32,
    /// Highlight orientation ordinal
    #[serde(rename = "Orientation")]
    pub orientation: i32,
    /// Highlight sharpness
    #[serde(rename = "Sharpness")]
    pub sharpness: f32,
    /// Highlight squash
    #[serde(rename = "Squash")]
    pub squash: f32,
    /// Diffraction strength
    #[serde(rename = "DiffractionEffect")]
    pub diffraction_effect: f32,
    /// Diffraction range
    #[serde(rename = "Range")]
    pub range: f32,
    /// Whether bump mapping is applied
    #[serde(rename = "BumpOn")]
    pub bump_on: bool,
    /// Bump amount
    #[serde(rename = "BumpAmount")]
    pub bump_amount: f32,
    /// Whether bump suppresses the highlight
    #[serde(rename = "BumpDisableHighlight")]
    pub bump_disable_highlight: bool,
    /// Whether reflection is applied
    #[serde(rename = "ReflectionOn")]
    pub reflection_on: bool,
    /// Reflection amount
    #[serde(rename = "ReflectionAmount")]
    pub reflection_amount: f32,
    /// Reflection color
    #[serde(rename = "ReflectionColor")]
    pub reflection_color: [f32; 4],
    /// Base transparency color
    #[serde(rename = "BasicMaterialTransparency")]
    pub basic_material_transparency: [f32; 4],
    /// Back-reference to the owning line-function node
    #[serde(rename = "LineFunctions")]
    pub line_functions: Option<String>,
    /// Shading gradation block
    #[serde(rename = "Gradation")]
    pub gradation: Gradation,
    /// Free-form user block
    #[serde(rename = "UserDef")]
    pub user_def: UserDef,
}

/// Shading gradation block of a material record
#[derive(Debug, Clone, Serialize)]
pub struct Gradation {
    /// Portable gradation stops
    #[serde(rename = "UniversalGradation")]
    pub universal_gradation: Vec<GradationStop>,
}

/// One portable gradation stop
#[derive(Debug, Clone, Serialize)]
pub struct GradationStop {
    /// Stop blend amount
    #[serde(rename = "BlendAmount")]
    pub blend_amount: f32,
    /// Stop blend mode ordinal
    #[serde(rename = "BlendMode")]
    pub blend_mode: i32,
    /// Stop color
    #[serde(rename = "Color")]
    pub color: [f32; 4],
    /// Stop color map reference, unused here
    #[serde(rename = "ColorMap")]
    pub color_map: Option<String>,
    /// Whether the stop color map is applied
    #[serde(rename = "ColorMapOn")]
    pub color_map_on: bool,
    /// Whether the stop is active
    #[serde(rename = "Enable")]
    pub enable: bool,
    /// Stop interpolation ordinal
    #[serde(rename = "Interpolation")]
    pub interpolation: i32,
    /// Stop color map opacity
    #[serde(rename = "MapOpacity")]
    pub map_opacity: f32,
    /// Stop position in the gradation
    #[serde(rename = "Position")]
    pub position: f32,
}

impl GradationStop {
    fn at(position: f32, color: [f32; 4]) -> Self {
        Self {
            blend_amount: 1.0,
            blend_mode: 0,
            color,
            color_map: None,
            color_map_on: true,
            enable: true,
            interpolation: 0,
            map_opacity: 1.0,
            position,
        }
    }
}

/// Free-form user block of a material record
#[derive(Debug, Clone, Serialize)]
pub struct UserDef {
    /// User comment
    #[serde(rename = "Comment")]
    pub comment: String,
    /// User label color
    #[serde(rename = "Label")]
    pub label: [f32; 4],
}

impl Default for MaterialParams {
    fn default() -> Self {
        Self {
            basic_material: [0.5, 0.5, 0.5, 1.0],
            advanced_material: None,
            blend_mode: 0,
            blend_amount: 1.0,
            highlight_color: [1.0, 1.0, 1.0, 1.0],
            color_map_on: true,
            color_map: None,
            map_opacity: 1.0,
            specular_level: 0.0,
            glossiness: 0.1,
            anisotropic: 0.0,
            orientation: 0,
            sharpness: 0.0,
            squash: 0.0,
            diffraction_effect: 0.0,
            range: 0.0,
            bump_on: false,
            bump_amount: 0.0,
            bump_disable_highlight: false,
            reflection_on: false,
            reflection_amount: 1.0,
            reflection_color: [1.0, 1.0, 1.0, 1.0],
            basic_material_transparency: [0.0, 0.0, 0.0, 0.0],
            line_functions: None,
            gradation: Gradation {
                universal_gradation: vec![
                    GradationStop::at(0.0, [0.0, 0.0, 0.0, 1.0]),
                    GradationStop::at(0.25, [0.333, 0.333, 0.333, 1.0]),
                    GradationStop::at(0.5, [0.667, 0.667, 0.667, 1.0]),
                    GradationStop::at(0.75, [1.0, 1.0, 1.0, 1.0]),
                ],
            },
            user_def: UserDef {
                comment: String::new(),
                label: [0.267, 0.267, 0.267, 1.0],
            },
        }
    }
}

/// Build the synthetic record for one targeted material
pub fn material_record(material_name: &str, line_functions_id: &str) -> NodeRecord {
    let params = MaterialParams {
        line_functions: Some(line_functions_id.to_owned()),
        ..MaterialParams::default()
    };
    let mut record = NodeRecord::new(MATERIAL_NODE_TYPE, material_name);
    if let Ok(Value::Object(map)) = serde_json::to_value(&params) {
        record.params = map;
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_record_carries_back_reference() {
        let record = material_record("Cloth", "node-7");
        assert_eq!(record.node_type, MATERIAL_NODE_TYPE);
        assert_eq!(record.node_name, "Cloth");
        assert_eq!(
            record.params.get(LINE_FUNCTIONS_PARAM).and_then(Value::as_str),
            Some("node-7")
        );
    }

    #[test]
    fn test_default_gradation_has_four_stops() {
        let record = material_record("Cloth", "node-7");
        let stops = record.params["Gradation"]["UniversalGradation"]
            .as_array()
            .unwrap();
        assert_eq!(stops.len(), 4);
        assert_eq!(stops[1]["Position"].as_f64().unwrap(), 0.25);
    }
}
