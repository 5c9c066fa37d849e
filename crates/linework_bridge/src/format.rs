// SPDX-License-Identifier: MIT OR Apache-2.0
//! Document key names, the file version gate, and top-level validation.

use serde_json::Value;

/// JSON key names of the portable document
pub mod key {
    /// Producing host and version
    pub const PLATFORM: &str = "Platform";
    /// Document format version, `major.minor`
    pub const FILE_VERSION: &str = "FileVersion";
    /// Producing host's unit scale relative to meters
    pub const SCALE_FACTOR: &str = "ScaleFactor";
    /// Map of id to line-side node records
    pub const LINE_NODE: &str = "LineNode";
    /// Map of id to material-side node records
    pub const MATERIAL_NODE: &str = "MaterialNode";

    /// Record type tag
    pub const NODE_TYPE: &str = "NodeType";
    /// Record display name
    pub const NODE_NAME: &str = "NodeName";
    /// Record field values keyed by alias
    pub const NODE_PARAMS: &str = "Params";

    /// Line-set reference list on a line record
    pub const LINE_SETS: &str = "LineSets";

    /// Tangent keyframe list of a curve param
    pub const NATIVE_CURVE_KEYS: &str = "NativeCurveKeys";
    /// Platform-neutral sample list of a curve param
    pub const UNIVERSAL_CURVE_KEYS: &str = "UniversalKeys";

    /// Curve key time
    pub const CURVE_TIME: &str = "Time";
    /// Curve key value
    pub const CURVE_VALUE: &str = "Value";
    /// Curve key incoming tangent
    pub const CURVE_IN_TANGENT: &str = "InTangent";
    /// Curve key outgoing tangent
    pub const CURVE_OUT_TANGENT: &str = "OutTangent";
    /// Curve key left tangent mode
    pub const CURVE_LEFT_TANGENT_MODE: &str = "LeftTangentMode";
    /// Curve key right tangent mode
    pub const CURVE_RIGHT_TANGENT_MODE: &str = "RightTangentMode";
    /// Curve key broken flag
    pub const CURVE_KEY_BROKEN: &str = "KeyBroken";
    /// Curve key incoming tangent weight
    pub const CURVE_IN_WEIGHT: &str = "InWeight";
    /// Curve key outgoing tangent weight
    pub const CURVE_OUT_WEIGHT: &str = "OutWeight";
    /// Curve key weighted mode
    pub const CURVE_WEIGHTED_MODE: &str = "WeightedMode";
}

/// Name prefix identifying documents produced by this host
pub const PLATFORM_NAME: &str = "Linework";

/// The platform string written into exported documents
pub fn platform_string() -> String {
    format!("{PLATFORM_NAME} {}", env!("CARGO_PKG_VERSION"))
}

/// Version written into exported documents
const CURRENT: [u32; 2] = [1, 1];

/// Lowest readable version
const SUPPORTED_MIN: [u32; 2] = [1, 0];

/// Lowest version known to be unreadable
const UNSUPPORTED_MIN: [u32; 2] = [2, 0];

/// The current file version as a `major.minor` string
pub fn version_string() -> String {
    format!("{}.{}", CURRENT[0], CURRENT[1])
}

/// Whether a document with the given version string can be read
///
/// Anything that is not exactly two dot-separated integers is
/// unsupported.
pub fn is_supported(version: &str) -> bool {
    let mut parts = version.split('.');
    let (Some(major), Some(minor), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    let (Ok(major), Ok(minor)) = (major.parse::<u32>(), minor.parse::<u32>()) else {
        return false;
    };

    let [major_min, minor_min] = SUPPORTED_MIN;
    let [major_max, minor_max] = UNSUPPORTED_MIN;

    (major == major_min && minor >= minor_min)
        || (major > major_min && major < major_max)
        || (major == major_max && minor < minor_max)
}

/// Fatal document errors, raised before any graph mutation
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// Top-level value is not an object
    #[error("invalid format")]
    InvalidFormat,

    /// `FileVersion` key missing
    #[error("file version not found")]
    MissingFileVersion,

    /// `FileVersion` outside the supported range, or malformed
    #[error("invalid file version `{0}`")]
    UnsupportedFileVersion(String),

    /// `LineNode` missing or not an object
    #[error("line node list not found")]
    MissingLineNodes,

    /// `MaterialNode` missing or not an object
    #[error("material node list not found")]
    MissingMaterialNodes,

    /// Malformed JSON text
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Validate a parsed document's top-level structure
///
/// All-or-nothing: any violation is fatal and happens before dependency
/// resolution or node materialization.
pub fn validate(root: &Value) -> Result<(), BridgeError> {
    let Some(object) = root.as_object() else {
        return Err(BridgeError::InvalidFormat);
    };

    let version = object
        .get(key::FILE_VERSION)
        .ok_or(BridgeError::MissingFileVersion)?;
    let Some(version) = version.as_str() else {
        return Err(BridgeError::UnsupportedFileVersion(version.to_string()));
    };
    if !is_supported(version) {
        return Err(BridgeError::UnsupportedFileVersion(version.to_owned()));
    }

    if !object.get(key::LINE_NODE).is_some_and(Value::is_object) {
        return Err(BridgeError::MissingLineNodes);
    }
    if !object.get(key::MATERIAL_NODE).is_some_and(Value::is_object) {
        return Err(BridgeError::MissingMaterialNodes);
    }

    Ok(())
}
