// SPDX-License-Identifier: MIT OR Apache-2.0
//! Host-managed material and texture catalog.
//!
//! Materials and textures are looked up by display name, never owned by
//! graph nodes. The catalog is read-only for the duration of an export
//! or import and preserves registration order; when several assets share
//! a name, the first registered one wins.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a host asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetId(pub Uuid);

impl AssetId {
    /// Create a new random asset ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AssetId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A named host asset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    /// Asset identity
    pub id: AssetId,
    /// Display name
    pub name: String,
}

/// Catalog of the host's materials and textures
#[derive(Debug, Clone, Default)]
pub struct AssetCatalog {
    materials: Vec<Asset>,
    textures: Vec<Asset>,
}

impl AssetCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a material, returning its identity
    pub fn add_material(&mut self, name: impl Into<String>) -> AssetId {
        let asset = Asset {
            id: AssetId::new(),
            name: name.into(),
        };
        let id = asset.id;
        self.materials.push(asset);
        id
    }

    /// Register a texture, returning its identity
    pub fn add_texture(&mut self, name: impl Into<String>) -> AssetId {
        let asset = Asset {
            id: AssetId::new(),
            name: name.into(),
        };
        let id = asset.id;
        self.textures.push(asset);
        id
    }

    /// All materials in registration order
    pub fn materials(&self) -> &[Asset] {
        &self.materials
    }

    /// Look up a material by identity
    pub fn material(&self, id: AssetId) -> Option<&Asset> {
        self.materials.iter().find(|a| a.id == id)
    }

    /// The first material with the given name
    pub fn find_material(&self, name: &str) -> Option<&Asset> {
        self.materials.iter().find(|a| a.name == name)
    }

    /// Every material with the given name, in registration order
    pub fn materials_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Asset> {
        self.materials.iter().filter(move |a| a.name == name)
    }

    /// Look up a texture by identity
    pub fn texture(&self, id: AssetId) -> Option<&Asset> {
        self.textures.iter().find(|a| a.id == id)
    }

    /// The first texture with the given name
    pub fn find_texture(&self, name: &str) -> Option<&Asset> {
        self.textures.iter().find(|a| a.name == name)
    }
}

/// Replace characters a host asset name cannot carry with underscores
///
/// Material assets are file-backed on some hosts, so imported names are
/// scrubbed of filesystem-reserved characters before lookup.
pub fn escape_name(unescaped: &str) -> String {
    unescaped
        .chars()
        .map(|c| match c {
            '/' | '?' | '<' | '>' | '\\' | ':' | '*' | '|' | '"' => '_',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_material_wins_on_duplicate_names() {
        let mut catalog = AssetCatalog::new();
        let first = catalog.add_material("Cloth");
        let _second = catalog.add_material("Cloth");
        assert_eq!(catalog.find_material("Cloth").unwrap().id, first);
        assert_eq!(catalog.materials_named("Cloth").count(), 2);
    }

    #[test]
    fn test_texture_lookup() {
        let mut catalog = AssetCatalog::new();
        let id = catalog.add_texture("paper_grain");
        assert_eq!(catalog.find_texture("paper_grain").unwrap().id, id);
        assert!(catalog.find_texture("missing").is_none());
    }

    #[test]
    fn test_escape_name_replaces_reserved_characters() {
        assert_eq!(escape_name(r#"a/b?c<d>e\f:g*h|i"j"#), "a_b_c_d_e_f_g_h_i_j");
        assert_eq!(escape_name("plain name"), "plain name");
    }
}
