// SPDX-License-Identifier: MIT OR Apache-2.0
//! Live node graph model for the Linework line-rendering pipeline.
//!
//! This crate provides the in-memory form of a line-rendering setup:
//! - A closed set of node kinds (line list, lines, line sets, brushes, ...)
//! - Statically declared per-kind field tables with portable aliases
//! - Typed field values, including tangent curves with Hermite evaluation
//! - An arena-based graph owned by a single root line-list node
//! - A read-only catalog of host-managed materials and textures
//! - Optional per-kind serialization callbacks
//!
//! The portable document codec lives in the `linework_bridge` crate and
//! consumes this model through the field tables declared here.

pub mod assets;
pub mod curve;
pub mod graph;
pub mod hooks;
pub mod node;
pub mod schema;
pub mod value;

pub use assets::{Asset, AssetCatalog, AssetId};
pub use curve::{Curve, CurveKey};
pub use graph::LineGraph;
pub use node::{Node, NodeId, NodeKind};
pub use schema::{field_specs, find_spec, FieldSpec};
pub use value::{FieldKind, FieldValue};
