// SPDX-License-Identifier: MIT OR Apache-2.0
//! Portable document codec for Linework node graphs.
//!
//! A scene's line-rendering setup is exchanged between hosts through a
//! single versioned JSON document. This crate provides both directions:
//!
//! - [`export::export_text`] walks a live graph from its root, flattens
//!   it into an addressable document, and pretty-prints it
//! - [`import::import_text`] validates a document, computes the
//!   dependency closure of the caller-selected lines, materializes the
//!   filtered records into live nodes, and reconciles the root's
//!   collections under replace or merge semantics
//!
//! Field values cross the boundary through the per-kind codec in
//! [`codec`]; curves additionally carry a platform-neutral polyline
//! form generated by [`resample`].

pub mod codec;
pub mod document;
pub mod export;
pub mod format;
pub mod import;
pub mod material;
pub mod resample;
pub mod resolve;

pub use document::{Document, NodeRecord};
pub use export::{export_document, export_text};
pub use format::BridgeError;
pub use import::{
    import_document, import_text, selectable_lines, ImportMode, ImportOptions, LineEntry,
    UnitScale,
};
