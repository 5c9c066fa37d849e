// SPDX-License-Identifier: MIT OR Apache-2.0
//! Document import and graph reconciliation.
//!
//! One import runs the pipeline: validate, resolve dependencies, filter
//! the document, materialize nodes, apply fields, reconcile the root's
//! collections, commit. Validation failures abort before any graph
//! mutation; structural per-field decode failures are logged and the
//! field keeps its default; dangling references are dropped silently.

use crate::codec::{self, DecodeCx};
use crate::document::Document;
use crate::format::BridgeError;
use crate::material;
use crate::resolve;
use linework_graph::assets::{escape_name, AssetCatalog, AssetId};
use linework_graph::graph::LineGraph;
use linework_graph::hooks;
use linework_graph::node::{Node, NodeId, NodeKind};
use linework_graph::schema;
use linework_graph::value::FieldValue;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};

/// How incoming nodes reconcile with the existing graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportMode {
    /// Destroy existing nodes the document overwrites by name
    #[default]
    Replace,
    /// Keep everything existing alongside the incoming nodes
    Merge,
}

/// Source of the unit scale applied to scale-dependent floats
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum UnitScale {
    /// Use the document's own scale factor
    #[default]
    Auto,
    /// Override with a caller-supplied factor
    Manual(f32),
}

/// Caller choices for one import
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Replace or merge reconciliation
    pub mode: ImportMode,
    /// Unit scale source
    pub unit_scale: UnitScale,
    /// Import specific brushes whose "specific on" flag is off
    pub include_disabled_specific_brush: bool,
    /// Import reductions whose "on" flag is off
    pub include_disabled_reduction: bool,
    /// Document ids of the lines to import
    pub selected_lines: HashSet<String>,
}

impl ImportOptions {
    /// Default options with every line in the document selected
    pub fn all_lines(doc: &Document) -> Self {
        Self {
            selected_lines: selectable_lines(doc).into_iter().map(|e| e.id).collect(),
            ..Self::default()
        }
    }
}

/// One selectable line surfaced by the pre-scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineEntry {
    /// Document id of the record
    pub id: String,
    /// Display name of the record
    pub name: String,
}

/// List every selectable line record for the host's selection UI
pub fn selectable_lines(doc: &Document) -> Vec<LineEntry> {
    doc.line_nodes
        .iter()
        .filter(|(_, record)| record.node_type == "Line")
        .map(|(id, record)| LineEntry {
            id: id.clone(),
            name: record.node_name.clone(),
        })
        .collect()
}

/// Validate document text and import it into the graph
pub fn import_text(
    text: &str,
    options: &ImportOptions,
    graph: &mut LineGraph,
    catalog: &AssetCatalog,
) -> Result<(), BridgeError> {
    let doc = Document::from_json_text(text)?;
    import_document(&doc, options, graph, catalog);
    Ok(())
}

struct Materialized {
    doc_id: String,
    node_id: NodeId,
    kind: NodeKind,
    params: Map<String, Value>,
}

struct MaterialDummy {
    name: String,
    line_functions: Option<String>,
}

/// Import a validated document into the graph
pub fn import_document(
    doc: &Document,
    options: &ImportOptions,
    graph: &mut LineGraph,
    catalog: &AssetCatalog,
) {
    let scale = match options.unit_scale {
        UnitScale::Auto => doc.scale_factor as f32,
        UnitScale::Manual(s) => s,
    };
    let native_origin = doc.is_native_origin();

    let resolved = resolve::collect_import_ids(
        doc,
        &options.selected_lines,
        options.include_disabled_specific_brush,
        options.include_disabled_reduction,
    );

    // Synthetic material records are consumed for linking only
    let dummies: Vec<MaterialDummy> = doc
        .material_nodes
        .values()
        .filter(|record| record.node_type == material::MATERIAL_NODE_TYPE)
        .map(|record| MaterialDummy {
            name: escape_name(&record.node_name),
            line_functions: record
                .params
                .get(material::LINE_FUNCTIONS_PARAM)
                .and_then(Value::as_str)
                .map(str::to_owned),
        })
        .collect();

    // Filter: the line map is subset to the resolved closure plus the
    // structurally mandatory types; the material map is taken whole
    let line_records = doc.line_nodes.iter().filter(|(id, record)| {
        resolve::MANDATORY_NODE_TYPES.contains(&record.node_type.as_str())
            || resolved.contains(id.as_str())
    });
    let material_records = doc
        .material_nodes
        .iter()
        .filter(|(_, record)| record.node_type != material::MATERIAL_NODE_TYPE);

    // Materialize: the root record reuses the live root node, everything
    // else becomes a fresh node; unknown types are skipped
    let mut materialized: Vec<Materialized> = Vec::new();
    let mut ids: HashMap<String, NodeId> = HashMap::new();
    let mut incoming_line_names: HashSet<String> = HashSet::new();
    let mut incoming_group_names: HashSet<String> = HashSet::new();
    for (doc_id, record) in line_records.chain(material_records) {
        let Some(kind) = NodeKind::from_type_tag(&record.node_type) else {
            continue;
        };
        let node_id = if kind == NodeKind::LineList {
            graph.root_mut().name = record.node_name.clone();
            graph.root_id()
        } else {
            graph.add_node(Node::new(kind, record.node_name.clone()))
        };
        match kind {
            NodeKind::Line => {
                incoming_line_names.insert(record.node_name.clone());
            }
            NodeKind::LineGroup => {
                incoming_group_names.insert(record.node_name.clone());
            }
            _ => {}
        }
        ids.insert(doc_id.clone(), node_id);
        materialized.push(Materialized {
            doc_id: doc_id.clone(),
            node_id,
            kind,
            params: record.params.clone(),
        });
    }

    // Snapshot the root's collections before they are rebuilt
    let mut kept_lines = graph.root().node_list("LineList").to_vec();
    let mut kept_functions = graph.root().node_list("LineFunctionsList").to_vec();
    let kept_dsm = graph.root().material_list("DoubleSidedMaterials").to_vec();
    let kept_ignore = graph.root().name_list("IgnoreObjectList").to_vec();
    let mut kept_groups = graph.root().node_list("LineGroupList").to_vec();
    kept_lines.retain(|id| graph.contains(*id));
    kept_functions.retain(|id| graph.contains(*id));
    kept_groups.retain(|id| graph.contains(*id));

    if options.mode == ImportMode::Replace {
        kept_lines = destroy_name_collisions(graph, kept_lines, &incoming_line_names);
        kept_functions = subtract_overwritten_materials(graph, kept_functions, catalog, &dummies);
        kept_groups = destroy_name_collisions(graph, kept_groups, &incoming_group_names);
    }

    clear_root_collections(graph);

    // Apply fields, link materials, run after-import callbacks
    for item in &materialized {
        for (alias, value) in &item.params {
            if value.is_null() {
                continue;
            }
            let Some(spec) = schema::find_spec(item.kind, alias) else {
                continue;
            };
            let decoded = {
                let cx = DecodeCx {
                    scale,
                    ids: &ids,
                    graph: &*graph,
                    catalog,
                };
                codec::decode(value, spec, &cx)
            };
            match decoded {
                Ok(Some(decoded_value)) => {
                    if spec.owning {
                        match &decoded_value {
                            FieldValue::NodeRef(Some(child)) => {
                                graph.set_parent(*child, Some(item.node_id));
                            }
                            FieldValue::NodeList(children) => {
                                for child in children {
                                    graph.set_parent(*child, Some(item.node_id));
                                }
                            }
                            _ => {}
                        }
                    }
                    if let Some(node) = graph.node_mut(item.node_id) {
                        node.set_value(spec.alias, decoded_value);
                    }
                }
                Ok(None) => {}
                Err(err) => {
                    let name = graph
                        .node(item.node_id)
                        .map(|n| n.name.clone())
                        .unwrap_or_default();
                    tracing::warn!("couldn't deserialize {name}.{}: {err}", spec.alias);
                }
            }
        }

        if item.kind == NodeKind::LineFunctions {
            link_target_materials(graph, item, catalog, &dummies);
        }

        if hooks::has_after_import(item.kind) {
            hooks::run_after_import(graph, item.node_id, native_origin);
        }
    }

    // A document without a root record came from another platform; its
    // lines and line functions are inferred by kind and re-parented
    if !materialized.iter().any(|m| m.kind == NodeKind::LineList) {
        let root_id = graph.root_id();
        for (kind, alias) in [
            (NodeKind::Line, "LineList"),
            (NodeKind::LineFunctions, "LineFunctionsList"),
        ] {
            let inferred: Vec<NodeId> = materialized
                .iter()
                .filter(|m| m.kind == kind)
                .map(|m| m.node_id)
                .collect();
            let mut list = graph.root().node_list(alias).to_vec();
            for id in inferred {
                graph.set_parent(id, Some(root_id));
                list.push(id);
            }
            graph.root_mut().set_value(alias, FieldValue::NodeList(list));
        }
    }

    // Reconcile: kept existing first, then incoming; new lines follow
    // their decoded render priority
    let mut incoming_lines = graph.root().node_list("LineList").to_vec();
    incoming_lines.sort_by_key(|id| {
        graph
            .node(*id)
            .and_then(|n| n.int("RenderPriority"))
            .unwrap_or(0)
    });
    kept_lines.extend(incoming_lines);

    kept_functions.extend(graph.root().node_list("LineFunctionsList").iter().copied());
    kept_groups.extend(graph.root().node_list("LineGroupList").iter().copied());

    let mut dsm = kept_dsm;
    dsm.extend(graph.root().material_list("DoubleSidedMaterials").iter().copied());
    let dsm = dedup_assets(dsm);

    let mut ignore = kept_ignore;
    ignore.extend(graph.root().name_list("IgnoreObjectList").iter().cloned());
    let ignore = dedup_names(ignore);

    let root = graph.root_mut();
    root.set_value("LineList", FieldValue::NodeList(kept_lines));
    root.set_value("LineFunctionsList", FieldValue::NodeList(kept_functions));
    root.set_value("DoubleSidedMaterials", FieldValue::MaterialList(dsm));
    root.set_value("IgnoreObjectList", FieldValue::NameList(ignore));
    root.set_value("LineGroupList", FieldValue::NodeList(kept_groups));
}

/// Destroy list entries whose names collide with incoming ones
fn destroy_name_collisions(
    graph: &mut LineGraph,
    existing: Vec<NodeId>,
    incoming_names: &HashSet<String>,
) -> Vec<NodeId> {
    let mut kept = Vec::new();
    for id in existing {
        let collides = graph
            .node(id)
            .is_some_and(|n| incoming_names.contains(&n.name));
        if collides {
            graph.remove_subtree(id);
        } else {
            kept.push(id);
        }
    }
    kept
}

/// Subtract overwritten materials from existing line-function targets
///
/// A function node that had targets and loses them all is destroyed; a
/// node that never had targets is kept as-is.
fn subtract_overwritten_materials(
    graph: &mut LineGraph,
    existing: Vec<NodeId>,
    catalog: &AssetCatalog,
    dummies: &[MaterialDummy],
) -> Vec<NodeId> {
    let dummy_names: HashSet<&str> = dummies.iter().map(|d| d.name.as_str()).collect();
    let overwritten: HashSet<AssetId> = catalog
        .materials()
        .iter()
        .filter(|a| dummy_names.contains(a.name.as_str()))
        .map(|a| a.id)
        .collect();

    let mut kept = Vec::new();
    for id in existing {
        let Some(node) = graph.node(id) else {
            continue;
        };
        let targets = node.material_list("TargetMaterials").to_vec();
        if targets.is_empty() {
            kept.push(id);
            continue;
        }
        let remaining: Vec<AssetId> = targets
            .into_iter()
            .filter(|t| !overwritten.contains(t))
            .collect();
        if remaining.is_empty() {
            graph.remove_subtree(id);
        } else {
            if let Some(node) = graph.node_mut(id) {
                node.set_value("TargetMaterials", FieldValue::MaterialList(remaining));
            }
            kept.push(id);
        }
    }
    kept
}

/// Append the live materials named by linked synthetic records
fn link_target_materials(
    graph: &mut LineGraph,
    item: &Materialized,
    catalog: &AssetCatalog,
    dummies: &[MaterialDummy],
) {
    for dummy in dummies {
        if dummy.line_functions.as_deref() != Some(item.doc_id.as_str()) {
            continue;
        }
        let additions: Vec<AssetId> = catalog.materials_named(&dummy.name).map(|a| a.id).collect();
        if additions.is_empty() {
            continue;
        }
        if let Some(node) = graph.node_mut(item.node_id) {
            let mut targets = node.material_list("TargetMaterials").to_vec();
            targets.extend(additions);
            node.set_value("TargetMaterials", FieldValue::MaterialList(targets));
        }
    }
}

fn clear_root_collections(graph: &mut LineGraph) {
    let root = graph.root_mut();
    root.set_value("LineList", FieldValue::NodeList(Vec::new()));
    root.set_value("LineFunctionsList", FieldValue::NodeList(Vec::new()));
    root.set_value("DoubleSidedMaterials", FieldValue::MaterialList(Vec::new()));
    root.set_value("IgnoreObjectList", FieldValue::NameList(Vec::new()));
    root.set_value("LineGroupList", FieldValue::NodeList(Vec::new()));
}

fn dedup_assets(list: Vec<AssetId>) -> Vec<AssetId> {
    let mut seen = HashSet::new();
    list.into_iter().filter(|id| seen.insert(*id)).collect()
}

fn dedup_names(list: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    list.into_iter()
        .filter(|name| seen.insert(name.clone()))
        .collect()
}
