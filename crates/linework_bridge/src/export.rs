// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph walker and document emission.
//!
//! Export starts at the root line-list node and follows owning
//! reference fields, collecting each reachable node exactly once; the
//! visited set, not a stack, guards re-entrancy, so reference cycles
//! cannot recurse. Collected nodes are encoded through the field codec
//! and placed into the document's two maps.

use crate::codec;
use crate::document::{Document, NodeRecord};
use crate::format::BridgeError;
use crate::material;
use linework_graph::assets::{AssetCatalog, AssetId};
use linework_graph::graph::LineGraph;
use linework_graph::hooks;
use linework_graph::node::{NodeId, NodeKind};
use linework_graph::schema;
use linework_graph::value::FieldKind;
use std::collections::{HashMap, HashSet};

/// Flatten a live graph into a portable document
///
/// The graph is taken mutably because before-export callbacks write
/// into it: the root stamps the render-priority index of every line.
pub fn export_document(graph: &mut LineGraph, catalog: &AssetCatalog) -> Document {
    let mut visited = HashSet::new();
    let mut order = Vec::new();
    collect(graph, graph.root_id(), &mut visited, &mut order);

    for id in &order {
        let Some(kind) = graph.node(*id).map(|n| n.kind) else {
            continue;
        };
        if hooks::has_before_export(kind) {
            hooks::run_before_export(graph, *id);
        }
    }

    // On duplicate material names the first registered material wins
    let mut first_material_by_name: HashMap<&str, AssetId> = HashMap::new();
    for asset in catalog.materials() {
        first_material_by_name
            .entry(asset.name.as_str())
            .or_insert(asset.id);
    }

    let mut doc = Document::new();
    for id in order {
        let Some(node) = graph.node(id) else {
            continue;
        };
        let mut record = NodeRecord::new(node.kind.type_tag(), &node.name);
        for (alias, value) in node.values() {
            let Some(spec) = schema::find_spec(node.kind, alias) else {
                continue;
            };
            record
                .params
                .insert(alias.to_owned(), codec::encode(value, spec, graph, catalog));
        }

        if node.kind == NodeKind::LineFunctions {
            let owner_id = id.to_string();
            for material_id in node.material_list("TargetMaterials") {
                let Some(asset) = catalog.material(*material_id) else {
                    continue;
                };
                let Some(first_id) = first_material_by_name.get(asset.name.as_str()) else {
                    continue;
                };
                doc.material_nodes
                    .entry(first_id.to_string())
                    .or_insert_with(|| material::material_record(&asset.name, &owner_id));
            }
            // The raw target list is redundant with the synthetic records
            record.params.shift_remove("TargetMaterials");
            doc.material_nodes.insert(owner_id, record);
        } else {
            doc.line_nodes.insert(id.to_string(), record);
        }
    }

    doc
}

/// Export a graph as pretty-printed document text
pub fn export_text(graph: &mut LineGraph, catalog: &AssetCatalog) -> Result<String, BridgeError> {
    export_document(graph, catalog).to_json_text()
}

fn collect(graph: &LineGraph, id: NodeId, visited: &mut HashSet<NodeId>, order: &mut Vec<NodeId>) {
    if graph.node(id).is_none() || !visited.insert(id) {
        return;
    }
    order.push(id);

    let Some(node) = graph.node(id) else {
        return;
    };
    for spec in schema::field_specs(node.kind) {
        if !spec.owning {
            continue;
        }
        match spec.kind {
            FieldKind::NodeRef => {
                if let Some(child) = node.node_ref(spec.alias) {
                    collect(graph, child, visited, order);
                }
            }
            FieldKind::NodeList => {
                for child in node.node_list(spec.alias).to_vec() {
                    collect(graph, child, visited, order);
                }
            }
            _ => {}
        }
    }
}
