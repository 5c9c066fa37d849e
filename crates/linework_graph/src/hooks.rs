// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per-kind serialization callbacks.
//!
//! Node kinds declare their callbacks here statically instead of being
//! probed for them at runtime. The exporter runs `run_before_export` on
//! every collected node; the importer runs `run_after_import` on every
//! materialized node.

use crate::graph::LineGraph;
use crate::node::{NodeId, NodeKind};
use crate::value::FieldValue;

/// `TextureUV` ordinal selecting screen-space placement
pub const TEXTURE_UV_SCREEN: i32 = 1;

/// Whether a kind declares a before-export callback
pub fn has_before_export(kind: NodeKind) -> bool {
    matches!(kind, NodeKind::LineList)
}

/// Whether a kind declares an after-import callback
pub fn has_after_import(kind: NodeKind) -> bool {
    matches!(kind, NodeKind::TextureMap)
}

/// Run a node's before-export callback, if it declares one
///
/// The line-list root stamps a render-priority index into each line in
/// its list; the index advances over every list entry, lines or not, so
/// priorities may carry gaps.
pub fn run_before_export(graph: &mut LineGraph, id: NodeId) {
    let Some(node) = graph.node(id) else {
        return;
    };
    match node.kind {
        NodeKind::LineList => stamp_render_priority(graph, id),
        _ => {}
    }
}

/// Run a node's after-import callback, if it declares one
///
/// Screen-space texture map offsets use a flipped vertical axis on other
/// platforms; a foreign-origin document gets its V offset negated here.
/// Documents produced by this host are left untouched.
pub fn run_after_import(graph: &mut LineGraph, id: NodeId, native_origin: bool) {
    let Some(node) = graph.node(id) else {
        return;
    };
    match node.kind {
        NodeKind::TextureMap if !native_origin => flip_screen_v(graph, id),
        _ => {}
    }
}

fn stamp_render_priority(graph: &mut LineGraph, list_id: NodeId) {
    let entries = match graph.node(list_id) {
        Some(node) => node.node_list("LineList").to_vec(),
        None => return,
    };
    for (index, entry) in entries.into_iter().enumerate() {
        let Some(node) = graph.node_mut(entry) else {
            continue;
        };
        if node.kind == NodeKind::Line {
            node.set_value("RenderPriority", FieldValue::Int(index as i32));
        }
    }
}

fn flip_screen_v(graph: &mut LineGraph, id: NodeId) {
    let Some(node) = graph.node_mut(id) else {
        return;
    };
    if node.int("TextureUV") != Some(TEXTURE_UV_SCREEN) {
        return;
    }
    if let Some([u, v]) = node.vec2("Offset") {
        node.set_value("Offset", FieldValue::Vec2([u, -v]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;

    #[test]
    fn test_render_priority_advances_over_every_entry() {
        let mut graph = LineGraph::new("Line List");
        let root = graph.root_id();
        let a = graph
            .adopt(root, "LineList", Node::new(NodeKind::Line, "A"))
            .unwrap();
        // A stale group id in the line list still advances the index
        let group = graph
            .adopt(root, "LineList", Node::new(NodeKind::LineGroup, "G"))
            .unwrap();
        let b = graph
            .adopt(root, "LineList", Node::new(NodeKind::Line, "B"))
            .unwrap();

        run_before_export(&mut graph, root);

        assert_eq!(graph.node(a).unwrap().int("RenderPriority"), Some(0));
        assert_eq!(graph.node(b).unwrap().int("RenderPriority"), Some(2));
        assert_eq!(graph.node(group).unwrap().int("RenderPriority"), None);
    }

    #[test]
    fn test_foreign_screen_map_flips_v() {
        let mut graph = LineGraph::new("Line List");
        let mut map = Node::new(NodeKind::TextureMap, "Map");
        map.set_value("TextureUV", FieldValue::Int(TEXTURE_UV_SCREEN));
        map.set_value("Offset", FieldValue::Vec2([0.25, 0.5]));
        let id = graph.add_node(map);

        run_after_import(&mut graph, id, false);
        assert_eq!(graph.node(id).unwrap().vec2("Offset"), Some([0.25, -0.5]));

        // Native documents keep the offset as written
        run_after_import(&mut graph, id, true);
        assert_eq!(graph.node(id).unwrap().vec2("Offset"), Some([0.25, -0.5]));
    }

    #[test]
    fn test_object_uv_map_is_untouched() {
        let mut graph = LineGraph::new("Line List");
        let mut map = Node::new(NodeKind::TextureMap, "Map");
        map.set_value("Offset", FieldValue::Vec2([0.25, 0.5]));
        let id = graph.add_node(map);

        run_after_import(&mut graph, id, false);
        assert_eq!(graph.node(id).unwrap().vec2("Offset"), Some([0.25, 0.5]));
    }
}
