// SPDX-License-Identifier: MIT OR Apache-2.0
//! Arena-based graph of line-rendering nodes.

use crate::node::{Node, NodeId, NodeKind};
use crate::value::{FieldKind, FieldValue};
use indexmap::IndexMap;

/// A live node graph rooted at a single line-list node
///
/// Nodes are addressed by identity rather than held by pointer; owning
/// relationships are expressed by reference fields plus the per-node
/// parent link.
#[derive(Debug, Clone)]
pub struct LineGraph {
    nodes: IndexMap<NodeId, Node>,
    root: NodeId,
}

impl LineGraph {
    /// Create a graph containing only a root line-list node
    pub fn new(root_name: impl Into<String>) -> Self {
        let root = Node::new(NodeKind::LineList, root_name);
        let root_id = root.id;
        let mut nodes = IndexMap::new();
        nodes.insert(root_id, root);
        Self {
            nodes,
            root: root_id,
        }
    }

    /// The root node's identity
    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// The root node
    pub fn root(&self) -> &Node {
        &self.nodes[&self.root]
    }

    /// The root node, mutably
    pub fn root_mut(&mut self) -> &mut Node {
        self.nodes.get_mut(&self.root).expect("root node present")
    }

    /// Add a node to the arena
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = node.id;
        self.nodes.insert(id, node);
        id
    }

    /// Add a node under a parent's reference field
    ///
    /// A `NodeRef` field is overwritten; a `NodeList` field is appended to.
    pub fn adopt(
        &mut self,
        parent_id: NodeId,
        alias: &str,
        mut node: Node,
    ) -> Result<NodeId, AdoptError> {
        let parent = self
            .nodes
            .get(&parent_id)
            .ok_or(AdoptError::NoSuchParent(parent_id))?;
        let spec = crate::schema::find_spec(parent.kind, alias)
            .ok_or_else(|| AdoptError::UnknownField(alias.to_owned()))?;
        let id = node.id;
        node.parent = Some(parent_id);
        match spec.kind {
            FieldKind::NodeRef => {
                self.nodes.insert(id, node);
                let parent = self.nodes.get_mut(&parent_id).expect("parent present");
                parent.set_value(spec.alias, FieldValue::NodeRef(Some(id)));
            }
            FieldKind::NodeList => {
                self.nodes.insert(id, node);
                let parent = self.nodes.get_mut(&parent_id).expect("parent present");
                let mut list = parent.node_list(spec.alias).to_vec();
                list.push(id);
                parent.set_value(spec.alias, FieldValue::NodeList(list));
            }
            _ => return Err(AdoptError::NotAReferenceField(alias.to_owned())),
        }
        Ok(id)
    }

    /// Get a node by ID
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Get a mutable node by ID
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// Whether a node is present
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// All nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// The number of nodes, root included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Set or clear a node's parent link
    pub fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent = parent;
        }
    }

    /// Find the first node with the given display name
    pub fn find_by_name(&self, name: &str) -> Option<&Node> {
        self.nodes.values().find(|n| n.name == name)
    }

    /// Remove a node and every node parented under it, transitively
    ///
    /// The root cannot be removed. Returns the removed identities.
    pub fn remove_subtree(&mut self, id: NodeId) -> Vec<NodeId> {
        if id == self.root {
            return Vec::new();
        }
        let mut removed = Vec::new();
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            if self.nodes.shift_remove(&current).is_none() {
                continue;
            }
            removed.push(current);
            pending.extend(
                self.nodes
                    .values()
                    .filter(|n| n.parent == Some(current))
                    .map(|n| n.id),
            );
        }
        removed
    }
}

/// Error when adopting a node under a parent field
#[derive(Debug, thiserror::Error)]
pub enum AdoptError {
    /// Parent not found
    #[error("parent node not found: {0}")]
    NoSuchParent(NodeId),

    /// Alias not declared for the parent's kind
    #[error("unknown field `{0}`")]
    UnknownField(String),

    /// Field is not a node reference
    #[error("field `{0}` is not a node reference")]
    NotAReferenceField(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_graph_has_root() {
        let graph = LineGraph::new("Line List");
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.root().kind, NodeKind::LineList);
        assert_eq!(graph.root().name, "Line List");
    }

    #[test]
    fn test_adopt_into_list_and_ref() {
        let mut graph = LineGraph::new("Line List");
        let root = graph.root_id();
        let line = graph
            .adopt(root, "LineList", Node::new(NodeKind::Line, "Line 1"))
            .unwrap();
        let set = graph
            .adopt(line, "LineSets", Node::new(NodeKind::LineSet, "Set 1"))
            .unwrap();
        let brush = graph
            .adopt(set, "VBrushSettings", Node::new(NodeKind::BrushSettings, "Brush"))
            .unwrap();

        assert_eq!(graph.root().node_list("LineList"), &[line]);
        assert_eq!(graph.node(line).unwrap().node_list("LineSets"), &[set]);
        assert_eq!(graph.node(set).unwrap().node_ref("VBrushSettings"), Some(brush));
        assert_eq!(graph.node(brush).unwrap().parent, Some(set));
    }

    #[test]
    fn test_adopt_rejects_scalar_field() {
        let mut graph = LineGraph::new("Line List");
        let root = graph.root_id();
        let line = graph
            .adopt(root, "LineList", Node::new(NodeKind::Line, "Line 1"))
            .unwrap();
        let err = graph
            .adopt(line, "RenderPriority", Node::new(NodeKind::LineSet, "Set"))
            .unwrap_err();
        assert!(matches!(err, AdoptError::NotAReferenceField(_)));
    }

    #[test]
    fn test_remove_subtree_takes_descendants() {
        let mut graph = LineGraph::new("Line List");
        let root = graph.root_id();
        let line = graph
            .adopt(root, "LineList", Node::new(NodeKind::Line, "Line 1"))
            .unwrap();
        let set = graph
            .adopt(line, "LineSets", Node::new(NodeKind::LineSet, "Set 1"))
            .unwrap();
        let brush = graph
            .adopt(set, "VBrushSettings", Node::new(NodeKind::BrushSettings, "Brush"))
            .unwrap();

        let removed = graph.remove_subtree(line);
        assert_eq!(removed.len(), 3);
        assert!(!graph.contains(line));
        assert!(!graph.contains(set));
        assert!(!graph.contains(brush));
        assert!(graph.contains(root));
    }

    #[test]
    fn test_root_is_never_removed() {
        let mut graph = LineGraph::new("Line List");
        let root = graph.root_id();
        assert!(graph.remove_subtree(root).is_empty());
        assert!(graph.contains(root));
    }
}
