/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Document model for a mind map.
//!
//! Core structures:
//! - `Graph`: node/edge container with tree-shaped queries
//! - `Node`: positioned node carrying user-editable `NodeData`
//! - `Edge`: directed connection, parent→child for tree edges
//!
//! The container is mutated only through the map engine; everything else
//! observes it read-only.

use euclid::default::Point2D;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::persistence::types::{PersistedEdge, PersistedNode};

/// Default fill color for new nodes.
pub const DEFAULT_NODE_COLOR: &str = "#3498DB";

/// Label given to the root node of a fresh map.
pub const DEFAULT_ROOT_LABEL: &str = "Central Idea";

/// Hard cap on label length, enforced at the label-update boundary.
pub const MAX_LABEL_LEN: usize = 150;

/// Visual shape of a node.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum NodeShape {
    #[default]
    Rectangle,
    Pill,
    Diamond,
}

/// Label text size step.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextSize {
    Small,
    #[default]
    Medium,
    Large,
}

/// User-editable content and style of a node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeData {
    pub label: String,

    /// Hex fill color, e.g. `#3498DB`.
    pub color: String,

    pub shape: NodeShape,

    pub font_size: TextSize,

    /// Optional emoji marker shown next to the label.
    pub icon: Option<String>,

    /// Optional free-form annotation.
    pub comment: Option<String>,

    /// Optional external link.
    pub url: Option<String>,

    /// Optional attached image (data URL).
    pub image: Option<String>,

    /// Parent node id; `None` marks the tree root.
    pub parent_id: Option<Uuid>,
}

impl NodeData {
    /// Data for a fresh root node.
    pub fn root(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            color: DEFAULT_NODE_COLOR.to_string(),
            shape: NodeShape::default(),
            font_size: TextSize::default(),
            icon: None,
            comment: None,
            url: None,
            image: None,
            parent_id: None,
        }
    }

    /// Data for a fresh child node with an empty label.
    pub fn child_of(parent_id: Uuid) -> Self {
        Self {
            parent_id: Some(parent_id),
            ..Self::root(String::new())
        }
    }
}

/// Partial update over `NodeData` style/content fields.
///
/// Outer `None` leaves a field untouched; for clearable fields the inner
/// option distinguishes "set" (`Some(Some(v))`) from "clear" (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeDataPatch {
    pub color: Option<String>,
    pub shape: Option<NodeShape>,
    pub font_size: Option<TextSize>,
    pub icon: Option<Option<String>>,
    pub comment: Option<Option<String>>,
    pub url: Option<Option<String>>,
    pub image: Option<Option<String>>,
}

impl NodeDataPatch {
    /// Shallow-merge the patch into `data`.
    pub fn apply_to(&self, data: &mut NodeData) {
        if let Some(color) = &self.color {
            data.color = color.clone();
        }
        if let Some(shape) = self.shape {
            data.shape = shape;
        }
        if let Some(font_size) = self.font_size {
            data.font_size = font_size;
        }
        if let Some(icon) = &self.icon {
            data.icon = icon.clone();
        }
        if let Some(comment) = &self.comment {
            data.comment = comment.clone();
        }
        if let Some(url) = &self.url {
            data.url = url.clone();
        }
        if let Some(image) = &self.image {
            data.image = image.clone();
        }
    }
}

/// A node in the mind map.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Stable node identity.
    pub id: Uuid,

    /// Position in canvas space.
    pub position: Point2D<f32>,

    /// User-editable content and style.
    pub data: NodeData,
}

/// A directed edge. Tree edges run parent→child; extra user-drawn
/// connections share the same record shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    /// Deterministic identity derived from both endpoints.
    pub id: String,

    pub source: Uuid,

    pub target: Uuid,
}

impl Edge {
    pub fn between(source: Uuid, target: Uuid) -> Self {
        Self {
            id: edge_id(source, target),
            source,
            target,
        }
    }
}

/// Derive the deterministic edge id for a source/target pair.
pub fn edge_id(source: Uuid, target: Uuid) -> String {
    format!("edge-{source}-{target}")
}

/// Node/edge container for one mind map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl Graph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from already-validated parts (snapshot restore).
    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Get a node by id.
    pub fn node(&self, id: Uuid) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Get a mutable node by id.
    pub fn node_mut(&mut self, id: Uuid) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn contains_node(&self, id: Uuid) -> bool {
        self.node(id).is_some()
    }

    /// Append a node. Ids are caller-generated and assumed unique.
    pub fn insert_node(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// Remove a single node record, leaving its edges in place.
    ///
    /// Edge removal arrives as its own change batch from the canvas; tree
    /// operations that must drop edges too go through [`Graph::remove_many`].
    pub fn remove_node(&mut self, id: Uuid) -> bool {
        let before = self.nodes.len();
        self.nodes.retain(|n| n.id != id);
        self.nodes.len() != before
    }

    /// Remove a set of nodes and every edge touching any of them.
    pub fn remove_many(&mut self, ids: &HashSet<Uuid>) {
        self.nodes.retain(|n| !ids.contains(&n.id));
        self.edges
            .retain(|e| !ids.contains(&e.source) && !ids.contains(&e.target));
    }

    /// Append a directed edge. Rejects missing endpoints and duplicate
    /// source→target pairs; both arise from stale canvas gestures.
    pub fn add_edge(&mut self, source: Uuid, target: Uuid) -> bool {
        if !self.contains_node(source) || !self.contains_node(target) {
            return false;
        }
        if self.has_edge(source, target) {
            return false;
        }
        self.edges.push(Edge::between(source, target));
        true
    }

    /// Check whether a directed source→target edge exists.
    pub fn has_edge(&self, source: Uuid, target: Uuid) -> bool {
        self.edges
            .iter()
            .any(|e| e.source == source && e.target == target)
    }

    /// Remove an edge by id. Returns whether anything was removed.
    pub fn remove_edge(&mut self, id: &str) -> bool {
        let before = self.edges.len();
        self.edges.retain(|e| e.id != id);
        self.edges.len() != before
    }

    /// Remove all directed edges from `source` to `target`.
    /// Returns how many edges were removed.
    pub fn remove_edge_between(&mut self, source: Uuid, target: Uuid) -> usize {
        let before = self.edges.len();
        self.edges
            .retain(|e| !(e.source == source && e.target == target));
        before - self.edges.len()
    }

    /// Number of outgoing edges of `parent` (pre-layout fan-out stagger).
    pub fn child_count(&self, parent: Uuid) -> usize {
        self.edges.iter().filter(|e| e.source == parent).count()
    }

    /// Source → ordered targets adjacency, preserving edge insertion order.
    /// Sibling order in the layout passes is this order.
    pub fn child_map(&self) -> HashMap<Uuid, Vec<Uuid>> {
        let mut map: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for edge in &self.edges {
            map.entry(edge.source).or_default().push(edge.target);
        }
        map
    }

    /// The root node: first node without a `parent_id`, in insertion order.
    ///
    /// A well-formed map has exactly one; with zero the caller skips
    /// layout and passes positions through unchanged.
    pub fn find_root(&self) -> Option<&Node> {
        self.nodes.iter().find(|n| n.data.parent_id.is_none())
    }

    /// Transitive closure of edge targets reachable from `id` (excluding
    /// `id` itself). Walks iteratively; the visited set bounds the walk on
    /// corrupt cyclic edge sets.
    pub fn descendant_ids(&self, id: Uuid) -> HashSet<Uuid> {
        let mut out = HashSet::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            for edge in self.edges.iter().filter(|e| e.source == current) {
                if out.insert(edge.target) {
                    stack.push(edge.target);
                }
            }
        }
        out
    }

    /// Overwrite positions from a layout pass. Nodes absent from the map
    /// keep their stored position.
    pub fn apply_positions(&mut self, positions: &HashMap<Uuid, Point2D<f32>>) {
        for node in &mut self.nodes {
            if let Some(position) = positions.get(&node.id) {
                node.position = *position;
            }
        }
    }

    /// Serialize nodes to their persisted record shape.
    pub fn to_persisted_nodes(&self) -> Vec<PersistedNode> {
        self.nodes
            .iter()
            .map(|node| PersistedNode {
                node_id: node.id.to_string(),
                label: node.data.label.clone(),
                color: node.data.color.clone(),
                shape: node.data.shape,
                font_size: node.data.font_size,
                icon: node.data.icon.clone(),
                comment: node.data.comment.clone(),
                url: node.data.url.clone(),
                image: node.data.image.clone(),
                parent_id: node.data.parent_id.map(|id| id.to_string()),
                position_x: node.position.x,
                position_y: node.position.y,
            })
            .collect()
    }

    /// Serialize edges to their persisted record shape.
    pub fn to_persisted_edges(&self) -> Vec<PersistedEdge> {
        self.edges
            .iter()
            .map(|edge| PersistedEdge {
                source_id: edge.source.to_string(),
                target_id: edge.target.to_string(),
            })
            .collect()
    }

    /// Rebuild a graph from persisted records.
    ///
    /// Records with unparseable ids are dropped rather than propagated;
    /// edges with endpoints outside the restored node set are dropped too.
    pub fn from_persisted(nodes: &[PersistedNode], edges: &[PersistedEdge]) -> Self {
        let mut graph = Graph::new();

        for pnode in nodes {
            let Ok(id) = Uuid::parse_str(&pnode.node_id) else {
                continue;
            };
            let parent_id = match &pnode.parent_id {
                Some(raw) => match Uuid::parse_str(raw) {
                    Ok(parent) => Some(parent),
                    Err(_) => continue,
                },
                None => None,
            };
            graph.insert_node(Node {
                id,
                position: Point2D::new(pnode.position_x, pnode.position_y),
                data: NodeData {
                    label: pnode.label.clone(),
                    color: pnode.color.clone(),
                    shape: pnode.shape,
                    font_size: pnode.font_size,
                    icon: pnode.icon.clone(),
                    comment: pnode.comment.clone(),
                    url: pnode.url.clone(),
                    image: pnode.image.clone(),
                    parent_id,
                },
            });
        }

        for pedge in edges {
            let source = Uuid::parse_str(&pedge.source_id).ok();
            let target = Uuid::parse_str(&pedge.target_id).ok();
            if let (Some(source), Some(target)) = (source, target) {
                graph.add_edge(source, target);
            }
        }

        graph
    }
}
