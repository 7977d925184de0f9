/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Starter map templates.
//!
//! Templates are static descriptions; `instantiate` mints fresh node ids
//! each time, so two maps created from one template never share ids.

use euclid::default::Point2D;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::graph::{Graph, Node, NodeData, NodeShape, DEFAULT_ROOT_LABEL};
use crate::layout::LayoutMode;
use crate::persistence::NewMapRecord;

/// A pre-wired first-level child in a template.
pub struct TemplateChild {
    pub label: &'static str,
    pub color: &'static str,
    pub shape: NodeShape,
}

const fn child(label: &'static str, color: &'static str) -> TemplateChild {
    TemplateChild {
        label,
        color,
        shape: NodeShape::Rectangle,
    }
}

const fn pill(label: &'static str, color: &'static str) -> TemplateChild {
    TemplateChild {
        label,
        color,
        shape: NodeShape::Pill,
    }
}

/// A starter map description.
pub struct MapTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub layout_mode: LayoutMode,
    pub root_label: &'static str,
    pub children: &'static [TemplateChild],
}

/// All built-in templates, gallery order.
pub const TEMPLATES: &[MapTemplate] = &[
    MapTemplate {
        id: "blank",
        name: "Blank Map",
        description: "Start from scratch with a single root node",
        icon: "📄",
        layout_mode: LayoutMode::Free,
        root_label: DEFAULT_ROOT_LABEL,
        children: &[],
    },
    MapTemplate {
        id: "swot",
        name: "SWOT Analysis",
        description: "Strengths, Weaknesses, Opportunities, Threats",
        icon: "📊",
        layout_mode: LayoutMode::Tree,
        root_label: "SWOT Analysis",
        children: &[
            child("Strengths", "#2ECC71"),
            child("Weaknesses", "#E74C3C"),
            child("Opportunities", "#3498DB"),
            child("Threats", "#E67E22"),
        ],
    },
    MapTemplate {
        id: "pros-cons",
        name: "Pros & Cons",
        description: "Weigh the positives and negatives",
        icon: "⚖️",
        layout_mode: LayoutMode::Tree,
        root_label: "Decision",
        children: &[child("Pros", "#2ECC71"), child("Cons", "#E74C3C")],
    },
    MapTemplate {
        id: "project-plan",
        name: "Project Plan",
        description: "Planning, Execution, and Review phases",
        icon: "📋",
        layout_mode: LayoutMode::Tree,
        root_label: "Project",
        children: &[
            child("Planning", "#3498DB"),
            child("Execution", "#E67E22"),
            child("Review", "#2ECC71"),
        ],
    },
    MapTemplate {
        id: "brainstorm",
        name: "Brainstorm",
        description: "Capture ideas freely in all directions",
        icon: "💡",
        layout_mode: LayoutMode::Tree,
        root_label: "Topic",
        children: &[
            pill("Idea 1", "#E67E22"),
            pill("Idea 2", "#9B59B6"),
            pill("Idea 3", "#2ECC71"),
            pill("Idea 4", "#E74C3C"),
        ],
    },
    MapTemplate {
        id: "meeting-notes",
        name: "Meeting Notes",
        description: "Agenda, Discussion, and Action Items",
        icon: "📝",
        layout_mode: LayoutMode::Tree,
        root_label: "Meeting",
        children: &[
            child("Agenda", "#3498DB"),
            child("Discussion", "#F39C12"),
            child("Action Items", "#2ECC71"),
        ],
    },
];

/// Look up a template by its stable id.
pub fn find(id: &str) -> Option<&'static MapTemplate> {
    TEMPLATES.iter().find(|t| t.id == id)
}

impl MapTemplate {
    /// Build a storable record from this template with fresh node ids.
    /// Positions start at the origin; non-free templates are laid out on
    /// first load.
    pub fn instantiate(&self, name: impl Into<String>, now: OffsetDateTime) -> NewMapRecord {
        let mut graph = Graph::new();
        let root_id = Uuid::new_v4();
        graph.insert_node(Node {
            id: root_id,
            position: Point2D::new(0.0, 0.0),
            data: NodeData::root(self.root_label),
        });

        for entry in self.children {
            let mut data = NodeData::child_of(root_id);
            data.label = entry.label.to_string();
            data.color = entry.color.to_string();
            data.shape = entry.shape;
            let id = Uuid::new_v4();
            graph.insert_node(Node {
                id,
                position: Point2D::new(0.0, 0.0),
                data,
            });
            graph.add_edge(root_id, id);
        }

        NewMapRecord {
            name: name.into(),
            nodes: graph.to_persisted_nodes(),
            edges: graph.to_persisted_edges(),
            layout_mode: self.layout_mode,
            thumbnail: None,
            created_at: now,
            updated_at: now,
        }
    }
}
