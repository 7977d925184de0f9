/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Serializable record types for map persistence.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::graph::{NodeShape, TextSize};
use crate::layout::LayoutMode;

/// Persisted node.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PersistedNode {
    /// Stable node identity.
    pub node_id: String,
    pub label: String,
    pub color: String,
    pub shape: NodeShape,
    pub font_size: TextSize,
    pub icon: Option<String>,
    pub comment: Option<String>,
    pub url: Option<String>,
    pub image: Option<String>,
    /// Parent node id; absent marks the tree root.
    pub parent_id: Option<String>,
    pub position_x: f32,
    pub position_y: f32,
}

/// Persisted edge. The edge id is re-derived from the endpoints on
/// restore, so only they are stored.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PersistedEdge {
    pub source_id: String,
    pub target_id: String,
}

/// One stored mind map, the unit the gateway reads and writes.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MapRecord {
    pub id: u64,
    pub name: String,
    pub nodes: Vec<PersistedNode>,
    pub edges: Vec<PersistedEdge>,
    pub layout_mode: LayoutMode,
    pub thumbnail: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// A map record before the gateway has assigned its id.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NewMapRecord {
    pub name: String,
    pub nodes: Vec<PersistedNode>,
    pub edges: Vec<PersistedEdge>,
    pub layout_mode: LayoutMode,
    pub thumbnail: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Partial update over a stored map record; `None` fields are untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MapRecordPatch {
    pub name: Option<String>,
    pub nodes: Option<Vec<PersistedNode>>,
    pub edges: Option<Vec<PersistedEdge>>,
    pub layout_mode: Option<LayoutMode>,
    pub thumbnail: Option<String>,
    pub updated_at: Option<OffsetDateTime>,
}

impl MapRecordPatch {
    /// Apply the provided fields onto `record`.
    pub fn apply_to(&self, record: &mut MapRecord) {
        if let Some(name) = &self.name {
            record.name = name.clone();
        }
        if let Some(nodes) = &self.nodes {
            record.nodes = nodes.clone();
        }
        if let Some(edges) = &self.edges {
            record.edges = edges.clone();
        }
        if let Some(layout_mode) = self.layout_mode {
            record.layout_mode = layout_mode;
        }
        if let Some(thumbnail) = &self.thumbnail {
            record.thumbnail = Some(thumbnail.clone());
        }
        if let Some(updated_at) = self.updated_at {
            record.updated_at = updated_at;
        }
    }
}
