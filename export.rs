/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Versioned JSON interchange format for whole maps.
//!
//! Export serializes the live document; import validates the shape,
//! stores a fresh record through the gateway, and returns the new id.
//! Node and edge content round-trips unchanged; the record id is
//! assigned by the gateway.

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::graph::Graph;
use crate::layout::LayoutMode;
use crate::persistence::{GatewayError, MapGateway, NewMapRecord, PersistedEdge, PersistedNode};

/// Current interchange format version.
pub const EXPORT_FORMAT_VERSION: u32 = 1;

/// One exported mind map.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExportedMap {
    pub version: u32,
    pub name: String,
    pub nodes: Vec<PersistedNode>,
    pub edges: Vec<PersistedEdge>,
    pub layout_mode: LayoutMode,
    pub thumbnail: Option<String>,
    pub exported_at: String,
}

/// Import failures.
#[derive(Debug)]
pub enum ImportError {
    /// The payload is not a structurally valid exported map.
    InvalidFormat,
    /// Storing the imported record failed.
    Gateway(GatewayError),
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::InvalidFormat => write!(f, "Invalid mind map file format"),
            ImportError::Gateway(e) => write!(f, "Import failed: {e}"),
        }
    }
}

impl std::error::Error for ImportError {}

/// Serialize a map to the interchange JSON.
pub fn export_json(
    name: &str,
    graph: &Graph,
    layout_mode: LayoutMode,
    thumbnail: Option<String>,
) -> Result<String, serde_json::Error> {
    let exported = ExportedMap {
        version: EXPORT_FORMAT_VERSION,
        name: name.to_string(),
        nodes: graph.to_persisted_nodes(),
        edges: graph.to_persisted_edges(),
        layout_mode,
        thumbnail,
        exported_at: OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default(),
    };
    serde_json::to_string_pretty(&exported)
}

/// Parse interchange JSON and store it as a new record.
///
/// Shape validation happens before any write: a malformed payload is
/// rejected with [`ImportError::InvalidFormat`] and nothing is created.
pub async fn import_json(gateway: &dyn MapGateway, payload: &str) -> Result<u64, ImportError> {
    let parsed: ExportedMap =
        serde_json::from_str(payload).map_err(|_| ImportError::InvalidFormat)?;

    let now = OffsetDateTime::now_utc();
    gateway
        .add(NewMapRecord {
            name: parsed.name,
            nodes: parsed.nodes,
            edges: parsed.edges,
            layout_mode: parsed.layout_mode,
            thumbnail: parsed.thumbnail,
            created_at: now,
            updated_at: now,
        })
        .await
        .map_err(ImportError::Gateway)
}
