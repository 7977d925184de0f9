/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Async key-value gateway for map records.
//!
//! The engine treats storage as an opaque collaborator: records go in and
//! out whole, keyed by id, and background write failures are logged by
//! the caller rather than surfaced. `MemoryGateway` is the reference
//! implementation used by tests and embedders without a real store.

pub mod types;

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;

pub use types::{MapRecord, MapRecordPatch, NewMapRecord, PersistedEdge, PersistedNode};

/// Errors from a gateway implementation.
#[derive(Debug)]
pub enum GatewayError {
    /// No record stored under the given id.
    NotFound(u64),
    /// Backend-specific failure, already rendered to text.
    Storage(String),
}

impl std::fmt::Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GatewayError::NotFound(id) => write!(f, "No map record with id {id}"),
            GatewayError::Storage(e) => write!(f, "Storage error: {e}"),
        }
    }
}

impl std::error::Error for GatewayError {}

/// Asynchronous store of map records.
#[async_trait]
pub trait MapGateway: Send + Sync {
    /// Fetch a record by id; `Ok(None)` when the id is unknown.
    async fn get(&self, id: u64) -> Result<Option<MapRecord>, GatewayError>;

    /// Store a new record, returning its assigned id.
    async fn add(&self, record: NewMapRecord) -> Result<u64, GatewayError>;

    /// Apply a partial update to a stored record.
    async fn update(&self, id: u64, patch: MapRecordPatch) -> Result<(), GatewayError>;

    /// Delete a record. Deleting an unknown id is not an error.
    async fn delete(&self, id: u64) -> Result<(), GatewayError>;

    /// All stored records (gallery listing).
    async fn all(&self) -> Result<Vec<MapRecord>, GatewayError>;
}

#[derive(Default)]
struct MemoryStore {
    maps: BTreeMap<u64, MapRecord>,
    next_id: u64,
    writes: u64,
}

/// In-memory gateway with auto-incrementing ids.
#[derive(Default)]
pub struct MemoryGateway {
    inner: RwLock<MemoryStore>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `update` calls; used to observe debounced
    /// auto-save coalescing.
    pub fn write_count(&self) -> u64 {
        self.inner.read().writes
    }
}

#[async_trait]
impl MapGateway for MemoryGateway {
    async fn get(&self, id: u64) -> Result<Option<MapRecord>, GatewayError> {
        Ok(self.inner.read().maps.get(&id).cloned())
    }

    async fn add(&self, record: NewMapRecord) -> Result<u64, GatewayError> {
        let mut store = self.inner.write();
        store.next_id += 1;
        let id = store.next_id;
        store.maps.insert(
            id,
            MapRecord {
                id,
                name: record.name,
                nodes: record.nodes,
                edges: record.edges,
                layout_mode: record.layout_mode,
                thumbnail: record.thumbnail,
                created_at: record.created_at,
                updated_at: record.updated_at,
            },
        );
        Ok(id)
    }

    async fn update(&self, id: u64, patch: MapRecordPatch) -> Result<(), GatewayError> {
        let mut store = self.inner.write();
        let Some(record) = store.maps.get_mut(&id) else {
            return Err(GatewayError::NotFound(id));
        };
        patch.apply_to(record);
        store.writes += 1;
        Ok(())
    }

    async fn delete(&self, id: u64) -> Result<(), GatewayError> {
        self.inner.write().maps.remove(&id);
        Ok(())
    }

    async fn all(&self) -> Result<Vec<MapRecord>, GatewayError> {
        Ok(self.inner.read().maps.values().cloned().collect())
    }
}
