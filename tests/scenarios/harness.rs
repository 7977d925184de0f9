/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::sync::Arc;

use euclid::default::Point2D;
use mindweave::engine::{MapEngine, NodeChange};
use mindweave::persistence::{MapGateway, MapRecord, MemoryGateway};
use mindweave::templates;
use time::OffsetDateTime;
use uuid::Uuid;

pub(crate) struct TestHarness {
    pub(crate) gateway: Arc<MemoryGateway>,
    pub(crate) engine: MapEngine,
}

impl TestHarness {
    /// Engine with a freshly created, loaded blank map (free layout).
    /// Returns the harness and the root node id.
    pub(crate) async fn with_blank_map() -> (Self, Uuid) {
        let gateway = Arc::new(MemoryGateway::new());
        let record = templates::find("blank")
            .unwrap()
            .instantiate("Test Map", OffsetDateTime::now_utc());
        let id = gateway.add(record).await.unwrap();

        let mut engine = MapEngine::new(gateway.clone());
        engine.load_map(id).await;
        assert!(engine.error().is_none(), "blank map should load cleanly");
        let root = engine.graph().find_root().expect("blank map has a root").id;

        (Self { gateway, engine }, root)
    }

    pub(crate) fn add_child(&mut self, parent: Uuid) -> Uuid {
        self.engine
            .add_child_node(parent)
            .expect("parent node should exist")
    }

    /// The stored record for the loaded map.
    pub(crate) async fn stored_record(&self) -> MapRecord {
        let id = self.engine.map_id().expect("a map is loaded");
        self.gateway
            .get(id)
            .await
            .unwrap()
            .expect("record exists for the loaded map")
    }
}

/// A drag gesture over one node: intermediate dragging frames along
/// `path`, then the release frame.
pub(crate) fn drag_gesture(id: Uuid, path: &[(f32, f32)]) -> Vec<NodeChange> {
    let mut changes: Vec<NodeChange> = path
        .iter()
        .map(|&(x, y)| NodeChange::Position {
            id,
            position: Some(Point2D::new(x, y)),
            dragging: true,
        })
        .collect();
    changes.push(NodeChange::Position {
        id,
        position: None,
        dragging: false,
    });
    changes
}
