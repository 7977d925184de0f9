/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The stateful map engine.
//!
//! `MapEngine` owns the live document (graph, layout mode, selection and
//! edit cursors, undo history) and exposes every mutation the UI shell is
//! allowed to perform. Mutations run synchronously to completion; the
//! only asynchrony is the initial record fetch and the debounced
//! fire-and-forget auto-save.

use std::sync::Arc;
use std::time::{Duration, Instant};

use euclid::default::Point2D;
use log::warn;
use time::OffsetDateTime;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::graph::{Edge, Graph, Node, NodeData, NodeDataPatch, MAX_LABEL_LEN};
use crate::history::{History, Snapshot};
use crate::layout::{self, LayoutMode};
use crate::persistence::{MapGateway, MapRecordPatch};

/// Quiet interval before a burst of mutations becomes one durable write.
pub const AUTO_SAVE_DEBOUNCE: Duration = Duration::from_millis(500);

/// Horizontal offset of a freshly created child from its parent.
const CHILD_X_OFFSET: f32 = 250.0;

/// Vertical stagger per existing sibling, so pre-layout children fan out
/// instead of stacking.
const SIBLING_Y_STAGGER: f32 = 100.0;

/// Operations rejected at the engine boundary. Messages are suitable for
/// direct display to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    /// The move target is the moved node itself or inside its subtree.
    MoveIntoDescendant,
    /// The root node has no parent edge to reassign.
    RootImmovable,
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::MoveIntoDescendant => {
                write!(f, "Cannot move a branch into its own subtree")
            }
            EngineError::RootImmovable => {
                write!(f, "The root node cannot be moved to a new parent")
            }
        }
    }
}

impl std::error::Error for EngineError {}

/// Externally-reported node delta from the canvas widget.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeChange {
    /// Pointer-driven position update. `dragging` marks an active
    /// gesture; the transition to `false` closes the drag bracket.
    Position {
        id: Uuid,
        position: Option<Point2D<f32>>,
        dragging: bool,
    },
    /// Selection toggle; the last toggle in a batch wins.
    Select { id: Uuid, selected: bool },
    /// Node removed by the widget (edge deltas arrive separately).
    Remove { id: Uuid },
}

/// Externally-reported edge delta from the canvas widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeChange {
    Remove { id: String },
}

/// The mind-map state engine.
pub struct MapEngine {
    map_id: Option<u64>,
    map_name: String,
    graph: Graph,
    layout_mode: LayoutMode,
    selected_node_id: Option<Uuid>,
    editing_node_id: Option<Uuid>,
    loading: bool,
    error: Option<String>,
    history: History,
    /// While true, position deltas are layout-transition frames and are
    /// ignored rather than treated as user moves.
    is_animating: bool,
    /// Pending cut/move source picked by the UI, not itself undoable.
    move_source_id: Option<Uuid>,
    gateway: Arc<dyn MapGateway>,
    pending_persist: Option<JoinHandle<()>>,
}

impl MapEngine {
    pub fn new(gateway: Arc<dyn MapGateway>) -> Self {
        Self {
            map_id: None,
            map_name: String::new(),
            graph: Graph::new(),
            layout_mode: LayoutMode::Free,
            selected_node_id: None,
            editing_node_id: None,
            loading: false,
            error: None,
            history: History::new(),
            is_animating: false,
            move_source_id: None,
            gateway,
            pending_persist: None,
        }
    }

    // ── Read-only state surface ─────────────────────────────────────

    pub fn map_id(&self) -> Option<u64> {
        self.map_id
    }

    pub fn map_name(&self) -> &str {
        &self.map_name
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn nodes(&self) -> &[Node] {
        self.graph.nodes()
    }

    pub fn edges(&self) -> &[Edge] {
        self.graph.edges()
    }

    pub fn layout_mode(&self) -> LayoutMode {
        self.layout_mode
    }

    pub fn selected_node_id(&self) -> Option<Uuid> {
        self.selected_node_id
    }

    pub fn editing_node_id(&self) -> Option<Uuid> {
        self.editing_node_id
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_animating(&self) -> bool {
        self.is_animating
    }

    pub fn move_source_id(&self) -> Option<Uuid> {
        self.move_source_id
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    // ── Lifecycle ───────────────────────────────────────────────────

    /// Fetch a map record and make it the live document.
    ///
    /// A missing id or a gateway failure becomes the `error` state; the
    /// rest of the engine is left untouched. A stored non-free layout
    /// mode is re-applied before the map is exposed.
    pub async fn load_map(&mut self, id: u64) {
        self.loading = true;
        self.error = None;
        match self.gateway.get(id).await {
            Ok(Some(record)) => {
                let mut graph = Graph::from_persisted(&record.nodes, &record.edges);
                if record.layout_mode != LayoutMode::Free {
                    let positions = layout::apply(record.layout_mode, &graph);
                    graph.apply_positions(&positions);
                }
                self.map_id = Some(record.id);
                self.map_name = record.name;
                self.graph = graph;
                self.layout_mode = record.layout_mode;
                self.selected_node_id = None;
                self.editing_node_id = None;
                self.history.reset();
                self.loading = false;
            }
            Ok(None) => {
                self.loading = false;
                self.error = Some("Map not found".to_string());
            }
            Err(e) => {
                self.loading = false;
                self.error = Some(e.to_string());
            }
        }
    }

    /// Cancel pending work and return to the initial empty state.
    /// Idempotent; a stale drag bracket or auto-save task cannot leak
    /// into the next loaded map.
    pub fn reset(&mut self) {
        if let Some(handle) = self.pending_persist.take() {
            handle.abort();
        }
        self.history.reset();
        self.map_id = None;
        self.map_name.clear();
        self.graph = Graph::new();
        self.layout_mode = LayoutMode::Free;
        self.selected_node_id = None;
        self.editing_node_id = None;
        self.loading = false;
        self.error = None;
        self.is_animating = false;
        self.move_source_id = None;
    }

    // ── Canvas change feeds ─────────────────────────────────────────

    /// Apply a batch of node deltas reported by the canvas.
    ///
    /// Position deltas are dropped while a layout transition animates.
    /// Drag brackets are detected here: the state immediately before the
    /// first dragging event is held and pushed once, on release.
    pub fn on_nodes_change(&mut self, changes: &[NodeChange]) {
        let animating = self.is_animating;
        let filtered: Vec<&NodeChange> = changes
            .iter()
            .filter(|change| !(animating && matches!(change, NodeChange::Position { .. })))
            .collect();
        if filtered.is_empty() {
            return;
        }

        for change in filtered {
            match change {
                NodeChange::Position {
                    id,
                    position,
                    dragging,
                } => {
                    if *dragging && !self.history.is_dragging() {
                        let pre_drag = self.snapshot();
                        self.history.begin_drag(pre_drag);
                    } else if !*dragging && self.history.is_dragging() {
                        self.history.end_drag();
                    }
                    if let Some(position) = position
                        && let Some(node) = self.graph.node_mut(*id)
                    {
                        node.position = *position;
                    }
                }
                NodeChange::Select { id, selected } => {
                    self.selected_node_id = selected.then_some(*id);
                }
                NodeChange::Remove { id } => {
                    self.graph.remove_node(*id);
                }
            }
        }

        self.schedule_persist();
    }

    /// Apply a batch of edge deltas reported by the canvas.
    pub fn on_edges_change(&mut self, changes: &[EdgeChange]) {
        if changes.is_empty() {
            return;
        }
        for change in changes {
            match change {
                EdgeChange::Remove { id } => {
                    self.graph.remove_edge(id);
                }
            }
        }
        self.schedule_persist();
    }

    // ── Structural mutations ────────────────────────────────────────

    /// Create a child of `parent_id` and open it for label entry.
    /// Returns the new node's id; `None` if the parent is gone.
    pub fn add_child_node(&mut self, parent_id: Uuid) -> Option<Uuid> {
        let parent = self.graph.node(parent_id)?;
        let parent_position = parent.position;
        let sibling_count = self.graph.child_count(parent_id) as f32;

        self.record_snapshot(false);

        let id = Uuid::new_v4();
        self.graph.insert_node(Node {
            id,
            position: Point2D::new(
                parent_position.x + CHILD_X_OFFSET,
                parent_position.y + sibling_count * SIBLING_Y_STAGGER,
            ),
            data: NodeData::child_of(parent_id),
        });
        self.graph.add_edge(parent_id, id);
        self.relayout_if_auto();
        self.editing_node_id = Some(id);
        self.schedule_persist();
        Some(id)
    }

    /// Create a sibling of `node_id` under the same parent.
    /// No-op on the root, which has no parent.
    pub fn add_sibling_node(&mut self, node_id: Uuid) -> Option<Uuid> {
        let parent_id = self.graph.node(node_id)?.data.parent_id?;
        self.add_child_node(parent_id)
    }

    /// Add a user-drawn connection. Self-loops and duplicate pairs are
    /// stale gesture artifacts and are dropped silently.
    pub fn add_edge(&mut self, source: Uuid, target: Uuid) {
        if source == target {
            return;
        }
        if self.graph.has_edge(source, target) {
            return;
        }
        if !self.graph.contains_node(source) || !self.graph.contains_node(target) {
            return;
        }

        self.record_snapshot(false);
        self.graph.add_edge(source, target);
        self.schedule_persist();
    }

    /// Commit a label edit. An all-whitespace value falls back to the
    /// previous label; overlong values are truncated. Clears the edit
    /// cursor either way.
    pub fn update_node_label(&mut self, node_id: Uuid, label: &str) {
        let Some(previous) = self.graph.node(node_id).map(|n| n.data.label.clone()) else {
            return;
        };

        self.record_snapshot(true);

        let trimmed = label.trim();
        let next = if trimmed.is_empty() {
            previous
        } else {
            trimmed.chars().take(MAX_LABEL_LEN).collect()
        };
        if let Some(node) = self.graph.node_mut(node_id) {
            node.data.label = next;
        }
        self.editing_node_id = None;
        self.schedule_persist();
    }

    /// Merge style/content fields into a node's data.
    pub fn update_node_data(&mut self, node_id: Uuid, patch: &NodeDataPatch) {
        if !self.graph.contains_node(node_id) {
            return;
        }

        self.record_snapshot(true);

        if let Some(node) = self.graph.node_mut(node_id) {
            patch.apply_to(&mut node.data);
        }
        self.schedule_persist();
    }

    /// Delete a node and its whole subtree. The root is undeletable.
    pub fn delete_node(&mut self, node_id: Uuid) {
        let Some(node) = self.graph.node(node_id) else {
            return;
        };
        if node.data.parent_id.is_none() {
            return;
        }

        self.record_snapshot(false);

        let mut remove = self.graph.descendant_ids(node_id);
        remove.insert(node_id);
        self.graph.remove_many(&remove);
        self.relayout_if_auto();
        self.selected_node_id = None;
        self.editing_node_id = None;
        self.schedule_persist();
    }

    /// Reparent `source_id` (with its subtree) under `new_parent_id`.
    ///
    /// Rejected with a descriptive error when the target is the node
    /// itself or one of its descendants, or when the source is the root;
    /// state is untouched on rejection. Stale ids are silent no-ops.
    pub fn move_branch(&mut self, source_id: Uuid, new_parent_id: Uuid) -> Result<(), EngineError> {
        let Some(source) = self.graph.node(source_id) else {
            return Ok(());
        };
        let Some(old_parent_id) = source.data.parent_id else {
            return Err(EngineError::RootImmovable);
        };
        if new_parent_id == source_id {
            return Err(EngineError::MoveIntoDescendant);
        }
        if self.graph.descendant_ids(source_id).contains(&new_parent_id) {
            return Err(EngineError::MoveIntoDescendant);
        }
        if !self.graph.contains_node(new_parent_id) || new_parent_id == old_parent_id {
            return Ok(());
        }

        self.record_snapshot(false);

        self.graph.remove_edge_between(old_parent_id, source_id);
        if let Some(node) = self.graph.node_mut(source_id) {
            node.data.parent_id = Some(new_parent_id);
        }
        self.graph.add_edge(new_parent_id, source_id);
        if self.move_source_id == Some(source_id) {
            self.move_source_id = None;
        }
        self.relayout_if_auto();
        self.schedule_persist();
        Ok(())
    }

    /// Mark a node as the pending move source (UI picking mode).
    pub fn cut_node(&mut self, node_id: Uuid) {
        if self.graph.contains_node(node_id) {
            self.move_source_id = Some(node_id);
        }
    }

    /// Leave move-target picking mode.
    pub fn cancel_move_branch(&mut self) {
        self.move_source_id = None;
    }

    // ── Layout, naming, cursors ─────────────────────────────────────

    /// Switch the layout mode, recording the outgoing mode so undo can
    /// restore both the prior positions and the prior mode. Leaves the
    /// engine animating until the UI reports the transition finished.
    pub fn set_layout_mode(&mut self, mode: LayoutMode) {
        if mode == self.layout_mode {
            return;
        }

        let outgoing = self.snapshot_with_mode();
        self.history.push(outgoing);
        self.layout_mode = mode;
        if mode != LayoutMode::Free {
            let positions = layout::apply(mode, &self.graph);
            self.graph.apply_positions(&positions);
        }
        self.is_animating = true;
        self.schedule_persist();
    }

    /// Mark the layout transition as running/finished.
    pub fn set_animating(&mut self, animating: bool) {
        self.is_animating = animating;
    }

    pub fn set_selected_node(&mut self, id: Option<Uuid>) {
        self.selected_node_id = id;
    }

    /// Move the inline-edit cursor. At most one node is editable at a
    /// time; the commit path clears the cursor.
    pub fn set_editing_node(&mut self, id: Option<Uuid>) {
        self.editing_node_id = id;
    }

    pub fn set_map_name(&mut self, name: impl Into<String>) {
        self.map_name = name.into();
        self.schedule_persist();
    }

    // ── History ─────────────────────────────────────────────────────

    /// Step back one undo step. Clears selection and edit cursors.
    pub fn undo(&mut self) {
        if !self.history.can_undo() {
            return;
        }
        let current = self.snapshot_with_mode();
        let Some(previous) = self.history.undo(current) else {
            return;
        };
        self.apply_snapshot(previous);
        self.selected_node_id = None;
        self.editing_node_id = None;
        self.schedule_persist();
    }

    /// Step forward one redo step. Clears selection and edit cursors.
    pub fn redo(&mut self) {
        if !self.history.can_redo() {
            return;
        }
        let current = self.snapshot_with_mode();
        let Some(next) = self.history.redo(current) else {
            return;
        };
        self.apply_snapshot(next);
        self.selected_node_id = None;
        self.editing_node_id = None;
        self.schedule_persist();
    }

    // ── Persistence ─────────────────────────────────────────────────

    /// Request a durable write of the current state (debounced).
    pub fn persist(&mut self) {
        self.schedule_persist();
    }

    /// Store a rendered thumbnail immediately, outside the debounce
    /// window. Fire-and-forget; failures are logged.
    pub fn save_thumbnail(&self, thumbnail: String) {
        let Some(map_id) = self.map_id else {
            return;
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!("Thumbnail save skipped: no async runtime available");
            return;
        };
        let gateway = Arc::clone(&self.gateway);
        let _ = runtime.spawn(async move {
            let patch = MapRecordPatch {
                thumbnail: Some(thumbnail),
                ..MapRecordPatch::default()
            };
            if let Err(e) = gateway.update(map_id, patch).await {
                warn!("Failed to save thumbnail for map {map_id}: {e}");
            }
        });
    }

    // ── Internals ───────────────────────────────────────────────────

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            nodes: self.graph.nodes().to_vec(),
            edges: self.graph.edges().to_vec(),
            layout_mode: None,
        }
    }

    fn snapshot_with_mode(&self) -> Snapshot {
        Snapshot {
            layout_mode: Some(self.layout_mode),
            ..self.snapshot()
        }
    }

    fn record_snapshot(&mut self, batchable: bool) {
        let snapshot = self.snapshot();
        self.history.record(snapshot, batchable, Instant::now());
    }

    fn apply_snapshot(&mut self, snapshot: Snapshot) {
        self.graph = Graph::from_parts(snapshot.nodes, snapshot.edges);
        if let Some(mode) = snapshot.layout_mode {
            self.layout_mode = mode;
        }
    }

    fn relayout_if_auto(&mut self) {
        if self.layout_mode == LayoutMode::Free {
            return;
        }
        let positions = layout::apply(self.layout_mode, &self.graph);
        self.graph.apply_positions(&positions);
    }

    /// Replace any pending auto-save with one for the current state.
    ///
    /// The payload is cloned now; the write happens after the debounce
    /// interval on the runtime, so a burst of mutations becomes one
    /// write of the final state. Without a loaded map this is a no-op.
    fn schedule_persist(&mut self) {
        let Some(map_id) = self.map_id else {
            return;
        };
        if let Some(handle) = self.pending_persist.take() {
            handle.abort();
        }
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!("Auto-save skipped: no async runtime available");
            return;
        };

        let patch = MapRecordPatch {
            name: Some(self.map_name.clone()),
            nodes: Some(self.graph.to_persisted_nodes()),
            edges: Some(self.graph.to_persisted_edges()),
            layout_mode: Some(self.layout_mode),
            thumbnail: None,
            updated_at: Some(OffsetDateTime::now_utc()),
        };
        let gateway = Arc::clone(&self.gateway);
        self.pending_persist = Some(runtime.spawn(async move {
            tokio::time::sleep(AUTO_SAVE_DEBOUNCE).await;
            if let Err(e) = gateway.update(map_id, patch).await {
                warn!("Auto-save failed for map {map_id}: {e}");
            }
        }));
    }
}
