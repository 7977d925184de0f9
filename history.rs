/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Bounded undo/redo history over deep-copied graph snapshots.
//!
//! Push policy:
//! - structural operations push unconditionally
//! - rapid batchable edits within [`UNDO_BATCH_WINDOW`] coalesce into the
//!   previous step
//! - drag gestures hold a pre-drag snapshot and push it once, on release
//!
//! The gesture state lives here, owned by the engine that owns the
//! history, so independent engines never interfere; `reset` clears it.

use std::time::{Duration, Instant};

use crate::graph::{Edge, Node};
use crate::layout::LayoutMode;

/// Maximum retained undo steps; the oldest step is evicted first.
pub const MAX_UNDO_STEPS: usize = 50;

/// Batchable edits closer together than this share one undo step.
pub const UNDO_BATCH_WINDOW: Duration = Duration::from_millis(300);

/// Immutable deep copy of the graph state.
///
/// `layout_mode` is carried only by mode-switch steps and by the
/// "current state" snapshots captured inside undo/redo, so undoing a
/// mode switch restores the prior mode along with the prior positions.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub layout_mode: Option<LayoutMode>,
}

/// Past/future snapshot stacks plus gesture-spanning tracking state.
#[derive(Debug, Default)]
pub struct History {
    past: Vec<Snapshot>,
    future: Vec<Snapshot>,
    /// When the last batching-eligible push happened.
    last_push_at: Option<Instant>,
    dragging: bool,
    /// Pre-drag state held until the gesture ends.
    pre_drag: Option<Snapshot>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Record a pre-operation snapshot.
    ///
    /// A batchable record inside the coalescing window folds into the
    /// previous step: nothing is pushed, but the redo stack is still
    /// invalidated. Every actual push refreshes the window.
    pub fn record(&mut self, snapshot: Snapshot, batchable: bool, now: Instant) {
        if batchable
            && let Some(last) = self.last_push_at
            && now.duration_since(last) < UNDO_BATCH_WINDOW
        {
            self.future.clear();
            return;
        }
        self.last_push_at = Some(now);
        self.push(snapshot);
    }

    /// Push a snapshot unconditionally: cap the stack, drop redo state.
    /// Used by drag release and mode switches, which bypass batching and
    /// leave the batching window untouched.
    pub fn push(&mut self, snapshot: Snapshot) {
        self.past.push(snapshot);
        self.future.clear();
        if self.past.len() > MAX_UNDO_STEPS {
            let excess = self.past.len() - MAX_UNDO_STEPS;
            self.past.drain(0..excess);
        }
    }

    /// First dragging-flagged position event: hold the pre-drag state.
    /// Repeat calls during one gesture are ignored.
    pub fn begin_drag(&mut self, snapshot: Snapshot) {
        if self.dragging {
            return;
        }
        self.dragging = true;
        self.pre_drag = Some(snapshot);
    }

    /// Drag released: push the held snapshot as a single undo step.
    /// Returns whether a step was pushed.
    pub fn end_drag(&mut self) -> bool {
        if !self.dragging {
            return false;
        }
        self.dragging = false;
        match self.pre_drag.take() {
            Some(snapshot) => {
                self.push(snapshot);
                true
            }
            None => false,
        }
    }

    /// Pop the most recent past step, filing `current` for redo.
    /// `None` when there is nothing to undo (and `current` is discarded).
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let previous = self.past.pop()?;
        self.future.push(current);
        Some(previous)
    }

    /// Pop the most recent future step, filing `current` for undo.
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.future.pop()?;
        self.past.push(current);
        Some(next)
    }

    /// Drop all history and gesture state.
    pub fn reset(&mut self) {
        self.past.clear();
        self.future.clear();
        self.last_push_at = None;
        self.dragging = false;
        self.pre_drag = None;
    }
}
