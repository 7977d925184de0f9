/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! mindweave: the state engine behind a mind-map editor.
//!
//! A map is a rooted tree of labeled, styled nodes plus optional extra
//! connections, with deterministic radial/tree auto-layout, bounded
//! undo/redo with drag and edit batching, and debounced persistence
//! through an async record gateway.
//!
//! Core structure:
//! - [`graph`]: document model and tree-shaped queries
//! - [`layout`]: the radial and tree layout passes
//! - [`history`]: bounded undo/redo snapshot stacks
//! - [`engine`]: [`engine::MapEngine`], the stateful orchestrator the UI
//!   shell talks to
//! - [`persistence`]: the [`persistence::MapGateway`] storage seam
//! - [`export`] / [`templates`]: map interchange and starter maps
//!
//! Rendering, toolbars, and the storage backend itself live outside this
//! crate; they drive the engine through its operation surface and
//! observe its state read-only.

pub mod engine;
pub mod export;
pub mod graph;
pub mod history;
pub mod layout;
pub mod persistence;
pub mod templates;

pub use engine::{EdgeChange, EngineError, MapEngine, NodeChange};
pub use graph::{Edge, Graph, Node, NodeData, NodeDataPatch, NodeShape, TextSize};
pub use history::{History, Snapshot};
pub use layout::LayoutMode;
pub use persistence::{GatewayError, MapGateway, MapRecord, MemoryGateway, NewMapRecord};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
