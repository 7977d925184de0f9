/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Deterministic auto-layout passes.
//!
//! Two algorithms, both pure functions of the tree shape:
//! - `radial`: leaf-count-weighted angular sectors around the root
//! - `tree`: top-down levels with subtree-width horizontal packing
//!
//! Free mode is direct manipulation only; the engine never invokes a
//! layout pass for it. Both passes walk only the parent-chain edges
//! (user-drawn extra connections do not participate) and return a
//! position map; nodes outside the rooted tree keep their positions.

pub mod radial;
pub mod tree;

use euclid::default::Point2D;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::graph::Graph;

/// How node positions are produced.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    Radial,
    Tree,
    #[default]
    Free,
}

impl LayoutMode {
    pub fn as_str(self) -> &'static str {
        match self {
            LayoutMode::Radial => "radial",
            LayoutMode::Tree => "tree",
            LayoutMode::Free => "free",
        }
    }
}

impl std::fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compute new positions for `graph` under `mode`.
///
/// Returns an empty map (identity) in free mode or when no root can be
/// resolved.
pub fn apply(mode: LayoutMode, graph: &Graph) -> HashMap<Uuid, Point2D<f32>> {
    match mode {
        LayoutMode::Radial => radial::compute(graph),
        LayoutMode::Tree => tree::compute(graph),
        LayoutMode::Free => HashMap::new(),
    }
}

/// Rooted tree restricted to parent-chain edges.
pub(crate) struct TreeIndex {
    pub(crate) root: Uuid,
    /// Parent → ordered children, sibling order = edge insertion order.
    pub(crate) children: HashMap<Uuid, Vec<Uuid>>,
}

/// Build the rooted tree the layout passes walk.
///
/// An edge participates only when its target exists and names the edge
/// source as its parent, so user-drawn connections and dangling parent
/// references fall out here. Each node is attached at most once; with at
/// most one parent per node the reachable structure cannot cycle.
pub(crate) fn tree_index(graph: &Graph) -> Option<TreeIndex> {
    let root = graph.find_root()?;
    let mut children: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    let mut attached: std::collections::HashSet<Uuid> = std::collections::HashSet::new();

    for edge in graph.edges() {
        let Some(target) = graph.node(edge.target) else {
            continue;
        };
        if target.data.parent_id != Some(edge.source) {
            continue;
        }
        if !attached.insert(edge.target) {
            continue;
        }
        children.entry(edge.source).or_default().push(edge.target);
    }

    Some(TreeIndex {
        root: root.id,
        children,
    })
}

/// Leaves under each node: leaf = 1, internal = sum of children.
/// Iterative post-order, children resolved before their parent.
pub(crate) fn leaf_counts(index: &TreeIndex) -> HashMap<Uuid, usize> {
    let mut counts = HashMap::new();
    let mut stack = vec![(index.root, false)];
    while let Some((id, expanded)) = stack.pop() {
        let kids = index.children.get(&id);
        if expanded || kids.is_none_or(|k| k.is_empty()) {
            let total: usize = kids
                .map(|k| k.iter().map(|child| counts[child]).sum())
                .unwrap_or(0);
            counts.insert(id, total.max(1));
        } else {
            stack.push((id, true));
            for &child in kids.into_iter().flatten() {
                stack.push((child, false));
            }
        }
    }
    counts
}
