/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Radial layout: concentric rings around the root, each child given an
//! angular sector proportional to its share of the parent's leaves.

use euclid::default::Point2D;
use std::collections::HashMap;
use std::f32::consts::TAU;
use uuid::Uuid;

use super::{leaf_counts, tree_index};
use crate::graph::Graph;

/// Distance between consecutive depth rings.
const RING_SPACING: f32 = 200.0;

/// Minimum node-to-node arc length on a ring; dense rings widen their
/// sectors to this instead of crowding.
const MIN_NODE_ARC: f32 = 80.0;

/// Compute radial positions. Root sits at the origin; depth `d` maps to
/// radius `d * RING_SPACING`. Output is a pure function of the tree
/// shape, independent of current positions.
pub(crate) fn compute(graph: &Graph) -> HashMap<Uuid, Point2D<f32>> {
    let Some(index) = tree_index(graph) else {
        return HashMap::new();
    };
    let leaves = leaf_counts(&index);

    let mut positions = HashMap::new();
    positions.insert(index.root, Point2D::new(0.0, 0.0));

    // (node, child ring depth, sector start, sector end)
    let mut stack: Vec<(Uuid, f32, f32, f32)> = vec![(index.root, 1.0, 0.0, TAU)];
    while let Some((id, depth, start, end)) = stack.pop() {
        let Some(children) = index.children.get(&id) else {
            continue;
        };
        let radius = depth * RING_SPACING;
        let total = leaves[&id] as f32;
        let mut current = start;

        for &child in children {
            let share = (end - start) * leaves[&child] as f32 / total;
            let min_sweep = if radius > 0.0 {
                MIN_NODE_ARC / radius
            } else {
                share
            };
            let sweep = share.max(min_sweep);
            let mid = current + sweep / 2.0;
            positions.insert(
                child,
                Point2D::new(mid.cos() * radius, mid.sin() * radius),
            );
            stack.push((child, depth + 1.0, current, current + sweep));
            current += sweep;
        }
    }

    positions
}
