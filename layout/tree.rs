/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Tree layout: root on top, one level per depth, subtrees packed
//! left-to-right without overlap.

use euclid::default::Point2D;
use std::collections::HashMap;
use uuid::Uuid;

use super::{tree_index, TreeIndex};
use crate::graph::Graph;

/// Vertical distance between depth levels.
const LEVEL_SPACING: f32 = 120.0;

/// Horizontal gap between adjacent sibling subtrees.
const SIBLING_SPACING: f32 = 40.0;

/// Horizontal footprint reserved for a leaf.
const NODE_WIDTH: f32 = 180.0;

/// Compute tree positions. Each node is centered over the horizontal
/// span of its subtree; the root's span is centered on x = 0.
pub(crate) fn compute(graph: &Graph) -> HashMap<Uuid, Point2D<f32>> {
    let Some(index) = tree_index(graph) else {
        return HashMap::new();
    };
    let widths = subtree_widths(&index);

    let mut positions = HashMap::new();
    // (node, depth, left edge of the subtree span)
    let total = widths[&index.root];
    let mut stack: Vec<(Uuid, f32, f32)> = vec![(index.root, 0.0, -total / 2.0)];
    while let Some((id, depth, left)) = stack.pop() {
        let width = widths[&id];
        positions.insert(
            id,
            Point2D::new(left + width / 2.0, depth * LEVEL_SPACING),
        );

        let mut child_left = left;
        for &child in index.children.get(&id).into_iter().flatten() {
            stack.push((child, depth + 1.0, child_left));
            child_left += widths[&child] + SIBLING_SPACING;
        }
    }

    positions
}

/// Horizontal span needed by each subtree: a leaf takes `NODE_WIDTH`,
/// an internal node the sum of its children plus gaps.
fn subtree_widths(index: &TreeIndex) -> HashMap<Uuid, f32> {
    let mut widths = HashMap::new();
    let mut stack = vec![(index.root, false)];
    while let Some((id, expanded)) = stack.pop() {
        let kids = index.children.get(&id);
        if expanded || kids.is_none_or(|k| k.is_empty()) {
            let width = match kids {
                Some(kids) if !kids.is_empty() => {
                    let children: f32 = kids.iter().map(|child| widths[child]).sum();
                    children + SIBLING_SPACING * (kids.len() - 1) as f32
                }
                _ => NODE_WIDTH,
            };
            widths.insert(id, width);
        } else {
            stack.push((id, true));
            for &child in kids.into_iter().flatten() {
                stack.push((child, false));
            }
        }
    }
    widths
}
