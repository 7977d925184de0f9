/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use super::harness::TestHarness;
use mindweave::engine::EngineError;
use mindweave::graph::edge_id;
use uuid::Uuid;

#[tokio::test]
async fn test_add_child_fans_out_below_parent() {
    let (mut harness, root) = TestHarness::with_blank_map().await;
    let root_position = harness.engine.graph().node(root).unwrap().position;

    let first = harness.add_child(root);
    let second = harness.add_child(root);

    let first_position = harness.engine.graph().node(first).unwrap().position;
    let second_position = harness.engine.graph().node(second).unwrap().position;
    assert_eq!(first_position.x, root_position.x + 250.0);
    assert_eq!(first_position.y, root_position.y);
    assert_eq!(second_position.x, root_position.x + 250.0);
    assert_eq!(second_position.y, root_position.y + 100.0);
}

#[tokio::test]
async fn test_add_child_wires_tree_edge_and_cursor() {
    let (mut harness, root) = TestHarness::with_blank_map().await;

    let child = harness.add_child(root);

    let node = harness.engine.graph().node(child).unwrap();
    assert_eq!(node.data.parent_id, Some(root));
    assert!(node.data.label.is_empty());
    assert!(harness.engine.graph().has_edge(root, child));
    assert_eq!(
        harness.engine.edges().last().unwrap().id,
        edge_id(root, child)
    );
    assert_eq!(harness.engine.editing_node_id(), Some(child));
}

#[tokio::test]
async fn test_add_child_of_missing_parent_is_noop() {
    let (mut harness, _root) = TestHarness::with_blank_map().await;

    assert!(harness.engine.add_child_node(Uuid::new_v4()).is_none());
    assert_eq!(harness.engine.graph().node_count(), 1);
    assert_eq!(harness.engine.history().past_len(), 0);
}

#[tokio::test]
async fn test_add_sibling_uses_shared_parent() {
    let (mut harness, root) = TestHarness::with_blank_map().await;
    let child = harness.add_child(root);

    let sibling = harness.engine.add_sibling_node(child).unwrap();

    assert_eq!(
        harness.engine.graph().node(sibling).unwrap().data.parent_id,
        Some(root)
    );
}

#[tokio::test]
async fn test_add_sibling_of_root_is_noop() {
    let (mut harness, root) = TestHarness::with_blank_map().await;

    assert!(harness.engine.add_sibling_node(root).is_none());
    assert_eq!(harness.engine.graph().node_count(), 1);
}

#[tokio::test]
async fn test_delete_removes_exactly_the_subtree() {
    let (mut harness, root) = TestHarness::with_blank_map().await;
    let a = harness.add_child(root);
    let b = harness.add_child(a);
    let c = harness.add_child(a);
    let d = harness.add_child(b);

    harness.engine.delete_node(b);

    let graph = harness.engine.graph();
    assert!(graph.contains_node(root));
    assert!(graph.contains_node(a));
    assert!(graph.contains_node(c));
    assert!(!graph.contains_node(b));
    assert!(!graph.contains_node(d));

    assert_eq!(graph.edge_count(), 2);
    assert!(graph.has_edge(root, a));
    assert!(graph.has_edge(a, c));
    assert_eq!(harness.engine.selected_node_id(), None);
    assert_eq!(harness.engine.editing_node_id(), None);
}

#[tokio::test]
async fn test_delete_root_is_noop() {
    let (mut harness, root) = TestHarness::with_blank_map().await;
    harness.add_child(root);
    let steps = harness.engine.history().past_len();

    harness.engine.delete_node(root);

    assert!(harness.engine.graph().contains_node(root));
    assert_eq!(harness.engine.graph().node_count(), 2);
    assert_eq!(harness.engine.history().past_len(), steps);
}

#[tokio::test]
async fn test_delete_missing_node_is_noop() {
    let (mut harness, _root) = TestHarness::with_blank_map().await;

    harness.engine.delete_node(Uuid::new_v4());

    assert_eq!(harness.engine.history().past_len(), 0);
}

#[tokio::test]
async fn test_connect_rejects_self_loop_and_duplicate_silently() {
    let (mut harness, root) = TestHarness::with_blank_map().await;
    let a = harness.add_child(root);
    let b = harness.add_child(root);
    let edges_before = harness.engine.graph().edge_count();
    let steps_before = harness.engine.history().past_len();

    harness.engine.add_edge(a, a);
    harness.engine.add_edge(root, a); // duplicate of the tree edge
    harness.engine.add_edge(Uuid::new_v4(), b); // stale endpoint

    assert_eq!(harness.engine.graph().edge_count(), edges_before);
    assert_eq!(harness.engine.history().past_len(), steps_before);
}

#[tokio::test]
async fn test_connect_adds_cross_link() {
    let (mut harness, root) = TestHarness::with_blank_map().await;
    let a = harness.add_child(root);
    let b = harness.add_child(root);

    harness.engine.add_edge(a, b);

    assert!(harness.engine.graph().has_edge(a, b));
    // The cross-link does not reparent.
    assert_eq!(
        harness.engine.graph().node(b).unwrap().data.parent_id,
        Some(root)
    );
}

#[tokio::test]
async fn test_move_branch_rewires_parent_edge() {
    let (mut harness, root) = TestHarness::with_blank_map().await;
    let a = harness.add_child(root);
    let b = harness.add_child(a);
    let target = harness.add_child(root);

    harness.engine.move_branch(a, target).unwrap();

    let graph = harness.engine.graph();
    assert_eq!(graph.node(a).unwrap().data.parent_id, Some(target));
    assert!(graph.has_edge(target, a));
    assert!(!graph.has_edge(root, a));
    // The subtree follows implicitly.
    assert_eq!(graph.node(b).unwrap().data.parent_id, Some(a));
    assert!(graph.descendant_ids(target).contains(&b));
}

#[tokio::test]
async fn test_move_branch_up_to_root_succeeds() {
    let (mut harness, root) = TestHarness::with_blank_map().await;
    let a = harness.add_child(root);
    let b = harness.add_child(a);

    harness.engine.move_branch(b, root).unwrap();

    let graph = harness.engine.graph();
    assert_eq!(graph.node(b).unwrap().data.parent_id, Some(root));
    assert!(graph.has_edge(root, b));
    assert!(!graph.has_edge(a, b));
}

#[tokio::test]
async fn test_move_branch_into_own_subtree_is_rejected() {
    let (mut harness, root) = TestHarness::with_blank_map().await;
    let a = harness.add_child(root);
    let b = harness.add_child(a);
    let before = harness.engine.graph().clone();
    let steps = harness.engine.history().past_len();

    let err = harness.engine.move_branch(a, b).unwrap_err();
    assert_eq!(err, EngineError::MoveIntoDescendant);
    let err = harness.engine.move_branch(a, a).unwrap_err();
    assert_eq!(err, EngineError::MoveIntoDescendant);

    // State is untouched on rejection.
    assert_eq!(harness.engine.graph(), &before);
    assert_eq!(harness.engine.history().past_len(), steps);
}

#[tokio::test]
async fn test_move_branch_error_is_displayable() {
    let (mut harness, root) = TestHarness::with_blank_map().await;
    let a = harness.add_child(root);

    let err = harness.engine.move_branch(a, a).unwrap_err();
    assert_eq!(err.to_string(), "Cannot move a branch into its own subtree");
}

#[tokio::test]
async fn test_move_root_is_rejected() {
    let (mut harness, root) = TestHarness::with_blank_map().await;
    let a = harness.add_child(root);
    let before = harness.engine.graph().clone();

    let err = harness.engine.move_branch(root, a).unwrap_err();

    assert_eq!(err, EngineError::RootImmovable);
    assert_eq!(harness.engine.graph(), &before);
}

#[tokio::test]
async fn test_move_branch_with_stale_ids_is_noop() {
    let (mut harness, root) = TestHarness::with_blank_map().await;
    let a = harness.add_child(root);
    let before = harness.engine.graph().clone();

    harness.engine.move_branch(Uuid::new_v4(), a).unwrap();
    harness.engine.move_branch(a, Uuid::new_v4()).unwrap();

    assert_eq!(harness.engine.graph(), &before);
}

#[tokio::test]
async fn test_cut_marker_set_cleared_and_consumed() {
    let (mut harness, root) = TestHarness::with_blank_map().await;
    let a = harness.add_child(root);
    let target = harness.add_child(root);

    harness.engine.cut_node(a);
    assert_eq!(harness.engine.move_source_id(), Some(a));

    harness.engine.cancel_move_branch();
    assert_eq!(harness.engine.move_source_id(), None);

    harness.engine.cut_node(a);
    harness.engine.move_branch(a, target).unwrap();
    assert_eq!(
        harness.engine.move_source_id(),
        None,
        "completing the move consumes the marker"
    );
}

#[tokio::test]
async fn test_cut_marker_is_not_undoable() {
    let (mut harness, root) = TestHarness::with_blank_map().await;
    let a = harness.add_child(root);
    let steps = harness.engine.history().past_len();

    harness.engine.cut_node(a);
    harness.engine.cancel_move_branch();

    assert_eq!(harness.engine.history().past_len(), steps);
}
