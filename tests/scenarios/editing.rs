/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use super::harness::TestHarness;
use mindweave::graph::{NodeDataPatch, NodeShape, TextSize, MAX_LABEL_LEN};
use mindweave::history::UNDO_BATCH_WINDOW;
use std::time::Duration;
use uuid::Uuid;

/// Let the batching window opened by fixture setup expire, so label
/// edits under test get their own undo steps.
fn step_out_of_batch_window() {
    std::thread::sleep(UNDO_BATCH_WINDOW + Duration::from_millis(50));
}

#[tokio::test]
async fn test_label_commit_trims_and_clears_cursor() {
    let (mut harness, root) = TestHarness::with_blank_map().await;
    let child = harness.add_child(root);
    assert_eq!(harness.engine.editing_node_id(), Some(child));

    harness.engine.update_node_label(child, "  Groceries  ");

    let node = harness.engine.graph().node(child).unwrap();
    assert_eq!(node.data.label, "Groceries");
    assert_eq!(harness.engine.editing_node_id(), None);
}

#[tokio::test]
async fn test_blank_label_falls_back_to_previous() {
    let (mut harness, root) = TestHarness::with_blank_map().await;
    let child = harness.add_child(root);
    harness.engine.update_node_label(child, "Keep me");

    harness.engine.update_node_label(child, "   ");

    let node = harness.engine.graph().node(child).unwrap();
    assert_eq!(node.data.label, "Keep me");
}

#[tokio::test]
async fn test_overlong_label_is_truncated() {
    let (mut harness, root) = TestHarness::with_blank_map().await;
    let child = harness.add_child(root);

    let long = "x".repeat(MAX_LABEL_LEN + 40);
    harness.engine.update_node_label(child, &long);

    let node = harness.engine.graph().node(child).unwrap();
    assert_eq!(node.data.label.chars().count(), MAX_LABEL_LEN);
}

#[tokio::test]
async fn test_label_edits_batch_within_window() {
    let (mut harness, root) = TestHarness::with_blank_map().await;
    let child = harness.add_child(root);
    step_out_of_batch_window();
    let steps_before = harness.engine.history().past_len();

    harness.engine.update_node_label(child, "draft one");
    harness.engine.update_node_label(child, "draft two");

    assert_eq!(
        harness.engine.history().past_len(),
        steps_before + 1,
        "a rapid edit burst should cost one undo step"
    );

    // One undo unwinds the whole burst.
    harness.engine.undo();
    let node = harness.engine.graph().node(child).unwrap();
    assert_eq!(node.data.label, "");
}

#[tokio::test]
async fn test_label_edits_split_across_window() {
    let (mut harness, root) = TestHarness::with_blank_map().await;
    let child = harness.add_child(root);
    step_out_of_batch_window();
    let steps_before = harness.engine.history().past_len();

    harness.engine.update_node_label(child, "first");
    step_out_of_batch_window();
    harness.engine.update_node_label(child, "second");

    assert_eq!(harness.engine.history().past_len(), steps_before + 2);
}

#[tokio::test]
async fn test_update_node_data_merges_fields() {
    let (mut harness, root) = TestHarness::with_blank_map().await;
    let child = harness.add_child(root);
    harness.engine.update_node_label(child, "Styled");

    harness.engine.update_node_data(
        child,
        &NodeDataPatch {
            color: Some("#9B59B6".to_string()),
            shape: Some(NodeShape::Diamond),
            font_size: Some(TextSize::Large),
            icon: Some(Some("🚀".to_string())),
            comment: Some(Some("ship it".to_string())),
            url: Some(Some("https://example.com".to_string())),
            ..NodeDataPatch::default()
        },
    );

    let data = &harness.engine.graph().node(child).unwrap().data;
    assert_eq!(data.color, "#9B59B6");
    assert_eq!(data.shape, NodeShape::Diamond);
    assert_eq!(data.font_size, TextSize::Large);
    assert_eq!(data.icon.as_deref(), Some("🚀"));
    assert_eq!(data.comment.as_deref(), Some("ship it"));
    assert_eq!(data.url.as_deref(), Some("https://example.com"));
    // untouched by the patch
    assert_eq!(data.label, "Styled");
    assert_eq!(data.parent_id, Some(root));
}

#[tokio::test]
async fn test_update_node_data_can_clear_fields() {
    let (mut harness, root) = TestHarness::with_blank_map().await;
    let child = harness.add_child(root);
    harness.engine.update_node_data(
        child,
        &NodeDataPatch {
            icon: Some(Some("⭐".to_string())),
            ..NodeDataPatch::default()
        },
    );

    harness.engine.update_node_data(
        child,
        &NodeDataPatch {
            icon: Some(None),
            ..NodeDataPatch::default()
        },
    );

    let data = &harness.engine.graph().node(child).unwrap().data;
    assert_eq!(data.icon, None);
}

#[tokio::test]
async fn test_edits_on_missing_node_are_noops() {
    let (mut harness, _root) = TestHarness::with_blank_map().await;
    let ghost = Uuid::new_v4();

    harness.engine.update_node_label(ghost, "nobody");
    harness.engine.update_node_data(
        ghost,
        &NodeDataPatch {
            color: Some("#000000".to_string()),
            ..NodeDataPatch::default()
        },
    );

    assert_eq!(harness.engine.history().past_len(), 0);
}

#[tokio::test]
async fn test_map_rename_persists() {
    let (mut harness, _root) = TestHarness::with_blank_map().await;

    harness.engine.set_map_name("Renamed Map");

    assert_eq!(harness.engine.map_name(), "Renamed Map");
    // The rename alone does not create an undo step.
    assert_eq!(harness.engine.history().past_len(), 0);
}
