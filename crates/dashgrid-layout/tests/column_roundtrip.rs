//! Column migration scenarios: cache replay, scaling modes, and the
//! single-column special case.

use dashgrid_layout::{
    CellRect, ColumnMode, EngineOptions, GridEngine, NodeId, NodeSpec,
};

fn engine_with_three() -> (GridEngine, [NodeId; 3]) {
    let mut engine = GridEngine::new(EngineOptions::default());
    let a = engine
        .add_node(NodeSpec::new().widget("a").at(0, 0).size(4, 2))
        .expect("add a");
    let b = engine
        .add_node(NodeSpec::new().widget("b").at(4, 0).size(4, 2))
        .expect("add b");
    let c = engine
        .add_node(NodeSpec::new().widget("c").at(8, 0).size(4, 4))
        .expect("add c");
    (engine, [a, b, c])
}

fn rects(engine: &GridEngine, ids: &[NodeId]) -> Vec<CellRect> {
    ids.iter()
        .map(|id| engine.node_state(*id).expect("node").cell_rect())
        .collect()
}

#[test]
fn twelve_to_one_to_twelve_is_lossless() {
    let (mut engine, ids) = engine_with_three();
    let original = rects(&engine, &ids);

    engine
        .column_changed(12, 1, ColumnMode::MoveScale)
        .expect("shrink");
    assert_eq!(engine.column(), 1);
    for state in engine.nodes() {
        assert_eq!(state.w, 1, "single-column stack must collapse widths");
        assert_eq!(state.x, 0);
    }

    engine
        .column_changed(1, 12, ColumnMode::MoveScale)
        .expect("grow");
    assert_eq!(engine.column(), 12);
    assert_eq!(rects(&engine, &ids), original);
}

#[test]
fn round_trip_via_intermediate_count() {
    let (mut engine, ids) = engine_with_three();
    let original = rects(&engine, &ids);

    engine
        .column_changed(12, 6, ColumnMode::MoveScale)
        .expect("to 6");
    engine
        .column_changed(6, 2, ColumnMode::MoveScale)
        .expect("to 2");
    engine
        .column_changed(2, 6, ColumnMode::MoveScale)
        .expect("back to 6");
    engine
        .column_changed(6, 12, ColumnMode::MoveScale)
        .expect("back to 12");

    assert_eq!(rects(&engine, &ids), original);
}

#[test]
fn growing_without_cache_scales() {
    let mut engine = GridEngine::new(EngineOptions::default().column(6));
    let id = engine
        .add_node(NodeSpec::new().at(1, 0).size(2, 1))
        .expect("add");

    engine
        .column_changed(6, 12, ColumnMode::MoveScale)
        .expect("grow");

    let state = engine.node_state(id).expect("node");
    assert_eq!((state.x, state.w), (2, 4));
}

#[test]
fn mode_none_only_clamps() {
    let mut engine = GridEngine::new(EngineOptions::default());
    let left = engine
        .add_node(NodeSpec::new().at(0, 0).size(2, 1))
        .expect("add");
    let right = engine
        .add_node(NodeSpec::new().at(10, 0).size(2, 1))
        .expect("add");

    engine
        .column_changed(12, 6, ColumnMode::None)
        .expect("shrink");

    let l = engine.node_state(left).expect("left");
    assert_eq!((l.x, l.w), (0, 2));
    let r = engine.node_state(right).expect("right");
    assert_eq!(r.w, 2);
    assert!(r.x + r.w <= 6, "clamped into the narrower grid: {r:?}");
}

#[test]
fn growing_from_single_column_without_cache_keeps_unit_width() {
    let mut engine = GridEngine::new(EngineOptions::default().column(1));
    engine
        .add_node(NodeSpec::new().at(0, 0).size(1, 1))
        .expect("add");
    engine
        .add_node(NodeSpec::new().at(0, 1).size(1, 2))
        .expect("add");

    engine
        .column_changed(1, 12, ColumnMode::MoveScale)
        .expect("grow");

    for state in engine.nodes() {
        assert_eq!(state.w, 1, "no cache to restore from: widths stay 1");
    }
}

#[test]
fn over_wide_node_restores_design_width() {
    // A 10-wide widget loaded into a 6-column board is clamped, but its
    // design-time footprint is remembered under the default 12-column key.
    let mut engine = GridEngine::new(EngineOptions::default().column(6));
    let id = engine
        .add_node(NodeSpec::new().at(0, 0).size(10, 2))
        .expect("add");
    assert_eq!(engine.node_state(id).expect("node").w, 6);

    engine
        .column_changed(6, 12, ColumnMode::MoveScale)
        .expect("grow");
    assert_eq!(engine.node_state(id).expect("node").w, 10);
}

#[test]
fn compact_mode_reflows_ignoring_coordinates() {
    let mut engine = GridEngine::new(EngineOptions::default().float(true));
    engine
        .add_node(NodeSpec::new().at(8, 5).size(2, 1))
        .expect("add");
    engine
        .add_node(NodeSpec::new().at(3, 9).size(2, 1))
        .expect("add");

    engine
        .column_changed(12, 4, ColumnMode::Compact)
        .expect("compact");

    assert_eq!(engine.content_height(), 1);
    for state in engine.nodes() {
        assert!(state.x + state.w <= 4);
    }
}

#[test]
fn list_mode_preserves_reading_order() {
    let mut engine = GridEngine::new(EngineOptions::default());
    let first = engine
        .add_node(NodeSpec::new().widget("first").at(0, 0).size(6, 1))
        .expect("add");
    let second = engine
        .add_node(NodeSpec::new().widget("second").at(6, 0).size(6, 1))
        .expect("add");

    engine
        .column_changed(12, 6, ColumnMode::List)
        .expect("list");

    let f = engine.node_state(first).expect("first");
    let s = engine.node_state(second).expect("second");
    assert!(
        (f.y, f.x) < (s.y, s.x),
        "reading order inverted: {f:?} vs {s:?}"
    );
}

#[test]
fn removed_node_is_purged_from_caches() {
    let (mut engine, [a, b, c]) = engine_with_three();
    let before_b = engine.node_state(b).expect("b").cell_rect();

    engine
        .column_changed(12, 1, ColumnMode::MoveScale)
        .expect("shrink");
    engine.remove_node(a);
    engine
        .column_changed(1, 12, ColumnMode::MoveScale)
        .expect("grow");

    assert!(engine.node_state(a).is_none());
    assert_eq!(engine.node_state(b).expect("b").cell_rect(), before_b);
    assert!(engine.node_state(c).is_some());
}

#[test]
fn custom_relayout_controls_uncached_nodes() {
    let mut engine = GridEngine::new(EngineOptions::default());
    let id = engine
        .add_node(NodeSpec::new().at(4, 0).size(4, 1))
        .expect("add");

    engine
        .column_changed_with(12, 6, |new_column, prev_column, nodes| {
            assert_eq!((new_column, prev_column), (6, 12));
            for state in nodes {
                state.x = 0;
                state.w = new_column;
            }
        })
        .expect("custom");

    let state = engine.node_state(id).expect("node");
    assert_eq!((state.x, state.w), (0, 6));
}
