//! Property/fuzz-style invariants for the placement engine.
//!
//! This suite exercises random operation streams against the public
//! GridEngine API and asserts structural validity (no overlaps at rest,
//! geometry in bounds), bounded collision cascades, and deterministic
//! replay after each mutation.

use dashgrid_layout::{
    ColumnMode, CompactMode, EngineOptions, GridEngine, MoveRequest, NodeId, NodeSpec,
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        Self {
            state: seed ^ 0x9E37_79B9_7F4A_7C15,
        }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        self.state
    }

    fn next_i32_range(&mut self, min: i32, max: i32) -> i32 {
        debug_assert!(min <= max);
        if min == max {
            return min;
        }
        let span = (max - min + 1) as u64;
        min + (self.next_u64() % span) as i32
    }

    fn choose_bool(&mut self) -> bool {
        (self.next_u64() & 1) == 0
    }

    fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = (self.next_u64() % items.len() as u64) as usize;
        items.get(idx)
    }
}

fn node_ids(engine: &GridEngine) -> Vec<NodeId> {
    engine.nodes().map(|s| s.id).collect()
}

fn random_spec(rng: &mut Lcg, column: i32) -> NodeSpec {
    let mut spec = NodeSpec::new().size(rng.next_i32_range(1, 4), rng.next_i32_range(1, 3));
    if rng.choose_bool() {
        spec = spec.at(rng.next_i32_range(0, column - 1), rng.next_i32_range(0, 8));
    }
    if rng.next_u64() % 8 == 0 {
        spec = spec.locked();
    }
    spec
}

fn assert_structure(engine: &GridEngine) {
    let column = engine.column();
    let states: Vec<_> = engine.nodes().collect();
    for state in &states {
        assert!(state.x >= 0 && state.y >= 0, "negative origin: {state:?}");
        assert!(state.w >= 1 && state.h >= 1, "degenerate span: {state:?}");
        assert!(
            state.x + state.w <= column,
            "column overflow at {column}: {state:?}"
        );
    }
    if !engine.batch_mode() && !engine.float() {
        for (i, a) in states.iter().enumerate() {
            for b in &states[i + 1..] {
                assert!(
                    !a.cell_rect().intersects(&b.cell_rect()),
                    "overlap between {a:?} and {b:?}"
                );
            }
        }
    }
}

fn run_ops(seed: u64, count: usize) -> GridEngine {
    let mut rng = Lcg::new(seed);
    let mut engine = GridEngine::new(EngineOptions::default());

    for _ in 0..count {
        match rng.next_u64() % 10 {
            0..=3 => {
                let spec = random_spec(&mut rng, engine.column());
                engine.add_node(spec).expect("bounded add");
            }
            4 => {
                if let Some(&id) = rng.choose(&node_ids(&engine)) {
                    engine.remove_node(id);
                }
            }
            5 | 6 => {
                if let Some(&id) = rng.choose(&node_ids(&engine)) {
                    let req = MoveRequest::default().to(
                        rng.next_i32_range(0, engine.column() - 1),
                        rng.next_i32_range(0, 10),
                    );
                    engine.move_node_check(id, req).expect("bounded move");
                }
            }
            7 => {
                if let Some(&id) = rng.choose(&node_ids(&engine)) {
                    let req = MoveRequest::default()
                        .resize(rng.next_i32_range(1, 6), rng.next_i32_range(1, 4));
                    engine.move_node_check(id, req).expect("bounded resize");
                }
            }
            8 => {
                engine.batch_update(true);
                for _ in 0..rng.next_i32_range(1, 3) {
                    let spec = random_spec(&mut rng, engine.column());
                    engine.add_node(spec).expect("bounded batched add");
                }
                engine.batch_update(false);
            }
            _ => {
                let prev = engine.column();
                let next = rng.next_i32_range(1, 12);
                engine
                    .column_changed(prev, next, ColumnMode::MoveScale)
                    .expect("bounded migration");
            }
        }
        engine.take_changes();
        assert_structure(&engine);
    }
    engine
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn random_operation_streams_hold_invariants(seed in any::<u64>()) {
        let engine = run_ops(seed, 40);
        assert_structure(&engine);
    }

    #[test]
    fn identical_streams_replay_identically(seed in any::<u64>()) {
        let first = run_ops(seed, 25).save();
        let second = run_ops(seed, 25).save();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn compact_always_reaches_zero_gap_rows(seed in any::<u64>()) {
        let mut engine = run_ops(seed, 15);
        engine.compact(CompactMode::Compact).expect("compact");
        engine.take_changes();
        assert_structure(&engine);

        // After compaction no fully-empty row may sit above a node, except
        // rows pinned open by locked nodes.
        if engine.nodes().all(|s| !s.locked()) {
            let height = engine.content_height();
            for row in 0..height {
                let occupied = engine
                    .nodes()
                    .any(|s| s.y <= row && row < s.y + s.h);
                prop_assert!(occupied, "empty row {row} below content height {height}");
            }
        }
    }
}
