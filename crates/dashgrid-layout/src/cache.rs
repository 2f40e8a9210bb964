//! Per-column-count layout cache.
//!
//! When the column count shrinks, the engine snapshots every node's
//! `x, y, w` (height never changes across column migration) keyed by the
//! column count it is leaving. Growing back to a cached count replays those
//! placements by stable id instead of re-running the scaling math, which is
//! what makes a 12 → 1 → 12 breakpoint round-trip lossless.
//!
//! # Invariants
//!
//! 1. At most one entry per (column count, node id) pair.
//! 2. Removing a node purges it from every cached column.
//! 3. Replay only ever matches by [`NodeId`]; user-facing ids play no role.

use dashgrid_core::id::NodeId;
use rustc_hash::FxHashMap;

use crate::node::NodeState;

/// One node's cached placement for a specific column count.
///
/// Missing coordinates mean the node was auto-positioned when cached and
/// should be re-slotted, not pinned, on replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachedPlacement {
    pub id: NodeId,
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub w: i32,
    pub auto_position: bool,
}

impl CachedPlacement {
    /// Capture a node's current placement.
    #[must_use]
    pub fn from_state(state: &NodeState) -> Self {
        if state.auto_position() {
            Self {
                id: state.id,
                x: None,
                y: None,
                w: state.w,
                auto_position: true,
            }
        } else {
            Self {
                id: state.id,
                x: Some(state.x),
                y: Some(state.y),
                w: state.w,
                auto_position: false,
            }
        }
    }
}

/// Cached layouts keyed by column count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnCache {
    layouts: FxHashMap<i32, Vec<CachedPlacement>>,
}

impl ColumnCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole layout cached for `column`.
    pub fn store(&mut self, column: i32, placements: Vec<CachedPlacement>) {
        self.layouts.insert(column, placements);
    }

    /// Insert or update a single node's placement for `column`.
    pub fn store_one(&mut self, column: i32, placement: CachedPlacement) {
        let layout = self.layouts.entry(column).or_default();
        match layout.iter_mut().find(|p| p.id == placement.id) {
            Some(existing) => *existing = placement,
            None => layout.push(placement),
        }
    }

    /// The layout cached for `column`, if any.
    #[must_use]
    pub fn get(&self, column: i32) -> Option<&[CachedPlacement]> {
        self.layouts.get(&column).map(Vec::as_slice)
    }

    /// Whether `column` has an entry for `id`.
    #[must_use]
    pub fn contains(&self, column: i32, id: NodeId) -> bool {
        self.layouts
            .get(&column)
            .is_some_and(|layout| layout.iter().any(|p| p.id == id))
    }

    /// Widest column count with a non-empty cached layout.
    #[must_use]
    pub fn widest(&self) -> Option<i32> {
        self.layouts
            .iter()
            .filter(|(_, layout)| !layout.is_empty())
            .map(|(&column, _)| column)
            .max()
    }

    /// Remove one node from every cached column.
    pub fn purge_node(&mut self, id: NodeId) {
        for layout in self.layouts.values_mut() {
            layout.retain(|p| p.id != id);
        }
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.layouts.clear();
    }

    /// Number of cached column counts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }
}
