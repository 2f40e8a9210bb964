//! Node records: persisted placement state and transient interaction state.
//!
//! A placed node is stored as two associated structures: [`NodeState`] is
//! what a snapshot persists (geometry, constraints, policy flags), while
//! `InteractionState` holds everything that only exists during a live
//! interaction (dirty bit, drag-start snapshot, cached pixel rect). The two
//! are combined in the engine's internal record, so serialization cannot
//! pick up transient fields by construction — there is no save-time
//! filtering step to forget.

use bitflags::bitflags;
use dashgrid_core::geometry::{CellRect, PxRect};
use dashgrid_core::id::NodeId;

bitflags! {
    /// Placement policy bits.
    ///
    /// `LOCKED` makes a node immovable by collision resolution. `NO_MOVE`
    /// and `NO_RESIZE` are host-level policy (the host refuses to start the
    /// interaction) and are orthogonal to `LOCKED`. `AUTO_POSITION` marks a
    /// node still waiting for the empty-slot search to place it.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct NodeFlags: u8 {
        const LOCKED = 1;
        const NO_MOVE = 1 << 1;
        const NO_RESIZE = 1 << 2;
        const AUTO_POSITION = 1 << 3;
    }
}

/// Optional per-node size bounds, in cells. `None` means unconstrained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizeConstraints {
    pub min_w: Option<i32>,
    pub min_h: Option<i32>,
    pub max_w: Option<i32>,
    pub max_h: Option<i32>,
}

impl SizeConstraints {
    /// Whether no bound is set at all.
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.min_w.is_none() && self.min_h.is_none() && self.max_w.is_none() && self.max_h.is_none()
    }
}

/// Persisted placement state of one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeState {
    /// Stable opaque identity, allocated by the engine.
    pub id: NodeId,
    /// User-facing widget id, if the host assigned one.
    pub widget_id: Option<String>,
    /// Left column.
    pub x: i32,
    /// Top row.
    pub y: i32,
    /// Width in columns (>= 1 at rest).
    pub w: i32,
    /// Height in rows (>= 1 at rest).
    pub h: i32,
    /// Optional size bounds.
    pub constraints: SizeConstraints,
    /// Placement policy.
    pub flags: NodeFlags,
}

impl NodeState {
    /// The node's footprint as a rectangle.
    #[inline]
    #[must_use]
    pub fn cell_rect(&self) -> CellRect {
        CellRect::new(self.x, self.y, self.w, self.h)
    }

    /// Overwrite the footprint from a rectangle.
    #[inline]
    pub(crate) fn set_rect(&mut self, rect: CellRect) {
        self.x = rect.x;
        self.y = rect.y;
        self.w = rect.w;
        self.h = rect.h;
    }

    /// Bottom row (exclusive).
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    #[inline]
    #[must_use]
    pub fn locked(&self) -> bool {
        self.flags.contains(NodeFlags::LOCKED)
    }

    #[inline]
    #[must_use]
    pub fn no_move(&self) -> bool {
        self.flags.contains(NodeFlags::NO_MOVE)
    }

    #[inline]
    #[must_use]
    pub fn no_resize(&self) -> bool {
        self.flags.contains(NodeFlags::NO_RESIZE)
    }

    #[inline]
    #[must_use]
    pub fn auto_position(&self) -> bool {
        self.flags.contains(NodeFlags::AUTO_POSITION)
    }
}

/// A placement intent submitted by the host.
///
/// Missing coordinates mean "find me a slot" (auto-position). Missing spans
/// default to one cell. Out-of-range values are clamped by the engine,
/// never rejected.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeSpec {
    pub widget_id: Option<String>,
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub w: Option<i32>,
    pub h: Option<i32>,
    pub constraints: SizeConstraints,
    pub flags: NodeFlags,
}

impl NodeSpec {
    /// Empty spec: 1×1, auto-positioned.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the requested origin.
    #[must_use]
    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    /// Set the requested span.
    #[must_use]
    pub fn size(mut self, w: i32, h: i32) -> Self {
        self.w = Some(w);
        self.h = Some(h);
        self
    }

    /// Attach a user-facing widget id.
    #[must_use]
    pub fn widget(mut self, id: impl Into<String>) -> Self {
        self.widget_id = Some(id.into());
        self
    }

    /// Set minimum spans.
    #[must_use]
    pub fn min_size(mut self, min_w: i32, min_h: i32) -> Self {
        self.constraints.min_w = Some(min_w);
        self.constraints.min_h = Some(min_h);
        self
    }

    /// Set maximum spans.
    #[must_use]
    pub fn max_size(mut self, max_w: i32, max_h: i32) -> Self {
        self.constraints.max_w = Some(max_w);
        self.constraints.max_h = Some(max_h);
        self
    }

    /// Make the node immovable by collision resolution.
    #[must_use]
    pub fn locked(mut self) -> Self {
        self.flags.insert(NodeFlags::LOCKED);
        self
    }

    /// Forbid host-initiated moves.
    #[must_use]
    pub fn no_move(mut self) -> Self {
        self.flags.insert(NodeFlags::NO_MOVE);
        self
    }

    /// Forbid host-initiated resizes.
    #[must_use]
    pub fn no_resize(mut self) -> Self {
        self.flags.insert(NodeFlags::NO_RESIZE);
        self
    }

    /// Request empty-slot placement even when coordinates are present.
    #[must_use]
    pub fn auto_position(mut self) -> Self {
        self.flags.insert(NodeFlags::AUTO_POSITION);
        self
    }
}

/// Transient per-node interaction state. Never persisted.
#[derive(Debug, Clone, Default)]
pub(crate) struct InteractionState {
    /// Geometry changed since the last notification.
    pub dirty: bool,
    /// Snapshot taken at interaction start; packing floor and cancel target.
    pub orig: Option<CellRect>,
    /// Pixel rect cached at drag start for coverage hit-testing.
    pub rect: Option<PxRect>,
    /// Actively being dragged (not resized).
    pub moving: bool,
    /// Already hopped below a collider during this downward cascade.
    pub skip_down: bool,
    /// The single live interaction target.
    pub updating: bool,
    /// Mid drag-out: suppress the repack a removal would trigger.
    pub pending_remove: bool,
}

/// Internal engine record: persisted state plus interaction state.
#[derive(Debug, Clone)]
pub(crate) struct GridNode {
    pub state: NodeState,
    pub interaction: InteractionState,
}

impl GridNode {
    pub fn new(state: NodeState) -> Self {
        Self {
            state,
            interaction: InteractionState::default(),
        }
    }
}
