//! The grid placement engine.
//!
//! [`GridEngine`] owns the canonical set of placed nodes and is the only
//! code allowed to mutate their geometry. Hosts submit intents (add, move,
//! resize, remove, column change) and read back [`ChangeSet`]s describing
//! exactly which nodes moved.
//!
//! # Invariants
//!
//! 1. At rest (not batched, not floating), no two nodes' rectangles
//!    intersect.
//! 2. Locked nodes are never displaced by collision resolution.
//! 3. Collision cascades resolve in row-descending order, so identical
//!    inputs produce identical outputs.
//! 4. A cascade that exceeds `2 × node count` iterations is a malformed
//!    input and surfaces as [`EngineError::CollisionOverflow`]; it is never
//!    a normal code path.
//!
//! # Failure Modes
//!
//! Out-of-range geometry is clamped, never rejected. Duplicate adds are
//! idempotent. Removing an unknown node is a no-op. The only errors are the
//! cascade bound above and id-space exhaustion.

use dashgrid_core::geometry::{
    CellRect, Margins, PxRect, SortOrder, row_major_cmp, row_major_key,
};
use dashgrid_core::id::{IdAllocator, IdError, NodeId};
use std::fmt;

use crate::cache::{CachedPlacement, ColumnCache};
use crate::node::{GridNode, NodeFlags, NodeSpec, NodeState, SizeConstraints};
use crate::snapshot::NodeSnapshot;

// ---------------------------------------------------------------------------
// Public request/response types
// ---------------------------------------------------------------------------

/// A move/resize intent in cell units. Missing fields keep their current
/// value; `rect` is the live pixel rectangle of the dragged element, used
/// for coverage-based collision selection during an active drag.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MoveRequest {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub w: Option<i32>,
    pub h: Option<i32>,
    pub rect: Option<PxRect>,
}

impl MoveRequest {
    /// Request a new origin.
    #[must_use]
    pub fn to(mut self, x: i32, y: i32) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    /// Request a new span.
    #[must_use]
    pub fn resize(mut self, w: i32, h: i32) -> Self {
        self.w = Some(w);
        self.h = Some(h);
        self
    }

    /// Attach the dragged element's current pixel rect.
    #[must_use]
    pub fn with_rect(mut self, rect: PxRect) -> Self {
        self.rect = Some(rect);
        self
    }
}

/// Nodes whose geometry changed since the last notification.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    pub added: Vec<NodeState>,
    pub removed: Vec<NodeState>,
    pub updated: Vec<NodeState>,
}

impl ChangeSet {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.updated.is_empty()
    }
}

/// Strategy for re-deriving a layout when the column count changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnMode {
    /// Scale both position and width by `new / prev` (default).
    #[default]
    MoveScale,
    /// Scale position only; clamp width.
    Move,
    /// Scale width only; clamp position.
    Scale,
    /// Clamp only, no scaling.
    None,
    /// Ignore prior coordinates; re-flow by empty-slot search.
    Compact,
    /// Like `Compact`, preserving left-to-right reading order.
    List,
}

/// Re-flow flavor for [`GridEngine::compact`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompactMode {
    /// Tightest row-major packing.
    #[default]
    Compact,
    /// Preserve the current reading order while packing.
    List,
}

/// Engine construction options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Column count (>= 1).
    pub column: i32,
    /// Hard row ceiling; 0 = unbounded.
    pub max_row: i32,
    /// Start in float mode (no gravity packing).
    pub float: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            column: 12,
            max_row: 0,
            float: false,
        }
    }
}

impl EngineOptions {
    /// Set the column count.
    #[must_use]
    pub fn column(mut self, column: i32) -> Self {
        self.column = column;
        self
    }

    /// Set the row ceiling (0 = unbounded).
    #[must_use]
    pub fn max_row(mut self, max_row: i32) -> Self {
        self.max_row = max_row;
        self
    }

    /// Enable float mode.
    #[must_use]
    pub fn float(mut self, float: bool) -> Self {
        self.float = float;
        self
    }
}

/// Errors from engine mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    /// A collision cascade failed to terminate within `2 × node count`
    /// iterations: the input encodes an unsatisfiable constraint cycle.
    CollisionOverflow { node: NodeId, iterations: usize },
    /// The id allocator is exhausted.
    Id(IdError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CollisionOverflow { node, iterations } => write!(
                f,
                "collision cascade for node {node} did not terminate after {iterations} iterations"
            ),
            Self::Id(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<IdError> for EngineError {
    fn from(err: IdError) -> Self {
        Self::Id(err)
    }
}

/// Options threaded through the internal move/cascade machinery.
#[derive(Debug, Clone, Copy, Default)]
struct MoveOpts {
    /// Pack and notify once the move lands (top-level intents only).
    pack: bool,
    /// Inside a cascade: no swap attempts, no pack.
    nested: bool,
    /// Additional node excluded from collision checks (the cascade
    /// initiator, when pushing its collider).
    skip: Option<NodeId>,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Owner of all placed nodes and the collision/packing/migration logic.
#[derive(Debug, Clone)]
pub struct GridEngine {
    column: i32,
    /// Widest layout the board was designed for; key for over-wide
    /// placement caching during shrink.
    default_column: i32,
    max_row: i32,
    float: bool,
    prev_float: bool,
    batch_mode: bool,
    /// Mid column migration: re-inserts skip full preparation.
    in_column_resize: bool,
    /// Replaying a saved layout: no row-widening, colliders are hopped.
    loading: bool,
    nodes: Vec<GridNode>,
    layout_cache: ColumnCache,
    ids: IdAllocator,
    /// Ids added since the last notification.
    added: Vec<NodeId>,
    /// States removed since the last notification.
    removed: Vec<NodeState>,
    pending: Vec<ChangeSet>,
    /// Collider chosen by the last coverage test, for the swap fallback.
    last_drag_collide: Option<NodeId>,
}

impl GridEngine {
    /// Create an engine.
    #[must_use]
    pub fn new(opts: EngineOptions) -> Self {
        let column = opts.column.max(1);
        Self {
            column,
            default_column: column.max(12),
            max_row: opts.max_row.max(0),
            float: opts.float,
            prev_float: opts.float,
            batch_mode: false,
            in_column_resize: false,
            loading: false,
            nodes: Vec::new(),
            layout_cache: ColumnCache::new(),
            ids: IdAllocator::new(),
            added: Vec::new(),
            removed: Vec::new(),
            pending: Vec::new(),
            last_drag_collide: None,
        }
    }

    // -- read access --------------------------------------------------------

    #[must_use]
    pub fn column(&self) -> i32 {
        self.column
    }

    #[must_use]
    pub fn max_row(&self) -> i32 {
        self.max_row
    }

    #[must_use]
    pub fn float(&self) -> bool {
        self.float
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All node states, in internal order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeState> {
        self.nodes.iter().map(|n| &n.state)
    }

    /// One node's state.
    #[must_use]
    pub fn node_state(&self, id: NodeId) -> Option<&NodeState> {
        self.node_ref(id).map(|n| &n.state)
    }

    /// Look a node up by its user-facing widget id.
    #[must_use]
    pub fn find_by_widget(&self, widget_id: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|n| n.state.widget_id.as_deref() == Some(widget_id))
            .map(|n| n.state.id)
    }

    /// Bottom row of the lowest node (the content height in rows).
    #[must_use]
    pub fn content_height(&self) -> i32 {
        self.nodes.iter().map(|n| n.state.bottom()).max().unwrap_or(0)
    }

    /// Whether nothing occupies the given area.
    #[must_use]
    pub fn is_area_empty(&self, x: i32, y: i32, w: i32, h: i32) -> bool {
        let area = CellRect::new(x, y, w, h);
        !self
            .nodes
            .iter()
            .any(|n| n.state.cell_rect().intersects(&area))
    }

    /// Re-slot an existing node into the first empty row-major position,
    /// optionally starting just past `after`'s footprint.
    pub fn find_empty_position(&mut self, id: NodeId, after: Option<NodeId>) -> bool {
        let Some(mut state) = self.node_state(id).cloned() else {
            return false;
        };
        let mut dirty = false;
        let after_rect = after.and_then(|a| self.rect_of(a));
        let found = find_slot(
            &mut state,
            &mut dirty,
            &self.nodes,
            self.column,
            after_rect.as_ref(),
            Some(id),
        );
        if found && let Some(n) = self.node_mut(id) {
            n.state = state;
            n.interaction.dirty |= dirty;
        }
        found
    }

    /// Whether adding `spec` would stay under the row ceiling.
    pub fn will_it_fit(&self, spec: &NodeSpec) -> Result<bool, EngineError> {
        if self.max_row == 0 {
            return Ok(true);
        }
        let mut clone = self.simulation_clone();
        clone.add_node(spec.clone())?;
        Ok(clone.content_height() <= self.max_row)
    }

    /// Drain every change set accumulated since the last drain.
    pub fn take_changes(&mut self) -> Vec<ChangeSet> {
        std::mem::take(&mut self.pending)
    }

    // -- add / remove -------------------------------------------------------

    /// Add a node.
    ///
    /// Idempotent: if a node with the same widget id already exists, its id
    /// is returned and nothing changes. Auto-positioned specs get the first
    /// empty row-major slot; explicit positions go through collision
    /// resolution.
    pub fn add_node(&mut self, spec: NodeSpec) -> Result<NodeId, EngineError> {
        if let Some(wid) = spec.widget_id.as_deref()
            && let Some(existing) = self.find_by_widget(wid)
        {
            return Ok(existing);
        }
        let node = self.prepare_spec(spec)?;
        let id = node.state.id;
        tracing::debug!(node = id.get(), "add node");
        self.insert_node(node, true, None)?;
        Ok(id)
    }

    /// Remove a node. Unknown ids are silently ignored (`false`).
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        tracing::debug!(node = id.get(), "remove node");
        let node = self.nodes.remove(idx);
        self.layout_cache.purge_node(id);
        self.removed.push(node.state);
        if !node.interaction.pending_remove {
            self.pack_nodes();
        }
        self.notify();
        true
    }

    /// Remove every node.
    pub fn remove_all(&mut self) {
        if self.nodes.is_empty() {
            return;
        }
        for n in self.nodes.drain(..) {
            self.removed.push(n.state);
        }
        self.layout_cache.clear();
        self.notify();
    }

    /// Flag a node as mid drag-out so its removal skips the repack that
    /// would otherwise make the board visibly jump before deletion lands.
    pub fn set_pending_remove(&mut self, id: NodeId, pending: bool) {
        if let Some(n) = self.node_mut(id) {
            n.interaction.pending_remove = pending;
        }
    }

    /// Replace a node's size bounds.
    ///
    /// Cached wide placements may embed the old bounds, so they are purged
    /// rather than replayed stale.
    pub fn update_node_constraints(
        &mut self,
        id: NodeId,
        constraints: SizeConstraints,
    ) -> Result<bool, EngineError> {
        let Some(idx) = self.index_of(id) else {
            return Ok(false);
        };
        self.nodes[idx].state.constraints = constraints;
        self.layout_cache.purge_node(id);

        let mut fixed = self.nodes[idx].state.clone();
        let changed = self.node_bound_fix(&mut fixed, true);
        if changed {
            let nn = fixed.cell_rect();
            if let Some(n) = self.node_mut(id) {
                n.state.set_rect(nn);
                n.interaction.dirty = true;
            }
            self.fix_collisions(id, nn, None, MoveOpts::default())?;
            if !self.batch_mode {
                self.pack_nodes();
                self.notify();
            }
        }
        Ok(changed)
    }

    // -- moving -------------------------------------------------------------

    /// Move/resize a node, resolving collisions and repacking.
    pub fn move_node(&mut self, id: NodeId, req: MoveRequest) -> Result<bool, EngineError> {
        self.move_node_opts(
            id,
            req,
            MoveOpts {
                pack: true,
                nested: false,
                skip: None,
            },
        )
    }

    /// Move/resize with precondition checks and row-ceiling simulation.
    ///
    /// Refuses locked nodes and no-op requests. With a row ceiling, the
    /// move is simulated on an unbounded clone and only committed if the
    /// result respects `max(ceiling, current height)`; a failed simulated
    /// drag falls back to a swap with the coverage collider.
    pub fn move_node_check(&mut self, id: NodeId, req: MoveRequest) -> Result<bool, EngineError> {
        let Some(state) = self.node_state(id).cloned() else {
            return Ok(false);
        };
        if state.locked() {
            return Ok(false);
        }
        if !changed_pos_constrain(&state, &req) {
            return Ok(false);
        }

        let opt = MoveOpts {
            pack: true,
            nested: false,
            skip: None,
        };
        if self.max_row == 0 {
            return self.move_node_opts(id, req, opt);
        }

        let mut clone = self.simulation_clone();
        let moved = clone.move_node_opts(id, req, opt)?;
        let can_move =
            moved && clone.content_height() <= self.max_row.max(self.content_height());

        let resizing =
            req.w.is_some_and(|w| w != state.w) || req.h.is_some_and(|h| h != state.h);
        if !can_move
            && !resizing
            && let Some(collide) = clone.last_drag_collide
            && self.swap(id, collide) == Some(true)
        {
            self.notify();
            return Ok(true);
        }
        if !can_move {
            return Ok(false);
        }

        // Commit every position the simulation ended up changing.
        for sim in &clone.nodes {
            let rect = sim.state.cell_rect();
            if let Some(n) = self.node_mut(sim.state.id)
                && n.state.cell_rect() != rect
            {
                n.state.set_rect(rect);
                n.interaction.dirty = true;
            }
        }
        self.notify();
        Ok(true)
    }

    // -- collision detection ------------------------------------------------

    /// First node (in current order) intersecting `area`, excluding `skip`
    /// and `skip2`.
    #[must_use]
    pub fn collide(&self, skip: NodeId, area: CellRect, skip2: Option<NodeId>) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|n| {
                n.state.id != skip
                    && Some(n.state.id) != skip2
                    && n.state.cell_rect().intersects(&area)
            })
            .map(|n| n.state.id)
    }

    /// Every node intersecting `area`, excluding `skip` and `skip2`.
    #[must_use]
    pub fn collide_all(
        &self,
        skip: NodeId,
        area: CellRect,
        skip2: Option<NodeId>,
    ) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| {
                n.state.id != skip
                    && Some(n.state.id) != skip2
                    && n.state.cell_rect().intersects(&area)
            })
            .map(|n| n.state.id)
            .collect()
    }

    // -- swap ---------------------------------------------------------------

    /// Trade positions of two adjacent, shape-compatible nodes.
    ///
    /// `Some(true)`: swapped. `Some(false)`: structurally attempted but
    /// disqualified (locked, missing, or shapes never matched). `None`: the
    /// touch test ran and failed, so a swap was not applicable at all —
    /// callers use this to fall back to the cascade push.
    pub fn swap(&mut self, a_id: NodeId, b_id: NodeId) -> Option<bool> {
        let (a, b) = match (self.node_state(a_id), self.node_state(b_id)) {
            (Some(a), Some(b)) => (a.clone(), b.clone()),
            _ => return Some(false),
        };
        if a.locked() || b.locked() {
            return Some(false);
        }

        let mut touching: Option<bool> = None;

        // Same shape, aligned on a row or column: straight trade.
        if a.w == b.w && a.h == b.h && (a.x == b.x || a.y == b.y) {
            let t = a.cell_rect().touches(&b.cell_rect());
            touching = Some(t);
            if t {
                self.do_swap(a_id, b_id);
                return Some(true);
            }
        }
        if touching == Some(false) {
            return None;
        }

        // Same columns, different heights: the upper one stays first.
        if a.w == b.w && a.x == b.x {
            let t = touching.unwrap_or_else(|| a.cell_rect().touches(&b.cell_rect()));
            touching = Some(t);
            if t {
                if b.y < a.y {
                    self.do_swap(b_id, a_id);
                } else {
                    self.do_swap(a_id, b_id);
                }
                return Some(true);
            }
        }
        if touching == Some(false) {
            return None;
        }

        // Same row, different widths: the left one stays first.
        if a.h == b.h && a.y == b.y {
            let t = touching.unwrap_or_else(|| a.cell_rect().touches(&b.cell_rect()));
            if t {
                if b.x < a.x {
                    self.do_swap(b_id, a_id);
                } else {
                    self.do_swap(a_id, b_id);
                }
                return Some(true);
            }
        }
        Some(false)
    }

    /// Exchange positions; `first` is the upper/left node when spans differ
    /// (the other is placed after it rather than at its exact coordinates).
    fn do_swap(&mut self, first_id: NodeId, second_id: NodeId) {
        let (Some(a), Some(b)) = (
            self.node_state(first_id).cloned(),
            self.node_state(second_id).cloned(),
        ) else {
            return;
        };
        let (bx, by) = (b.x, b.y);
        let (nb_x, nb_y) = (a.x, a.y);
        let (na_x, na_y) = if a.h != b.h {
            (bx, nb_y + b.h)
        } else if a.w != b.w {
            (nb_x + b.w, by)
        } else {
            (bx, by)
        };
        if let Some(n) = self.node_mut(second_id) {
            n.state.x = nb_x;
            n.state.y = nb_y;
            n.interaction.dirty = true;
        }
        if let Some(n) = self.node_mut(first_id) {
            n.state.x = na_x;
            n.state.y = na_y;
            n.interaction.dirty = true;
        }
    }

    // -- batching and interaction snapshots ---------------------------------

    /// Enter or leave batch mode.
    ///
    /// Flattened: re-entering the current mode is a no-op. While batching,
    /// packing and notification are suppressed and float is forced on so
    /// intermediate states don't cascade; leaving restores float, packs
    /// once, and emits one change set.
    pub fn batch_update(&mut self, flag: bool) {
        self.batch_update_opts(flag, true);
    }

    fn batch_update_opts(&mut self, flag: bool, do_pack: bool) {
        if self.batch_mode == flag {
            return;
        }
        self.batch_mode = flag;
        if flag {
            self.prev_float = self.float;
            self.float = true;
            self.save_initial();
        } else {
            self.float = self.prev_float;
            if do_pack {
                self.pack_nodes();
            }
            self.notify();
        }
    }

    #[must_use]
    pub fn batch_mode(&self) -> bool {
        self.batch_mode
    }

    /// Snapshot every node's position as the interaction origin.
    pub fn save_initial(&mut self) {
        for n in &mut self.nodes {
            n.interaction.orig = Some(n.state.cell_rect());
            n.interaction.dirty = false;
        }
    }

    /// Restore every node to its interaction-start snapshot and notify.
    ///
    /// The single-interaction undo: valid for the in-flight interaction
    /// only, not a general history.
    pub fn restore_initial(&mut self) {
        for n in &mut self.nodes {
            let Some(orig) = n.interaction.orig else {
                continue;
            };
            if n.state.cell_rect() == orig {
                continue;
            }
            n.state.set_rect(orig);
            n.interaction.dirty = true;
        }
        self.notify();
    }

    /// Mark one node as the live interaction target and snapshot initial
    /// positions. `moving` is true for drags, false for resizes.
    pub fn begin_update(&mut self, id: NodeId, moving: bool) {
        let Some(idx) = self.index_of(id) else {
            return;
        };
        if !self.nodes[idx].interaction.updating {
            self.nodes[idx].interaction.updating = true;
            self.nodes[idx].interaction.skip_down = false;
            if !self.batch_mode {
                self.save_initial();
            }
        }
        self.nodes[idx].interaction.moving = moving;
    }

    /// Clear the live interaction marks.
    pub fn end_update(&mut self) {
        if let Some(n) = self.nodes.iter_mut().find(|n| n.interaction.updating) {
            n.interaction.updating = false;
            n.interaction.skip_down = false;
            n.interaction.moving = false;
        }
    }

    /// Convert every node's cell footprint to a pixel rect for the
    /// duration of one interaction. Must be re-run if the cell size
    /// changes mid-interaction.
    pub fn cache_rects(&mut self, cell_width: f64, cell_height: f64, margins: Margins) {
        let stride_x = cell_width + margins.horizontal_sum();
        let stride_y = cell_height + margins.vertical_sum();
        for n in &mut self.nodes {
            let s = &n.state;
            n.interaction.rect = Some(PxRect::new(
                f64::from(s.x) * stride_x + margins.left,
                f64::from(s.y) * stride_y + margins.top,
                f64::from(s.w) * stride_x - margins.horizontal_sum(),
                f64::from(s.h) * stride_y - margins.vertical_sum(),
            ));
        }
    }

    /// Replace the row ceiling (0 = unbounded). Existing nodes are not
    /// re-clamped until they next move.
    pub fn set_max_row(&mut self, max_row: i32) {
        self.max_row = max_row.max(0);
    }

    /// Toggle float mode. Turning gravity back on packs immediately.
    pub fn set_float(&mut self, float: bool) {
        if self.float == float {
            return;
        }
        self.float = float;
        if !float {
            self.pack_nodes();
            self.notify();
        }
    }

    // -- persistence --------------------------------------------------------

    /// Serialize every node, sorted row-major, transient state excluded by
    /// construction.
    #[must_use]
    pub fn save(&self) -> Vec<NodeSnapshot> {
        let mut nodes: Vec<&GridNode> = self.nodes.iter().collect();
        nodes.sort_by(|a, b| {
            row_major_cmp(&a.state.cell_rect(), &b.state.cell_rect(), SortOrder::Ascending)
        });
        nodes
            .iter()
            .map(|n| NodeSnapshot::from_state(&n.state))
            .collect()
    }

    /// Diff a saved layout against the current nodes.
    ///
    /// Existing nodes (matched by widget id) are moved/resized in place —
    /// keeping their stable id and therefore their column-cache continuity
    /// — new ones are added, and nodes missing from the layout are removed.
    /// Runs as one batch with replay semantics (no row-widening cascades).
    pub fn load(&mut self, snapshots: &[NodeSnapshot]) -> Result<(), EngineError> {
        let mut incoming: Vec<NodeSnapshot> = snapshots.to_vec();
        incoming.sort_by_key(|s| row_major_key(s.x, s.y));
        tracing::debug!(count = incoming.len(), "load layout");

        self.loading = true;
        self.batch_update(true);

        let keep: Vec<&str> = incoming.iter().filter_map(|s| s.id.as_deref()).collect();
        let stale: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|n| match n.state.widget_id.as_deref() {
                Some(w) => !keep.contains(&w),
                None => true,
            })
            .map(|n| n.state.id)
            .collect();
        for id in stale {
            self.remove_node(id);
        }

        for snap in &incoming {
            match snap.id.as_deref().and_then(|w| self.find_by_widget(w)) {
                Some(id) => {
                    if let Some(n) = self.node_mut(id) {
                        n.state.constraints = snap.constraints();
                        n.state.flags = snap.flags();
                    }
                    let req = MoveRequest {
                        x: snap.x,
                        y: snap.y,
                        w: Some(snap.w),
                        h: Some(snap.h),
                        rect: None,
                    };
                    self.move_node_opts(
                        id,
                        req,
                        MoveOpts {
                            pack: true,
                            nested: false,
                            skip: None,
                        },
                    )?;
                }
                None => {
                    self.add_node(snap.to_spec())?;
                }
            }
        }

        self.batch_update(false);
        self.loading = false;
        Ok(())
    }

    // -- column migration ---------------------------------------------------

    /// Re-derive the layout for a new column count.
    pub fn column_changed(
        &mut self,
        prev_column: i32,
        column: i32,
        mode: ColumnMode,
    ) -> Result<(), EngineError> {
        self.column_changed_impl(prev_column, column, mode, None::<fn(i32, i32, &mut [NodeState])>)
    }

    /// Like [`Self::column_changed`], handing uncached nodes to a caller
    /// closure instead of a built-in scaling mode. The closure receives
    /// `(new_column, prev_column, nodes)` and may rewrite positions and
    /// widths; results still go through the collision path.
    pub fn column_changed_with<F>(
        &mut self,
        prev_column: i32,
        column: i32,
        relayout: F,
    ) -> Result<(), EngineError>
    where
        F: FnOnce(i32, i32, &mut [NodeState]),
    {
        self.column_changed_impl(prev_column, column, ColumnMode::None, Some(relayout))
    }

    fn column_changed_impl<F>(
        &mut self,
        prev_column: i32,
        column: i32,
        mode: ColumnMode,
        custom: Option<F>,
    ) -> Result<(), EngineError>
    where
        F: FnOnce(i32, i32, &mut [NodeState]),
    {
        if column < 1 || prev_column == column {
            return Ok(());
        }
        if self.nodes.is_empty() {
            self.column = column;
            return Ok(());
        }
        tracing::debug!(prev = prev_column, new = column, mode = ?mode, "column changed");

        let compacting =
            custom.is_none() && matches!(mode, ColumnMode::Compact | ColumnMode::List);
        if compacting {
            // Fix the ordering once, before the new column count perturbs it.
            self.sort_nodes(SortOrder::Ascending);
        }

        // Shrinking: remember the current arrangement for a later grow.
        if column < prev_column {
            self.cache_current_layout(prev_column);
        }

        self.batch_update(true);
        self.in_column_resize = true;
        self.column = column;

        let mut prev_column = prev_column;
        let mut kept: Vec<GridNode> = Vec::new();
        let mut rest: Vec<GridNode> = std::mem::take(&mut self.nodes);
        if !compacting {
            // Reverse order so re-insertion goes last row first, limiting
            // collisions.
            rest.sort_by(|a, b| {
                row_major_cmp(&a.state.cell_rect(), &b.state.cell_rect(), SortOrder::Descending)
            });
        }

        if !compacting && column > prev_column {
            let cached: Vec<CachedPlacement> = self
                .layout_cache
                .get(column)
                .map(<[CachedPlacement]>::to_vec)
                .unwrap_or_default();

            // No exact cache: rescale from the widest snapshot instead of
            // the current (narrower, lossier) arrangement.
            if cached.is_empty()
                && let Some(widest) = self.layout_cache.widest()
                && widest != prev_column
            {
                let wide: Vec<CachedPlacement> = self
                    .layout_cache
                    .get(widest)
                    .map(<[CachedPlacement]>::to_vec)
                    .unwrap_or_default();
                for p in wide {
                    if let Some(node) = rest.iter_mut().find(|n| n.state.id == p.id) {
                        if !p.auto_position {
                            if let Some(x) = p.x {
                                node.state.x = x;
                            }
                            if let Some(y) = p.y {
                                node.state.y = y;
                            }
                        }
                        node.state.w = p.w;
                        if p.x.is_none() || p.y.is_none() {
                            node.state.flags.insert(NodeFlags::AUTO_POSITION);
                        }
                    }
                }
                prev_column = widest;
            }

            // Exact cache hit: replay placements by stable id, bypassing
            // the scaling math entirely.
            for p in cached {
                if let Some(pos) = rest.iter().position(|n| n.state.id == p.id) {
                    let mut node = rest.remove(pos);
                    if node.state.auto_position() || p.x.is_none() || p.y.is_none() {
                        node.state.flags.insert(NodeFlags::AUTO_POSITION);
                    } else if let (Some(x), Some(y)) = (p.x, p.y) {
                        node.state.x = x;
                        node.state.y = y;
                    }
                    node.state.w = p.w;
                    kept.push(node);
                }
            }
        }

        if compacting {
            self.nodes = rest;
            let cmode = if matches!(mode, ColumnMode::List) {
                CompactMode::List
            } else {
                CompactMode::Compact
            };
            self.compact_with(cmode, false)?;
        } else {
            if !rest.is_empty() {
                if let Some(relayout) = custom {
                    let mut states: Vec<NodeState> =
                        rest.iter().map(|n| n.state.clone()).collect();
                    relayout(column, prev_column, &mut states);
                    for (node, state) in rest.iter_mut().zip(states) {
                        node.state = state;
                    }
                    kept.append(&mut rest);
                } else {
                    let ratio = f64::from(column) / f64::from(prev_column);
                    let do_move = matches!(mode, ColumnMode::Move | ColumnMode::MoveScale);
                    let do_scale = matches!(mode, ColumnMode::Scale | ColumnMode::MoveScale);
                    for mut node in rest.drain(..) {
                        let s = &mut node.state;
                        s.x = if column == 1 {
                            0
                        } else if do_move {
                            (f64::from(s.x) * ratio).round() as i32
                        } else {
                            s.x.min(column - 1)
                        };
                        // A single-column stack in either direction always
                        // collapses width to one cell.
                        s.w = if column == 1 || prev_column == 1 {
                            1
                        } else if do_scale {
                            ((f64::from(s.w) * ratio).round() as i32).max(1)
                        } else {
                            s.w.min(column)
                        };
                        kept.push(node);
                    }
                }
            }

            kept.sort_by(|a, b| {
                row_major_cmp(&a.state.cell_rect(), &b.state.cell_rect(), SortOrder::Descending)
            });
            for mut node in kept {
                node.interaction.orig = None;
                self.insert_node(node, false, None)?;
            }
        }

        // Clear snapshots so the batch commit can't "restore" the
        // migration away.
        for n in &mut self.nodes {
            n.interaction.orig = None;
        }
        self.batch_update_opts(false, !compacting);
        self.in_column_resize = false;
        Ok(())
    }

    /// Re-flow every node through the empty-slot search.
    pub fn compact(&mut self, mode: CompactMode) -> Result<(), EngineError> {
        self.compact_with(mode, true)
    }

    fn compact_with(&mut self, mode: CompactMode, sort: bool) -> Result<(), EngineError> {
        if self.nodes.is_empty() {
            return Ok(());
        }
        if sort {
            self.sort_nodes(SortOrder::Ascending);
        }
        let was_batch = self.batch_mode;
        if !was_batch {
            self.batch_update(true);
        }
        let was_column_resize = self.in_column_resize;
        self.in_column_resize = true;

        let copy = std::mem::take(&mut self.nodes);
        let mut prev_id: Option<NodeId> = None;
        for mut node in copy {
            let mut after = None;
            if !node.state.locked() {
                node.state.flags.insert(NodeFlags::AUTO_POSITION);
                if matches!(mode, CompactMode::List) {
                    after = prev_id;
                }
            }
            let id = node.state.id;
            self.insert_node(node, false, after)?;
            prev_id = Some(id);
        }

        self.in_column_resize = was_column_resize;
        if !was_batch {
            self.batch_update(false);
        }
        Ok(())
    }

    // -- internals ----------------------------------------------------------

    fn index_of(&self, id: NodeId) -> Option<usize> {
        self.nodes.iter().position(|n| n.state.id == id)
    }

    fn node_ref(&self, id: NodeId) -> Option<&GridNode> {
        self.nodes.iter().find(|n| n.state.id == id)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut GridNode> {
        self.nodes.iter_mut().find(|n| n.state.id == id)
    }

    fn rect_of(&self, id: NodeId) -> Option<CellRect> {
        self.node_ref(id).map(|n| n.state.cell_rect())
    }

    fn has_locked(&self) -> bool {
        self.nodes.iter().any(|n| n.state.locked())
    }

    fn sort_nodes(&mut self, order: SortOrder) {
        self.nodes
            .sort_by(|a, b| row_major_cmp(&a.state.cell_rect(), &b.state.cell_rect(), order));
    }

    /// A copy of this engine with no row ceiling and clean buffers, for
    /// what-if simulation.
    fn simulation_clone(&self) -> GridEngine {
        let mut clone = self.clone();
        clone.max_row = 0;
        clone.pending.clear();
        clone.added.clear();
        clone.removed.clear();
        clone.last_drag_collide = None;
        clone
    }

    fn prepare_spec(&mut self, spec: NodeSpec) -> Result<GridNode, EngineError> {
        let id = self.ids.allocate()?;
        let auto = spec.flags.contains(NodeFlags::AUTO_POSITION)
            || spec.x.is_none()
            || spec.y.is_none();
        let mut flags = spec.flags;
        if auto {
            flags.insert(NodeFlags::AUTO_POSITION);
        }
        let mut state = NodeState {
            id,
            widget_id: spec.widget_id,
            x: spec.x.unwrap_or(0),
            y: spec.y.unwrap_or(0),
            w: spec.w.unwrap_or(1).max(1),
            h: spec.h.unwrap_or(1).max(1),
            constraints: spec.constraints,
            flags,
        };
        self.node_bound_fix(&mut state, false);
        Ok(GridNode::new(state))
    }

    fn insert_node(
        &mut self,
        mut node: GridNode,
        trigger_event: bool,
        after: Option<NodeId>,
    ) -> Result<NodeId, EngineError> {
        let id = node.state.id;
        if self.index_of(id).is_some() {
            return Ok(id);
        }
        if self.in_column_resize {
            let changed = self.node_bound_fix(&mut node.state, false);
            node.interaction.dirty |= changed;
        }
        node.interaction.pending_remove = false;

        let mut skip_collision = false;
        if node.state.auto_position() {
            let after_rect = after.and_then(|a| self.rect_of(a));
            if find_slot(
                &mut node.state,
                &mut node.interaction.dirty,
                &self.nodes,
                self.column,
                after_rect.as_ref(),
                None,
            ) {
                skip_collision = true;
            }
        }

        let nn = node.state.cell_rect();
        self.nodes.push(node);
        if trigger_event {
            self.added.push(id);
        }
        if !skip_collision {
            self.fix_collisions(id, nn, None, MoveOpts::default())?;
        }
        if !self.batch_mode {
            self.pack_nodes();
            self.notify();
        }
        Ok(id)
    }

    /// Clamp a node's geometry to the engine bounds.
    ///
    /// Returns whether anything changed; callers mark the stored node
    /// dirty. Side effect: an over-wide node on a shrunken grid is cached
    /// under `default_column` (first shrink only) so growing back restores
    /// the wide placement.
    fn node_bound_fix(&mut self, state: &mut NodeState, resizing: bool) -> bool {
        let before = state.cell_rect();
        let c = state.constraints;
        if let Some(max_w) = c.max_w {
            state.w = state.w.min(max_w);
        }
        if let Some(max_h) = c.max_h {
            state.h = state.h.min(max_h);
        }
        if let Some(min_w) = c.min_w
            && min_w <= self.column
        {
            state.w = state.w.max(min_w);
        }
        if let Some(min_h) = c.min_h {
            state.h = state.h.max(min_h);
        }

        if state.x + state.w > self.column
            && self.column < self.default_column
            && !self.in_column_resize
            && !self.layout_cache.contains(self.default_column, state.id)
        {
            let mut cached = CachedPlacement::from_state(state);
            if let Some(x) = cached.x {
                cached.w = cached.w.min((self.default_column - x).max(1));
            }
            self.layout_cache.store_one(self.default_column, cached);
        }

        if state.w > self.column {
            state.w = self.column;
        } else if state.w < 1 {
            state.w = 1;
        }
        if self.max_row > 0 && state.h > self.max_row {
            state.h = self.max_row;
        } else if state.h < 1 {
            state.h = 1;
        }
        if state.x < 0 {
            state.x = 0;
        }
        if state.y < 0 {
            state.y = 0;
        }
        if state.x + state.w > self.column {
            if resizing {
                state.w = self.column - state.x;
            } else {
                state.x = self.column - state.w;
            }
        }
        if self.max_row > 0 && state.y + state.h > self.max_row {
            if resizing {
                state.h = self.max_row - state.y;
            } else {
                state.y = self.max_row - state.h;
            }
        }
        state.cell_rect() != before
    }

    /// Whether collision hit-testing should widen to the entire row, which
    /// gives "push the whole row down" semantics instead of moving only the
    /// directly-overlapped neighbor.
    fn use_entire_row_area(&self, id: NodeId, nn: CellRect) -> bool {
        let Some(n) = self.node_ref(id) else {
            return false;
        };
        (!self.float || (self.batch_mode && !self.prev_float))
            && !self.has_locked()
            && (!n.interaction.moving || n.interaction.skip_down || nn.y <= n.state.y)
    }

    fn move_node_opts(
        &mut self,
        id: NodeId,
        req: MoveRequest,
        opt: MoveOpts,
    ) -> Result<bool, EngineError> {
        let Some(current) = self.node_state(id).cloned() else {
            return Ok(false);
        };

        let mut target = current.clone();
        target.x = req.x.unwrap_or(current.x);
        target.y = req.y.unwrap_or(current.y);
        target.w = req.w.unwrap_or(current.w);
        target.h = req.h.unwrap_or(current.h);
        let resizing = target.w != current.w || target.h != current.h;

        self.node_bound_fix(&mut target, resizing);
        let nn = target.cell_rect();
        if current.cell_rect() == nn {
            return Ok(false);
        }

        let prev = current.cell_rect();
        let collides = self.collide_all(id, nn, opt.skip);
        let mut need_to_move = true;
        if !collides.is_empty() {
            let moving = self
                .node_ref(id)
                .is_some_and(|n| n.interaction.moving);
            let active_drag = moving && !opt.nested;
            let chosen = if active_drag {
                // Mid-drag we only honor a collision actually covered by
                // the pointer rect, not any cell-level graze.
                let c = self.direction_collide_coverage(id, req.rect, &collides);
                self.last_drag_collide = c;
                c
            } else {
                collides.first().copied()
            };
            match chosen {
                Some(c) => {
                    let fixed = self.fix_collisions(id, nn, Some(c), opt)?;
                    need_to_move = !fixed;
                }
                None => {
                    need_to_move = false;
                }
            }
        }

        if need_to_move
            && let Some(n) = self.node_mut(id)
        {
            n.interaction.dirty = true;
            n.state.set_rect(nn);
        }
        if opt.pack {
            self.pack_nodes();
            self.notify();
        }
        Ok(self.rect_of(id) != Some(prev))
    }

    /// The central cascade: resolve everything overlapping `nn`.
    ///
    /// Locked colliders, bulk loads, and downward drags make the moving
    /// node hop below the collider (once per cascade, via `skip_down`);
    /// every other collider is pushed below the landing position, possibly
    /// displacing further nodes in turn.
    fn fix_collisions(
        &mut self,
        id: NodeId,
        nn_in: CellRect,
        collide_hint: Option<NodeId>,
        opt: MoveOpts,
    ) -> Result<bool, EngineError> {
        self.sort_nodes(SortOrder::Descending);

        let mut nn = nn_in;
        let Some(first) = collide_hint.or_else(|| self.collide(id, nn, opt.skip)) else {
            return Ok(false);
        };

        let moving = self.node_ref(id).is_some_and(|n| n.interaction.moving);
        if moving && !opt.nested && !self.float && self.swap(id, first) == Some(true) {
            return Ok(true);
        }

        // Widen to the whole row so a large item pushes every neighbor in
        // the row instead of leap-frogging the small ones.
        let mut widened: Option<CellRect> = None;
        let mut collide = Some(first);
        if !self.loading && self.use_entire_row_area(id, nn) {
            let area = CellRect::new(0, nn.y, self.column, nn.h);
            widened = Some(area);
            collide = self.collide(id, area, opt.skip);
        }

        let mut did_move = false;
        let mut counter = 0usize;
        let limit = self.nodes.len() * 2;
        loop {
            let area = widened.unwrap_or(nn);
            let Some(c_id) = collide.take().or_else(|| self.collide(id, area, opt.skip)) else {
                break;
            };
            counter += 1;
            if counter > limit {
                tracing::warn!(
                    node = id.get(),
                    iterations = counter,
                    "collision cascade exceeded bound"
                );
                return Err(EngineError::CollisionOverflow {
                    node: id,
                    iterations: counter,
                });
            }

            let Some(c_state) = self.node_state(c_id).cloned() else {
                break;
            };
            let c_rect = c_state.cell_rect();
            let Some((node_rect, node_moving, node_skip_down)) = self
                .node_ref(id)
                .map(|n| (n.state.cell_rect(), n.interaction.moving, n.interaction.skip_down))
            else {
                break;
            };

            // Dragging downward into space it didn't just vacate: hop past
            // the collider instead of pushing it (the collider could rise
            // into our old or pre-landing rows).
            let dragging_down = node_moving && !node_skip_down && nn.y > node_rect.y && !self.float;
            let hop = c_state.locked()
                || self.loading
                || (dragging_down
                    && (self
                        .collide(c_id, c_rect.at_y(node_rect.y), Some(id))
                        .is_none()
                        || self
                            .collide(c_id, c_rect.at_y(nn.y - c_state.h), Some(id))
                            .is_none()));

            let moved;
            if hop {
                if nn.y > node_rect.y
                    && let Some(n) = self.node_mut(id)
                {
                    n.interaction.skip_down = true;
                }
                let target = CellRect::new(nn.x, c_rect.bottom(), nn.w, nn.h);
                if self.loading && node_rect == target {
                    // Layout replay already landed us here; keep scanning.
                    moved = true;
                } else {
                    let req = MoveRequest::default()
                        .to(target.x, target.y)
                        .resize(target.w, target.h);
                    moved = self.move_node_opts(
                        id,
                        req,
                        MoveOpts {
                            nested: true,
                            pack: false,
                            skip: opt.skip,
                        },
                    )?;
                }
                if (c_state.locked() || self.loading) && moved {
                    // Where we landed past the lock becomes the new goal.
                    if let Some(r) = self.rect_of(id) {
                        nn = r;
                    }
                } else if !c_state.locked() && moved && opt.pack {
                    // Packed boards: settle, then keep the drop location
                    // just past the collider to see what else we push.
                    self.pack_nodes();
                    nn.y = c_rect.bottom();
                    if let Some(n) = self.node_mut(id) {
                        n.state.set_rect(nn);
                    }
                }
                did_move |= moved;
            } else {
                // Push the collider below where we land, ignoring our own
                // current footprint.
                let req = MoveRequest::default()
                    .to(c_rect.x, nn.bottom())
                    .resize(c_rect.w, c_rect.h);
                moved = self.move_node_opts(
                    c_id,
                    req,
                    MoveOpts {
                        nested: true,
                        pack: false,
                        skip: Some(id),
                    },
                )?;
            }

            if !moved {
                // Nothing could give way (row ceiling, locks): stop here.
                return Ok(did_move);
            }
            collide = None;
        }
        Ok(did_move)
    }

    /// During an active drag, pick the collision candidate whose cached
    /// pixel rect is covered more than 50% by the dragged rect (grown back
    /// toward its starting rect so approach direction counts).
    fn direction_collide_coverage(
        &self,
        id: NodeId,
        drag_rect: Option<PxRect>,
        collides: &[NodeId],
    ) -> Option<NodeId> {
        let r0 = self.node_ref(id)?.interaction.rect?;
        let mut r = drag_rect?;

        if r.y > r0.y {
            r.h += r.y - r0.y;
            r.y = r0.y;
        } else {
            r.h += r0.y - r.y;
        }
        if r.x > r0.x {
            r.w += r.x - r0.x;
            r.x = r0.x;
        } else {
            r.w += r0.x - r.x;
        }

        let mut best = None;
        let mut over_max = 0.5;
        for &c in collides {
            let Some(cn) = self.node_ref(c) else { break };
            if cn.state.locked() {
                break;
            }
            let Some(r2) = cn.interaction.rect else { break };

            let mut y_over = f64::MAX;
            let mut x_over = f64::MAX;
            if r0.y < r2.y {
                y_over = (r.bottom() - r2.y) / r2.h;
            } else if r0.bottom() > r2.bottom() {
                y_over = (r2.bottom() - r.y) / r2.h;
            }
            if r0.x < r2.x {
                x_over = (r.right() - r2.x) / r2.w;
            } else if r0.right() > r2.right() {
                x_over = (r2.right() - r.x) / r2.w;
            }

            let over = x_over.min(y_over);
            if over > over_max {
                over_max = over;
                best = Some(c);
            }
        }
        best
    }

    /// Upward compaction.
    ///
    /// Float mode only closes gaps the current interaction opened: each
    /// node whose row drifted from its snapshot is pulled up while no
    /// collision occurs, never above its snapshot row. Gravity mode pulls
    /// every unlocked node up while the slot above is free.
    fn pack_nodes(&mut self) {
        if self.batch_mode {
            return;
        }
        self.sort_nodes(SortOrder::Ascending);

        if self.float {
            for i in 0..self.nodes.len() {
                let (id, rect, orig, updating) = {
                    let n = &self.nodes[i];
                    (
                        n.state.id,
                        n.state.cell_rect(),
                        n.interaction.orig,
                        n.interaction.updating,
                    )
                };
                let Some(orig) = orig else { continue };
                if updating || rect.y == orig.y {
                    continue;
                }
                let mut new_y = rect.y;
                while new_y > orig.y {
                    if self.collide(id, rect.at_y(new_y - 1), None).is_some() {
                        break;
                    }
                    new_y -= 1;
                }
                if new_y != rect.y {
                    let n = &mut self.nodes[i];
                    n.interaction.dirty = true;
                    n.state.y = new_y;
                }
            }
        } else {
            for i in 0..self.nodes.len() {
                if self.nodes[i].state.locked() {
                    continue;
                }
                loop {
                    let (id, rect) = {
                        let n = &self.nodes[i];
                        (n.state.id, n.state.cell_rect())
                    };
                    if rect.y <= 0 {
                        break;
                    }
                    let new_y = if i == 0 { 0 } else { rect.y - 1 };
                    let can_move = i == 0 || self.collide(id, rect.at_y(new_y), None).is_none();
                    if !can_move {
                        break;
                    }
                    let n = &mut self.nodes[i];
                    n.interaction.dirty |= n.state.y != new_y;
                    n.state.y = new_y;
                }
            }
        }
    }

    fn cache_current_layout(&mut self, column: i32) {
        let placements = self
            .nodes
            .iter()
            .map(|n| CachedPlacement::from_state(&n.state))
            .collect();
        self.layout_cache.store(column, placements);
    }

    /// Record one notification point: the dirty set since the last one.
    fn notify(&mut self) {
        if self.batch_mode {
            return;
        }
        let added_ids = std::mem::take(&mut self.added);
        let removed = std::mem::take(&mut self.removed);

        let mut added = Vec::with_capacity(added_ids.len());
        for id in &added_ids {
            if let Some(s) = self.node_state(*id) {
                added.push(s.clone());
            }
        }
        let mut updated = Vec::new();
        for n in &mut self.nodes {
            if n.interaction.dirty {
                n.interaction.dirty = false;
                if !added_ids.contains(&n.state.id) {
                    updated.push(n.state.clone());
                }
            }
        }

        if added.is_empty() && removed.is_empty() && updated.is_empty() {
            return;
        }
        tracing::trace!(
            added = added.len(),
            removed = removed.len(),
            updated = updated.len(),
            "layout changed"
        );
        self.pending.push(ChangeSet {
            added,
            removed,
            updated,
        });
    }
}

/// Row-major empty-slot scan.
///
/// Starts just past `after`'s footprint when given (preserving relative
/// order for list re-flow), skips x offsets where the width overflows, and
/// takes the first footprint free of every node in `nodes`.
fn find_slot(
    state: &mut NodeState,
    dirty: &mut bool,
    nodes: &[GridNode],
    column: i32,
    after: Option<&CellRect>,
    exclude: Option<NodeId>,
) -> bool {
    if state.w > column {
        return false;
    }
    let start = after.map_or(0, |a| {
        i64::from(a.y) * i64::from(column) + i64::from(a.x + a.w)
    });
    let mut i = start.max(0);
    loop {
        let x = (i % i64::from(column)) as i32;
        let y = (i / i64::from(column)) as i32;
        i += 1;
        if x + state.w > column {
            continue;
        }
        let candidate = CellRect::new(x, y, state.w, state.h);
        if nodes.iter().any(|n| {
            Some(n.state.id) != exclude && candidate.intersects(&n.state.cell_rect())
        }) {
            continue;
        }
        if state.x != x || state.y != y {
            *dirty = true;
        }
        state.x = x;
        state.y = y;
        state.flags.remove(NodeFlags::AUTO_POSITION);
        return true;
    }
}

/// Whether a request changes anything once size constraints are applied.
fn changed_pos_constrain(state: &NodeState, req: &MoveRequest) -> bool {
    let x = req.x.unwrap_or(state.x);
    let y = req.y.unwrap_or(state.y);
    let mut w = req.w.unwrap_or(state.w);
    let mut h = req.h.unwrap_or(state.h);
    if state.x != x || state.y != y {
        return true;
    }
    let c = state.constraints;
    if let Some(max_w) = c.max_w {
        w = w.min(max_w);
    }
    if let Some(max_h) = c.max_h {
        h = h.min(max_h);
    }
    if let Some(min_w) = c.min_w {
        w = w.max(min_w);
    }
    if let Some(min_h) = c.min_h {
        h = h.max(min_h);
    }
    state.w != w || state.h != h
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
