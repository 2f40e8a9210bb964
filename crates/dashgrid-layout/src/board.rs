//! Host coordinator: the engine's boundary with the drag/render layer.
//!
//! [`GridBoard`] mediates between pointer events and the engine. It owns
//! the cell-to-pixel conversion, the interaction lifecycle (begin → drag or
//! resize → end/cancel), breakpoint-driven column migration, and delivery
//! of [`ChangeSet`]s to the registered [`ChangeListener`] — one call per
//! non-batched mutation, one per batch commit.
//!
//! Hosts never touch node geometry directly; every mutation is an intent
//! submitted here or to the engine, and the dirty set is the only output.

use std::fmt;

use dashgrid_core::config;
use dashgrid_core::geometry::{CellRect, Margins, PxRect};
use dashgrid_core::id::NodeId;
use dashgrid_core::size::{Length, SizeParseError, SizeUnit};

use crate::engine::{
    ChangeSet, ColumnMode, EngineError, EngineOptions, GridEngine, MoveRequest,
};
use crate::node::NodeSpec;
use crate::responsive::Breakpoints;
use crate::snapshot::{BoardSnapshot, SnapshotError};

/// CSS reference pixel ratios for the units a headless coordinator can
/// resolve without a viewport.
const PX_PER_EM: f64 = 16.0;
const PX_PER_CM: f64 = 96.0 / 2.54;
const PX_PER_MM: f64 = 96.0 / 25.4;

/// Engine-to-host notification sink.
pub trait ChangeListener {
    /// Called with exactly the nodes whose geometry changed since the last
    /// notification.
    fn on_change(&mut self, changes: &ChangeSet);
}

/// Which interaction a pointer gesture starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    Drag,
    Resize,
}

/// Board construction options.
#[derive(Debug, Clone)]
pub struct BoardOptions {
    pub column: i32,
    pub max_row: i32,
    pub float: bool,
    /// Cell height as a size string (`"64px"`, `"4rem"`); `None` makes
    /// cells square. Parsed fail-fast at construction.
    pub cell_height: Option<String>,
    pub margins: Margins,
    pub breakpoints: Option<Breakpoints>,
    /// Strategy for breakpoint-driven column migration.
    pub column_mode: ColumnMode,
    /// Board-wide drag opt-out; a node's `NO_MOVE` flag overrides upward,
    /// never downward.
    pub disable_drag: bool,
    /// Board-wide resize opt-out, same layering as `disable_drag`.
    pub disable_resize: bool,
}

impl Default for BoardOptions {
    fn default() -> Self {
        Self {
            column: 12,
            max_row: 0,
            float: false,
            cell_height: None,
            margins: Margins::default(),
            breakpoints: None,
            column_mode: ColumnMode::MoveScale,
            disable_drag: false,
            disable_resize: false,
        }
    }
}

/// Resolved cell-to-pixel conversion for the current container size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellGeometry {
    pub cell_width: f64,
    pub cell_height: f64,
    pub margins: Margins,
}

impl CellGeometry {
    /// Pixel rectangle of a cell rect, margins applied on every side.
    #[must_use]
    pub fn px_rect(&self, rect: CellRect) -> PxRect {
        let stride_x = self.cell_width + self.margins.horizontal_sum();
        let stride_y = self.cell_height + self.margins.vertical_sum();
        PxRect::new(
            f64::from(rect.x) * stride_x + self.margins.left,
            f64::from(rect.y) * stride_y + self.margins.top,
            f64::from(rect.w) * stride_x - self.margins.horizontal_sum(),
            f64::from(rect.h) * stride_y - self.margins.vertical_sum(),
        )
    }

    /// Cell under a pixel point.
    #[must_use]
    pub fn cell_at(&self, px: f64, py: f64) -> (i32, i32) {
        let stride_x = self.cell_width + self.margins.horizontal_sum();
        let stride_y = self.cell_height + self.margins.vertical_sum();
        ((px / stride_x).floor() as i32, (py / stride_y).floor() as i32)
    }
}

/// Errors from board configuration and intent handling.
#[derive(Debug, Clone, PartialEq)]
pub enum BoardError {
    /// Malformed cell-height string.
    Size(SizeParseError),
    /// A unit the headless coordinator cannot resolve without a viewport.
    UnsupportedCellHeightUnit { unit: SizeUnit },
    Engine(EngineError),
    Snapshot(SnapshotError),
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Size(err) => write!(f, "{err}"),
            Self::UnsupportedCellHeightUnit { unit } => {
                write!(f, "cell height unit {unit:?} needs a viewport to resolve")
            }
            Self::Engine(err) => write!(f, "{err}"),
            Self::Snapshot(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for BoardError {}

impl From<SizeParseError> for BoardError {
    fn from(err: SizeParseError) -> Self {
        Self::Size(err)
    }
}

impl From<EngineError> for BoardError {
    fn from(err: EngineError) -> Self {
        Self::Engine(err)
    }
}

impl From<SnapshotError> for BoardError {
    fn from(err: SnapshotError) -> Self {
        Self::Snapshot(err)
    }
}

/// The host-side coordinator wrapping one engine instance.
pub struct GridBoard {
    engine: GridEngine,
    listener: Option<Box<dyn ChangeListener>>,
    margins: Margins,
    cell_height: Option<Length>,
    breakpoints: Option<Breakpoints>,
    column_mode: ColumnMode,
    disable_drag: bool,
    disable_resize: bool,
    container_width: f64,
    interaction: Option<NodeId>,
}

impl core::fmt::Debug for GridBoard {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GridBoard")
            .field("engine", &self.engine)
            .field("listener", &self.listener.as_ref().map(|_| "<listener>"))
            .field("margins", &self.margins)
            .field("cell_height", &self.cell_height)
            .field("breakpoints", &self.breakpoints)
            .field("column_mode", &self.column_mode)
            .field("disable_drag", &self.disable_drag)
            .field("disable_resize", &self.disable_resize)
            .field("container_width", &self.container_width)
            .field("interaction", &self.interaction)
            .finish()
    }
}

impl GridBoard {
    /// Build a board. Cell-height strings are parsed here and malformed
    /// input is surfaced immediately, not at first layout.
    pub fn new(opts: BoardOptions) -> Result<Self, BoardError> {
        let cell_height = match &opts.cell_height {
            Some(raw) => {
                let len: Length = raw.parse()?;
                match len.unit {
                    SizeUnit::Px
                    | SizeUnit::Em
                    | SizeUnit::Rem
                    | SizeUnit::Cm
                    | SizeUnit::Mm => {}
                    unit @ (SizeUnit::Percent | SizeUnit::Vh | SizeUnit::Vw) => {
                        return Err(BoardError::UnsupportedCellHeightUnit { unit });
                    }
                }
                Some(len)
            }
            None => None,
        };
        Ok(Self {
            engine: GridEngine::new(
                EngineOptions::default()
                    .column(opts.column)
                    .max_row(opts.max_row)
                    .float(opts.float),
            ),
            listener: None,
            margins: opts.margins,
            cell_height,
            breakpoints: opts.breakpoints,
            column_mode: opts.column_mode,
            disable_drag: opts.disable_drag,
            disable_resize: opts.disable_resize,
            container_width: 0.0,
            interaction: None,
        })
    }

    /// Register the notification sink.
    pub fn set_listener(&mut self, listener: Box<dyn ChangeListener>) {
        self.listener = Some(listener);
    }

    /// Read access to the engine.
    #[must_use]
    pub fn engine(&self) -> &GridEngine {
        &self.engine
    }

    /// The current cell-to-pixel conversion.
    #[must_use]
    pub fn cell_geometry(&self) -> CellGeometry {
        let column = f64::from(self.engine.column());
        let stride = if self.container_width > 0.0 {
            self.container_width / column
        } else {
            1.0
        };
        let cell_width = (stride - self.margins.horizontal_sum()).max(1.0);
        let cell_height = match self.cell_height {
            None => cell_width,
            Some(len) => match len.unit {
                SizeUnit::Px => len.value,
                SizeUnit::Em | SizeUnit::Rem => len.value * PX_PER_EM,
                SizeUnit::Cm => len.value * PX_PER_CM,
                SizeUnit::Mm => len.value * PX_PER_MM,
                // Rejected at construction.
                SizeUnit::Percent | SizeUnit::Vh | SizeUnit::Vw => cell_width,
            },
        };
        CellGeometry {
            cell_width,
            cell_height,
            margins: self.margins,
        }
    }

    // -- widget intents -----------------------------------------------------

    /// Add a widget.
    pub fn add_widget(&mut self, spec: NodeSpec) -> Result<NodeId, BoardError> {
        let id = self.engine.add_node(spec)?;
        self.flush();
        Ok(id)
    }

    /// Remove a widget; unknown ids are ignored.
    pub fn remove_widget(&mut self, id: NodeId) -> bool {
        let removed = self.engine.remove_node(id);
        self.flush();
        removed
    }

    /// Programmatic move/resize outside an interaction.
    pub fn update_widget(&mut self, id: NodeId, req: MoveRequest) -> Result<bool, BoardError> {
        let moved = self.engine.move_node_check(id, req)?;
        self.flush();
        Ok(moved)
    }

    /// Bulk mutation window: one pack + one notification at the end.
    pub fn batch_update(&mut self, flag: bool) {
        self.engine.batch_update(flag);
        self.flush();
    }

    // -- interaction lifecycle ----------------------------------------------

    /// Start a drag or resize. Refused for locked nodes and for the
    /// matching host policy flag (`no_move` / `no_resize`). Snapshots every
    /// node and caches pixel rects for coverage hit-testing.
    pub fn begin_interaction(&mut self, id: NodeId, kind: InteractionKind) -> bool {
        let Some(state) = self.engine.node_state(id) else {
            return false;
        };
        if state.locked() {
            return false;
        }
        // Node flag, then board default: gridwide opt-outs apply to every
        // node that doesn't set its own policy bit.
        let refused = match kind {
            InteractionKind::Drag => config::resolve(
                state.no_move().then_some(true),
                Some(self.disable_drag),
                false,
            ),
            InteractionKind::Resize => config::resolve(
                state.no_resize().then_some(true),
                Some(self.disable_resize),
                false,
            ),
        };
        if refused {
            return false;
        }
        self.engine
            .begin_update(id, matches!(kind, InteractionKind::Drag));
        let geo = self.cell_geometry();
        self.engine
            .cache_rects(geo.cell_width, geo.cell_height, geo.margins);
        self.interaction = Some(id);
        true
    }

    /// Live drag step, in cell units, with the element's current pixel
    /// rect for >50% coverage collision selection.
    pub fn drag_to(
        &mut self,
        x: i32,
        y: i32,
        px_rect: Option<PxRect>,
    ) -> Result<bool, BoardError> {
        let Some(id) = self.interaction else {
            return Ok(false);
        };
        let mut req = MoveRequest::default().to(x, y);
        if let Some(rect) = px_rect {
            req = req.with_rect(rect);
        }
        let moved = self.engine.move_node_check(id, req)?;
        self.flush();
        Ok(moved)
    }

    /// Live resize step, in cell units.
    pub fn resize_to(&mut self, w: i32, h: i32) -> Result<bool, BoardError> {
        let Some(id) = self.interaction else {
            return Ok(false);
        };
        let moved = self
            .engine
            .move_node_check(id, MoveRequest::default().resize(w, h))?;
        self.flush();
        Ok(moved)
    }

    /// Commit the in-flight interaction.
    pub fn end_interaction(&mut self) {
        if self.interaction.take().is_some() {
            self.engine.end_update();
            self.flush();
        }
    }

    /// Abort the in-flight interaction (Escape): every node returns to its
    /// snapshot and the listener is re-notified.
    pub fn cancel_interaction(&mut self) {
        if self.interaction.take().is_some() {
            self.engine.restore_initial();
            self.engine.end_update();
            self.flush();
        }
    }

    // -- responsive ---------------------------------------------------------

    /// Report a new container width; migrates the column count when the
    /// breakpoint tier changes.
    pub fn container_resized(&mut self, width: f64) -> Result<(), BoardError> {
        self.container_width = width;
        if let Some(bp) = &self.breakpoints {
            let columns = bp.resolve(width);
            let prev = self.engine.column();
            if columns != prev {
                tracing::debug!(width, prev, columns, "breakpoint column change");
                self.engine.column_changed(prev, columns, self.column_mode)?;
                self.flush();
            }
        }
        Ok(())
    }

    // -- persistence --------------------------------------------------------

    /// Snapshot the board.
    #[must_use]
    pub fn save(&self) -> BoardSnapshot {
        let mut snap = BoardSnapshot::new(self.engine.column(), self.engine.save());
        snap.float = self.engine.float();
        snap.max_row = self.engine.max_row();
        snap
    }

    /// Validate and apply a snapshot, diffing against the current widgets.
    pub fn load(&mut self, snapshot: &BoardSnapshot) -> Result<(), BoardError> {
        snapshot.validate()?;
        let prev = self.engine.column();
        if snapshot.column != prev {
            self.engine
                .column_changed(prev, snapshot.column, self.column_mode)?;
        }
        self.engine.set_float(snapshot.float);
        self.engine.set_max_row(snapshot.max_row);
        self.engine.load(&snapshot.nodes)?;
        self.flush();
        Ok(())
    }

    fn flush(&mut self) {
        let changes = self.engine.take_changes();
        if let Some(listener) = self.listener.as_mut() {
            for cs in &changes {
                listener.on_change(cs);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::responsive::ColumnBreakpoint;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<ChangeSet>>>);

    impl ChangeListener for Recorder {
        fn on_change(&mut self, changes: &ChangeSet) {
            self.0.borrow_mut().push(changes.clone());
        }
    }

    fn board() -> (GridBoard, Recorder) {
        let mut board = GridBoard::new(BoardOptions::default()).expect("board");
        let recorder = Recorder::default();
        board.set_listener(Box::new(recorder.clone()));
        (board, recorder)
    }

    #[test]
    fn malformed_cell_height_fails_fast() {
        let err = GridBoard::new(BoardOptions {
            cell_height: Some("12quux".into()),
            ..BoardOptions::default()
        })
        .unwrap_err();
        assert!(matches!(err, BoardError::Size(SizeParseError::UnknownUnit { .. })));
    }

    #[test]
    fn viewport_relative_cell_height_is_rejected() {
        let err = GridBoard::new(BoardOptions {
            cell_height: Some("50vh".into()),
            ..BoardOptions::default()
        })
        .unwrap_err();
        assert_eq!(
            err,
            BoardError::UnsupportedCellHeightUnit {
                unit: SizeUnit::Vh
            }
        );
    }

    #[test]
    fn add_widget_notifies_listener() {
        let (mut board, recorder) = board();
        board
            .add_widget(NodeSpec::new().at(0, 0).size(2, 2))
            .expect("add");
        let changes = recorder.0.borrow();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].added.len(), 1);
    }

    #[test]
    fn cell_geometry_is_square_by_default() {
        let mut board = GridBoard::new(BoardOptions::default()).expect("board");
        board.container_resized(1200.0).expect("resize");
        let geo = board.cell_geometry();
        assert_eq!(geo.cell_width, 100.0);
        assert_eq!(geo.cell_height, 100.0);

        let px = geo.px_rect(CellRect::new(2, 1, 3, 2));
        assert_eq!(px.x, 200.0);
        assert_eq!(px.y, 100.0);
        assert_eq!(px.w, 300.0);
        assert_eq!(px.h, 200.0);
        assert_eq!(geo.cell_at(250.0, 150.0), (2, 1));
    }

    #[test]
    fn fixed_cell_height_applies() {
        let mut board = GridBoard::new(BoardOptions {
            cell_height: Some("4rem".into()),
            ..BoardOptions::default()
        })
        .expect("board");
        board.container_resized(1200.0).expect("resize");
        assert_eq!(board.cell_geometry().cell_height, 64.0);
    }

    #[test]
    fn breakpoint_resize_migrates_columns() {
        let breakpoints = Breakpoints::new(
            vec![ColumnBreakpoint {
                max_width: 600.0,
                columns: 1,
            }],
            12,
        )
        .expect("breakpoints");
        let mut board = GridBoard::new(BoardOptions {
            breakpoints: Some(breakpoints),
            ..BoardOptions::default()
        })
        .expect("board");
        board.container_resized(1200.0).expect("resize");
        board
            .add_widget(NodeSpec::new().at(0, 0).size(4, 2))
            .expect("add");
        board
            .add_widget(NodeSpec::new().at(4, 0).size(4, 2))
            .expect("add");

        board.container_resized(480.0).expect("shrink");
        assert_eq!(board.engine().column(), 1);
        for state in board.engine().nodes() {
            assert_eq!(state.w, 1);
        }

        board.container_resized(1200.0).expect("grow");
        assert_eq!(board.engine().column(), 12);
        let widths: Vec<i32> = board.engine().nodes().map(|s| s.w).collect();
        assert_eq!(widths, vec![4, 4]);
    }

    #[test]
    fn cancel_interaction_restores_layout() {
        let (mut board, _) = board();
        board.container_resized(1200.0).expect("resize");
        let a = board
            .add_widget(NodeSpec::new().at(0, 0).size(2, 2))
            .expect("add");
        board
            .add_widget(NodeSpec::new().at(2, 0).size(2, 2))
            .expect("add");

        assert!(board.begin_interaction(a, InteractionKind::Drag));
        board.drag_to(4, 0, None).expect("drag");
        board.cancel_interaction();

        let state = board.engine().node_state(a).unwrap();
        assert_eq!((state.x, state.y), (0, 0));
    }

    #[test]
    fn host_policy_flags_refuse_interactions() {
        let (mut board, _) = board();
        let pinned = board
            .add_widget(NodeSpec::new().at(0, 0).size(2, 2).no_move())
            .expect("add");
        let rigid = board
            .add_widget(NodeSpec::new().at(2, 0).size(2, 2).no_resize())
            .expect("add");

        assert!(!board.begin_interaction(pinned, InteractionKind::Drag));
        assert!(board.begin_interaction(pinned, InteractionKind::Resize));
        board.end_interaction();
        assert!(!board.begin_interaction(rigid, InteractionKind::Resize));
        assert!(board.begin_interaction(rigid, InteractionKind::Drag));
        board.end_interaction();
    }

    #[test]
    fn board_wide_drag_opt_out_applies() {
        let mut board = GridBoard::new(BoardOptions {
            disable_drag: true,
            ..BoardOptions::default()
        })
        .expect("board");
        let id = board
            .add_widget(NodeSpec::new().at(0, 0).size(2, 2))
            .expect("add");

        assert!(!board.begin_interaction(id, InteractionKind::Drag));
        assert!(board.begin_interaction(id, InteractionKind::Resize));
        board.end_interaction();
    }

    #[test]
    fn snapshot_round_trips_through_board() {
        let (mut board, _) = board();
        board
            .add_widget(NodeSpec::new().widget("a").at(0, 0).size(4, 2))
            .expect("add");
        board
            .add_widget(NodeSpec::new().widget("b").at(4, 0).size(2, 1))
            .expect("add");
        let snap = board.save();

        let mut fresh = GridBoard::new(BoardOptions::default()).expect("board");
        fresh.load(&snap).expect("load");
        assert_eq!(fresh.engine().len(), 2);
        let b = fresh.engine().find_by_widget("b").expect("b");
        let state = fresh.engine().node_state(b).unwrap();
        assert_eq!((state.x, state.y, state.w, state.h), (4, 0, 2, 1));
    }
}
