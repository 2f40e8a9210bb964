#![forbid(unsafe_code)]

//! Grid placement engine and host protocol for dashgrid.
//!
//! # Role in dashgrid
//! `dashgrid-layout` owns the canonical (column, row) placement of widget
//! panels: collision detection and resolution, gravity packing, per-column
//! layout caching, and responsive column migration.
//!
//! # Primary responsibilities
//! - **GridEngine**: the stateful, single-owner placement core. Hosts
//!   submit intents; the engine emits [`ChangeSet`]s of moved nodes.
//! - **GridBoard**: the host coordinator — interaction lifecycle, pixel
//!   conversion, breakpoint handling, listener dispatch.
//! - **Snapshots**: schema-versioned persistence with defaults omitted and
//!   transient state excluded by construction.
//!
//! # How it fits in the system
//! The rendering layer never mutates geometry. It feeds pointer intents to
//! [`GridBoard`] and applies the returned dirty sets to the DOM or canvas;
//! everything between those two points is deterministic and synchronous.

pub mod board;
pub mod cache;
pub mod engine;
pub mod node;
pub mod responsive;
pub mod snapshot;

pub use dashgrid_core::geometry::{CellRect, Margins, PxRect, SortOrder};
pub use dashgrid_core::id::NodeId;

pub use board::{
    BoardError, BoardOptions, CellGeometry, ChangeListener, GridBoard, InteractionKind,
};
pub use cache::{CachedPlacement, ColumnCache};
pub use engine::{
    ChangeSet, ColumnMode, CompactMode, EngineError, EngineOptions, GridEngine, MoveRequest,
};
pub use node::{NodeFlags, NodeSpec, NodeState, SizeConstraints};
pub use responsive::{BreakpointError, Breakpoints, ColumnBreakpoint};
pub use snapshot::{BOARD_SCHEMA_VERSION, BoardSnapshot, NodeSnapshot, SnapshotError};
