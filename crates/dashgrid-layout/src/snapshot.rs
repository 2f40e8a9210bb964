//! Persisted layout schema v1.
//!
//! A [`BoardSnapshot`] wraps the node list with board-level settings and a
//! schema version. Defaults are omitted on save (`w`/`h` of one, falsy
//! flags, absent constraints) and unknown host payload rides in an
//! `extensions` bag so foreign fields round-trip.
//!
//! # Schema Versioning Policy
//!
//! - **Additive fields** may be carried in `extensions` without a version
//!   bump.
//! - **Breaking changes** require incrementing [`BOARD_SCHEMA_VERSION`] and
//!   a migration path.
//! - Loaders reject unknown versions with found/expected diagnostics.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::node::{NodeFlags, NodeSpec, NodeState, SizeConstraints};

/// Current board snapshot schema version.
pub const BOARD_SCHEMA_VERSION: u16 = 1;

/// One node's persisted form.
///
/// Coordinates are optional: a node saved while auto-positioned carries
/// none and is re-slotted on load.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NodeSnapshot {
    /// User-facing widget id; the load diff matches on this.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<i32>,
    #[serde(default = "default_span", skip_serializing_if = "is_default_span")]
    pub w: i32,
    #[serde(default = "default_span", skip_serializing_if = "is_default_span")]
    pub h: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_w: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_h: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_w: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_h: Option<i32>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub locked: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub no_move: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub no_resize: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub auto_position: bool,
    /// Host-attached payload (widget kind, settings reference, ...).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extensions: BTreeMap<String, String>,
}

fn default_span() -> i32 {
    1
}

fn is_default_span(v: &i32) -> bool {
    *v == 1
}

fn is_false(v: &bool) -> bool {
    !*v
}

impl NodeSnapshot {
    /// Snapshot with an id and explicit placement.
    #[must_use]
    pub fn new_at(id: impl Into<String>, x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            id: Some(id.into()),
            x: Some(x),
            y: Some(y),
            w,
            h,
            ..Self::default()
        }
    }

    /// Capture a node's persisted state. Transient interaction state never
    /// appears here — it lives in a separate structure entirely.
    #[must_use]
    pub fn from_state(state: &NodeState) -> Self {
        let auto = state.auto_position();
        Self {
            id: state.widget_id.clone(),
            x: if auto { None } else { Some(state.x) },
            y: if auto { None } else { Some(state.y) },
            w: state.w,
            h: state.h,
            min_w: state.constraints.min_w,
            min_h: state.constraints.min_h,
            max_w: state.constraints.max_w,
            max_h: state.constraints.max_h,
            locked: state.locked(),
            no_move: state.no_move(),
            no_resize: state.no_resize(),
            auto_position: auto,
            extensions: BTreeMap::new(),
        }
    }

    /// The constraint set this snapshot carries.
    #[must_use]
    pub fn constraints(&self) -> SizeConstraints {
        SizeConstraints {
            min_w: self.min_w,
            min_h: self.min_h,
            max_w: self.max_w,
            max_h: self.max_h,
        }
    }

    /// The flag set this snapshot carries. Missing coordinates imply
    /// auto-position.
    #[must_use]
    pub fn flags(&self) -> NodeFlags {
        let mut flags = NodeFlags::empty();
        if self.locked {
            flags.insert(NodeFlags::LOCKED);
        }
        if self.no_move {
            flags.insert(NodeFlags::NO_MOVE);
        }
        if self.no_resize {
            flags.insert(NodeFlags::NO_RESIZE);
        }
        if self.auto_position || self.x.is_none() || self.y.is_none() {
            flags.insert(NodeFlags::AUTO_POSITION);
        }
        flags
    }

    /// Rebuild a placement intent from this snapshot.
    #[must_use]
    pub fn to_spec(&self) -> NodeSpec {
        NodeSpec {
            widget_id: self.id.clone(),
            x: self.x,
            y: self.y,
            w: Some(self.w),
            h: Some(self.h),
            constraints: self.constraints(),
            flags: self.flags(),
        }
    }

    /// Whether two snapshots describe the same placement. Spans default to
    /// one cell for the comparison when absent from either side.
    #[must_use]
    pub fn same_position(&self, other: &NodeSnapshot) -> bool {
        self.x == other.x
            && self.y == other.y
            && self.w.max(1) == other.w.max(1)
            && self.h.max(1) == other.h.max(1)
    }
}

/// Persisted board state: settings plus the node list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    /// Schema version for migration detection.
    #[serde(default = "default_board_version")]
    pub schema_version: u16,
    pub column: i32,
    #[serde(default, skip_serializing_if = "is_false")]
    pub float: bool,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub max_row: i32,
    pub nodes: Vec<NodeSnapshot>,
    /// Forward-compatible extension bag.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extensions: BTreeMap<String, String>,
}

fn default_board_version() -> u16 {
    BOARD_SCHEMA_VERSION
}

fn is_zero(v: &i32) -> bool {
    *v == 0
}

impl BoardSnapshot {
    /// A v1 snapshot with the given settings.
    #[must_use]
    pub fn new(column: i32, nodes: Vec<NodeSnapshot>) -> Self {
        Self {
            schema_version: BOARD_SCHEMA_VERSION,
            column,
            float: false,
            max_row: 0,
            nodes,
            extensions: BTreeMap::new(),
        }
    }

    /// Validate schema version and structural basics.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.schema_version != BOARD_SCHEMA_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.schema_version,
                expected: BOARD_SCHEMA_VERSION,
            });
        }
        if self.column < 1 {
            return Err(SnapshotError::InvalidColumn {
                column: self.column,
            });
        }
        Ok(())
    }
}

/// Errors from snapshot validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotError {
    /// The snapshot was written by an incompatible schema.
    UnsupportedVersion { found: u16, expected: u16 },
    /// Column count below one.
    InvalidColumn { column: i32 },
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedVersion { found, expected } => {
                write!(
                    f,
                    "unsupported board schema version {found} (expected {expected})"
                )
            }
            Self::InvalidColumn { column } => {
                write!(f, "board snapshot has invalid column count {column}")
            }
        }
    }
}

impl std::error::Error for SnapshotError {}
