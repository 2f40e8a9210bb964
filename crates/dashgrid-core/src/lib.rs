#![forbid(unsafe_code)]

//! Core: geometry, identity, and configuration primitives for dashgrid.
//!
//! # Role in dashgrid
//! `dashgrid-core` is the stateless foundation. It owns the cell-space and
//! pixel-space rectangle types, node identity allocation, size-string
//! parsing, and the layered option resolver that the layout engine builds
//! on.
//!
//! # Primary responsibilities
//! - **Geometry**: [`CellRect`] / [`PxRect`] intersection, touch, and
//!   ordering helpers used by collision detection and packing.
//! - **Identity**: [`NodeId`] and the per-engine [`IdAllocator`].
//! - **Size parsing**: [`Length`] with fail-fast unit validation.
//! - **Configuration**: pure layered resolution of per-node, per-grid, and
//!   global defaults.
//!
//! # How it fits in the system
//! The layout engine (`dashgrid-layout`) consumes these primitives and owns
//! all mutable placement state. Nothing in this crate holds state beyond a
//! value being built.

pub mod config;
pub mod geometry;
pub mod id;
pub mod size;

pub use geometry::{CellRect, Margins, PxRect, SortOrder, row_major_key};
pub use id::{IdAllocator, IdError, NodeId};
pub use size::{Length, SizeParseError, SizeUnit};
