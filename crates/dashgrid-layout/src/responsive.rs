//! Breakpoint table for responsive column counts.
//!
//! The host consults a [`Breakpoints`] table on every container resize to
//! decide when to migrate the column count. Entries are `{max_width,
//! columns}`: a container at or under `max_width` pixels gets that entry's
//! columns; wider than every entry falls back to the default count.
//!
//! # Invariants
//!
//! 1. Entries are strictly ascending by `max_width` (validated at
//!    construction, not trusted at resolve time).
//! 2. Every entry's column count is >= 1, as is the default.
//! 3. `resolve()` is total: any finite width maps to exactly one count.

use std::fmt;

/// One tier: containers at or under `max_width` pixels use `columns`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnBreakpoint {
    pub max_width: f64,
    pub columns: i32,
}

/// Validated, ordered breakpoint table.
#[derive(Debug, Clone, PartialEq)]
pub struct Breakpoints {
    entries: Vec<ColumnBreakpoint>,
    default_columns: i32,
}

impl Breakpoints {
    /// Build a table, validating ordering and column counts.
    pub fn new(
        entries: Vec<ColumnBreakpoint>,
        default_columns: i32,
    ) -> Result<Self, BreakpointError> {
        if entries.is_empty() {
            return Err(BreakpointError::Empty);
        }
        if default_columns < 1 {
            return Err(BreakpointError::NonPositiveColumns {
                index: None,
                columns: default_columns,
            });
        }
        for (index, entry) in entries.iter().enumerate() {
            if entry.columns < 1 {
                return Err(BreakpointError::NonPositiveColumns {
                    index: Some(index),
                    columns: entry.columns,
                });
            }
            if !entry.max_width.is_finite() || entry.max_width <= 0.0 {
                return Err(BreakpointError::InvalidWidth {
                    index,
                    max_width: entry.max_width,
                });
            }
            if index > 0 && entries[index - 1].max_width >= entry.max_width {
                return Err(BreakpointError::NotAscending { index });
            }
        }
        Ok(Self {
            entries,
            default_columns,
        })
    }

    /// The column count for a container width.
    #[must_use]
    pub fn resolve(&self, width: f64) -> i32 {
        self.entries
            .iter()
            .find(|entry| width <= entry.max_width)
            .map_or(self.default_columns, |entry| entry.columns)
    }

    /// The validated tiers, ascending.
    #[must_use]
    pub fn entries(&self) -> &[ColumnBreakpoint] {
        &self.entries
    }

    /// The count used above every tier.
    #[must_use]
    pub fn default_columns(&self) -> i32 {
        self.default_columns
    }
}

/// Errors from breakpoint table construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BreakpointError {
    /// No tiers given.
    Empty,
    /// A tier (or the default, `index: None`) has fewer than one column.
    NonPositiveColumns { index: Option<usize>, columns: i32 },
    /// A tier's width threshold is non-positive or not finite.
    InvalidWidth { index: usize, max_width: f64 },
    /// Tiers are not strictly ascending by width.
    NotAscending { index: usize },
}

impl fmt::Display for BreakpointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "breakpoint table is empty"),
            Self::NonPositiveColumns {
                index: Some(index),
                columns,
            } => write!(f, "breakpoint {index} has invalid column count {columns}"),
            Self::NonPositiveColumns {
                index: None,
                columns,
            } => write!(f, "default column count {columns} is invalid"),
            Self::InvalidWidth { index, max_width } => {
                write!(f, "breakpoint {index} has invalid width {max_width}")
            }
            Self::NotAscending { index } => {
                write!(f, "breakpoint {index} is not wider than its predecessor")
            }
        }
    }
}

impl std::error::Error for BreakpointError {}
