//! Layered option resolution.
//!
//! Options can be set per node, per grid, or as a library default. The
//! resolution order is fixed: node override, then grid default, then the
//! global default. Keeping this a pure function means the precedence rule
//! is tested once here instead of being re-encoded as fallback chains at
//! every call site.

/// Resolve a layered option: node override → grid default → global default.
#[inline]
#[must_use]
pub fn resolve<T>(node: Option<T>, grid: Option<T>, default: T) -> T {
    node.or(grid).unwrap_or(default)
}

/// Resolve a layered option with no global default.
#[inline]
#[must_use]
pub fn resolve_opt<T>(node: Option<T>, grid: Option<T>) -> Option<T> {
    node.or(grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_override_wins() {
        assert_eq!(resolve(Some(1), Some(2), 3), 1);
    }

    #[test]
    fn grid_default_wins_over_global() {
        assert_eq!(resolve(None, Some(2), 3), 2);
    }

    #[test]
    fn global_default_is_last() {
        assert_eq!(resolve::<i32>(None, None, 3), 3);
    }

    #[test]
    fn node_override_wins_even_when_falsy() {
        // A deliberate override to 0/false must not fall through.
        assert_eq!(resolve(Some(0), Some(2), 3), 0);
        assert_eq!(resolve(Some(false), Some(true), true), false);
    }

    #[test]
    fn opt_resolution() {
        assert_eq!(resolve_opt(Some(1), Some(2)), Some(1));
        assert_eq!(resolve_opt::<i32>(None, Some(2)), Some(2));
        assert_eq!(resolve_opt::<i32>(None, None), None);
    }
}
