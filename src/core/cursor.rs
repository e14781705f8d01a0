//! Cursor arithmetic
//!
//! Every function here is pure: it takes the current cursor, the registry
//! size and the configured bounds, and returns a cursor that satisfies
//!
//! * `field index <= InfoField::MAX_INDEX`
//! * `offset <= min(max(len - 1, 0), max_rows)`

use crate::core::state::InfoField;

/// Scroll offset, displayed field and inspect flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewCursor {
    pub offset: usize,
    pub field: InfoField,
    pub inspect: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Left,
    Right,
    Up,
    Down,
}

/// Configured bounds the cursor is held to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorBounds {
    pub max_rows: usize,
}

impl CursorBounds {
    /// Highest offset reachable with `len` registry entries
    pub fn offset_limit(self, len: usize) -> usize {
        len.saturating_sub(1).min(self.max_rows)
    }
}

impl ViewCursor {
    pub fn navigate(self, nav: Navigation, len: usize, bounds: CursorBounds) -> Self {
        let field = self.field.index();
        let moved = match nav {
            Navigation::Left => Self {
                field: InfoField::from_index(field.saturating_sub(1)),
                ..self
            },
            Navigation::Right => Self {
                field: InfoField::from_index((field + 1).min(InfoField::MAX_INDEX)),
                ..self
            },
            Navigation::Up => Self {
                offset: self.offset.saturating_sub(1),
                ..self
            },
            Navigation::Down => Self {
                offset: (self.offset + 1).min(bounds.offset_limit(len)),
                ..self
            },
        };
        moved.clamp(len, bounds)
    }

    pub fn toggle_inspect(self) -> Self {
        Self {
            inspect: !self.inspect,
            ..self
        }
    }

    /// Pull the offset back inside the registry after it changed size
    pub fn clamp(self, len: usize, bounds: CursorBounds) -> Self {
        Self {
            offset: self.offset.min(bounds.offset_limit(len)),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BOUNDS: CursorBounds = CursorBounds { max_rows: 100 };

    fn invariants_hold(cursor: ViewCursor, len: usize, bounds: CursorBounds) -> bool {
        cursor.field.index() <= InfoField::MAX_INDEX
            && cursor.offset <= len.saturating_sub(1).min(bounds.max_rows)
    }

    #[test]
    fn down_clamps_at_last_row() {
        let cursor = ViewCursor::default()
            .navigate(Navigation::Down, 2, BOUNDS)
            .navigate(Navigation::Down, 2, BOUNDS);
        assert_eq!(cursor.offset, 1);
    }

    #[test]
    fn down_respects_max_rows() {
        let bounds = CursorBounds { max_rows: 3 };
        let mut cursor = ViewCursor::default();
        for _ in 0..10 {
            cursor = cursor.navigate(Navigation::Down, 50, bounds);
        }
        assert_eq!(cursor.offset, 3);
    }

    #[test]
    fn down_on_empty_registry_stays_at_zero() {
        let cursor = ViewCursor::default().navigate(Navigation::Down, 0, BOUNDS);
        assert_eq!(cursor.offset, 0);
    }

    #[test]
    fn up_saturates_at_zero() {
        let cursor = ViewCursor::default().navigate(Navigation::Up, 5, BOUNDS);
        assert_eq!(cursor.offset, 0);

        let cursor = ViewCursor {
            offset: 3,
            ..Default::default()
        }
        .navigate(Navigation::Up, 5, BOUNDS);
        assert_eq!(cursor.offset, 2);
    }

    #[test]
    fn field_edges_are_no_ops() {
        let start = ViewCursor::default();
        assert_eq!(start.navigate(Navigation::Left, 0, BOUNDS), start);

        let last = ViewCursor {
            field: InfoField::from_index(InfoField::MAX_INDEX),
            ..Default::default()
        };
        assert_eq!(last.navigate(Navigation::Right, 0, BOUNDS), last);

        let next = start.navigate(Navigation::Right, 0, BOUNDS);
        assert_eq!(next.field, InfoField::Status);
        assert_eq!(next.navigate(Navigation::Left, 0, BOUNDS).field, InfoField::Image);
    }

    #[test]
    fn clamp_after_shrink() {
        let cursor = ViewCursor {
            offset: 4,
            ..Default::default()
        };
        assert_eq!(cursor.clamp(3, BOUNDS).offset, 2);
        assert_eq!(cursor.clamp(0, BOUNDS).offset, 0);
        assert_eq!(cursor.clamp(10, BOUNDS).offset, 4);
    }

    #[test]
    fn toggle_inspect_twice_is_identity() {
        let cursor = ViewCursor {
            offset: 2,
            field: InfoField::Ports,
            inspect: false,
        };
        assert!(cursor.toggle_inspect().inspect);
        assert_eq!(cursor.toggle_inspect().toggle_inspect(), cursor);
    }

    #[test]
    fn random_walk_keeps_invariants() {
        let bounds = CursorBounds { max_rows: 4 };
        let moves = [
            Navigation::Down,
            Navigation::Right,
            Navigation::Down,
            Navigation::Left,
            Navigation::Up,
            Navigation::Right,
        ];
        let mut cursor = ViewCursor::default();
        // Deterministic pseudo-random sizes and moves
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        for _ in 0..500 {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            let len = (seed % 9) as usize;
            let nav = moves[(seed >> 8) as usize % moves.len()];
            cursor = cursor.clamp(len, bounds).navigate(nav, len, bounds);
            assert!(invariants_hold(cursor, len, bounds), "{cursor:?} with len {len}");
        }
    }
}
