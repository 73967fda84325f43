//! Selection type shared by the session, the planner and the mapper.

/// A selection in display coordinates (char offsets). `start == end` is a caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Selection {
    /// Selection start offset
    pub start: usize,
    /// Selection end offset
    pub end: usize,
}

impl Selection {
    /// Create a selection; the endpoints are stored in ascending order.
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
        }
    }

    /// A caret at `offset`.
    pub fn caret(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Returns `true` for a caret.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Number of selected chars. Zero for a literal built with `start > end`.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Clamp both ends to `max`.
    pub fn clamp(self, max: usize) -> Self {
        Self::new(self.start.min(max), self.end.min(max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_orders_endpoints() {
        let sel = Selection::new(7, 3);
        assert_eq!(sel, Selection { start: 3, end: 7 });
        assert_eq!(sel.len(), 4);
        assert!(!sel.is_empty());
        assert!(Selection::caret(2).is_empty());
        assert_eq!(Selection::new(3, 9).clamp(5), Selection::new(3, 5));
    }

    #[test]
    fn test_len_of_reversed_literal_does_not_underflow() {
        let sel = Selection { start: 5, end: 2 };
        assert_eq!(sel.len(), 0);
    }
}
