//! Invalidation intervals.
//!
//! Every mutating data-source operation reports either no visible change or
//! an `Interval`: the half-open index range `[from, to)` into a projection
//! whose rows may have shifted and must be re-rendered. Rows outside the
//! interval are guaranteed unchanged.

use core::fmt;

/// A half-open index range `[from, to)` into a projection.
///
/// The degenerate `from == to` form is the single-position convention used
/// by select/unselect: exactly the row at `from` changed selection state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Interval {
    /// First dirty index, inclusive.
    pub from: usize,
    /// End of the dirty range, exclusive.
    pub to: usize,
}

impl Interval {
    /// Creates an interval `[from, to)`.
    #[inline]
    pub fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }

    /// Creates the single-position interval `[i, i)` signalling that the row
    /// at `i` changed selection state.
    #[inline]
    pub fn point(i: usize) -> Self {
        Self { from: i, to: i }
    }

    /// The smallest interval covering both indices: a row moved from `a` to
    /// `b` (or vice versa) shifts every row strictly between them by one.
    #[inline]
    pub fn covering(a: usize, b: usize) -> Self {
        if a <= b {
            Self { from: a, to: b + 1 }
        } else {
            Self { from: b, to: a + 1 }
        }
    }

    /// Number of positions in the range.
    #[inline]
    pub fn len(&self) -> usize {
        self.to.saturating_sub(self.from)
    }

    /// Returns true for the single-position select/unselect form.
    #[inline]
    pub fn is_point(&self) -> bool {
        self.from == self.to
    }

    /// Returns true if `i` falls inside `[from, to)`.
    #[inline]
    pub fn contains(&self, i: usize) -> bool {
        self.from <= i && i < self.to
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.from, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_interval_covering_orders_endpoints() {
        assert_eq!(Interval::covering(0, 2), Interval::new(0, 3));
        assert_eq!(Interval::covering(2, 0), Interval::new(0, 3));
        assert_eq!(Interval::covering(4, 4), Interval::new(4, 5));
    }

    #[test]
    fn test_interval_point() {
        let p = Interval::point(3);
        assert!(p.is_point());
        assert_eq!(p.len(), 0);
        assert!(!p.contains(3));
    }

    #[test]
    fn test_interval_contains() {
        let iv = Interval::new(2, 5);
        assert!(!iv.contains(1));
        assert!(iv.contains(2));
        assert!(iv.contains(4));
        assert!(!iv.contains(5));
    }

    #[test]
    fn test_interval_display() {
        assert_eq!(Interval::new(1, 4).to_string(), "[1, 4)");
    }
}
