//! Windowed read results.

use alloc::vec::Vec;

/// An owned snapshot of one requested window of the live view, together
/// with the total number of live rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LiveDataView<V> {
    total: usize,
    rows: Vec<V>,
}

impl<V> LiveDataView<V> {
    /// Creates a view over the given rows.
    #[inline]
    pub fn new(total: usize, rows: Vec<V>) -> Self {
        Self { total, rows }
    }

    /// Total number of rows in the live projection, independent of the
    /// window size.
    #[inline]
    pub fn total(&self) -> usize {
        self.total
    }

    /// The rows of the requested window, in live order.
    #[inline]
    pub fn rows(&self) -> &[V] {
        &self.rows
    }

    /// Consumes the view and returns the window rows.
    #[inline]
    pub fn into_rows(self) -> Vec<V> {
        self.rows
    }

    /// Number of rows in the window.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the window is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
