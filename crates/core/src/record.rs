//! Record wrapper for the live-view engine.
//!
//! A `Record` pairs a caller-owned value with the bookkeeping the view
//! maintainer needs: a stable insertion sequence and the acceptance flag
//! mirroring membership in the primary projection.

/// Insertion sequence of a record. Assigned once at creation, strictly
/// increasing per data source, never reused. Sole sort tie-break.
pub type RowSeq = u64;

/// A stored record: the current value plus projection bookkeeping.
///
/// The record store owns every `Record` exclusively; projections refer to
/// records by key. The wrapper identity is stable across `set_data` calls.
#[derive(Clone, Debug)]
pub struct Record<V> {
    seq: RowSeq,
    data: V,
    accepted: bool,
}

impl<V> Record<V> {
    /// Creates a record with the given sequence. Acceptance starts false and
    /// is set by the first evaluation.
    #[inline]
    pub fn new(seq: RowSeq, data: V) -> Self {
        Self {
            seq,
            data,
            accepted: false,
        }
    }

    /// Returns the insertion sequence.
    #[inline]
    pub fn seq(&self) -> RowSeq {
        self.seq
    }

    /// Returns the current value.
    #[inline]
    pub fn data(&self) -> &V {
        &self.data
    }

    /// Returns a mutable reference to the current value.
    #[inline]
    pub fn data_mut(&mut self) -> &mut V {
        &mut self.data
    }

    /// Replaces the value in place, keeping sequence and acceptance.
    #[inline]
    pub fn set_data(&mut self, data: V) {
        self.data = data;
    }

    /// Consumes the record and returns the value.
    #[inline]
    pub fn into_data(self) -> V {
        self.data
    }

    /// Returns true if the record currently passes the active filters.
    #[inline]
    pub fn is_accepted(&self) -> bool {
        self.accepted
    }

    /// Sets the acceptance flag. Must always mirror membership in the
    /// primary projection.
    #[inline]
    pub fn set_accepted(&mut self, accepted: bool) {
        self.accepted = accepted;
    }
}
