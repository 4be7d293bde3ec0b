//! The filter capability.

use alloc::string::String;
use gridflow_core::Record;

/// A filter over records.
///
/// Concrete filter kinds are chosen by the embedding system (column value
/// sets, search boxes, range filters); this crate only depends on the two
/// capabilities below.
pub trait RowFilter<V> {
    /// Tests whether the record passes this filter.
    ///
    /// A filter with an empty value set is expected to accept everything;
    /// that behavior belongs to the filter itself, not to the registry.
    fn test(&self, record: &Record<V>) -> bool;

    /// The currently selected filter values. An empty slice marks the filter
    /// inactive, which the grouped OR logic treats as match-all.
    fn filter_values(&self) -> &[String];
}
