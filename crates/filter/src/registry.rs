//! Filter registry and acceptance evaluation.

use crate::filter::RowFilter;
use crate::group::FilterGroupResolver;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use gridflow_core::Record;
use hashbrown::HashMap;

/// An installed filter: the identifier used for group resolution plus the
/// filter itself. Slots are addressed by a stringified slot key (typically
/// the column key), one filter per slot.
pub struct FilterSlot<V> {
    id: String,
    filter: Box<dyn RowFilter<V>>,
}

impl<V> FilterSlot<V> {
    /// The filter identifier, resolvable to a group name.
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The installed filter.
    #[inline]
    pub fn filter(&self) -> &dyn RowFilter<V> {
        self.filter.as_ref()
    }
}

/// Evaluates the reinforcement/group predicate over a set of filters:
/// all-inactive auto-accepts, otherwise OR over the active members.
pub fn group_matches<V>(record: &Record<V>, filters: &[&dyn RowFilter<V>]) -> bool {
    if filters.iter().all(|f| f.filter_values().is_empty()) {
        // No values selected anywhere in the group: match everything.
        return true;
    }
    filters
        .iter()
        .any(|f| !f.filter_values().is_empty() && f.test(record))
}

/// Key a filter is bucketed under during grouped evaluation. Filters whose
/// identifier resolves to no group form singleton buckets, preserving flat
/// AND semantics for them.
#[derive(Hash, PartialEq, Eq)]
enum GroupKey<'a> {
    Named(&'a str),
    Solo(&'a str),
}

/// The set of installed filters, addressed by slot key.
pub struct FilterRegistry<V> {
    slots: HashMap<String, FilterSlot<V>>,
}

impl<V> Default for FilterRegistry<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> FilterRegistry<V> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }

    /// Installs or replaces the filter under `slot_key`. Returns true if the
    /// slot was previously occupied.
    pub fn set(
        &mut self,
        slot_key: impl Into<String>,
        filter_id: impl Into<String>,
        filter: Box<dyn RowFilter<V>>,
    ) -> bool {
        self.slots
            .insert(
                slot_key.into(),
                FilterSlot {
                    id: filter_id.into(),
                    filter,
                },
            )
            .is_some()
    }

    /// Removes the filter under `slot_key`. Returns true if one was present.
    pub fn remove(&mut self, slot_key: &str) -> bool {
        self.slots.remove(slot_key).is_some()
    }

    /// Removes all filters.
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Returns the slot installed under `slot_key`.
    pub fn get(&self, slot_key: &str) -> Option<&FilterSlot<V>> {
        self.slots.get(slot_key)
    }

    /// Finds an installed filter by its identifier.
    pub fn find_by_id(&self, filter_id: &str) -> Option<&dyn RowFilter<V>> {
        self.slots
            .values()
            .find(|slot| slot.id == filter_id)
            .map(|slot| slot.filter.as_ref())
    }

    /// Number of installed filters.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if no filter is installed.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterates the installed slots (order unspecified).
    pub fn slots(&self) -> impl Iterator<Item = &FilterSlot<V>> {
        self.slots.values()
    }

    /// Decides whether a record passes the active filter set.
    ///
    /// With no resolver, all filters must accept (flat AND). With a
    /// resolver, each group must accept independently: inactive groups
    /// auto-accept, active groups OR their active members, and a single
    /// rejecting group rejects the record outright.
    pub fn accept(
        &self,
        record: &Record<V>,
        resolver: Option<&dyn FilterGroupResolver>,
    ) -> bool {
        match resolver {
            Some(resolver) => self.accept_grouped(record, resolver),
            None => self.slots.values().all(|slot| slot.filter.test(record)),
        }
    }

    fn accept_grouped(&self, record: &Record<V>, resolver: &dyn FilterGroupResolver) -> bool {
        let mut by_group: HashMap<GroupKey<'_>, Vec<&dyn RowFilter<V>>> = HashMap::new();
        for (slot_key, slot) in self.slots.iter() {
            let bucket = match resolver.group_name(&slot.id) {
                Some(name) => GroupKey::Named(name),
                None => GroupKey::Solo(slot_key.as_str()),
            };
            by_group.entry(bucket).or_default().push(slot.filter.as_ref());
        }
        // The group verdict is evaluated per group; one rejecting group
        // rejects the record.
        by_group
            .values()
            .all(|group| group_matches(record, group))
    }

    /// Collects the registered members of the group `filter_id` belongs to.
    /// Falls back to the filter itself when the identifier resolves to no
    /// group. Used by reinforcement, which re-tests rows against the changed
    /// group only.
    pub fn group_members(
        &self,
        resolver: &dyn FilterGroupResolver,
        filter_id: &str,
    ) -> Vec<&dyn RowFilter<V>> {
        match resolver.group_name(filter_id) {
            Some(group) => resolver
                .filter_ids(group)
                .into_iter()
                .filter_map(|id| self.find_by_id(id))
                .collect(),
            None => self.find_by_id(filter_id).into_iter().collect(),
        }
    }
}
