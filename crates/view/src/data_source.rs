//! The cache data source: live-view maintenance over a keyed record store.
//!
//! `CacheDataSource` owns the record store, both sorted projections, and the
//! selection set, and orchestrates every mutation: evaluate acceptance,
//! patch the projections incrementally, and report the minimal contiguous
//! index range a consumer must re-render. A full rescan happens only when a
//! filter change cannot be reinforced incrementally.
//!
//! All operations are synchronous, single-writer, in-memory. Embedders that
//! share an instance across threads must serialize access themselves.

use crate::projection::{insert_row, remove_row, sort_rows, Comparator};
use crate::window::LiveDataView;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt;
use core::hash::Hash;
use gridflow_core::{Error, Interval, Record, Result, RowSeq};
use gridflow_filter::{group_matches, FilterGroupResolver, FilterRegistry, RowFilter};
use hashbrown::{HashMap, HashSet};

/// External cache of per-value render state. The data source invalidates
/// the entry for a record's old value whenever that value is about to be
/// replaced; everything else is the embedder's business.
pub trait RenderingHelperCache<V> {
    /// Drops any precomputed render state for the given value.
    fn invalidate(&mut self, value: &V);
}

/// An incrementally maintained, filtered, sorted projection over a keyed
/// in-memory record store, plus the sub-projection of selected rows.
///
/// Invariants, after every public operation:
/// - the primary projection holds exactly the accepted records, ordered by
///   the installed comparator with insertion-sequence tie-break;
/// - the selection projection holds exactly the accepted records whose key
///   is selected;
/// - a record's acceptance flag mirrors its primary-projection membership.
pub struct CacheDataSource<K, V> {
    cache: HashMap<K, Record<V>>,
    live_data: Vec<K>,
    live_selected: Vec<K>,
    selected_keys: HashSet<K>,
    last_requested: Vec<K>,
    next_seq: RowSeq,
    key_fn: Box<dyn Fn(&V) -> K>,
    comparator: Comparator<V>,
    filters: FilterRegistry<V>,
    group_resolver: Option<Box<dyn FilterGroupResolver>>,
    rendering_cache: Option<Box<dyn RenderingHelperCache<V>>>,
}

impl<K, V> CacheDataSource<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty data source. Until `sort` installs a comparator,
    /// rows are ordered by insertion sequence.
    pub fn new(key_fn: impl Fn(&V) -> K + 'static) -> Self {
        Self {
            cache: HashMap::new(),
            live_data: Vec::new(),
            live_selected: Vec::new(),
            selected_keys: HashSet::new(),
            last_requested: Vec::new(),
            next_seq: 0,
            key_fn: Box::new(key_fn),
            comparator: Box::new(|_, _| Ordering::Equal),
            filters: FilterRegistry::new(),
            group_resolver: None,
            rendering_cache: None,
        }
    }

    /// Installs the filter-group resolver. With a resolver present, filters
    /// combine as OR within a group and AND across groups; without one, as
    /// a flat AND.
    pub fn set_group_resolver(&mut self, resolver: Box<dyn FilterGroupResolver>) {
        self.group_resolver = Some(resolver);
    }

    /// Installs the external rendering-helper cache.
    pub fn set_rendering_cache(&mut self, cache: Box<dyn RenderingHelperCache<V>>) {
        self.rendering_cache = Some(cache);
    }

    // -----------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------

    /// Inserts or updates the record keyed by the value.
    ///
    /// Returns the invalidation interval into the primary projection, or
    /// `None` when nothing visible changed: the value equals the stored one,
    /// or the record is rejected both before and after.
    pub fn set_data(&mut self, v: V) -> Option<Interval>
    where
        V: PartialEq,
    {
        let k = (self.key_fn)(&v);
        if let Some(rec) = self.cache.get(&k) {
            if *rec.data() == v {
                return None;
            }
        }
        if self.cache.contains_key(&k) {
            self.mutate_record(&k, move |data| *data = v)
        } else {
            self.insert_new(k, v)
        }
    }

    /// Updates the record under `k` in place. Best-effort: returns `None`
    /// when the key is unknown. The updater must not change the value's
    /// key.
    pub fn update_data(&mut self, k: &K, updater: impl FnOnce(&mut V)) -> Option<Interval> {
        if !self.cache.contains_key(k) {
            return None;
        }
        self.mutate_record(k, updater)
    }

    /// Removes the record under `k` from the store, the selection set, and
    /// both projections, returning its value.
    ///
    /// No interval is reported: the caller must treat the removal as a
    /// full-row deletion it handles itself.
    pub fn remove_data(&mut self, k: &K) -> Result<V>
    where
        K: fmt::Debug,
    {
        if !self.cache.contains_key(k) {
            return Err(Error::row_not_found(k));
        }
        if self.cache[k].is_accepted() {
            remove_row(&mut self.live_data, &self.cache, self.comparator.as_ref(), k);
            if self.selected_keys.contains(k) {
                remove_row(
                    &mut self.live_selected,
                    &self.cache,
                    self.comparator.as_ref(),
                    k,
                );
            }
        }
        self.selected_keys.remove(k);
        match self.cache.remove(k) {
            Some(rec) => Ok(rec.into_data()),
            None => Err(Error::row_not_found(k)),
        }
    }

    fn insert_new(&mut self, k: K, v: V) -> Option<Interval> {
        let seq = self.next_seq;
        self.next_seq += 1;
        let mut rec = Record::new(seq, v);
        let accepted = self
            .filters
            .accept(&rec, self.group_resolver.as_deref());
        rec.set_accepted(accepted);
        self.cache.insert(k.clone(), rec);
        if !accepted {
            return None;
        }
        let idx = insert_row(&mut self.live_data, &self.cache, self.comparator.as_ref(), &k);
        Some(Interval::new(idx, self.live_data.len()))
    }

    /// Shared update path for `set_data` and `update_data`. The record must
    /// exist.
    fn mutate_record(&mut self, k: &K, mutate: impl FnOnce(&mut V)) -> Option<Interval> {
        let was_accepted = self.cache.get(k)?.is_accepted();
        if was_accepted {
            // Pull the row out of both projections before the value (and
            // with it the sort key) changes.
            let old_len = self.live_data.len();
            let old_idx = remove_row(&mut self.live_data, &self.cache, self.comparator.as_ref(), k)?;
            let selected = self.selected_keys.contains(k);
            if selected {
                remove_row(
                    &mut self.live_selected,
                    &self.cache,
                    self.comparator.as_ref(),
                    k,
                );
            }
            self.invalidate_render(k);
            if let Some(rec) = self.cache.get_mut(k) {
                mutate(rec.data_mut());
            }
            let now_accepted = self.evaluate(k);
            if let Some(rec) = self.cache.get_mut(k) {
                rec.set_accepted(now_accepted);
            }
            if now_accepted {
                let new_idx =
                    insert_row(&mut self.live_data, &self.cache, self.comparator.as_ref(), k);
                if selected {
                    insert_row(
                        &mut self.live_selected,
                        &self.cache,
                        self.comparator.as_ref(),
                        k,
                    );
                }
                // Every row strictly between the old and new slot shifted
                // by one.
                Some(Interval::covering(old_idx, new_idx))
            } else {
                // Everything from the vacated slot to the old tail moved
                // down.
                Some(Interval::new(old_idx, old_len))
            }
        } else {
            self.invalidate_render(k);
            if let Some(rec) = self.cache.get_mut(k) {
                mutate(rec.data_mut());
            }
            let now_accepted = self.evaluate(k);
            if let Some(rec) = self.cache.get_mut(k) {
                rec.set_accepted(now_accepted);
            }
            if !now_accepted {
                return None;
            }
            let idx = insert_row(&mut self.live_data, &self.cache, self.comparator.as_ref(), k);
            if self.selected_keys.contains(k) {
                insert_row(
                    &mut self.live_selected,
                    &self.cache,
                    self.comparator.as_ref(),
                    k,
                );
            }
            Some(Interval::new(idx, self.live_data.len()))
        }
    }

    fn evaluate(&self, k: &K) -> bool {
        self.filters
            .accept(&self.cache[k], self.group_resolver.as_deref())
    }

    fn invalidate_render(&mut self, k: &K) {
        if let Some(render_cache) = self.rendering_cache.as_mut() {
            if let Some(rec) = self.cache.get(k) {
                render_cache.invalidate(rec.data());
            }
        }
    }

    // -----------------------------------------------------------------
    // Filters
    // -----------------------------------------------------------------

    /// Installs or replaces the filter under `slot_key`.
    ///
    /// When the slot was empty, or the caller declares the change
    /// `reinforcing` (guaranteed to only narrow the accepted set — a
    /// contract this engine trusts without re-validating), the projections
    /// are patched incrementally: the live rows are re-tested when filters
    /// combine flat, the entire store when a group resolver is active,
    /// because a change to one filter can flip rows currently rejected by a
    /// sibling dimension. Any other change triggers `reset_live_data`.
    pub fn set_filter(
        &mut self,
        slot_key: impl Into<String>,
        filter_id: impl Into<String>,
        reinforcing: bool,
        filter: Box<dyn RowFilter<V>>,
    ) -> Option<Interval> {
        let slot_key = slot_key.into();
        let filter_id = filter_id.into();
        let replaced = self.filters.set(slot_key.clone(), filter_id.clone(), filter);
        if !replaced || reinforcing {
            if self.group_resolver.is_some() {
                self.reinforce_grouped(&filter_id)
            } else {
                self.reinforce_ungrouped(&slot_key)
            }
        } else {
            self.rebuild_interval()
        }
    }

    /// Drops the filter under `slot_key`. A dropped filter can only broaden
    /// the accepted set, so the live view is rebuilt. Returns `None` when
    /// the slot was empty.
    pub fn clear_filter(&mut self, slot_key: &str) -> Option<Interval> {
        if !self.filters.remove(slot_key) {
            return None;
        }
        self.rebuild_interval()
    }

    /// Drops every filter and rebuilds the live view. Returns `None` when
    /// no filter was installed.
    pub fn clear_filters(&mut self) -> Option<Interval> {
        if self.filters.is_empty() {
            return None;
        }
        self.filters.clear();
        self.rebuild_interval()
    }

    /// Re-tests the live rows against the changed slot's filter, dropping
    /// rows it now rejects.
    fn reinforce_ungrouped(&mut self, slot_key: &str) -> Option<Interval> {
        let old_len = self.live_data.len();
        let slot = self.filters.get(slot_key)?;
        let group = [slot.filter()];
        let from = reinforce_rows(&mut self.live_data, &mut self.cache, &group);
        reinforce_rows(&mut self.live_selected, &mut self.cache, &group);
        from.map(|from| Interval::new(from, old_len))
    }

    /// Re-tests every stored record against the changed filter's group.
    /// Rows the group now rejects leave both projections; rows it accepts
    /// are never promoted here, so the pass can only narrow the live view.
    fn reinforce_grouped(&mut self, filter_id: &str) -> Option<Interval> {
        let resolver = self.group_resolver.as_deref()?;
        let group = self.filters.group_members(resolver, filter_id);
        let old_len = self.live_data.len();
        let keys: Vec<K> = self.cache.keys().cloned().collect();
        let mut from: Option<usize> = None;
        for k in keys {
            if group_matches(&self.cache[&k], &group) {
                continue;
            }
            if self.cache[&k].is_accepted() {
                if let Some(idx) =
                    remove_row(&mut self.live_data, &self.cache, self.comparator.as_ref(), &k)
                {
                    from = Some(from.map_or(idx, |f| f.min(idx)));
                }
                if self.selected_keys.contains(&k) {
                    remove_row(
                        &mut self.live_selected,
                        &self.cache,
                        self.comparator.as_ref(),
                        &k,
                    );
                }
                if let Some(rec) = self.cache.get_mut(&k) {
                    rec.set_accepted(false);
                }
            }
        }
        from.map(|from| Interval::new(from, old_len))
    }

    fn rebuild_interval(&mut self) -> Option<Interval> {
        let old_len = self.live_data.len();
        self.reset_live_data();
        let to = old_len.max(self.live_data.len());
        if to == 0 {
            None
        } else {
            Some(Interval::new(0, to))
        }
    }

    /// Rebuilds both projections from scratch: every stored record is
    /// re-evaluated and accepted (and selected-and-accepted) records are
    /// re-inserted in order. Used when a filter change cannot be safely
    /// reinforced.
    pub fn reset_live_data(&mut self) {
        self.live_data.clear();
        self.live_selected.clear();
        let keys: Vec<K> = self.cache.keys().cloned().collect();
        for k in keys {
            let accepted = self.evaluate(&k);
            if let Some(rec) = self.cache.get_mut(&k) {
                rec.set_accepted(accepted);
            }
            if !accepted {
                continue;
            }
            insert_row(&mut self.live_data, &self.cache, self.comparator.as_ref(), &k);
            if self.selected_keys.contains(&k) {
                insert_row(
                    &mut self.live_selected,
                    &self.cache,
                    self.comparator.as_ref(),
                    &k,
                );
            }
        }
    }

    // -----------------------------------------------------------------
    // Sorting
    // -----------------------------------------------------------------

    /// Installs a new comparator and re-sorts the primary projection.
    ///
    /// The selection projection is deliberately left in its previous order
    /// (matching the long-standing data-grid behavior this engine
    /// replicates); it reorders on the next selection change or
    /// `reset_live_data`. Callers that need a consistently ordered
    /// selection call `select_all_live_data` after sorting.
    pub fn sort(&mut self, comparator: impl Fn(&V, &V) -> Ordering + 'static) {
        self.comparator = Box::new(comparator);
        sort_rows(&mut self.live_data, &self.cache, self.comparator.as_ref());
    }

    // -----------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------

    /// Selects the record under `k`. No-op (`None`) when the key is
    /// unknown, already selected, or the record is currently filtered out;
    /// otherwise returns the single-position interval of the new selection
    /// row.
    pub fn select(&mut self, k: &K) -> Option<Interval> {
        let rec = self.cache.get(k)?;
        if !rec.is_accepted() || self.selected_keys.contains(k) {
            return None;
        }
        self.selected_keys.insert(k.clone());
        let i = insert_row(
            &mut self.live_selected,
            &self.cache,
            self.comparator.as_ref(),
            k,
        );
        Some(Interval::point(i))
    }

    /// Unselects the record under `k`. The key leaves the selection set
    /// even while the record is filtered out; a visible interval is only
    /// reported when a selection row actually disappeared.
    pub fn unselect(&mut self, k: &K) -> Option<Interval> {
        if !self.cache.contains_key(k) {
            return None;
        }
        if !self.selected_keys.remove(k) {
            return None;
        }
        if !self.cache[k].is_accepted() {
            return None;
        }
        let i = remove_row(
            &mut self.live_selected,
            &self.cache,
            self.comparator.as_ref(),
            k,
        )?;
        Some(Interval::point(i))
    }

    /// Selects everything currently visible: the selection set and the
    /// selection projection are rebuilt from the primary projection,
    /// dropping any previously selected but filtered-out keys.
    pub fn select_all_live_data(&mut self) {
        self.live_selected.clear();
        self.selected_keys.clear();
        self.live_selected.extend(self.live_data.iter().cloned());
        self.selected_keys.extend(self.live_data.iter().cloned());
    }

    /// Returns true if `k` is in the selection set (visible or not).
    pub fn is_selected(&self, k: &K) -> bool {
        self.selected_keys.contains(k)
    }

    /// Number of selected keys, including filtered-out ones.
    pub fn selected_count(&self) -> usize {
        self.selected_keys.len()
    }

    /// Number of rows in the selection projection.
    pub fn visible_selected_count(&self) -> usize {
        self.live_selected.len()
    }

    // -----------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------

    /// Copies the addressed slice of the live view into the last-requested
    /// buffer (replacing any prior contents) and returns it with the total
    /// live count. The size is clamped so the window never runs past the
    /// end.
    pub fn get_rows(&mut self, offset: usize, size: usize) -> LiveDataView<V>
    where
        V: Clone,
    {
        let start = offset.min(self.live_data.len());
        let end = offset.saturating_add(size).min(self.live_data.len());
        self.last_requested.clear();
        self.last_requested.extend(self.live_data[start..end].iter().cloned());
        let rows = self
            .last_requested
            .iter()
            .map(|k| self.cache[k].data().clone())
            .collect();
        LiveDataView::new(self.live_data.len(), rows)
    }

    /// A defensive snapshot of the full live view, in order.
    pub fn get_filtered_data(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.live_data
            .iter()
            .map(|k| self.cache[k].data().clone())
            .collect()
    }

    /// A defensive snapshot of the most recent `get_rows` window. Keys
    /// whose records were removed since that call are skipped.
    pub fn get_last_requested_data(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.last_requested
            .iter()
            .filter_map(|k| self.cache.get(k).map(|rec| rec.data().clone()))
            .collect()
    }

    /// A defensive snapshot of the selection projection, in order.
    pub fn get_selected_data(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.live_selected
            .iter()
            .map(|k| self.cache[k].data().clone())
            .collect()
    }

    /// Returns the value stored under `k`.
    pub fn get_data(&self, k: &K) -> Option<&V> {
        self.cache.get(k).map(Record::data)
    }

    /// Returns the record stored under `k`.
    pub fn get_record(&self, k: &K) -> Option<&Record<V>> {
        self.cache.get(k)
    }

    /// Number of rows in the live projection.
    pub fn row_count(&self) -> usize {
        self.live_data.len()
    }

    /// Number of records in the store, visible or not.
    pub fn store_count(&self) -> usize {
        self.cache.len()
    }

    /// Returns true if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Visits every stored record, in unspecified order.
    pub fn for_each(&self, mut action: impl FnMut(&K, &V)) {
        for (k, rec) in self.cache.iter() {
            action(k, rec.data());
        }
    }
}

/// Reinforcement pass over one projection: re-tests each row against the
/// changed filter group and drops rows the group no longer matches,
/// flagging them unaccepted. Returns the first removed index — rows below
/// it are untouched, rows from it onward may have shifted.
fn reinforce_rows<K, V>(
    rows: &mut Vec<K>,
    cache: &mut HashMap<K, Record<V>>,
    group: &[&dyn RowFilter<V>],
) -> Option<usize>
where
    K: Eq + Hash + Clone,
{
    let mut from = None;
    let mut i = 0;
    while i < rows.len() {
        if group_matches(&cache[&rows[i]], group) {
            i += 1;
            continue;
        }
        let k = rows.remove(i);
        if let Some(rec) = cache.get_mut(&k) {
            rec.set_accepted(false);
        }
        if from.is_none() {
            from = Some(i);
        }
    }
    from
}
