//! Sorted projection maintenance.
//!
//! Projections are plain key vectors ordered by the installed comparator
//! with the insertion sequence as tie-break. The helpers here take the
//! projection, the owning record store, and the comparator as explicit
//! borrows; nothing holds a shared reference into the store across calls.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::hash::Hash;
use gridflow_core::Record;
use hashbrown::HashMap;

/// The externally supplied row comparator. Ties are always broken by the
/// record sequence, making the projection order total.
pub type Comparator<V> = Box<dyn Fn(&V, &V) -> Ordering>;

#[inline]
fn order<K, V>(
    store: &HashMap<K, Record<V>>,
    cmp: &dyn Fn(&V, &V) -> Ordering,
    a: &Record<V>,
    b: &K,
) -> Ordering
where
    K: Eq + Hash,
{
    let rb = &store[b];
    cmp(a.data(), rb.data()).then(a.seq().cmp(&rb.seq()))
}

/// Inserts `key` into the sorted projection, preserving order. Returns the
/// insertion index. The key's record must be present in the store.
pub fn insert_row<K, V>(
    rows: &mut Vec<K>,
    store: &HashMap<K, Record<V>>,
    cmp: &dyn Fn(&V, &V) -> Ordering,
    key: &K,
) -> usize
where
    K: Eq + Hash + Clone,
{
    let rec = &store[key];
    let pos = match rows.binary_search_by(|probe| order(store, cmp, rec, probe).reverse()) {
        Ok(pos) | Err(pos) => pos,
    };
    rows.insert(pos, key.clone());
    pos
}

/// Locates and removes `key` from the projection, returning the index it
/// occupied. The comparator-consistent binary search is tried first; a
/// linear scan by key covers projections whose order is stale relative to
/// the current comparator (the selection projection after a re-sort).
pub fn remove_row<K, V>(
    rows: &mut Vec<K>,
    store: &HashMap<K, Record<V>>,
    cmp: &dyn Fn(&V, &V) -> Ordering,
    key: &K,
) -> Option<usize>
where
    K: Eq + Hash + Clone,
{
    let rec = store.get(key)?;
    if let Ok(pos) = rows.binary_search_by(|probe| order(store, cmp, rec, probe).reverse()) {
        if rows[pos] == *key {
            rows.remove(pos);
            return Some(pos);
        }
    }
    let pos = rows.iter().position(|k| k == key)?;
    rows.remove(pos);
    Some(pos)
}

/// Fully re-sorts a projection under the given comparator.
pub fn sort_rows<K, V>(
    rows: &mut [K],
    store: &HashMap<K, Record<V>>,
    cmp: &dyn Fn(&V, &V) -> Ordering,
) where
    K: Eq + Hash,
{
    rows.sort_by(|a, b| {
        let ra = &store[a];
        let rb = &store[b];
        cmp(ra.data(), rb.data()).then(ra.seq().cmp(&rb.seq()))
    });
}
