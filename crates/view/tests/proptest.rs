//! Property-based tests for gridflow-view using proptest.
//!
//! Each test drives a `CacheDataSource` with a random operation sequence
//! and compares the live view against a brute-force model that re-filters
//! and re-sorts the whole store from scratch.

use gridflow_core::Record;
use gridflow_filter::RowFilter;
use gridflow_view::CacheDataSource;
use proptest::prelude::*;
use std::collections::HashMap;
use std::collections::HashSet;

type Row = (u32, i64);

/// Accepts rows whose value is at least `min`.
struct Threshold {
    values: Vec<String>,
    min: i64,
}

impl Threshold {
    fn min(min: i64) -> Self {
        Self {
            values: vec![String::from("on")],
            min,
        }
    }
}

impl RowFilter<Row> for Threshold {
    fn test(&self, record: &Record<Row>) -> bool {
        record.data().1 >= self.min
    }

    fn filter_values(&self) -> &[String] {
        &self.values
    }
}

fn source() -> CacheDataSource<u32, Row> {
    let mut src = CacheDataSource::new(|v: &Row| v.0);
    src.sort(|a: &Row, b: &Row| a.1.cmp(&b.1));
    src
}

/// Brute-force reference: the store re-filtered and re-sorted in full.
struct Model {
    rows: HashMap<u32, (i64, u64)>,
    next_seq: u64,
    min: Option<i64>,
}

impl Model {
    fn new() -> Self {
        Self {
            rows: HashMap::new(),
            next_seq: 0,
            min: None,
        }
    }

    fn set(&mut self, k: u32, v: i64) {
        match self.rows.get_mut(&k) {
            Some(slot) => slot.0 = v,
            None => {
                self.rows.insert(k, (v, self.next_seq));
                self.next_seq += 1;
            }
        }
    }

    fn remove(&mut self, k: &u32) {
        self.rows.remove(k);
    }

    fn accepted(&self, v: i64) -> bool {
        self.min.map_or(true, |m| v >= m)
    }

    fn live(&self) -> Vec<i64> {
        let mut rows: Vec<(i64, u64)> = self
            .rows
            .values()
            .filter(|(v, _)| self.accepted(*v))
            .copied()
            .collect();
        rows.sort();
        rows.into_iter().map(|(v, _)| v).collect()
    }
}

fn live_values(src: &CacheDataSource<u32, Row>) -> Vec<i64> {
    src.get_filtered_data().into_iter().map(|v| v.1).collect()
}

proptest! {
    /// The live view always equals a full re-sort of the store under
    /// random inserts, updates, and removals.
    #[test]
    fn live_view_matches_model(ops in prop::collection::vec((0u32..16, -50i64..50, prop::bool::weighted(0.8)), 1..200)) {
        let mut src = source();
        let mut model = Model::new();

        for (k, v, is_set) in ops {
            if is_set {
                src.set_data((k, v));
                model.set(k, v);
            } else {
                let _ = src.remove_data(&k);
                model.remove(&k);
            }
            prop_assert_eq!(live_values(&src), model.live());
            prop_assert_eq!(src.row_count(), model.live().len());
        }
    }

    /// Only-narrowing filter changes, applied through the reinforcement
    /// path, keep the live view identical to a from-scratch rebuild.
    #[test]
    fn reinforced_filters_match_model(
        rows in prop::collection::vec((0u32..32, -50i64..50), 1..100),
        thresholds in prop::collection::vec(-40i64..40, 1..6)
    ) {
        let mut src = source();
        let mut model = Model::new();
        for (k, v) in rows {
            src.set_data((k, v));
            model.set(k, v);
        }

        // Non-decreasing thresholds make every change a valid
        // reinforcement.
        let mut thresholds = thresholds;
        thresholds.sort();
        for min in thresholds {
            src.set_filter("col", "f-col", true, Box::new(Threshold::min(min)));
            model.min = Some(min);
            prop_assert_eq!(live_values(&src), model.live());
        }
    }

    /// The selection projection is always the live rows whose key is
    /// selected, in live order.
    #[test]
    fn selection_is_live_intersection(ops in prop::collection::vec((0u32..16, -50i64..50, 0u8..4), 1..150)) {
        let mut src = source();
        let mut model = Model::new();
        let mut selected: HashSet<u32> = HashSet::new();

        for (k, v, op) in ops {
            match op {
                0 | 1 => {
                    src.set_data((k, v));
                    model.set(k, v);
                }
                2 => {
                    if src.select(&k).is_some() {
                        selected.insert(k);
                    }
                }
                _ => {
                    src.unselect(&k);
                    selected.remove(&k);
                }
            }

            let mut expected: Vec<(i64, u64)> = model
                .rows
                .iter()
                .filter(|&(k, &(v, _))| selected.contains(k) && model.accepted(v))
                .map(|(_, row)| *row)
                .collect();
            expected.sort();
            let expected: Vec<i64> = expected.into_iter().map(|(v, _)| v).collect();
            let actual: Vec<i64> = src.get_selected_data().into_iter().map(|v| v.1).collect();
            prop_assert_eq!(actual, expected);
        }
    }

    /// Rows outside a reported invalidation interval keep their value and,
    /// when the view length is unchanged, their position.
    #[test]
    fn intervals_bound_the_damage(ops in prop::collection::vec((0u32..16, -50i64..50), 1..150)) {
        let mut src = source();

        for (k, v) in ops {
            let before = live_values(&src);
            match src.set_data((k, v)) {
                None => prop_assert_eq!(live_values(&src), before),
                Some(interval) => {
                    let after = live_values(&src);
                    prop_assert_eq!(&after[..interval.from], &before[..interval.from]);
                    if after.len() == before.len() {
                        prop_assert_eq!(&after[interval.to..], &before[interval.to..]);
                    }
                }
            }
        }
    }

    /// A record's acceptance flag always mirrors live membership.
    #[test]
    fn accepted_flag_mirrors_live_membership(
        rows in prop::collection::vec((0u32..32, -50i64..50), 1..100),
        min in -40i64..40
    ) {
        let mut src = source();
        for (k, v) in &rows {
            src.set_data((*k, *v));
        }
        src.set_filter("col", "f-col", false, Box::new(Threshold::min(min)));

        let live: HashSet<u32> = src.get_filtered_data().into_iter().map(|v| v.0).collect();
        let mut accepted = 0;
        src.for_each(|k, _| {
            if src.get_record(k).unwrap().is_accepted() {
                accepted += 1;
                assert!(live.contains(k));
            } else {
                assert!(!live.contains(k));
            }
        });
        prop_assert_eq!(accepted, src.row_count());
    }
}
