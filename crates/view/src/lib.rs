//! Live-view maintenance for gridflow.
//!
//! This crate hosts the engine behind a windowed data grid:
//!
//! - [`CacheDataSource`]: a keyed in-memory record store with an
//!   incrementally maintained, filtered, sorted live projection and a
//!   selection sub-projection.
//! - [`LiveDataView`]: the owned result of a windowed read.
//! - Projection helpers ([`insert_row`], [`remove_row`], [`sort_rows`])
//!   that keep key vectors ordered against the record store.
//!
//! Mutations report the contiguous [`Interval`](gridflow_core::Interval)
//! of live positions a renderer must repaint, so consumers redraw rows
//! instead of whole grids.
//!
//! # Example
//!
//! ```
//! use gridflow_view::CacheDataSource;
//!
//! let mut source = CacheDataSource::new(|v: &(u32, i64)| v.0);
//! source.sort(|a: &(u32, i64), b: &(u32, i64)| a.1.cmp(&b.1));
//!
//! source.set_data((1, 30));
//! source.set_data((2, 10));
//!
//! // Moving row 2 past row 1 invalidates positions [0, 2).
//! let interval = source.set_data((2, 40)).unwrap();
//! assert_eq!((interval.from, interval.to), (0, 2));
//!
//! let view = source.get_rows(0, 10);
//! assert_eq!(view.rows(), &[(1, 30), (2, 40)]);
//! ```

#![no_std]

extern crate alloc;

mod data_source;
mod projection;
mod window;

pub use data_source::{CacheDataSource, RenderingHelperCache};
pub use projection::{insert_row, remove_row, sort_rows, Comparator};
pub use window::LiveDataView;
