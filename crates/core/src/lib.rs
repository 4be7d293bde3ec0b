//! Gridflow Core - Core types for the gridflow live-view engine.
//!
//! This crate provides the foundational types shared by the filter and view
//! crates:
//!
//! - `Record<V>`: a caller value wrapped with a stable insertion sequence and
//!   an acceptance flag
//! - `RowSeq`: the monotonically increasing sequence used as a sort tie-break
//! - `Interval`: a half-open index range into a projection that a consumer
//!   must treat as needing re-render
//! - `Error`: error types for data-source operations
//!
//! # Example
//!
//! ```rust
//! use gridflow_core::{Interval, Record};
//!
//! let mut record = Record::new(0, "row");
//! assert!(!record.is_accepted());
//! record.set_accepted(true);
//!
//! // The smallest range covering an old and a new sort position.
//! let dirty = Interval::covering(4, 1);
//! assert_eq!(dirty, Interval::new(1, 5));
//! ```

#![no_std]

extern crate alloc;

mod error;
mod interval;
mod record;

pub use error::{Error, Result};
pub use interval::Interval;
pub use record::{Record, RowSeq};
