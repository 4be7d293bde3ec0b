//! Gridflow Filter - filter registry and acceptance evaluation.
//!
//! This crate decides which records are visible in the live view:
//!
//! - `RowFilter<V>`: the filter capability — a predicate plus its currently
//!   selected value set (empty set means inactive/match-all)
//! - `FilterGroupResolver`: maps filter identifiers to named groups;
//!   `StaticGroupResolver` is a map-backed implementation for embedders
//! - `FilterRegistry<V>`: holds the installed filters by slot and evaluates
//!   record acceptance
//!
//! # Composition semantics
//!
//! Without a group resolver, filters combine as a flat AND. With a resolver,
//! filters are partitioned by group name; a record passes a group if every
//! member filter is inactive (auto-accept) or at least one active member
//! matches (OR within the group), and must pass every group (AND across
//! groups). Groups model independent filter dimensions: satisfy at least one
//! active criterion per dimension, and all dimensions at once.

#![no_std]

extern crate alloc;

mod filter;
mod group;
mod registry;

pub use filter::RowFilter;
pub use group::{FilterGroupResolver, StaticGroupResolver};
pub use registry::{group_matches, FilterRegistry, FilterSlot};
