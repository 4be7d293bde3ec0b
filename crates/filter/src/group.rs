//! Filter group resolution.
//!
//! The group naming authority lives outside the engine: embedders decide
//! which filter identifiers form a dimension. The resolver is injected at
//! construction, never ambient state, so the registry stays testable with
//! mock resolvers.

use alloc::string::String;
use alloc::vec::Vec;
use hashbrown::HashMap;

/// Maps filter identifiers to named groups and back.
pub trait FilterGroupResolver {
    /// Resolves the group a filter identifier belongs to. `None` means the
    /// filter is not part of any group and is combined as a flat AND term.
    fn group_name(&self, filter_id: &str) -> Option<&str>;

    /// All filter identifiers registered under a group.
    fn filter_ids(&self, group_name: &str) -> Vec<&str>;
}

/// A map-backed resolver for embedders with a fixed group layout.
#[derive(Default)]
pub struct StaticGroupResolver {
    by_group: HashMap<String, Vec<String>>,
    by_id: HashMap<String, String>,
}

impl StaticGroupResolver {
    /// Creates an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns a filter identifier to a group.
    pub fn assign(&mut self, group: impl Into<String>, filter_id: impl Into<String>) {
        let group = group.into();
        let filter_id = filter_id.into();
        self.by_id.insert(filter_id.clone(), group.clone());
        self.by_group.entry(group).or_default().push(filter_id);
    }

    /// Builder-style `assign`.
    pub fn with(mut self, group: impl Into<String>, filter_id: impl Into<String>) -> Self {
        self.assign(group, filter_id);
        self
    }
}

impl FilterGroupResolver for StaticGroupResolver {
    fn group_name(&self, filter_id: &str) -> Option<&str> {
        self.by_id.get(filter_id).map(String::as_str)
    }

    fn filter_ids(&self, group_name: &str) -> Vec<&str> {
        self.by_group
            .get(group_name)
            .map(|ids| ids.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }
}
