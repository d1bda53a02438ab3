//! The value → token names index and its shared snapshot holder.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::Serialize;

/// Normalized value → every token name declared with that value.
///
/// Several tokens may share one value and any of them is an acceptable substitution,
/// so the index is keyed by value. Names are kept sorted for stable output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VariableMapping {
    entries: BTreeMap<String, BTreeSet<String>>,
}

/// One `(token name, normalized value)` pair, as listed by the search command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenEntry {
    pub name: String,
    pub value: String,
}

impl VariableMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, value: impl Into<String>, name: impl Into<String>) {
        self.entries
            .entry(value.into())
            .or_default()
            .insert(name.into());
    }

    /// Remove `name` from the set stored under `value`. Returns whether it was present.
    ///
    /// An emptied set stays in place; the value key still exists with no names.
    pub fn remove(&mut self, value: &str, name: &str) -> bool {
        self.entries
            .get_mut(value)
            .map(|names| names.remove(name))
            .unwrap_or(false)
    }

    pub fn get(&self, value: &str) -> Option<&BTreeSet<String>> {
        self.entries.get(value)
    }

    /// Whether any token is still declared with `value`.
    pub fn contains(&self, value: &str) -> bool {
        self.entries
            .get(value)
            .is_some_and(|names| !names.is_empty())
    }

    /// First token name for `value`, used by auto-replace.
    pub fn first_name(&self, value: &str) -> Option<&str> {
        self.entries
            .get(value)
            .and_then(|names| names.iter().next())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flatten into `(name, value)` pairs, one per token.
    pub fn entries(&self) -> Vec<TokenEntry> {
        self.entries
            .iter()
            .flat_map(|(value, names)| {
                names.iter().map(move |name| TokenEntry {
                    name: name.clone(),
                    value: value.clone(),
                })
            })
            .collect()
    }

    /// Case-insensitive filter over token names and values. An empty query lists all.
    pub fn search(&self, query: &str) -> Vec<TokenEntry> {
        let needle = query.trim().to_lowercase();
        self.entries()
            .into_iter()
            .filter(|entry| {
                needle.is_empty()
                    || entry.name.to_lowercase().contains(&needle)
                    || entry.value.to_lowercase().contains(&needle)
            })
            .collect()
    }
}

/// Holds the current mapping and replaces it in one atomic swap.
///
/// Readers grab a snapshot with [`MappingStore::snapshot`]; a concurrent reload never
/// exposes a half-built index because the new mapping is complete before it is stored.
#[derive(Debug)]
pub struct MappingStore {
    current: ArcSwap<VariableMapping>,
}

impl MappingStore {
    pub fn new(mapping: VariableMapping) -> Self {
        Self {
            current: ArcSwap::from_pointee(mapping),
        }
    }

    pub fn snapshot(&self) -> Arc<VariableMapping> {
        self.current.load_full()
    }

    pub fn replace(&self, mapping: VariableMapping) {
        self.current.store(Arc::new(mapping));
    }
}

impl Default for MappingStore {
    fn default() -> Self {
        Self::new(VariableMapping::new())
    }
}
