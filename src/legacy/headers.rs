//! The legacy host's native header store.
//!
//! # Responsibilities
//! - Keep one entry per header name, each holding one or more raw values
//! - Join multiple values with `,` when read as a single string
//! - Share a single store between every handle cloned from it
//!
//! # Design Decisions
//! - Names compare ASCII-case-insensitively; the first spelling is kept
//! - Insertion order of names is preserved for enumeration

use std::sync::{Arc, RwLock};

use crate::sync;

/// Separator used when several raw values are read as one string.
pub const VALUE_SEPARATOR: &str = ",";

#[derive(Debug, Clone)]
struct Entry {
    name: String,
    values: Vec<String>,
}

impl Entry {
    fn joined(&self) -> String {
        self.values.join(VALUE_SEPARATOR)
    }
}

/// Shared handle to a multi-value header store.
///
/// Cloning the handle does not copy the headers: all clones observe the same
/// entries.
#[derive(Debug, Clone, Default)]
pub struct HeaderStore {
    entries: Arc<RwLock<Vec<Entry>>>,
}

impl HeaderStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn position(entries: &[Entry], name: &str) -> Option<usize> {
        entries.iter().position(|e| e.name.eq_ignore_ascii_case(name))
    }

    /// Joined representation of the values stored under `name`.
    pub fn get(&self, name: &str) -> Option<String> {
        let entries = sync::read(&self.entries);
        Self::position(&entries, name).map(|i| entries[i].joined())
    }

    /// Raw values stored under `name`, in insertion order.
    pub fn get_values(&self, name: &str) -> Option<Vec<String>> {
        let entries = sync::read(&self.entries);
        Self::position(&entries, name).map(|i| entries[i].values.clone())
    }

    /// Replace every value of `name` with `value`.
    pub fn set(&self, name: &str, value: impl Into<String>) {
        let mut entries = sync::write(&self.entries);
        let value = value.into();
        match Self::position(&entries, name) {
            Some(i) => entries[i].values = vec![value],
            None => entries.push(Entry {
                name: name.to_string(),
                values: vec![value],
            }),
        }
    }

    /// Append `value` to the values of `name`.
    pub fn add(&self, name: &str, value: impl Into<String>) {
        let mut entries = sync::write(&self.entries);
        let value = value.into();
        match Self::position(&entries, name) {
            Some(i) => entries[i].values.push(value),
            None => entries.push(Entry {
                name: name.to_string(),
                values: vec![value],
            }),
        }
    }

    /// Remove `name`. Returns whether it was present.
    pub fn remove(&self, name: &str) -> bool {
        let mut entries = sync::write(&self.entries);
        match Self::position(&entries, name) {
            Some(i) => {
                entries.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn clear(&self) {
        sync::write(&self.entries).clear();
    }

    pub fn contains(&self, name: &str) -> bool {
        Self::position(&sync::read(&self.entries), name).is_some()
    }

    /// Number of distinct header names.
    pub fn len(&self) -> usize {
        sync::read(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Header names as first spelled, in insertion order.
    pub fn keys(&self) -> Vec<String> {
        sync::read(&self.entries)
            .iter()
            .map(|e| e.name.clone())
            .collect()
    }

    /// `(name, joined value)` pairs in insertion order.
    pub fn entries(&self) -> Vec<(String, String)> {
        sync::read(&self.entries)
            .iter()
            .map(|e| (e.name.clone(), e.joined()))
            .collect()
    }

    /// Returns true if both handles point at the same store.
    pub fn ptr_eq(&self, other: &HeaderStore) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for HeaderStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let store = HeaderStore::new();
        for (name, value) in iter {
            store.add(&name.into(), value);
        }
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> HeaderStore {
        [
            ("Header#1", "Value #1-A"),
            ("Header#2", "Value #2"),
            ("Header#1", "Value #1-B"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_multi_values_are_joined() {
        let store = sample();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("Header#1").as_deref(), Some("Value #1-A,Value #1-B"));
        assert_eq!(
            store.get_values("Header#1"),
            Some(vec!["Value #1-A".to_string(), "Value #1-B".to_string()])
        );
        assert_eq!(store.keys(), vec!["Header#1", "Header#2"]);
    }

    #[test]
    fn test_names_are_case_insensitive() {
        let store = sample();
        assert_eq!(store.get("header#2").as_deref(), Some("Value #2"));

        store.set("HEADER#2", "Replaced");
        assert_eq!(store.keys(), vec!["Header#1", "Header#2"]);
        assert_eq!(store.get("Header#2").as_deref(), Some("Replaced"));
    }

    #[test]
    fn test_clones_share_entries() {
        let store = sample();
        let other = store.clone();
        other.remove("Header#1");
        assert!(!store.contains("Header#1"));
        assert!(store.ptr_eq(&other));
        assert!(!store.ptr_eq(&HeaderStore::new()));
    }
}
