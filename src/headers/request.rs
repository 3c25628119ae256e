//! Detached request header dictionary.
//!
//! # Responsibilities
//! - Snapshot the legacy request headers once, at request-view construction
//! - Own its entries from then on: later legacy-side changes are not seen
//!
//! # Design Decisions
//! - Each legacy name becomes one entry holding the store's joined value
//! - Keys compare ASCII-case-insensitively, like the legacy store
//! - Setting an empty value removes the key

use std::sync::{Arc, RwLock};

use super::{HeaderDictionary, HeaderValues};
use crate::error::{BridgeError, BridgeResult};
use crate::legacy::HeaderStore;
use crate::sync;

/// Owned, ordered multi-value header dictionary.
#[derive(Debug, Clone, Default)]
pub struct RequestHeaders {
    entries: Arc<RwLock<Vec<(String, HeaderValues)>>>,
}

impl RequestHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy every distinct name of `store` with its joined value.
    pub fn snapshot(store: &HeaderStore) -> Self {
        let entries = store
            .entries()
            .into_iter()
            .map(|(name, joined)| (name, HeaderValues::from(joined)))
            .collect();
        Self {
            entries: Arc::new(RwLock::new(entries)),
        }
    }

    fn position(entries: &[(String, HeaderValues)], key: &str) -> Option<usize> {
        entries.iter().position(|(k, _)| k.eq_ignore_ascii_case(key))
    }
}

impl HeaderDictionary for RequestHeaders {
    fn get(&self, key: &str) -> HeaderValues {
        self.try_get(key).unwrap_or_default()
    }

    fn set(&self, key: &str, value: HeaderValues) -> BridgeResult<()> {
        if value.is_empty() {
            self.remove(key);
            return Ok(());
        }
        let mut entries = sync::write(&self.entries);
        match Self::position(&entries, key) {
            Some(i) => entries[i].1 = value,
            None => entries.push((key.to_string(), value)),
        }
        Ok(())
    }

    fn try_get(&self, key: &str) -> Option<HeaderValues> {
        let entries = sync::read(&self.entries);
        Self::position(&entries, key).map(|i| entries[i].1.clone())
    }

    fn contains_key(&self, key: &str) -> bool {
        Self::position(&sync::read(&self.entries), key).is_some()
    }

    fn add(&self, key: &str, value: HeaderValues) -> BridgeResult<()> {
        let mut entries = sync::write(&self.entries);
        if Self::position(&entries, key).is_some() {
            return Err(BridgeError::DuplicateHeader(key.to_string()));
        }
        entries.push((key.to_string(), value));
        Ok(())
    }

    fn remove(&self, key: &str) -> bool {
        let mut entries = sync::write(&self.entries);
        match Self::position(&entries, key) {
            Some(i) => {
                entries.remove(i);
                true
            }
            None => false,
        }
    }

    fn clear(&self) {
        sync::write(&self.entries).clear();
    }

    fn keys(&self) -> Vec<String> {
        sync::read(&self.entries)
            .iter()
            .map(|(k, _)| k.clone())
            .collect()
    }

    fn entries(&self) -> Vec<(String, HeaderValues)> {
        sync::read(&self.entries).clone()
    }

    fn len(&self) -> usize {
        sync::read(&self.entries).len()
    }
}
