//! Header dictionaries exposed to the processing pipeline.
//!
//! # Data Flow
//! ```text
//! request:  legacy HeaderStore ──snapshot──▶ RequestHeaders (detached, owned)
//! response: legacy response ◀──live view──▶ ResponseHeaders (no state of its own)
//! ```
//!
//! # Design Decisions
//! - One map contract ([`HeaderDictionary`]) for both sides, so the pipeline
//!   does not care which one it holds
//! - Methods take `&self`: implementations are shared handles and the
//!   dictionary object is itself shared through the feature set
//! - Entry comparisons (`contains`, `remove_entry`) use the joined
//!   representation, not the individual values

pub mod names;
pub mod request;
pub mod response;
pub mod values;

use std::fmt;

use crate::error::{BridgeError, BridgeResult};

pub use request::RequestHeaders;
pub use response::ResponseHeaders;
pub use values::HeaderValues;

/// Map contract over a multi-value header collection.
pub trait HeaderDictionary: Send + Sync + fmt::Debug {
    /// Values of `key`; empty when the key is absent.
    fn get(&self, key: &str) -> HeaderValues;

    /// Replace the values of `key`.
    fn set(&self, key: &str, value: HeaderValues) -> BridgeResult<()>;

    fn try_get(&self, key: &str) -> Option<HeaderValues>;

    fn contains_key(&self, key: &str) -> bool;

    /// Add `value` under `key`.
    fn add(&self, key: &str, value: HeaderValues) -> BridgeResult<()>;

    /// Remove `key`. Returns whether it was present.
    fn remove(&self, key: &str) -> bool;

    fn clear(&self);

    /// Keys in enumeration order.
    fn keys(&self) -> Vec<String>;

    /// `(key, values)` pairs in enumeration order.
    fn entries(&self) -> Vec<(String, HeaderValues)>;

    fn len(&self) -> usize {
        self.keys().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_read_only(&self) -> bool {
        false
    }

    fn values(&self) -> Vec<HeaderValues> {
        self.entries().into_iter().map(|(_, v)| v).collect()
    }

    /// True if `key` is present and its joined value equals `value`'s.
    fn contains(&self, key: &str, value: &HeaderValues) -> bool {
        self.try_get(key)
            .map(|found| found.same_joined(value))
            .unwrap_or(false)
    }

    /// Remove `key` only when its joined value equals `value`'s.
    fn remove_entry(&self, key: &str, value: &HeaderValues) -> bool {
        if !self.contains(key, value) {
            return false;
        }
        self.remove(key)
    }

    /// Copy every entry into `target`, starting at `index`.
    fn copy_to(&self, target: &mut [(String, HeaderValues)], index: usize) -> BridgeResult<()> {
        let entries = self.entries();
        let available = target.len().saturating_sub(index);
        if index > target.len() || entries.len() > available {
            return Err(BridgeError::CopyOutOfRange {
                needed: entries.len(),
                available,
            });
        }
        for (slot, entry) in target[index..].iter_mut().zip(entries) {
            *slot = entry;
        }
        Ok(())
    }

    /// Parsed `Content-Length`; `None` when the header is absent.
    fn content_length(&self) -> BridgeResult<Option<u64>> {
        match self.try_get(names::CONTENT_LENGTH) {
            None => Ok(None),
            Some(values) => {
                let raw = values.joined();
                raw.trim()
                    .parse()
                    .map(Some)
                    .map_err(|_| BridgeError::InvalidContentLength(raw))
            }
        }
    }

    /// Store `Content-Length`; `None` removes the header.
    fn set_content_length(&self, value: Option<u64>) -> BridgeResult<()> {
        match value {
            Some(length) => self.set(names::CONTENT_LENGTH, length.to_string().into()),
            None => {
                self.remove(names::CONTENT_LENGTH);
                Ok(())
            }
        }
    }
}
