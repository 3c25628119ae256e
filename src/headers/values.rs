//! Ordered multi-value header value.

use std::fmt;

use crate::legacy::headers::VALUE_SEPARATOR;

/// Zero or more values of one header, in order.
///
/// The joined representation (values separated by `,`) is what the legacy
/// store holds and what comparisons of whole entries use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct HeaderValues(Vec<String>);

impl HeaderValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Values joined with `,`; empty string when there are none.
    pub fn joined(&self) -> String {
        self.0.join(VALUE_SEPARATOR)
    }

    /// Compares joined representations, so `["a,b"]` equals `["a", "b"]`.
    pub fn same_joined(&self, other: &HeaderValues) -> bool {
        self.joined() == other.joined()
    }
}

impl fmt::Display for HeaderValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined())
    }
}

impl From<&str> for HeaderValues {
    fn from(value: &str) -> Self {
        Self(vec![value.to_string()])
    }
}

impl From<String> for HeaderValues {
    fn from(value: String) -> Self {
        Self(vec![value])
    }
}

impl From<Option<String>> for HeaderValues {
    fn from(value: Option<String>) -> Self {
        Self(value.into_iter().collect())
    }
}

impl From<Vec<String>> for HeaderValues {
    fn from(values: Vec<String>) -> Self {
        Self(values)
    }
}

impl From<&[&str]> for HeaderValues {
    fn from(values: &[&str]) -> Self {
        values.iter().copied().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for HeaderValues {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl IntoIterator for HeaderValues {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a HeaderValues {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
