//! Multi-valued query parameters.
//!
//! [`QueryParams`] collects typed [`ParamValue`]s under string keys and renders
//! them as `key=value&key=value`. The same string is used as a URL query for
//! GET requests and as an `application/x-www-form-urlencoded` body for POST.
//!
//! # Example
//!
//! ```
//! use promq_core::QueryParams;
//!
//! let mut params = QueryParams::new();
//! params.add("match[]", "up");
//! params.add("match[]", r#"http_requests_total{job="api"}"#);
//! params.add("limit", 10_u32);
//!
//! assert_eq!(
//!     params.to_query_string().expect("render"),
//!     "match%5B%5D=up&match%5B%5D=http_requests_total%7Bjob%3D%22api%22%7D&limit=10"
//! );
//! ```

use chrono::{DateTime, Utc};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;

use crate::{CodecError, PromDuration, to_scalar_string};

/// Everything except the RFC 3986 unreserved characters.
const COMPONENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// A typed query parameter value.
///
/// Rendered through [`to_scalar_string`]: text is sent bare, timestamps as
/// RFC 3339, durations in Prometheus syntax, numbers and booleans as written.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Text, e.g. a `PromQL` expression or a series selector.
    Text(String),
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    UInt(u64),
    /// Floating point number, e.g. a step in seconds.
    Float(f64),
    /// Boolean.
    Bool(bool),
    /// Point in time.
    Timestamp(DateTime<Utc>),
    /// Duration, e.g. a query timeout.
    Duration(PromDuration),
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<u64> for ParamValue {
    fn from(value: u64) -> Self {
        Self::UInt(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::UInt(value.into())
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<DateTime<Utc>> for ParamValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

impl From<PromDuration> for ParamValue {
    fn from(value: PromDuration) -> Self {
        Self::Duration(value)
    }
}

impl From<std::time::Duration> for ParamValue {
    fn from(value: std::time::Duration) -> Self {
        Self::Duration(value.into())
    }
}

/// Ordered multi-valued parameter collection.
///
/// Keys keep their first-insertion order and values keep their insertion
/// order within a key. Adding never replaces or de-duplicates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    entries: Vec<(String, Vec<ParamValue>)>,
}

impl QueryParams {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value under `key`.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        let key = key.into();
        let value = value.into();

        match self.entries.iter_mut().find(|(name, _)| *name == key) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    /// Appends a value under `key`, builder style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.add(key, value);
        self
    }

    /// Returns `true` if at least one value was added under `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(name, _)| name == key)
    }

    /// Values under `key` in insertion order (empty if absent).
    #[must_use]
    pub fn get(&self, key: &str) -> &[ParamValue] {
        self.entries
            .iter()
            .find(|(name, _)| name == key)
            .map_or(&[], |(_, values)| values.as_slice())
    }

    /// Number of values across all keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.iter().map(|(_, values)| values.len()).sum()
    }

    /// Returns `true` if nothing was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct keys in first-insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Every `(key, value)` pair, once per value.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries
            .iter()
            .flat_map(|(name, values)| values.iter().map(move |value| (name.as_str(), value)))
    }

    /// Render as `key=value` pairs joined by `&`, percent-encoding both sides.
    ///
    /// # Errors
    ///
    /// Returns a [`CodecError`] if a value has no scalar form (a non-finite float).
    pub fn to_query_string(&self) -> Result<String, CodecError> {
        let mut pairs = Vec::with_capacity(self.len());
        for (key, value) in self.iter() {
            let scalar = to_scalar_string(value)?;
            pairs.push(format!(
                "{}={}",
                utf8_percent_encode(key, COMPONENT_ENCODE_SET),
                utf8_percent_encode(&scalar, COMPONENT_ENCODE_SET)
            ));
        }
        Ok(pairs.join("&"))
    }
}

impl<K, V> Extend<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.add(key, value);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        params.extend(iter);
        params
    }
}

impl<'a> IntoIterator for &'a QueryParams {
    type Item = (&'a str, &'a ParamValue);
    type IntoIter = Box<dyn Iterator<Item = Self::Item> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
