// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Flat `key=value` records returned by the appliance.

use std::fmt;

/// A flat mapping of string keys to string values.
///
/// The appliance answers every request with a body of comma-separated
/// `key=value` tokens, for example `ret=OK,pow=1,mode=0`. Some values are
/// themselves percent-encoded records of the same shape.
///
/// Lookups treat the record as an unordered map where the last value for a
/// repeated key wins. Iteration yields keys in the position they first
/// appeared, so a record read from the appliance can be sent back with its
/// fields in the original order.
///
/// # Examples
///
/// ```
/// use daikin_purifier::response::RawRecord;
///
/// let record = RawRecord::decode("ret=OK,pow=1,bad,mode=0");
/// assert_eq!(record.get("pow"), Some("1"));
/// assert_eq!(record.get("bad"), None);
/// assert_eq!(record.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    fields: Vec<(String, String)>,
}

impl RawRecord {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a response body into a record.
    ///
    /// Tokens that do not split into exactly one key and one value are
    /// dropped. Malformed input never fails, it only yields fewer fields.
    #[must_use]
    pub fn decode(body: &str) -> Self {
        let mut record = Self::new();
        for token in body.split(',') {
            let mut parts = token.split('=');
            if let (Some(key), Some(value), None) = (parts.next(), parts.next(), parts.next()) {
                record.insert(key, value);
            }
        }
        record
    }

    /// Percent-decodes `value` and decodes the result as a nested record.
    ///
    /// A missing value or one that does not decode to UTF-8 yields an empty
    /// record.
    #[must_use]
    pub fn decode_nested(value: Option<&str>) -> Self {
        let Some(value) = value else {
            return Self::new();
        };
        match urlencoding::decode(value) {
            Ok(decoded) => Self::decode(&decoded),
            Err(e) => {
                tracing::warn!(error = %e, "Nested field is not valid percent-encoded UTF-8");
                Self::new()
            }
        }
    }

    /// Returns the value for `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the value for `key` read as an integer.
    ///
    /// Surrounding whitespace is ignored. Decimal and exponent forms with an
    /// integral value (`1.0`, `1e0`) read as that integer. Returns `None` if
    /// the key is absent or the value is not an integral number.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn get_number(&self, key: &str) -> Option<i64> {
        let value = self.get(key)?.trim();
        if let Ok(n) = value.parse::<i64>() {
            return Some(n);
        }
        let n = value.parse::<f64>().ok()?;
        if n.is_finite() && n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
            Some(n as i64)
        } else {
            None
        }
    }

    /// Returns `true` if the record holds `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Sets `key` to `value`.
    ///
    /// An existing key keeps its position and takes the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Removes `key` and returns its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let pos = self.fields.iter().position(|(k, _)| k == key)?;
        Some(self.fields.remove(pos).1)
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over `(key, value)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}

impl fmt::Display for RawRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{key}={value}")?;
        }
        Ok(())
    }
}
