// crates/notification-policy-core/src/core/filters.rs
// ============================================================================
// Module: Notification Policy Filters
// Description: Filter sets and the flatten/expand codec for nested filter blocks.
// Purpose: Convert between the vendor filter mapping and nested-record blocks.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`FilterSet`] maps a filter attribute name (`services`, `zones`,
//! `product`, `limit`, ...) to the values allowed for that attribute. The
//! declarative configuration cannot hold heterogeneous maps, so filters are
//! carried there as a sequence of [`FilterRecord`] values, one per attribute.
//! [`flatten`] and [`expand`] convert between the two forms.
//!
//! Invariants:
//! - `expand(&flatten(f))` equals `f` up to value ordering whenever no key of
//!   `f` maps to an empty list.
//! - Keys with empty value lists are omitted by [`flatten`] and therefore do
//!   not survive a round trip.
//! - [`expand`] concatenates values of records sharing a key.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Filter Types
// ============================================================================

/// Mapping from filter attribute name to its allowed values.
///
/// # Invariants
/// - Keys are unique.
/// - Value order is not significant; duplicates are preserved as given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet(BTreeMap<String, Vec<String>>);

impl FilterSet {
    /// Creates an empty filter set.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Replaces the values stored under `key`.
    pub fn insert(&mut self, key: impl Into<String>, values: Vec<String>) {
        self.0.insert(key.into(), values);
    }

    /// Appends values under `key`, creating the entry when absent.
    pub fn extend_key(&mut self, key: &str, values: impl IntoIterator<Item = String>) {
        match self.0.get_mut(key) {
            Some(existing) => existing.extend(values),
            None => {
                self.0.insert(key.to_string(), values.into_iter().collect());
            }
        }
    }

    /// Returns the values stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.0.get(key).map(Vec::as_slice)
    }

    /// Returns true when no keys are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over `(key, values)` pairs in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Vec<String>> {
        self.0.iter()
    }

    /// Returns a copy with every value list sorted.
    ///
    /// Two filter sets are equal up to value ordering exactly when their
    /// normalized forms are equal.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut map = self.0.clone();
        for values in map.values_mut() {
            values.sort_unstable();
        }
        Self(map)
    }

    /// Returns true when both sets hold the same keys and the same value
    /// multisets under each key.
    #[must_use]
    pub fn equivalent(&self, other: &Self) -> bool {
        self.normalized() == other.normalized()
    }
}

impl FromIterator<(String, Vec<String>)> for FilterSet {
    fn from_iter<T: IntoIterator<Item = (String, Vec<String>)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<BTreeMap<String, Vec<String>>> for FilterSet {
    fn from(value: BTreeMap<String, Vec<String>>) -> Self {
        Self(value)
    }
}

impl<'a> IntoIterator for &'a FilterSet {
    type IntoIter = btree_map::Iter<'a, String, Vec<String>>;
    type Item = (&'a String, &'a Vec<String>);

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// One attribute of a nested `filters` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterRecord {
    /// Filter attribute name.
    pub key: String,
    /// Values allowed for the attribute.
    pub values: Vec<String>,
}

impl FilterRecord {
    /// Creates a record from a key and its values.
    #[must_use]
    pub fn new(key: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            key: key.into(),
            values,
        }
    }
}

// ============================================================================
// SECTION: Codec
// ============================================================================

/// Converts a filter set into nested records, one per non-empty key.
#[must_use]
pub fn flatten(filters: &FilterSet) -> Vec<FilterRecord> {
    filters
        .iter()
        .filter(|(_, values)| !values.is_empty())
        .map(|(key, values)| FilterRecord::new(key.clone(), values.clone()))
        .collect()
}

/// Accumulates nested records into a filter set.
///
/// Records that share a key have their values concatenated in record order.
#[must_use]
pub fn expand(records: &[FilterRecord]) -> FilterSet {
    let mut filters = FilterSet::new();
    for record in records {
        if record.values.is_empty() {
            continue;
        }
        filters.extend_key(&record.key, record.values.iter().cloned());
    }
    filters
}
