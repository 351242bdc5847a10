//! Prefix index: string keys to id lists, searchable by key prefix.
//!
//! Keys are kept in a hash map for cheap inserts. Prefix queries run against
//! a byte-order sorted copy of the keys that is built on the first query after
//! a new key was added.

use crate::index::types::DirId;
use roaring::RoaringBitmap;
use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use std::ops::Range;
use std::sync::OnceLock;

/// Maps string keys to lists of ids and finds all ids whose key starts
/// with a prefix.
#[derive(Debug, Default)]
pub struct PrefixIndex {
    buckets: FxHashMap<String, Vec<DirId>>,
    /// Sorted view of `buckets` keys; reset whenever a key is created
    sorted_keys: OnceLock<Vec<String>>,
}

impl PrefixIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild an index from keys and buckets in the order they were written
    pub(crate) fn from_sorted_buckets(keys: Vec<String>, values: Vec<Vec<DirId>>) -> Self {
        let buckets = keys.iter().cloned().zip(values).collect();
        let sorted_keys = OnceLock::new();
        if is_sorted(&keys) {
            let _ = sorted_keys.set(keys);
        }
        Self {
            buckets,
            sorted_keys,
        }
    }

    /// Add a key and value pair. Duplicate values are kept.
    pub fn add(&mut self, key: &str, value: DirId) {
        match self.buckets.get_mut(key) {
            Some(bucket) => bucket.push(value),
            None => {
                self.sorted_keys = OnceLock::new();
                self.buckets.insert(key.to_string(), vec![value]);
            }
        }
    }

    /// Find all keys starting with `prefix` and add their values to `set`
    pub fn add_matches_starting_with(&self, prefix: &str, set: &mut RoaringBitmap) {
        let keys = self.sorted_keys();
        for key in &keys[range_starting_with(keys, prefix)] {
            if let Some(bucket) = self.buckets.get(key) {
                set.extend(bucket.iter().copied());
            }
        }
    }

    /// Keys in byte order, sorting them if a key was added since the last call
    pub fn sorted_keys(&self) -> &[String] {
        self.sorted_keys.get_or_init(|| {
            let mut keys: Vec<String> = self.buckets.keys().cloned().collect();
            keys.sort_unstable();
            keys
        })
    }

    /// Values stored under exactly `key`, in insertion order
    pub fn values(&self, key: &str) -> &[DirId] {
        self.buckets.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn key_count(&self) -> usize {
        self.buckets.len()
    }

    /// Total number of stored values across all keys
    pub fn value_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

fn is_sorted(keys: &[String]) -> bool {
    keys.windows(2).all(|pair| pair[0] < pair[1])
}

/// What a prefix comparison reports for a key that starts with the prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOrder {
    /// Keys starting with the prefix sort after it, locating the first one
    FirstWithPrefix,
    /// Keys starting with the prefix sort before it, locating one past the last
    FirstAfterPrefix,
}

/// Compare `key` against `prefix` byte by byte.
///
/// A key shorter than the prefix that matches entirely sorts before it. A key
/// that starts with the prefix sorts as `order` says, so the result is never
/// `Equal` and a binary search always lands on an insertion point.
pub fn compare_with_prefix(key: &str, prefix: &str, order: PrefixOrder) -> Ordering {
    let (key, prefix) = (key.as_bytes(), prefix.as_bytes());
    let length = key.len().min(prefix.len());

    match key[..length].cmp(&prefix[..length]) {
        Ordering::Equal if key.len() < prefix.len() => Ordering::Less,
        Ordering::Equal => match order {
            PrefixOrder::FirstWithPrefix => Ordering::Greater,
            PrefixOrder::FirstAfterPrefix => Ordering::Less,
        },
        other => other,
    }
}

/// Return the range of a byte-order sorted key list which start with `prefix`.
///
/// Empty results (including an empty prefix) are always `0..0`; check the
/// length, not the position.
pub fn range_starting_with<S: AsRef<str>>(sorted: &[S], prefix: &str) -> Range<usize> {
    if prefix.is_empty() {
        return 0..0;
    }

    let first = insertion_point(sorted.binary_search_by(|key| {
        compare_with_prefix(key.as_ref(), prefix, PrefixOrder::FirstWithPrefix)
    }));
    let after = insertion_point(sorted.binary_search_by(|key| {
        compare_with_prefix(key.as_ref(), prefix, PrefixOrder::FirstAfterPrefix)
    }));

    if after > first { first..after } else { 0..0 }
}

#[inline]
fn insertion_point(found: Result<usize, usize>) -> usize {
    match found {
        Ok(index) | Err(index) => index,
    }
}
