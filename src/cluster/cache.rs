//! Pairwise distance cache keyed by node ids.

use std::collections::HashMap;

/// Canonical (smaller id first) key for an unordered node pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct PairKey(i64, i64);

impl PairKey {
    pub(crate) fn new(a: i64, b: i64) -> Self {
        assert_ne!(a, b, "distance requested between node {a} and itself");
        if a < b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }
}

/// Write-once cache of distances between node pairs.
///
/// Node vectors never change after creation, so an entry stays valid for the
/// whole run. Inserting a key twice is a bug in id assignment and panics.
#[derive(Debug, Default)]
pub(crate) struct DistanceCache {
    entries: HashMap<PairKey, f64>,
    hits: u64,
}

impl DistanceCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Fetch a cached distance, counting the lookup as a hit.
    pub(crate) fn get(&mut self, key: PairKey) -> Option<f64> {
        let d = self.entries.get(&key).copied();
        if d.is_some() {
            self.hits += 1;
        }
        d
    }

    pub(crate) fn insert(&mut self, key: PairKey, distance: f64) {
        let prev = self.entries.insert(key, distance);
        assert!(
            prev.is_none(),
            "distance cache collision for node pair ({}, {})",
            key.0,
            key.1
        );
    }

    /// Number of distinct distances computed so far.
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn hits(&self) -> u64 {
        self.hits
    }
}
