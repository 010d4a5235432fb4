//! Spatial index over geohash-ordered entries.
//!
//! Maintains the set of `(code, id)` pairs in code order and answers
//! approximate-region queries by scanning the code ranges of the 3×3
//! cell neighborhood around a query point. Results are candidates
//! only: over-inclusive by construction, to be refined with an exact
//! distance check by the caller.
//!
//! # Thread Safety
//!
//! A single `RwLock` over the ordered set: scans take the read lock
//! concurrently, mutations take the write lock briefly. The index
//! holds no record data, so writes are small and short-lived.

use std::collections::BTreeSet;
use std::ops::Bound::{Excluded, Included};
use std::sync::RwLock;

use crate::event::EventId;
use crate::geohash;

/// Ordered index of `(geohash code, event id)` pairs.
///
/// Ties between equal codes are broken by id, which makes iteration
/// order (and therefore candidate order) deterministic.
#[derive(Debug, Default)]
pub struct SpatialIndex {
    entries: RwLock<BTreeSet<(u64, EventId)>>,
}

impl SpatialIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeSet::new()),
        }
    }

    /// Inserts the entry for an event at the given coordinates.
    ///
    /// Returns `false` if the exact `(code, id)` pair was already
    /// present. A record's code never changes for its lifetime, so
    /// re-insertion is naturally idempotent — this is what makes
    /// `reindex` safe against racing creates.
    pub fn insert(&self, id: EventId, lat: f64, lon: f64) -> bool {
        let code = geohash::encode(lat, lon);
        let mut entries = self.entries.write().expect("spatial index lock poisoned");
        entries.insert((code, id))
    }

    /// Removes the entry for an event at the given coordinates.
    ///
    /// Removing an absent entry is a no-op, matching idempotent
    /// cleanup expectations.
    pub fn remove(&self, id: EventId, lat: f64, lon: f64) {
        let code = geohash::encode(lat, lon);
        let mut entries = self.entries.write().expect("spatial index lock poisoned");
        entries.remove(&(code, id));
    }

    /// Collects candidate ids whose codes fall inside the query
    /// circle's cell neighborhood.
    ///
    /// Candidates are returned in code order and may lie outside the
    /// true radius; the caller must refine with an exact distance
    /// check.
    pub fn range_scan(&self, lat: f64, lon: f64, radius_km: f64) -> Vec<EventId> {
        let ranges = geohash::search_ranges(lat, lon, radius_km);
        let entries = self.entries.read().expect("spatial index lock poisoned");

        let mut candidates = Vec::new();
        for range in ranges {
            let lower = Included((range.start, EventId::lower_bound()));
            let upper = Excluded((range.end, EventId::lower_bound()));
            candidates.extend(entries.range((lower, upper)).map(|(_, id)| *id));
        }
        candidates
    }

    /// Number of indexed entries.
    pub fn len(&self) -> usize {
        let entries = self.entries.read().expect("spatial index lock poisoned");
        entries.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every entry.
    pub fn clear(&self) {
        let mut entries = self.entries.write().expect("spatial index lock poisoned");
        entries.clear();
    }
}
