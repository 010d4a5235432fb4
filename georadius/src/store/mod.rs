//! Metadata store: the canonical id → event mapping.
//!
//! Owns the full record data; the spatial index holds only `(code,
//! id)` pairs. Backed by a `DashMap`, so unrelated reads and writes
//! proceed concurrently with per-shard locking.

use dashmap::DashMap;

use crate::event::{Event, EventId};

/// Concurrent mapping from event id to its record.
#[derive(Debug, Default)]
pub struct MetadataStore {
    events: DashMap<EventId, Event>,
}

impl MetadataStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            events: DashMap::new(),
        }
    }

    /// Inserts or overwrites a record.
    pub fn put(&self, event: Event) {
        self.events.insert(event.id, event);
    }

    /// Returns a clone of the record, if present.
    pub fn get(&self, id: &EventId) -> Option<Event> {
        self.events.get(id).map(|entry| entry.value().clone())
    }

    /// Fetches many records, preserving input order.
    ///
    /// A missing id yields `None` in its slot rather than failing the
    /// batch — a record deleted between an index scan and this fetch
    /// is an expected race, not an error.
    pub fn batch_get(&self, ids: &[EventId]) -> Vec<Option<Event>> {
        ids.iter().map(|id| self.get(id)).collect()
    }

    /// Removes a record, returning it if it was present.
    pub fn remove(&self, id: &EventId) -> Option<Event> {
        self.events.remove(id).map(|(_, event)| event)
    }

    /// Removes every record, returning how many were removed.
    pub fn clear(&self) -> usize {
        let removed = self.events.len();
        self.events.clear();
        removed
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Snapshot of every record's `(id, latitude, longitude)`.
    ///
    /// Used by reindex to repair the spatial index without holding the
    /// map's shard locks while inserting.
    pub fn positions(&self) -> Vec<(EventId, f64, f64)> {
        self.events
            .iter()
            .map(|entry| (entry.id, entry.latitude, entry.longitude))
            .collect()
    }
}
