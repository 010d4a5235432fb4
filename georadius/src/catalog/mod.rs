//! Event catalog: the public orchestrator.
//!
//! Owns the [`SpatialIndex`] and the [`MetadataStore`] exclusively and
//! keeps them mutually consistent under concurrent mutation. Every
//! mutating call flows store-write then index-write; every query flows
//! index-scan then exact-distance refinement then store batch-fetch.
//!
//! # Consistency
//!
//! A record becomes visible to searches only once both writes have
//! completed. The store is always written first, so an id seen in the
//! index always has metadata behind it; the only permitted transient
//! inconsistency is metadata-without-index, which
//! [`EventCatalog::reindex`] repairs.
//!
//! # Thread Safety
//!
//! - Catalog-level access: `RwLock` — `clear` is the sole writer and
//!   gets exclusive access to both structures for its duration.
//! - Everything else takes the read lock and relies on the interior
//!   thread-safety of the index and store, so unrelated creates and
//!   searches never serialize against each other.
//! - `delete` and `reindex` additionally hold a repair lock against
//!   each other: a reindex snapshot must never re-insert the index
//!   entry of a record deleted mid-repair.

mod stats;

pub use stats::CatalogStats;

use std::cmp::Ordering;
use std::sync::{Mutex, RwLock};

use chrono::Utc;
use serde::Serialize;

use crate::config::CatalogConfig;
use crate::distance::haversine_km;
use crate::error::ValidationError;
use crate::event::{Event, EventDraft, EventId};
use crate::index::SpatialIndex;
use crate::store::MetadataStore;

/// A radius query against the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    /// Query center latitude, degrees.
    pub latitude: f64,
    /// Query center longitude, degrees.
    pub longitude: f64,
    /// Search radius in kilometers; matches use `distance <= radius`.
    pub radius_km: f64,
    /// Truncate results to at most this many, closest first.
    pub max_results: Option<usize>,
}

impl SearchQuery {
    /// Builds an unbounded query.
    pub fn new(latitude: f64, longitude: f64, radius_km: f64) -> Self {
        Self {
            latitude,
            longitude,
            radius_km,
            max_results: None,
        }
    }

    /// Caps the number of returned results (builder style).
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = Some(max_results);
        self
    }
}

/// A search match: the record plus its great-circle distance from the
/// query center, rounded to 2 decimal places of kilometers.
///
/// Ordering and radius inclusion are decided on the full-precision
/// distance before rounding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub event: Event,
    pub distance_km: f64,
}

/// Both stores, guarded together so `clear` can exclude everything.
#[derive(Debug, Default)]
struct CatalogCore {
    index: SpatialIndex,
    store: MetadataStore,
}

/// In-memory geospatial event catalog.
///
/// Construct one and share it by reference (or `Arc`) with every
/// caller; no other component may mutate the index or store directly.
#[derive(Debug)]
pub struct EventCatalog {
    core: RwLock<CatalogCore>,
    /// Serializes `delete` against `reindex` (both rare). Without it,
    /// a reindex snapshot can outlive a racing delete and re-insert
    /// the deleted id's index entry, leaving an index orphan — the
    /// one inconsistency direction the catalog forbids. Creates and
    /// searches never take this lock.
    repair_lock: Mutex<()>,
    config: CatalogConfig,
    stats: Mutex<CatalogStats>,
}

impl Default for EventCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl EventCatalog {
    /// Creates an empty catalog with default limits.
    pub fn new() -> Self {
        Self::with_config(CatalogConfig::default())
    }

    /// Creates an empty catalog with the given limits.
    ///
    /// Out-of-bounds limits are replaced with defaults (with a logged
    /// warning) rather than rejected.
    pub fn with_config(config: CatalogConfig) -> Self {
        Self {
            core: RwLock::new(CatalogCore::default()),
            repair_lock: Mutex::new(()),
            config: config.normalized(),
            stats: Mutex::new(CatalogStats::new()),
        }
    }

    /// Validates a draft, mints a fresh id, and stores the event.
    ///
    /// Writes metadata first, then the index entry, so a concurrent
    /// search that sees the id in the index always finds its record.
    /// On validation failure nothing is written.
    pub fn create(&self, draft: EventDraft) -> Result<EventId, ValidationError> {
        self.validate_draft(&draft)?;

        let core = self.core.read().expect("catalog lock poisoned");
        let id = self.apply_create(&core, draft);
        Ok(id)
    }

    /// Bulk-loads a batch of drafts, returning the minted ids in input
    /// order.
    ///
    /// Every draft is validated before anything is written; a failure
    /// names the offending batch index and leaves the catalog
    /// untouched. Application is per item (a search running midway
    /// through the batch sees a prefix of it), matching pipelined
    /// loading semantics.
    pub fn create_batch(&self, drafts: Vec<EventDraft>) -> Result<Vec<EventId>, ValidationError> {
        for (index, draft) in drafts.iter().enumerate() {
            self.validate_draft(draft)
                .map_err(|source| ValidationError::BatchItem {
                    index,
                    source: Box::new(source),
                })?;
        }

        let core = self.core.read().expect("catalog lock poisoned");
        let ids = drafts
            .into_iter()
            .map(|draft| self.apply_create(&core, draft))
            .collect();
        Ok(ids)
    }

    /// Finds every event within `radius_km` of the query center,
    /// closest first.
    ///
    /// Two phases: an approximate scan over the geohash cell
    /// neighborhood, then an exact haversine refinement that drops the
    /// cell-boundary false positives. Equal distances are ordered by
    /// id. Returns an empty vector (not an error) when nothing
    /// matches; candidates whose metadata vanished mid-query are
    /// silently skipped.
    pub fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>, ValidationError> {
        self.validate_query(query)?;

        let core = self.core.read().expect("catalog lock poisoned");
        let candidates = core
            .index
            .range_scan(query.latitude, query.longitude, query.radius_km);
        let candidate_count = candidates.len();

        let mut matches: Vec<(f64, Event)> = core
            .store
            .batch_get(&candidates)
            .into_iter()
            .flatten()
            .filter_map(|event| {
                let distance = haversine_km(
                    query.latitude,
                    query.longitude,
                    event.latitude,
                    event.longitude,
                );
                (distance <= query.radius_km).then_some((distance, event))
            })
            .collect();
        drop(core);

        matches.sort_by(|a, b| match a.0.total_cmp(&b.0) {
            Ordering::Equal => a.1.id.cmp(&b.1.id),
            other => other,
        });
        if let Some(max) = query.max_results {
            matches.truncate(max);
        }

        let hits: Vec<SearchHit> = matches
            .into_iter()
            .map(|(distance, event)| SearchHit {
                event,
                distance_km: round_km(distance),
            })
            .collect();

        tracing::debug!(
            candidates = candidate_count,
            matches = hits.len(),
            radius_km = query.radius_km,
            "search refined"
        );
        let mut stats = self.stats.lock().expect("stats lock poisoned");
        stats.record_search(candidate_count as u64, hits.len() as u64);
        drop(stats);

        Ok(hits)
    }

    /// Deletes a single event, returning its record if it existed.
    ///
    /// The index entry is removed before the metadata (the reverse of
    /// `create`'s ordering), so a reader never sees an index hit
    /// without metadata behind it.
    pub fn delete(&self, id: &EventId) -> Option<Event> {
        let core = self.core.read().expect("catalog lock poisoned");
        let event = core.store.get(id)?;
        // Exclude reindex while both entries come out, so its snapshot
        // cannot resurrect this id's index entry afterwards.
        let repair = self.repair_lock.lock().expect("repair lock poisoned");
        core.index.remove(event.id, event.latitude, event.longitude);
        let removed = core.store.remove(id);
        drop(repair);
        drop(core);

        if removed.is_some() {
            tracing::debug!(%id, "event deleted");
            let mut stats = self.stats.lock().expect("stats lock poisoned");
            stats.record_delete();
        }
        removed
    }

    /// Number of searchable events.
    ///
    /// The spatial index is the source of truth: a record present only
    /// in metadata (awaiting reindex) is not counted.
    pub fn count(&self) -> usize {
        let core = self.core.read().expect("catalog lock poisoned");
        core.index.len()
    }

    /// Empties both stores, returning the pre-clear index cardinality.
    ///
    /// Holds the catalog write lock for the duration: concurrent
    /// operations either complete entirely before the clear or observe
    /// the empty state entirely after it. Destructive and
    /// irreversible.
    pub fn clear(&self) -> usize {
        let core = self.core.write().expect("catalog lock poisoned");
        let removed = core.index.len();
        core.index.clear();
        core.store.clear();
        drop(core);

        tracing::info!(removed, "catalog cleared");
        let mut stats = self.stats.lock().expect("stats lock poisoned");
        stats.record_clear();
        removed
    }

    /// Repairs the spatial index from the metadata store.
    ///
    /// Inserts an index entry for every stored record whose id is
    /// missing and returns how many were actually inserted (zero on a
    /// repeat run — the operation is idempotent). Safe to run
    /// concurrently with creates: a record's code never changes, so a
    /// racing insert of the same entry is a no-op.
    pub fn reindex(&self) -> usize {
        let core = self.core.read().expect("catalog lock poisoned");
        // Taken before the snapshot: with deletes excluded, every
        // snapshot entry keeps its metadata until the repair is done,
        // so no insert can create an index orphan. Racing creates are
        // harmless — re-inserting an existing pair is a no-op.
        let repair = self.repair_lock.lock().expect("repair lock poisoned");
        let mut repaired = 0;
        for (id, lat, lon) in core.store.positions() {
            if core.index.insert(id, lat, lon) {
                repaired += 1;
            }
        }
        drop(repair);
        drop(core);

        if repaired > 0 {
            // A nonzero repair count means creates lost their index
            // write at some point; surface it, don't drop it.
            tracing::warn!(repaired, "reindex restored missing index entries");
        } else {
            tracing::debug!("reindex found no missing entries");
        }
        let mut stats = self.stats.lock().expect("stats lock poisoned");
        stats.record_reindex(repaired as u64);
        repaired
    }

    /// Snapshot of the operation counters.
    pub fn stats(&self) -> CatalogStats {
        let stats = self.stats.lock().expect("stats lock poisoned");
        stats.clone()
    }

    /// Store-then-index write for a pre-validated draft.
    fn apply_create(&self, core: &CatalogCore, draft: EventDraft) -> EventId {
        let event = Event {
            id: EventId::mint(),
            name: draft.name,
            latitude: draft.latitude,
            longitude: draft.longitude,
            attributes: draft.attributes,
            created_at: Utc::now(),
        };
        let id = event.id;
        let (lat, lon) = (event.latitude, event.longitude);

        core.store.put(event);
        core.index.insert(id, lat, lon);

        tracing::debug!(%id, lat, lon, "event created");
        let mut stats = self.stats.lock().expect("stats lock poisoned");
        stats.record_create();
        id
    }

    fn validate_draft(&self, draft: &EventDraft) -> Result<(), ValidationError> {
        if draft.name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let len = draft.name.chars().count();
        if len > self.config.max_name_len {
            return Err(ValidationError::NameTooLong {
                len,
                max: self.config.max_name_len,
            });
        }
        validate_coordinates(draft.latitude, draft.longitude)
    }

    fn validate_query(&self, query: &SearchQuery) -> Result<(), ValidationError> {
        validate_coordinates(query.latitude, query.longitude)?;
        if !query.radius_km.is_finite()
            || query.radius_km <= 0.0
            || query.radius_km > self.config.max_radius_km
        {
            return Err(ValidationError::RadiusOutOfRange {
                radius_km: query.radius_km,
                max_km: self.config.max_radius_km,
            });
        }
        Ok(())
    }
}

fn validate_coordinates(lat: f64, lon: f64) -> Result<(), ValidationError> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(ValidationError::LatitudeOutOfRange(lat));
    }
    if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
        return Err(ValidationError::LongitudeOutOfRange(lon));
    }
    Ok(())
}

/// Rounds a distance to 2 decimal places for reporting.
fn round_km(distance: f64) -> f64 {
    (distance * 100.0).round() / 100.0
}
