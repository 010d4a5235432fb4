//! Catalog statistics tracking.

use std::time::Instant;

/// Operation counters for monitoring and debugging.
///
/// Snapshots are cheap clones; counters only ever grow (a `clear` of
/// the catalog does not reset them).
#[derive(Debug, Clone)]
pub struct CatalogStats {
    // Mutation counters
    pub creates: u64,
    pub deletes: u64,
    pub clears: u64,
    /// Index entries restored by reindex runs.
    pub reindex_repairs: u64,

    // Query counters
    pub searches: u64,
    /// Candidates produced by approximate scans, before refinement.
    pub candidates_scanned: u64,
    /// Results surviving the exact-distance refinement.
    pub results_returned: u64,

    pub started_at: Instant,
}

impl Default for CatalogStats {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogStats {
    /// Creates a zeroed tracker.
    pub fn new() -> Self {
        Self {
            creates: 0,
            deletes: 0,
            clears: 0,
            reindex_repairs: 0,
            searches: 0,
            candidates_scanned: 0,
            results_returned: 0,
            started_at: Instant::now(),
        }
    }

    /// Fraction of scanned candidates that survived refinement
    /// (0.0 to 1.0).
    ///
    /// A low value means the cell scan is over-including heavily
    /// relative to the query radii in use.
    pub fn scan_precision(&self) -> f64 {
        if self.candidates_scanned == 0 {
            0.0
        } else {
            self.results_returned as f64 / self.candidates_scanned as f64
        }
    }

    /// Time elapsed since the tracker was created.
    pub fn uptime(&self) -> std::time::Duration {
        self.started_at.elapsed()
    }

    pub(super) fn record_create(&mut self) {
        self.creates += 1;
    }

    pub(super) fn record_delete(&mut self) {
        self.deletes += 1;
    }

    pub(super) fn record_clear(&mut self) {
        self.clears += 1;
    }

    pub(super) fn record_reindex(&mut self, repaired: u64) {
        self.reindex_repairs += repaired;
    }

    pub(super) fn record_search(&mut self, candidates: u64, results: u64) {
        self.searches += 1;
        self.candidates_scanned += candidates;
        self.results_returned += results;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_zeroed() {
        let stats = CatalogStats::new();
        assert_eq!(stats.creates, 0);
        assert_eq!(stats.searches, 0);
        assert_eq!(stats.scan_precision(), 0.0);
    }

    #[test]
    fn test_record_search_accumulates() {
        let mut stats = CatalogStats::new();
        stats.record_search(10, 4);
        stats.record_search(10, 6);

        assert_eq!(stats.searches, 2);
        assert_eq!(stats.candidates_scanned, 20);
        assert_eq!(stats.results_returned, 10);
        assert!((stats.scan_precision() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_record_mutations() {
        let mut stats = CatalogStats::new();
        stats.record_create();
        stats.record_create();
        stats.record_delete();
        stats.record_clear();
        stats.record_reindex(3);

        assert_eq!(stats.creates, 2);
        assert_eq!(stats.deletes, 1);
        assert_eq!(stats.clears, 1);
        assert_eq!(stats.reindex_repairs, 3);
    }
}
