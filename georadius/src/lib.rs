//! GeoRadius - In-memory geospatial event index engine
//!
//! Stores point-located event records and answers "find all events
//! within radius R of point P, sorted by distance" with a two-phase
//! query: an approximate scan over a geohash-ordered index, then an
//! exact great-circle refinement. A parallel metadata store holds the
//! record data and is kept consistent with the index under concurrent
//! mutation.
//!
//! # High-Level API
//!
//! The [`catalog::EventCatalog`] is the public surface; it exclusively
//! owns the index and store:
//!
//! ```
//! use georadius::{EventCatalog, EventDraft, SearchQuery};
//!
//! let catalog = EventCatalog::new();
//! let id = catalog.create(
//!     EventDraft::new("Tech Meetup", 28.6139, 77.2090).with_attribute("city", "Delhi"),
//! )?;
//!
//! let hits = catalog.search(&SearchQuery::new(28.6139, 77.2090, 5.0))?;
//! assert_eq!(hits[0].event.id, id);
//! assert_eq!(hits[0].distance_km, 0.0);
//! # Ok::<(), georadius::ValidationError>(())
//! ```

pub mod catalog;
pub mod config;
pub mod distance;
pub mod error;
pub mod event;
pub mod geohash;
pub mod index;
pub mod logging;
pub mod store;

pub use catalog::{CatalogStats, EventCatalog, SearchHit, SearchQuery};
pub use config::CatalogConfig;
pub use error::ValidationError;
pub use event::{Event, EventDraft, EventId};

/// Version of the GeoRadius library.
///
/// Defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
