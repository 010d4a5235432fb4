//! Event data model.
//!
//! An [`Event`] is the unit of storage: a named point with an open
//! string-to-string attribute map. The engine never interprets
//! attribute contents; they ride along for the embedding service
//! (city tags, external references, and so on).

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque unique identifier of an event.
///
/// Minted once at creation and never reused; the total `Ord` on ids
/// gives searches their deterministic tie-break order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    /// Mints a fresh random identifier.
    pub(crate) fn mint() -> Self {
        Self(Uuid::new_v4())
    }

    /// The smallest possible id; used as a scan bound, never stored.
    pub(crate) fn lower_bound() -> Self {
        Self(Uuid::nil())
    }

    /// Underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A stored event record.
///
/// Coordinates are immutable after creation; relocating an event means
/// delete and recreate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    /// Degrees, [-90, 90]
    pub latitude: f64,
    /// Degrees, [-180, 180]
    pub longitude: f64,
    /// Free-form metadata, opaque to the engine.
    pub attributes: HashMap<String, String>,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied portion of an event, consumed by
/// [`EventCatalog::create`](crate::catalog::EventCatalog::create).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDraft {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

impl EventDraft {
    /// Creates a draft with no attributes.
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
            attributes: HashMap::new(),
        }
    }

    /// Adds a single attribute (builder style).
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minted_ids_are_unique() {
        let a = EventId::mint();
        let b = EventId::mint();
        assert_ne!(a, b);
    }

    #[test]
    fn test_lower_bound_sorts_first() {
        let id = EventId::mint();
        assert!(EventId::lower_bound() < id);
    }

    #[test]
    fn test_display_is_hyphenated_uuid() {
        let id = EventId::mint();
        let s = id.to_string();
        assert_eq!(s.len(), 36);
        assert_eq!(s.matches('-').count(), 4);
    }

    #[test]
    fn test_draft_builder() {
        let draft = EventDraft::new("Food Festival", 19.0760, 72.8777)
            .with_attribute("city", "Mumbai")
            .with_attribute("venue", "Bandra");
        assert_eq!(draft.name, "Food Festival");
        assert_eq!(draft.attributes.len(), 2);
        assert_eq!(draft.attributes["city"], "Mumbai");
    }

    #[test]
    fn test_event_serde_round_trip() {
        let event = Event {
            id: EventId::mint(),
            name: "Art Exhibition".to_string(),
            latitude: 12.9716,
            longitude: 77.5946,
            attributes: HashMap::from([("city".to_string(), "Bangalore".to_string())]),
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&event).expect("serialize");
        let back: Event = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, event);
    }

    #[test]
    fn test_draft_attributes_default_on_deserialize() {
        let draft: EventDraft =
            serde_json::from_str(r#"{"name":"Meetup","latitude":1.0,"longitude":2.0}"#)
                .expect("deserialize");
        assert!(draft.attributes.is_empty());
    }
}
