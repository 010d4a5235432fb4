//! Error types for catalog operations.
//!
//! Validation failures are the only errors surfaced to callers: they
//! are reported with a field-level message, never retried internally,
//! and leave no partial state behind. Absence (a missing id during a
//! scan, an empty search result) is modeled as `None`/empty, not as an
//! error — concurrent deletion during a scan is an expected race.

/// A request was rejected before any state was written.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Event name was empty.
    #[error("name invalid: must not be empty")]
    EmptyName,

    /// Event name exceeded the configured maximum length.
    #[error("name invalid: {len} characters exceeds maximum of {max}")]
    NameTooLong { len: usize, max: usize },

    /// Latitude outside [-90, 90] degrees.
    #[error("lat invalid: {0} outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    /// Longitude outside [-180, 180] degrees.
    #[error("lon invalid: {0} outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    /// Search radius not in (0, max] kilometers.
    #[error("radius invalid: {radius_km} km not in (0, {max_km}]")]
    RadiusOutOfRange { radius_km: f64, max_km: f64 },

    /// A draft inside a batch failed validation; nothing was written.
    #[error("batch item {index} invalid: {source}")]
    BatchItem {
        index: usize,
        source: Box<ValidationError>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offending_field() {
        assert!(ValidationError::EmptyName.to_string().starts_with("name"));
        assert!(ValidationError::NameTooLong { len: 300, max: 256 }
            .to_string()
            .starts_with("name"));
        assert!(ValidationError::LatitudeOutOfRange(91.0)
            .to_string()
            .starts_with("lat"));
        assert!(ValidationError::LongitudeOutOfRange(-181.0)
            .to_string()
            .starts_with("lon"));
        assert!(ValidationError::RadiusOutOfRange {
            radius_km: -1.0,
            max_km: 20_000.0
        }
        .to_string()
        .starts_with("radius"));
    }

    #[test]
    fn test_batch_item_names_index_and_cause() {
        let err = ValidationError::BatchItem {
            index: 3,
            source: Box::new(ValidationError::EmptyName),
        };
        let msg = err.to_string();
        assert!(msg.contains("batch item 3"));
        assert!(msg.contains("name invalid"));
    }

    #[test]
    fn test_batch_item_exposes_source() {
        use std::error::Error;

        let err = ValidationError::BatchItem {
            index: 0,
            source: Box::new(ValidationError::LatitudeOutOfRange(100.0)),
        };
        let source = err.source().expect("batch error should chain its cause");
        assert!(source.to_string().starts_with("lat"));
    }
}
