//! Catalog configuration: defaults and bounds.

/// Default ceiling on search radius: half of Earth's circumference.
///
/// Any larger radius covers the whole sphere anyway and only inflates
/// the candidate set.
pub const DEFAULT_MAX_RADIUS_KM: f64 = 20_000.0;

/// Default maximum event name length, in characters.
pub const DEFAULT_MAX_NAME_LEN: usize = 256;

/// Tunable limits for an [`EventCatalog`](crate::catalog::EventCatalog).
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogConfig {
    /// Upper bound accepted for a search radius, in kilometers.
    pub max_radius_km: f64,
    /// Upper bound accepted for an event name, in characters.
    pub max_name_len: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            max_radius_km: DEFAULT_MAX_RADIUS_KM,
            max_name_len: DEFAULT_MAX_NAME_LEN,
        }
    }
}

impl CatalogConfig {
    /// Returns the config with out-of-bounds limits clamped back to
    /// their defaults, logging a warning for each adjustment.
    pub fn normalized(mut self) -> Self {
        if !self.max_radius_km.is_finite() || self.max_radius_km <= 0.0 {
            tracing::warn!(
                requested = self.max_radius_km,
                default = DEFAULT_MAX_RADIUS_KM,
                "max_radius_km must be positive and finite, using default"
            );
            self.max_radius_km = DEFAULT_MAX_RADIUS_KM;
        }
        if self.max_name_len == 0 {
            tracing::warn!(
                default = DEFAULT_MAX_NAME_LEN,
                "max_name_len must be nonzero, using default"
            );
            self.max_name_len = DEFAULT_MAX_NAME_LEN;
        }
        self
    }
}
