//! Geohash type definitions

/// Valid latitude range in degrees.
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;

/// Valid longitude range in degrees.
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Maximum number of bit subdivisions per axis.
///
/// 26 steps per axis yields a 52-bit interleaved code, the reference
/// precision: cells of roughly 0.6 m × 0.6 m at the equator.
pub const MAX_STEP: u8 = 26;

/// Geographic bounding box of a geohash cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellBounds {
    /// Southern edge (degrees)
    pub lat_min: f64,
    /// Northern edge (degrees)
    pub lat_max: f64,
    /// Western edge (degrees)
    pub lon_min: f64,
    /// Eastern edge (degrees)
    pub lon_max: f64,
}

impl CellBounds {
    /// Center point of the cell as `(lat, lon)`.
    #[inline]
    pub fn center(&self) -> (f64, f64) {
        (
            (self.lat_min + self.lat_max) / 2.0,
            (self.lon_min + self.lon_max) / 2.0,
        )
    }

    /// North-south extent of the cell in degrees.
    #[inline]
    pub fn lat_span(&self) -> f64 {
        self.lat_max - self.lat_min
    }

    /// East-west extent of the cell in degrees.
    #[inline]
    pub fn lon_span(&self) -> f64 {
        self.lon_max - self.lon_min
    }

    /// Whether the cell contains the given point.
    #[inline]
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.lat_min && lat < self.lat_max && lon >= self.lon_min && lon < self.lon_max
    }
}

/// Half-open range `[start, end)` of full-precision geohash codes.
///
/// Produced by [`search_ranges`](super::search_ranges); consumed by the
/// spatial index as scan bounds over its ordered entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CodeRange {
    pub start: u64,
    pub end: u64,
}

impl CodeRange {
    /// Whether a full-precision code falls inside this range.
    #[inline]
    pub fn contains(&self, code: u64) -> bool {
        code >= self.start && code < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_bounds_center() {
        let bounds = CellBounds {
            lat_min: 10.0,
            lat_max: 20.0,
            lon_min: -40.0,
            lon_max: -30.0,
        };
        assert_eq!(bounds.center(), (15.0, -35.0));
        assert_eq!(bounds.lat_span(), 10.0);
        assert_eq!(bounds.lon_span(), 10.0);
    }

    #[test]
    fn test_cell_bounds_contains() {
        let bounds = CellBounds {
            lat_min: 0.0,
            lat_max: 1.0,
            lon_min: 0.0,
            lon_max: 1.0,
        };
        assert!(bounds.contains(0.5, 0.5));
        assert!(bounds.contains(0.0, 0.0), "southwest corner is inclusive");
        assert!(!bounds.contains(1.0, 0.5), "northern edge is exclusive");
        assert!(!bounds.contains(0.5, 1.0), "eastern edge is exclusive");
    }

    #[test]
    fn test_code_range_contains() {
        let range = CodeRange { start: 100, end: 200 };
        assert!(range.contains(100));
        assert!(range.contains(199));
        assert!(!range.contains(200), "end is exclusive");
        assert!(!range.contains(99));
    }
}
