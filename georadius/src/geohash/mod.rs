//! Geohash codec
//!
//! Converts geographic coordinates (latitude/longitude) to and from a
//! fixed-precision interleaved bit code usable as a 1-D ordering key.
//! Points close in (lat, lon) space tend to produce numerically close
//! codes, which lets an ordered structure answer approximate-region
//! queries with range scans.
//!
//! The encoding interleaves the binary subdivisions of the longitude
//! and latitude ranges, longitude bit first, 26 subdivisions per axis
//! at full precision (52-bit codes).
//!
//! Codes are approximate by construction: cells near the query circle's
//! edge contain points outside the circle, so every range scan must be
//! followed by an exact-distance refinement pass downstream.

mod types;

pub use types::{CellBounds, CodeRange, MAX_LAT, MAX_LON, MAX_STEP, MIN_LAT, MIN_LON};

use crate::distance::EARTH_RADIUS_KM;

/// Half of Earth's circumference along the equator, in kilometers.
///
/// Upper bound on any meaningful search radius; also the anchor for the
/// radius-to-step estimate.
const MERCATOR_MAX_KM: f64 = 20_037.726;

/// Encodes coordinates at full precision (52-bit code).
#[inline]
pub fn encode(lat: f64, lon: f64) -> u64 {
    encode_at(lat, lon, MAX_STEP)
}

/// Encodes coordinates into an interleaved code of `2 * step` bits.
///
/// Each step halves both axis ranges once, emitting the longitude bit
/// then the latitude bit. Inputs are expected to be pre-validated;
/// out-of-range values are clamped by the subdivision itself rather
/// than rejected.
pub fn encode_at(lat: f64, lon: f64, step: u8) -> u64 {
    debug_assert!((1..=MAX_STEP).contains(&step));

    let mut lat_lo = MIN_LAT;
    let mut lat_hi = MAX_LAT;
    let mut lon_lo = MIN_LON;
    let mut lon_hi = MAX_LON;
    let mut code: u64 = 0;

    for _ in 0..step {
        let lon_mid = (lon_lo + lon_hi) / 2.0;
        code <<= 1;
        if lon >= lon_mid {
            code |= 1;
            lon_lo = lon_mid;
        } else {
            lon_hi = lon_mid;
        }

        let lat_mid = (lat_lo + lat_hi) / 2.0;
        code <<= 1;
        if lat >= lat_mid {
            code |= 1;
            lat_lo = lat_mid;
        } else {
            lat_hi = lat_mid;
        }
    }

    code
}

/// Returns the geographic cell a code of `2 * step` bits represents.
pub fn decode_bounds(code: u64, step: u8) -> CellBounds {
    debug_assert!((1..=MAX_STEP).contains(&step));

    let mut lat_min = MIN_LAT;
    let mut lat_max = MAX_LAT;
    let mut lon_min = MIN_LON;
    let mut lon_max = MAX_LON;

    for i in (0..step).rev() {
        let lon_bit = (code >> (2 * i + 1)) & 1;
        let lon_mid = (lon_min + lon_max) / 2.0;
        if lon_bit == 1 {
            lon_min = lon_mid;
        } else {
            lon_max = lon_mid;
        }

        let lat_bit = (code >> (2 * i)) & 1;
        let lat_mid = (lat_min + lat_max) / 2.0;
        if lat_bit == 1 {
            lat_min = lat_mid;
        } else {
            lat_max = lat_mid;
        }
    }

    CellBounds {
        lat_min,
        lat_max,
        lon_min,
        lon_max,
    }
}

/// Estimates the coarsest subdivision step whose cell still
/// circumscribes a circle of `radius_km`.
///
/// Derived by repeated halving against [`MERCATOR_MAX_KM`], then
/// widened by two steps so the center cell covers the circle in most
/// cases, and widened further near the poles where cells shrink
/// east-west. Result is clamped to `[1, MAX_STEP]`.
pub fn estimate_step_for_radius(radius_km: f64, lat: f64) -> u8 {
    if radius_km <= 0.0 {
        return MAX_STEP;
    }

    let mut step: i32 = 1;
    let mut range = radius_km;
    while range < MERCATOR_MAX_KM && step < MAX_STEP as i32 {
        range *= 2.0;
        step += 1;
    }
    step -= 2;

    // High-latitude cells are narrower in ground distance; widen.
    if lat.abs() > 80.0 {
        step -= 2;
    } else if lat.abs() > 66.0 {
        step -= 1;
    }

    step.clamp(1, MAX_STEP as i32) as u8
}

/// Picks the subdivision step whose 3×3 neighborhood is guaranteed to
/// cover the search circle.
///
/// Starts from [`estimate_step_for_radius`], then verifies the cell's
/// ground extent: cells keep a fixed degree size, so their east-west
/// ground width shrinks with `cos(lat)` and can fall below the radius
/// at mid and high latitudes. The step is decreased (cells doubled)
/// until one neighbor cell spans at least `radius_km` on both axes,
/// measured at the widest latitude the circle reaches. Near a pole
/// the width requirement becomes unsatisfiable and the loop bottoms
/// out at step 1, where the cells cover the whole sphere.
fn covering_step(lat: f64, radius_km: f64) -> u8 {
    let mut step = estimate_step_for_radius(radius_km, lat);

    let lat_extent_deg = (radius_km / EARTH_RADIUS_KM).to_degrees();
    let widest_lat = (lat.abs() + lat_extent_deg).min(MAX_LAT);
    let cos_widest = widest_lat.to_radians().cos();

    while step > 1 {
        let cell_height_km =
            (180.0 / (1u64 << step) as f64).to_radians() * EARTH_RADIUS_KM;
        let cell_width_km = 2.0 * cell_height_km * cos_widest;
        if cell_height_km >= radius_km && cell_width_km >= radius_km {
            break;
        }
        step -= 1;
    }
    step
}

/// Computes the full-precision code ranges covering a radius query.
///
/// Takes the center cell at the estimated step plus its eight
/// neighbors (the 3×3 neighborhood — required so points just across a
/// cell boundary are never missed), expands each cell to its half-open
/// range of 52-bit codes, and merges adjacent ranges.
///
/// The result is over-inclusive: it covers the circumscribing square
/// of the circle plus boundary slack. Callers must refine candidates
/// with an exact distance check.
pub fn search_ranges(lat: f64, lon: f64, radius_km: f64) -> Vec<CodeRange> {
    let step = covering_step(lat, radius_km);
    let center_code = encode_at(lat, lon, step);
    let bounds = decode_bounds(center_code, step);
    let (cell_lat, cell_lon) = bounds.center();
    let lat_span = bounds.lat_span();
    let lon_span = bounds.lon_span();

    let mut cells = Vec::with_capacity(9);
    for row in -1i8..=1 {
        let neighbor_lat = cell_lat + f64::from(row) * lat_span;
        // Rows beyond the poles have no cells; skip rather than clamp
        // so the pole cell is not scanned twice.
        if !(MIN_LAT..=MAX_LAT).contains(&neighbor_lat) {
            continue;
        }
        for col in -1i8..=1 {
            let mut neighbor_lon = cell_lon + f64::from(col) * lon_span;
            // Longitude wraps at the antimeridian.
            if neighbor_lon >= MAX_LON {
                neighbor_lon -= 360.0;
            } else if neighbor_lon < MIN_LON {
                neighbor_lon += 360.0;
            }
            cells.push(encode_at(neighbor_lat, neighbor_lon, step));
        }
    }

    cells.sort_unstable();
    cells.dedup();

    let shift = 2 * (MAX_STEP - step) as u32;
    let mut ranges: Vec<CodeRange> = Vec::with_capacity(cells.len());
    for cell in cells {
        let start = cell << shift;
        let end = (cell + 1) << shift;
        match ranges.last_mut() {
            // Coalesce cells that are adjacent in code order.
            Some(last) if last.end == start => last.end = end,
            _ => ranges.push(CodeRange { start, end }),
        }
    }

    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_origin() {
        // At (0, 0) the first subdivision of each axis takes the upper
        // half and every later one the lower half: bits 11 then zeros.
        let code = encode(0.0, 0.0);
        assert_eq!(code, 0b11 << 50);
    }

    #[test]
    fn test_encode_is_deterministic() {
        let a = encode(28.6139, 77.2090);
        let b = encode(28.6139, 77.2090);
        assert_eq!(a, b);
    }

    #[test]
    fn test_encode_distinct_points_distinct_codes() {
        let delhi = encode(28.6139, 77.2090);
        let mumbai = encode(19.0760, 72.8777);
        assert_ne!(delhi, mumbai);
    }

    #[test]
    fn test_encode_nearby_points_share_prefix() {
        // ~700 m apart: codes must agree on many leading bits.
        let a = encode(28.6139, 77.2090);
        let b = encode(28.6200, 77.2100);
        let differing = (a ^ b).leading_zeros();
        assert!(
            differing >= 12 + 24,
            "nearby points should share a long code prefix, shared bits: {}",
            differing as i32 - 12
        );
    }

    #[test]
    fn test_decode_bounds_contains_encoded_point() {
        for &(lat, lon) in &[
            (28.6139, 77.2090),
            (-33.8688, 151.2093),
            (0.0, 0.0),
            (89.9, -179.9),
            (-89.9, 179.9),
        ] {
            for step in [1, 5, 13, 26] {
                let code = encode_at(lat, lon, step);
                let bounds = decode_bounds(code, step);
                assert!(
                    bounds.contains(lat, lon),
                    "({}, {}) not in {:?} at step {}",
                    lat,
                    lon,
                    bounds,
                    step
                );
            }
        }
    }

    #[test]
    fn test_decode_bounds_center_reencodes_to_same_code() {
        let code = encode_at(48.8566, 2.3522, 20);
        let (lat, lon) = decode_bounds(code, 20).center();
        assert_eq!(encode_at(lat, lon, 20), code);
    }

    #[test]
    fn test_full_precision_cell_is_small() {
        let bounds = decode_bounds(encode(51.5074, -0.1278), MAX_STEP);
        // 26 halvings of 180°/360° leave sub-centimeter-scale degrees.
        assert!(bounds.lat_span() < 1e-5);
        assert!(bounds.lon_span() < 1e-5);
    }

    #[test]
    fn test_estimate_step_large_radius_is_coarse() {
        assert_eq!(estimate_step_for_radius(20_000.0, 0.0), 1);
        assert_eq!(estimate_step_for_radius(40_000.0, 0.0), 1);
    }

    #[test]
    fn test_estimate_step_small_radius_is_fine() {
        let step = estimate_step_for_radius(0.001, 0.0);
        assert!(step >= 20, "1 m radius should use a fine step, got {}", step);
    }

    #[test]
    fn test_estimate_step_shrinks_near_poles() {
        let equator = estimate_step_for_radius(10.0, 0.0);
        let arctic = estimate_step_for_radius(10.0, 70.0);
        let pole = estimate_step_for_radius(10.0, 85.0);
        assert!(arctic < equator);
        assert!(pole < arctic);
    }

    #[test]
    fn test_estimate_step_monotonic_in_radius() {
        let mut prev = MAX_STEP;
        for radius in [0.01, 0.1, 1.0, 10.0, 100.0, 1_000.0, 10_000.0] {
            let step = estimate_step_for_radius(radius, 0.0);
            assert!(step <= prev, "step must not grow with radius");
            prev = step;
        }
    }

    #[test]
    fn test_search_ranges_cover_points_inside_radius() {
        // Points well within 5 km of the center must fall inside the
        // unioned ranges (no false negatives from the cell scan).
        let (lat, lon) = (28.6139, 77.2090);
        let ranges = search_ranges(lat, lon, 5.0);

        for &(p_lat, p_lon) in &[
            (28.6139, 77.2090),
            (28.6200, 77.2100),
            (28.5800, 77.2090),
            (28.6139, 77.2500),
            (28.6400, 77.1800),
        ] {
            let code = encode(p_lat, p_lon);
            assert!(
                ranges.iter().any(|r| r.contains(code)),
                "({}, {}) escaped the scan ranges",
                p_lat,
                p_lon
            );
        }
    }

    #[test]
    fn test_search_ranges_sorted_and_disjoint() {
        let ranges = search_ranges(40.7128, -74.0060, 25.0);
        assert!(!ranges.is_empty());
        for pair in ranges.windows(2) {
            assert!(
                pair[0].end < pair[1].start,
                "ranges must be sorted, disjoint, and merged: {:?}",
                pair
            );
        }
    }

    #[test]
    fn test_search_ranges_at_most_nine_cells() {
        let ranges = search_ranges(12.9716, 77.5946, 50.0);
        assert!(ranges.len() <= 9);
    }

    #[test]
    fn test_search_ranges_cover_radius_at_high_latitude() {
        // At 65.9°N cells are less than half as wide on the ground as
        // at the equator; the scan must widen its step so a point
        // ~17.6 km east is still inside the unioned ranges.
        let ranges = search_ranges(65.9, 0.3515, 19.5);
        let code = encode(65.9, 0.74);
        assert!(
            ranges.iter().any(|r| r.contains(code)),
            "in-radius point east of the center escaped the scan"
        );
    }

    #[test]
    fn test_search_ranges_cover_circle_across_pole() {
        // A 120 km circle at 89.5°N reaches over the pole: the point
        // on the opposite meridian (~111 km away) must be covered.
        let ranges = search_ranges(89.5, 120.0, 120.0);
        let code = encode(89.5, -60.0);
        assert!(
            ranges.iter().any(|r| r.contains(code)),
            "point across the pole escaped the scan"
        );
    }

    #[test]
    fn test_search_ranges_near_pole_skips_missing_rows() {
        // No panic and no empty result when the neighborhood crosses
        // the pole.
        let ranges = search_ranges(89.99, 0.0, 10.0);
        assert!(!ranges.is_empty());
    }

    #[test]
    fn test_search_ranges_wrap_antimeridian() {
        let ranges = search_ranges(0.0, 179.999, 10.0);
        let east_code = encode(0.0, 179.998);
        let west_code = encode(0.0, -179.998);
        assert!(ranges.iter().any(|r| r.contains(east_code)));
        assert!(
            ranges.iter().any(|r| r.contains(west_code)),
            "scan must wrap across the antimeridian"
        );
    }
}
