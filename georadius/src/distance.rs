//! Great-circle distance on the reference sphere.

/// Earth radius in kilometers (mean radius used by the reference
/// geospatial index).
pub const EARTH_RADIUS_KM: f64 = 6372.797_560_856;

/// Haversine distance between two points, in kilometers.
///
/// Exact on the reference sphere; used as the refinement pass after an
/// approximate geohash cell scan. Inputs are degrees.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}
