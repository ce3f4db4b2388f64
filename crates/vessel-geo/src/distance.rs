//! Great-circle distance and bearing on a spherical Earth.

use vessel_core::constants::EARTH_RADIUS_KM;
use vessel_core::types::Coordinate;

/// Haversine great-circle distance in kilometres.
///
/// Zero for identical coordinates, symmetric, never negative. The haversine
/// term is clamped to `[0, 1]` so antipodal rounding can't leave the domain of `sqrt`.
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    // abs keeps the result bit-identical when the arguments are swapped
    let d_lat = (b.lat - a.lat).abs().to_radians();
    let d_lon = (b.lon - a.lon).abs().to_radians();

    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let h = h.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Initial bearing (forward azimuth) from `a` toward `b` in degrees, 0 = North, clockwise.
///
/// Returns 0 when the points coincide.
pub fn initial_bearing(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let y = d_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();
    if x == 0.0 && y == 0.0 {
        return 0.0;
    }

    let bearing = y.atan2(x).to_degrees().rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if bearing >= 360.0 {
        0.0
    } else {
        bearing
    }
}
