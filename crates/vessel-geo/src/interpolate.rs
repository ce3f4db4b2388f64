//! Planar interpolation between two coordinates.
//!
//! Linear in lat/lon space, not along the great circle. Accurate enough for
//! the short spans the simulation covers.

use glam::DVec2;

use vessel_core::types::Coordinate;

/// Point at `fraction` of the way from `start` to `end`, per axis.
///
/// Computed as `start * (1 - f) + end * f`, equal to
/// `start + (end - start) * f` but exact at both `f = 0` and `f = 1`.
/// No clamping: callers keep `fraction` in `[0, 1]` and must not pass NaN.
pub fn interpolate(start: Coordinate, end: Coordinate, fraction: f64) -> Coordinate {
    Coordinate::from_dvec2(lerp(start.to_dvec2(), end.to_dvec2(), fraction))
}

fn lerp(a: DVec2, b: DVec2, t: f64) -> DVec2 {
    a * (1.0 - t) + b * t
}
