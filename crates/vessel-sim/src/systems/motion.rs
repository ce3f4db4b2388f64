//! Time stepping and position derivation.
//!
//! Turns elapsed time into a completion fraction and the fraction into a
//! coordinate. All geo math is delegated to `vessel-geo`.

use vessel_core::enums::RunPhase;
use vessel_core::types::{Coordinate, TripPlan};
use vessel_geo::interpolate;

/// Sanitize a tick delta: NaN, infinite, and negative deltas advance by 0.
pub fn sanitize_delta(delta_ms: f64) -> f64 {
    if delta_ms.is_finite() {
        delta_ms.max(0.0)
    } else {
        0.0
    }
}

/// Next elapsed time, capped at the trip duration.
///
/// An undefined duration (NaN) leaves the sum uncapped; `f64::min` ignores NaN.
pub fn step_elapsed(elapsed_ms: f64, delta_ms: f64, total_time_ms: f64) -> f64 {
    (elapsed_ms + delta_ms).min(total_time_ms)
}

/// Run phase for an elapsed time under a plan.
pub fn phase_of(plan: &TripPlan, elapsed_ms: f64) -> RunPhase {
    match plan.finite_total_time_ms() {
        Some(total) if elapsed_ms >= total => RunPhase::Complete,
        _ => RunPhase::Running,
    }
}

/// Position for an elapsed time, or `None` when it can't be derived.
///
/// `None` means the caller keeps its last valid position.
pub fn position_at(
    start: Coordinate,
    end: Coordinate,
    plan: &TripPlan,
    elapsed_ms: f64,
) -> Option<Coordinate> {
    let fraction = plan.fraction_at(elapsed_ms)?;
    let position = interpolate(start, end, fraction);
    position.is_finite().then_some(position)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_delta() {
        assert_eq!(sanitize_delta(500.0), 500.0);
        assert_eq!(sanitize_delta(-1.0), 0.0);
        assert_eq!(sanitize_delta(f64::NAN), 0.0);
        assert_eq!(sanitize_delta(f64::INFINITY), 0.0);
    }

    #[test]
    fn test_step_elapsed_caps_at_total() {
        assert_eq!(step_elapsed(900.0, 500.0, 1000.0), 1000.0);
        assert_eq!(step_elapsed(0.0, 500.0, 1000.0), 500.0);
        assert_eq!(step_elapsed(0.0, 500.0, f64::INFINITY), 500.0);
        assert_eq!(step_elapsed(0.0, 500.0, f64::NAN), 500.0);
    }

    #[test]
    fn test_phase_of() {
        let plan = TripPlan::new(10.0, 20.0);
        assert_eq!(phase_of(&plan, 0.0), RunPhase::Running);
        assert_eq!(phase_of(&plan, plan.total_time_ms), RunPhase::Complete);

        let stopped = TripPlan::new(10.0, 0.0);
        assert_eq!(phase_of(&stopped, 1e12), RunPhase::Running);

        let empty = TripPlan::new(0.0, 20.0);
        assert_eq!(phase_of(&empty, 0.0), RunPhase::Complete);
    }

    #[test]
    fn test_position_at_past_duration_is_end() {
        let start = Coordinate::new(0.0, 0.0);
        let end = Coordinate::new(1.0, 1.0);
        let plan = TripPlan::new(10.0, 20.0);
        assert_eq!(
            position_at(start, end, &plan, plan.total_time_ms * 3.0),
            Some(end)
        );
        assert_eq!(phase_of(&plan, plan.total_time_ms * 3.0), RunPhase::Complete);
    }

    #[test]
    fn test_position_at_undefined_fraction() {
        let start = Coordinate::new(0.0, 0.0);
        let end = Coordinate::new(1.0, 1.0);
        assert_eq!(position_at(start, end, &TripPlan::new(10.0, 0.0), 100.0), None);
        assert_eq!(
            position_at(start, end, &TripPlan::new(10.0, 20.0), 0.0),
            Some(start)
        );
    }
}
