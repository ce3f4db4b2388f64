//! Simulation engine, the core of the tracker.
//!
//! `SimulationEngine` owns the trip state, processes operator commands,
//! advances elapsed time on explicit ticks, and produces `VesselSnapshot`s.
//! Completely headless (no timer, no renderer), so every transition is
//! directly testable without waiting on real time.

use std::collections::VecDeque;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use vessel_core::commands::VesselCommand;
use vessel_core::constants::{
    DEFAULT_END, DEFAULT_SPEED_KMH, DEFAULT_START, MS_PER_HOUR, SPEED_STEP_KMH, TICK_PERIOD_MS,
};
use vessel_core::enums::{RunPhase, SpeedChangePolicy};
use vessel_core::events::VesselEvent;
use vessel_core::state::VesselSnapshot;
use vessel_core::types::{Coordinate, TripPlan};
use vessel_geo::distance;

use crate::systems;

/// Configuration for starting a new simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub start: Coordinate,
    pub end: Coordinate,
    /// Initial speed (km/h).
    pub initial_speed_kmh: f64,
    /// Step used by `IncreaseSpeed` / `DecreaseSpeed` (km/h).
    pub speed_step_kmh: f64,
    /// Wall-clock period of the host's tick driver (ms).
    pub tick_period_ms: u64,
    pub speed_policy: SpeedChangePolicy,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            start: DEFAULT_START,
            end: DEFAULT_END,
            initial_speed_kmh: DEFAULT_SPEED_KMH,
            speed_step_kmh: SPEED_STEP_KMH,
            tick_period_ms: TICK_PERIOD_MS,
            speed_policy: SpeedChangePolicy::default(),
        }
    }
}

impl SimConfig {
    /// Check that every value is usable before a run starts.
    pub fn validate(&self) -> Result<(), String> {
        for (name, c) in [("start", self.start), ("end", self.end)] {
            // NaN fails both range checks
            if !(-90.0..=90.0).contains(&c.lat) {
                return Err(format!("{name} latitude out of range: {}", c.lat));
            }
            if !(-180.0..=180.0).contains(&c.lon) {
                return Err(format!("{name} longitude out of range: {}", c.lon));
            }
        }
        if !self.initial_speed_kmh.is_finite() || self.initial_speed_kmh < 0.0 {
            return Err(format!(
                "initial speed must be a non-negative number, got {}",
                self.initial_speed_kmh
            ));
        }
        if !self.speed_step_kmh.is_finite() || self.speed_step_kmh <= 0.0 {
            return Err(format!(
                "speed step must be positive, got {}",
                self.speed_step_kmh
            ));
        }
        if self.tick_period_ms == 0 {
            return Err("tick period must be at least 1 ms".into());
        }
        Ok(())
    }
}

/// The simulation engine. Sole owner and writer of the trip state.
pub struct SimulationEngine {
    start: Coordinate,
    end: Coordinate,
    speed_kmh: f64,
    elapsed_ms: f64,
    plan: TripPlan,
    /// Last valid position. Only written by `recompute_position`.
    position: Coordinate,
    policy: SpeedChangePolicy,
    speed_step_kmh: f64,
    /// Last non-zero speed; the speed elapsed time is measured against when rescaling.
    reference_speed_kmh: Option<f64>,
    tick_count: u64,
    command_queue: VecDeque<VesselCommand>,
    events: Vec<VesselEvent>,
}

impl SimulationEngine {
    /// Create a new engine with the given config, at the start of the route.
    pub fn new(config: SimConfig) -> Self {
        let speed_kmh = sanitize_speed(config.initial_speed_kmh);
        let plan = TripPlan::new(distance(config.start, config.end), speed_kmh);
        let mut engine = Self {
            start: config.start,
            end: config.end,
            speed_kmh,
            elapsed_ms: 0.0,
            plan,
            position: config.start,
            policy: config.speed_policy,
            speed_step_kmh: config.speed_step_kmh,
            reference_speed_kmh: (speed_kmh > 0.0).then_some(speed_kmh),
            tick_count: 0,
            command_queue: VecDeque::new(),
            events: Vec::new(),
        };
        engine.recompute_position();
        engine
    }

    /// Queue a command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: VesselCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = VesselCommand>) {
        self.command_queue.extend(commands);
    }

    /// Apply queued commands, advance by `delta_ms`, and return the resulting snapshot.
    pub fn tick(&mut self, delta_ms: f64) -> VesselSnapshot {
        self.process_commands();
        if self.advance(delta_ms) {
            self.tick_count += 1;
        }
        self.snapshot()
    }

    /// Advance elapsed time by `delta_ms`, capped at the trip duration.
    ///
    /// Returns `false` without touching any state when the trip is complete,
    /// when the delta is empty, or when the vessel is stopped under
    /// `SpeedChangePolicy::RescaleElapsed`.
    pub fn advance(&mut self, delta_ms: f64) -> bool {
        let delta = systems::motion::sanitize_delta(delta_ms);
        if delta == 0.0 || self.phase() == RunPhase::Complete {
            return false;
        }
        if self.speed_kmh == 0.0 && self.policy == SpeedChangePolicy::RescaleElapsed {
            return false;
        }

        self.elapsed_ms =
            systems::motion::step_elapsed(self.elapsed_ms, delta, self.plan.total_time_ms);
        self.recompute_position();

        if self.phase() == RunPhase::Complete {
            info!(
                "vessel arrived at {} after {:.0} ms",
                self.end, self.elapsed_ms
            );
            self.events.push(VesselEvent::Arrived {
                elapsed_ms: self.elapsed_ms,
            });
        }
        true
    }

    /// Change the speed. Negative and non-finite values floor at 0.
    ///
    /// The trip duration is recomputed from the full route length. Under
    /// `PreserveElapsed` the elapsed time is untouched, so the completion
    /// fraction jumps; under `RescaleElapsed` it is scaled to keep the
    /// fraction continuous. Elapsed time may end up past the new duration;
    /// the trip then reads as complete until a slower speed reopens it.
    /// The position is recomputed before returning.
    pub fn set_speed(&mut self, kmh: f64) {
        let new_speed = sanitize_speed(kmh);
        let old_speed = self.speed_kmh;
        if new_speed == old_speed {
            return;
        }
        let was = self.phase();

        if self.policy == SpeedChangePolicy::RescaleElapsed && new_speed > 0.0 {
            if let Some(reference) = self.reference_speed_kmh {
                self.elapsed_ms = self.elapsed_ms * reference / new_speed;
            }
        }
        if new_speed > 0.0 {
            self.reference_speed_kmh = Some(new_speed);
        }

        self.speed_kmh = new_speed;
        self.plan = TripPlan::new(self.plan.total_distance_km, new_speed);
        self.recompute_position();

        debug!("speed {old_speed} -> {new_speed} km/h, elapsed {:.0} ms", self.elapsed_ms);
        self.events.push(VesselEvent::SpeedChanged {
            from_kmh: old_speed,
            to_kmh: new_speed,
        });
        self.push_transition(was);
    }

    /// Replace both endpoints and restart the trip from the new start.
    ///
    /// Ignored (with a warning) if either coordinate is not finite.
    pub fn set_route(&mut self, start: Coordinate, end: Coordinate) {
        if !start.is_finite() || !end.is_finite() {
            warn!("ignoring route with non-finite endpoint: {start:?} -> {end:?}");
            return;
        }
        self.start = start;
        self.end = end;
        self.plan = TripPlan::new(distance(start, end), self.speed_kmh);
        self.elapsed_ms = 0.0;
        self.position = start;
        self.recompute_position();

        debug!(
            "route {start} -> {end}, {:.2} km",
            self.plan.total_distance_km
        );
        self.events.push(VesselEvent::RouteChanged { start, end });
    }

    /// Reset elapsed time to zero on the current route.
    pub fn restart(&mut self) {
        self.elapsed_ms = 0.0;
        self.position = self.start;
        self.recompute_position();
        self.events.push(VesselEvent::Restarted);
    }

    /// Build a snapshot of the current state, draining pending events.
    pub fn snapshot(&mut self) -> VesselSnapshot {
        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(self, events)
    }

    pub fn start(&self) -> Coordinate {
        self.start
    }

    pub fn end(&self) -> Coordinate {
        self.end
    }

    /// Current position (last valid value while the fraction is undefined).
    pub fn current_position(&self) -> Coordinate {
        self.position
    }

    pub fn speed_kmh(&self) -> f64 {
        self.speed_kmh
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn trip(&self) -> TripPlan {
        self.plan
    }

    pub fn policy(&self) -> SpeedChangePolicy {
        self.policy
    }

    /// Number of ticks that advanced elapsed time.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn phase(&self) -> RunPhase {
        systems::motion::phase_of(&self.plan, self.elapsed_ms)
    }

    pub fn total_distance_km(&self) -> f64 {
        self.plan.total_distance_km
    }

    /// Distance covered at the current speed over the elapsed time (km).
    pub fn distance_traveled_km(&self) -> f64 {
        self.elapsed_ms / MS_PER_HOUR * self.speed_kmh
    }

    /// Route length minus distance traveled. Not clamped: a speed increase
    /// past the arrival point drives it negative.
    pub fn distance_remaining_km(&self) -> f64 {
        self.plan.total_distance_km - self.distance_traveled_km()
    }

    /// `max(0, total - elapsed)`, or `None` while the duration is undefined.
    pub fn time_remaining_ms(&self) -> Option<f64> {
        let total = self.plan.finite_total_time_ms()?;
        Some((total - self.elapsed_ms).max(0.0))
    }

    /// `elapsed / total`, or `None` while the duration is undefined.
    pub fn fraction_complete(&self) -> Option<f64> {
        self.plan.fraction_at(self.elapsed_ms)
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single command.
    fn handle_command(&mut self, command: VesselCommand) {
        match command {
            VesselCommand::SetSpeed { kmh } => self.set_speed(kmh),
            VesselCommand::IncreaseSpeed => self.set_speed(self.speed_kmh + self.speed_step_kmh),
            VesselCommand::DecreaseSpeed => self.set_speed(self.speed_kmh - self.speed_step_kmh),
            VesselCommand::SetRoute { start, end } => self.set_route(start, end),
            VesselCommand::Restart => self.restart(),
        }
    }

    /// Overwrite the cached position if the current state yields a valid one.
    fn recompute_position(&mut self) {
        if let Some(position) =
            systems::motion::position_at(self.start, self.end, &self.plan, self.elapsed_ms)
        {
            self.position = position;
        }
    }

    /// Record a phase change caused by a speed change.
    fn push_transition(&mut self, was: RunPhase) {
        let elapsed_ms = self.elapsed_ms;
        match (was, self.phase()) {
            (RunPhase::Complete, RunPhase::Running) => {
                info!("trip reopened at {elapsed_ms:.0} ms");
                self.events.push(VesselEvent::Resumed { elapsed_ms });
            }
            (RunPhase::Running, RunPhase::Complete) => {
                info!("vessel arrived at {} after {elapsed_ms:.0} ms", self.end);
                self.events.push(VesselEvent::Arrived { elapsed_ms });
            }
            _ => {}
        }
    }
}

fn sanitize_speed(kmh: f64) -> f64 {
    if kmh.is_finite() {
        kmh.max(0.0)
    } else {
        0.0
    }
}
