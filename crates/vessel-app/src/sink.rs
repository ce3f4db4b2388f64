//! Renderer boundary: where snapshots leave the simulation.

use std::io::Write;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};

use vessel_core::events::VesselEvent;
use vessel_core::state::VesselSnapshot;

/// Consumer of the snapshots the tick driver produces.
pub trait SnapshotSink: Send {
    fn emit(&mut self, snapshot: &VesselSnapshot) -> Result<()>;
}

/// One JSON object per line.
pub struct JsonLinesSink<W> {
    out: W,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write + Send> SnapshotSink for JsonLinesSink<W> {
    fn emit(&mut self, snapshot: &VesselSnapshot) -> Result<()> {
        serde_json::to_writer(&mut self.out, snapshot)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Human-readable metrics panel, one line per snapshot.
pub struct PanelSink<W> {
    out: W,
}

impl<W: Write + Send> PanelSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write + Send> SnapshotSink for PanelSink<W> {
    fn emit(&mut self, snapshot: &VesselSnapshot) -> Result<()> {
        for event in &snapshot.events {
            writeln!(self.out, "* {}", describe_event(event))?;
        }
        writeln!(self.out, "{}", format_panel(snapshot))?;
        self.out.flush()?;
        Ok(())
    }
}

/// Stores every snapshot in memory. Used by tests and embedding hosts.
#[derive(Default, Clone)]
pub struct CollectingSink {
    snapshots: Arc<Mutex<Vec<VesselSnapshot>>>,
}

impl CollectingSink {
    /// Shared view of everything emitted so far.
    pub fn snapshots(&self) -> Arc<Mutex<Vec<VesselSnapshot>>> {
        self.snapshots.clone()
    }
}

impl SnapshotSink for CollectingSink {
    fn emit(&mut self, snapshot: &VesselSnapshot) -> Result<()> {
        self.snapshots
            .lock()
            .map_err(|e| anyhow!(e.to_string()))?
            .push(snapshot.clone());
        Ok(())
    }
}

/// Format the metrics panel line for a snapshot.
pub fn format_panel(snapshot: &VesselSnapshot) -> String {
    let m = &snapshot.metrics;
    format!(
        "[{:?}] pos {} | speed {} km/h | total {} km | traveled {} km | remaining {} km | \
         elapsed {} s | left {} s | total time {} s | fraction {}",
        snapshot.phase,
        snapshot.position,
        snapshot.speed_kmh,
        m.total_distance_km,
        m.distance_traveled_km,
        m.distance_remaining_km,
        m.elapsed_secs,
        or_dashes(m.time_remaining_secs),
        or_dashes(m.total_time_secs),
        m.fraction_complete
            .map(|f| format!("{f:.2}"))
            .unwrap_or_else(|| "--".into()),
    )
}

fn or_dashes(secs: Option<u64>) -> String {
    secs.map(|s| s.to_string()).unwrap_or_else(|| "--".into())
}

fn describe_event(event: &VesselEvent) -> String {
    match event {
        VesselEvent::SpeedChanged { from_kmh, to_kmh } => {
            format!("speed {from_kmh} -> {to_kmh} km/h")
        }
        VesselEvent::RouteChanged { start, end } => format!("new route ({start}) -> ({end})"),
        VesselEvent::Restarted => "trip restarted".into(),
        VesselEvent::Arrived { elapsed_ms } => {
            format!("arrived after {} s", (elapsed_ms / 1000.0).floor())
        }
        VesselEvent::Resumed { elapsed_ms } => {
            format!("underway again at {} s", (elapsed_ms / 1000.0).floor())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vessel_sim::engine::{SimConfig, SimulationEngine};

    #[test]
    fn test_panel_line() {
        let mut engine = SimulationEngine::new(SimConfig::default());
        let line = format_panel(&engine.snapshot());
        assert_eq!(
            line,
            "[Running] pos 22.1696, 91.4996 | speed 20 km/h | total 24.6 km | traveled 0 km | \
             remaining 24.6 km | elapsed 0 s | left 4428 s | total time 4428 s | fraction 0.00"
        );
    }

    #[test]
    fn test_panel_when_stopped() {
        let mut engine = SimulationEngine::new(SimConfig::default());
        engine.set_speed(0.0);
        let line = format_panel(&engine.snapshot());
        assert!(line.contains("left -- s"), "{line}");
        assert!(line.contains("fraction --"), "{line}");
    }

    #[test]
    fn test_panel_sink_writes_events() {
        let mut engine = SimulationEngine::new(SimConfig::default());
        engine.set_speed(70.0);
        let mut sink = PanelSink::new(Vec::new());
        sink.emit(&engine.snapshot()).unwrap();
        let text = String::from_utf8(sink.out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("* speed 20 -> 70 km/h"));
        assert!(lines.next().unwrap().starts_with("[Running]"));
    }

    #[test]
    fn test_json_lines_sink() {
        let mut engine = SimulationEngine::new(SimConfig::default());
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.emit(&engine.snapshot()).unwrap();
        sink.emit(&engine.tick(500.0)).unwrap();

        let text = String::from_utf8(sink.out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let second: VesselSnapshot = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second.elapsed_ms, 500.0);
        assert_eq!(second.tick, 1);
    }

    #[test]
    fn test_collecting_sink_shares_storage() {
        let mut sink = CollectingSink::default();
        let view = sink.snapshots();
        sink.emit(&VesselSnapshot::default()).unwrap();
        assert_eq!(view.lock().unwrap().len(), 1);
    }
}
