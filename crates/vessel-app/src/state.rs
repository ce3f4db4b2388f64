//! Session state shared between the host's control path and the tick driver.

use std::sync::{Arc, Mutex};

use anyhow::{anyhow, bail, Result};

use vessel_core::commands::VesselCommand;
use vessel_core::state::VesselSnapshot;
use vessel_sim::engine::SimConfig;

use crate::sink::SnapshotSink;
use crate::tick_loop::{self, TickLoopHandle};

/// Commands sent from the control path to the tick driver thread.
#[derive(Debug)]
pub enum LoopCommand {
    /// An operator command to forward to the simulation engine.
    Vessel(VesselCommand),
    /// Shut down the tick driver gracefully.
    Shutdown,
}

/// One simulation run and its driver.
///
/// At most one tick driver exists per session, so the engine always has a
/// single writer. The `Mutex`es keep the session `Send + Sync` for hosts
/// that share it across threads.
#[derive(Default)]
pub struct Session {
    /// Running driver. `None` before `start` and after `stop`.
    driver: Mutex<Option<TickLoopHandle>>,
    /// Latest snapshot for synchronous `latest_snapshot` queries.
    /// Updated by the driver thread after each tick.
    latest_snapshot: Arc<Mutex<Option<VesselSnapshot>>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn the tick driver. Fails if one is already running.
    pub fn start(
        &self,
        config: SimConfig,
        time_scale: f64,
        sink: Box<dyn SnapshotSink>,
    ) -> Result<()> {
        if !time_scale.is_finite() || time_scale <= 0.0 {
            bail!("time scale must be positive, got {time_scale}");
        }
        config.validate().map_err(|e| anyhow!("invalid config: {e}"))?;

        let mut driver = self.driver.lock().map_err(|e| anyhow!(e.to_string()))?;
        if driver.is_some() {
            bail!("Simulation already running");
        }

        *driver = Some(tick_loop::spawn_tick_loop(
            config,
            time_scale,
            sink,
            self.latest_snapshot.clone(),
        )?);
        Ok(())
    }

    /// Send an operator command to the running simulation.
    pub fn send_command(&self, command: VesselCommand) -> Result<()> {
        let driver = self.driver.lock().map_err(|e| anyhow!(e.to_string()))?;
        match driver.as_ref() {
            Some(handle) => handle.send(command),
            None => bail!("Simulation not started"),
        }
    }

    /// Latest snapshot emitted by the driver, if any.
    pub fn latest_snapshot(&self) -> Result<Option<VesselSnapshot>> {
        let lock = self
            .latest_snapshot
            .lock()
            .map_err(|e| anyhow!(e.to_string()))?;
        Ok(lock.clone())
    }

    pub fn is_running(&self) -> bool {
        self.driver.lock().map(|d| d.is_some()).unwrap_or(false)
    }

    /// Stop the driver and wait for it to exit. A no-op when not running.
    pub fn stop(&self) -> Result<()> {
        let handle = self
            .driver
            .lock()
            .map_err(|e| anyhow!(e.to_string()))?
            .take();
        match handle {
            Some(handle) => handle.stop(),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::CollectingSink;

    #[test]
    fn test_session_creation() {
        let session = Session::new();
        assert!(!session.is_running());
        assert!(session.latest_snapshot().unwrap().is_none());
        assert!(session.send_command(VesselCommand::Restart).is_err());
        assert!(session.stop().is_ok());
    }

    #[test]
    fn test_rejects_bad_time_scale() {
        let session = Session::new();
        let err = session
            .start(SimConfig::default(), 0.0, Box::new(CollectingSink::default()))
            .unwrap_err();
        assert!(err.to_string().contains("time scale"));
        assert!(!session.is_running());
    }

    #[test]
    fn test_rejects_invalid_config() {
        let session = Session::new();
        let config = SimConfig {
            tick_period_ms: 0,
            ..Default::default()
        };
        let err = session
            .start(config, 1.0, Box::new(CollectingSink::default()))
            .unwrap_err();
        assert!(err.to_string().starts_with("invalid config"));
    }
}
