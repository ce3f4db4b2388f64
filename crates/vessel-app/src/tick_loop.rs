//! Tick driver thread: runs the simulation engine at a fixed period and emits snapshots.
//!
//! The engine is created inside this thread, which makes the thread its only
//! writer. Commands arrive via `mpsc` channel. Snapshots go to the renderer
//! sink and into shared state for synchronous polling.

use std::sync::mpsc::{self, RecvTimeoutError, TryRecvError};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use log::{debug, warn};

use vessel_core::commands::VesselCommand;
use vessel_core::enums::RunPhase;
use vessel_core::state::VesselSnapshot;
use vessel_sim::engine::{SimConfig, SimulationEngine};

use crate::sink::SnapshotSink;
use crate::state::LoopCommand;

/// Handle to a running tick driver. Dropping it stops the thread.
pub struct TickLoopHandle {
    command_tx: mpsc::Sender<LoopCommand>,
    thread: Option<JoinHandle<()>>,
}

impl TickLoopHandle {
    /// Forward a command to the engine; applied at the next tick boundary.
    pub fn send(&self, command: VesselCommand) -> Result<()> {
        self.command_tx
            .send(LoopCommand::Vessel(command))
            .map_err(|e| anyhow!("tick loop is gone: {e}"))
    }

    /// Cancel the timer and wait for the thread to exit.
    pub fn stop(mut self) -> Result<()> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Result<()> {
        // The thread may already have exited on its own; a failed send is fine.
        let _ = self.command_tx.send(LoopCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            thread
                .join()
                .map_err(|_| anyhow!("tick loop thread panicked"))?;
        }
        Ok(())
    }
}

impl Drop for TickLoopHandle {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            warn!("{e}");
        }
    }
}

/// Spawns the tick driver in a new thread.
///
/// `time_scale` is simulated milliseconds per wall-clock millisecond.
pub fn spawn_tick_loop(
    config: SimConfig,
    time_scale: f64,
    sink: Box<dyn SnapshotSink>,
    latest_snapshot: Arc<Mutex<Option<VesselSnapshot>>>,
) -> Result<TickLoopHandle> {
    let (command_tx, command_rx) = mpsc::channel::<LoopCommand>();

    let thread = std::thread::Builder::new()
        .name("vessel-tick-driver".into())
        .spawn(move || {
            run_tick_loop(config, time_scale, sink, command_rx, &latest_snapshot);
        })
        .context("failed to spawn tick driver thread")?;

    Ok(TickLoopHandle {
        command_tx,
        thread: Some(thread),
    })
}

/// The tick loop. Runs until Shutdown or channel disconnect.
fn run_tick_loop(
    config: SimConfig,
    time_scale: f64,
    mut sink: Box<dyn SnapshotSink>,
    command_rx: mpsc::Receiver<LoopCommand>,
    latest_snapshot: &Mutex<Option<VesselSnapshot>>,
) {
    let period = Duration::from_millis(config.tick_period_ms);
    let sim_delta_ms = period.as_secs_f64() * 1000.0 * time_scale;
    let mut engine = SimulationEngine::new(config);

    publish(engine.snapshot(), sink.as_mut(), latest_snapshot);
    let mut next_tick_time = Instant::now() + period;

    loop {
        // 1. A complete trip schedules nothing; block until a command reopens it
        if engine.phase() == RunPhase::Complete {
            debug!("trip complete, tick driver idle");
            match command_rx.recv() {
                Ok(LoopCommand::Vessel(command)) => {
                    engine.queue_command(command);
                    if !drain_commands(&command_rx, &mut engine) {
                        return;
                    }
                    publish(engine.tick(0.0), sink.as_mut(), latest_snapshot);
                    next_tick_time = Instant::now() + period;
                    continue;
                }
                Ok(LoopCommand::Shutdown) | Err(_) => return,
            }
        }

        // 2. Wait for the next tick, queueing commands as they arrive
        let timeout = next_tick_time.saturating_duration_since(Instant::now());
        match command_rx.recv_timeout(timeout) {
            Ok(LoopCommand::Vessel(command)) => {
                engine.queue_command(command);
                continue;
            }
            Ok(LoopCommand::Shutdown) => return,
            Err(RecvTimeoutError::Disconnected) => return,
            Err(RecvTimeoutError::Timeout) => {}
        }

        // 3. Advance one period and publish
        publish(engine.tick(sim_delta_ms), sink.as_mut(), latest_snapshot);

        // 4. Schedule the next tick
        next_tick_time += period;
        let now = Instant::now();
        if now > next_tick_time && now - next_tick_time > period * 2 {
            // Too far behind, reset to avoid catch-up spiral
            next_tick_time = now;
        }
    }
}

/// Queue every pending command. Returns `false` when the loop should exit.
fn drain_commands(command_rx: &mpsc::Receiver<LoopCommand>, engine: &mut SimulationEngine) -> bool {
    loop {
        match command_rx.try_recv() {
            Ok(LoopCommand::Vessel(command)) => engine.queue_command(command),
            Ok(LoopCommand::Shutdown) => return false,
            Err(TryRecvError::Empty) => return true,
            Err(TryRecvError::Disconnected) => return false,
        }
    }
}

/// Hand a snapshot to the sink and store it for polling.
fn publish(
    snapshot: VesselSnapshot,
    sink: &mut dyn SnapshotSink,
    latest_snapshot: &Mutex<Option<VesselSnapshot>>,
) {
    if let Err(e) = sink.emit(&snapshot) {
        warn!("snapshot sink failed: {e:#}");
    }
    if let Ok(mut lock) = latest_snapshot.lock() {
        *lock = Some(snapshot);
    }
}
