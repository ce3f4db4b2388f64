use std::path::PathBuf;
use std::sync::mpsc::RecvTimeoutError;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::*;

use vessel_app::config::{load_config, ConfigOverrides};
use vessel_app::controls::{self, Control};
use vessel_app::sink::{JsonLinesSink, PanelSink, SnapshotSink};
use vessel_app::state::Session;
use vessel_core::enums::{RunPhase, SpeedChangePolicy};

#[derive(Debug, Parser)]
#[clap(author, version, about = "Simulate a vessel sailing between two points", long_about = None)]
struct Cli {
    /// JSON config file (missing fields use defaults)
    #[clap(long)]
    config: Option<PathBuf>,
    /// Initial speed in km/h
    #[clap(long)]
    speed: Option<f64>,
    /// Tick period in milliseconds
    #[clap(long)]
    tick_ms: Option<u64>,
    /// Speed change per +/- control in km/h
    #[clap(long)]
    step: Option<f64>,
    /// What a speed change does to elapsed time
    #[clap(long, value_enum)]
    policy: Option<PolicyArg>,
    /// Simulated milliseconds per wall-clock millisecond
    #[clap(long, default_value = "1.0")]
    time_scale: f64,
    #[clap(long, value_enum, default_value = "panel")]
    format: OutputFormat,
    /// Exit once the vessel arrives instead of waiting for controls
    #[clap(long)]
    exit_on_arrival: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    Preserve,
    Rescale,
}

impl From<PolicyArg> for SpeedChangePolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Preserve => SpeedChangePolicy::PreserveElapsed,
            PolicyArg::Rescale => SpeedChangePolicy::RescaleElapsed,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Panel,
    Json,
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Cli::parse();
    let overrides = ConfigOverrides {
        initial_speed_kmh: args.speed,
        tick_period_ms: args.tick_ms,
        speed_step_kmh: args.step,
        speed_policy: args.policy.map(Into::into),
    };
    let config = load_config(args.config.as_deref(), &overrides)?;
    let poll_period = Duration::from_millis(config.tick_period_ms);
    info!(
        "sailing {} -> {} at {} km/h",
        config.start, config.end, config.initial_speed_kmh
    );

    let sink: Box<dyn SnapshotSink> = match args.format {
        OutputFormat::Panel => Box::new(PanelSink::new(std::io::stdout())),
        OutputFormat::Json => Box::new(JsonLinesSink::new(std::io::stdout())),
    };

    let session = Session::new();
    session.start(config, args.time_scale, sink)?;

    let controls = controls::spawn_reader(std::io::BufReader::new(std::io::stdin()))?;
    let mut controls_open = true;
    loop {
        if controls_open {
            match controls.recv_timeout(poll_period) {
                Ok(Control::Command(command)) => session.send_command(command)?,
                Ok(Control::Quit) => break,
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    if !args.exit_on_arrival {
                        break;
                    }
                    debug!("control input closed, waiting for arrival");
                    controls_open = false;
                }
            }
        } else {
            std::thread::sleep(poll_period);
        }

        if args.exit_on_arrival {
            let arrived = session
                .latest_snapshot()?
                .map_or(false, |s| s.phase == RunPhase::Complete);
            if arrived {
                break;
            }
        }
    }

    session.stop()?;
    Ok(())
}
