//! Operator controls read from a line-oriented input (stdin by default).

use std::io::BufRead;
use std::sync::mpsc;

use anyhow::{Context, Result};
use log::warn;

use vessel_core::commands::VesselCommand;
use vessel_core::types::Coordinate;

/// One parsed control line.
#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    Command(VesselCommand),
    Quit,
}

/// Parse a control line. Blank lines yield `Ok(None)`.
///
/// Accepted forms: `+`, `-`, `speed <kmh>`, `route <lat> <lon> <lat> <lon>`,
/// `restart`, `quit`.
pub fn parse_control(line: &str) -> Result<Option<Control>, String> {
    let mut words = line.split_whitespace();
    let Some(word) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let control = match (word.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("+" | "faster", []) => Control::Command(VesselCommand::IncreaseSpeed),
        ("-" | "slower", []) => Control::Command(VesselCommand::DecreaseSpeed),
        ("speed", [kmh]) => Control::Command(VesselCommand::SetSpeed {
            kmh: parse_number(kmh)?,
        }),
        ("route", [lat1, lon1, lat2, lon2]) => Control::Command(VesselCommand::SetRoute {
            start: Coordinate::new(parse_number(lat1)?, parse_number(lon1)?),
            end: Coordinate::new(parse_number(lat2)?, parse_number(lon2)?),
        }),
        ("restart", []) => Control::Command(VesselCommand::Restart),
        ("quit" | "q" | "exit", []) => Control::Quit,
        _ => return Err(format!("unrecognized control: {}", line.trim())),
    };
    Ok(Some(control))
}

fn parse_number(s: &str) -> Result<f64, String> {
    s.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("not a number: {s}"))
}

/// Read controls from `input` on a background thread.
///
/// The returned receiver disconnects when the input reaches EOF. Lines that
/// don't parse are logged and skipped.
pub fn spawn_reader<R>(input: R) -> Result<mpsc::Receiver<Control>>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    std::thread::Builder::new()
        .name("vessel-controls".into())
        .spawn(move || {
            for line in input.lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        warn!("control input failed: {e}");
                        return;
                    }
                };
                match parse_control(&line) {
                    Ok(Some(control)) => {
                        if tx.send(control).is_err() {
                            return;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => warn!("{e}"),
                }
            }
        })
        .context("failed to spawn control reader thread")?;
    Ok(rx)
}
