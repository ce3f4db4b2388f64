//! Configuration loading: JSON file, then command-line overrides.

use std::path::Path;

use anyhow::{anyhow, Context, Result};

use vessel_core::enums::SpeedChangePolicy;
use vessel_sim::engine::SimConfig;

/// Values given on the command line; each one replaces the file/default value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub initial_speed_kmh: Option<f64>,
    pub tick_period_ms: Option<u64>,
    pub speed_step_kmh: Option<f64>,
    pub speed_policy: Option<SpeedChangePolicy>,
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut SimConfig) {
        if let Some(speed) = self.initial_speed_kmh {
            config.initial_speed_kmh = speed;
        }
        if let Some(period) = self.tick_period_ms {
            config.tick_period_ms = period;
        }
        if let Some(step) = self.speed_step_kmh {
            config.speed_step_kmh = step;
        }
        if let Some(policy) = self.speed_policy {
            config.speed_policy = policy;
        }
    }
}

/// Parse a JSON config. Missing fields take their defaults.
pub fn parse_config(json: &str) -> Result<SimConfig> {
    serde_json::from_str(json).context("malformed config JSON")
}

/// Build the run configuration from an optional file plus overrides, then validate it.
pub fn load_config(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<SimConfig> {
    let mut config = match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            parse_config(&json).with_context(|| format!("in {}", path.display()))?
        }
        None => SimConfig::default(),
    };
    overrides.apply(&mut config);
    config.validate().map_err(|e| anyhow!("invalid config: {e}"))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vessel_core::constants::DEFAULT_START;
    use vessel_core::types::Coordinate;

    #[test]
    fn test_defaults_without_file() {
        let config = load_config(None, &ConfigOverrides::default()).unwrap();
        assert_eq!(config, SimConfig::default());
    }

    #[test]
    fn test_overrides_win() {
        let overrides = ConfigOverrides {
            initial_speed_kmh: Some(80.0),
            tick_period_ms: Some(100),
            speed_step_kmh: None,
            speed_policy: Some(SpeedChangePolicy::RescaleElapsed),
        };
        let config = load_config(None, &overrides).unwrap();
        assert_eq!(config.initial_speed_kmh, 80.0);
        assert_eq!(config.tick_period_ms, 100);
        assert_eq!(config.speed_step_kmh, 50.0);
        assert_eq!(config.speed_policy, SpeedChangePolicy::RescaleElapsed);
    }

    #[test]
    fn test_parse_partial_file() {
        let config = parse_config(r#"{ "start": { "lat": 10.0, "lon": 20.0 } }"#).unwrap();
        assert_eq!(config.start, Coordinate::new(10.0, 20.0));
        assert_ne!(config.start, DEFAULT_START);
        assert_eq!(config.initial_speed_kmh, 20.0);
    }

    #[test]
    fn test_malformed_json() {
        let err = parse_config("{ not json").unwrap_err();
        assert!(err.to_string().contains("malformed config JSON"));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(
            Some(Path::new("/nonexistent/vessel.json")),
            &ConfigOverrides::default(),
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("reading config"));
    }

    #[test]
    fn test_invalid_override_rejected() {
        let overrides = ConfigOverrides {
            initial_speed_kmh: Some(-10.0),
            ..Default::default()
        };
        let err = load_config(None, &overrides).unwrap_err();
        assert!(err.to_string().starts_with("invalid config"));
    }
}
