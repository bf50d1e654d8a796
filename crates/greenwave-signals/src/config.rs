//! Runtime configuration.
//!
//! YAML with full defaults, so a missing file or empty document yields a
//! working setup. Environment overrides are applied after parsing:
//!
//! - `GREENWAVE_PROVIDER_URL` replaces `routing.provider_url`
//! - `GREENWAVE_OBSERVER_PORT` replaces `observer.port`
//!
//! The engine locates the file itself via `GREENWAVE_CONFIG`, falling
//! back to `greenwave.yaml` in the working directory.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::runner::{DEFAULT_TICK_INTERVAL_MS, MIN_TICK_INTERVAL_MS};

/// Environment variable naming the config file path.
pub const ENV_CONFIG_PATH: &str = "GREENWAVE_CONFIG";

/// Default config file name, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "greenwave.yaml";

/// Environment variable overriding the route provider base URL.
pub const ENV_PROVIDER_URL: &str = "GREENWAVE_PROVIDER_URL";

/// Environment variable overriding the observer port.
pub const ENV_OBSERVER_PORT: &str = "GREENWAVE_OBSERVER_PORT";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid YAML for the expected shape.
    #[error("failed to parse config: {source}")]
    Parse {
        /// Underlying YAML error.
        #[from]
        source: serde_yml::Error,
    },

    /// A value is syntactically valid but unusable.
    #[error("invalid configuration: {message}")]
    Invalid {
        /// What was wrong.
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Simulation clock and registry settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    /// Wall-clock milliseconds per simulated second.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Fixed RNG seed; omit for OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Path to an intersection registry JSON file; omit for the built-in
    /// registry.
    #[serde(default)]
    pub seed_file: Option<PathBuf>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            seed: None,
            seed_file: None,
        }
    }
}

/// Route provider and incident settings.
#[derive(Debug, Clone, Deserialize)]
pub struct RoutingConfig {
    /// Base URL of the OSRM-compatible route provider.
    #[serde(default = "default_provider_url")]
    pub provider_url: String,

    /// Per-request provider timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// How far back a reported incident stays active, in hours.
    #[serde(default = "default_incident_window_hours")]
    pub incident_window_hours: u64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            provider_url: default_provider_url(),
            request_timeout_ms: default_request_timeout_ms(),
            incident_window_hours: default_incident_window_hours(),
        }
    }
}

/// HTTP/WebSocket serving settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ObserverConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GreenwaveConfig {
    /// Simulation clock and registry settings.
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Route provider and incident settings.
    #[serde(default)]
    pub routing: RoutingConfig,

    /// HTTP/WebSocket serving settings.
    #[serde(default)]
    pub observer: ObserverConfig,
}

const fn default_tick_interval_ms() -> u64 {
    DEFAULT_TICK_INTERVAL_MS
}

fn default_provider_url() -> String {
    String::from("https://router.project-osrm.org")
}

const fn default_request_timeout_ms() -> u64 {
    10_000
}

const fn default_incident_window_hours() -> u64 {
    24
}

fn default_host() -> String {
    String::from("0.0.0.0")
}

const fn default_port() -> u16 {
    8080
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl GreenwaveConfig {
    /// Load from a YAML file, then apply environment overrides.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Parse YAML text, apply environment overrides, and validate.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(text)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(url) = std::env::var(ENV_PROVIDER_URL) {
            self.routing.provider_url = url;
        }
        if let Ok(port) = std::env::var(ENV_OBSERVER_PORT) {
            self.observer.port = port.parse().map_err(|_| ConfigError::Invalid {
                message: format!("{ENV_OBSERVER_PORT} must be a port number, got {port:?}"),
            })?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.simulation.tick_interval_ms < MIN_TICK_INTERVAL_MS {
            return Err(ConfigError::Invalid {
                message: format!(
                    "simulation.tick_interval_ms must be at least {MIN_TICK_INTERVAL_MS}, got {}",
                    self.simulation.tick_interval_ms
                ),
            });
        }
        if self.routing.request_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                message: String::from("routing.request_timeout_ms must be nonzero"),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_complete() {
        let config = GreenwaveConfig::default();
        assert_eq!(config.simulation.tick_interval_ms, 1000);
        assert_eq!(config.simulation.seed, None);
        assert_eq!(config.simulation.seed_file, None);
        assert_eq!(config.routing.provider_url, "https://router.project-osrm.org");
        assert_eq!(config.routing.request_timeout_ms, 10_000);
        assert_eq!(config.routing.incident_window_hours, 24);
        assert_eq!(config.observer.host, "0.0.0.0");
        assert_eq!(config.observer.port, 8080);
    }

    #[test]
    fn parses_full_yaml() {
        let yaml = r"
simulation:
  tick_interval_ms: 500
  seed: 42
  seed_file: seeds/downtown.json
routing:
  provider_url: http://localhost:5000
  request_timeout_ms: 2000
  incident_window_hours: 6
observer:
  host: 127.0.0.1
  port: 9090
";
        let config = GreenwaveConfig::parse(yaml).unwrap();
        assert_eq!(config.simulation.tick_interval_ms, 500);
        assert_eq!(config.simulation.seed, Some(42));
        assert_eq!(
            config.simulation.seed_file,
            Some(PathBuf::from("seeds/downtown.json"))
        );
        assert_eq!(config.routing.provider_url, "http://localhost:5000");
        assert_eq!(config.routing.request_timeout_ms, 2000);
        assert_eq!(config.routing.incident_window_hours, 6);
        assert_eq!(config.observer.host, "127.0.0.1");
        assert_eq!(config.observer.port, 9090);
    }

    #[test]
    fn partial_yaml_fills_in_defaults() {
        let yaml = r"
simulation:
  seed: 7
";
        let config = GreenwaveConfig::parse(yaml).unwrap();
        assert_eq!(config.simulation.seed, Some(7));
        assert_eq!(config.simulation.tick_interval_ms, 1000);
        assert_eq!(config.observer.port, 8080);
    }

    #[test]
    fn rejects_sub_minimum_tick_interval() {
        let yaml = r"
simulation:
  tick_interval_ms: 50
";
        let result = GreenwaveConfig::parse(yaml);
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn rejects_zero_request_timeout() {
        let yaml = r"
routing:
  request_timeout_ms: 0
";
        let result = GreenwaveConfig::parse(yaml);
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn rejects_malformed_yaml() {
        let result = GreenwaveConfig::parse("simulation: [not, a, map]");
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }
}
