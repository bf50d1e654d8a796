//! Engine binary for the Greenwave traffic platform.
//!
//! This is the main entry point that wires together the simulation
//! clock, the shared signal store, the incident feed, the route
//! provider, and the observer API server. It loads configuration,
//! initializes all subsystems, and runs the tick loop until a
//! termination condition is met.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration (`GREENWAVE_CONFIG`, default `greenwave.yaml`)
//! 3. Load the intersection registry (seed file or built-in set)
//! 4. Build the signal store, incident feed, and route source
//! 5. Start the observer API server on a background task
//! 6. Create the clock control block and RNG
//! 7. Run the clock loop
//! 8. Log the result

mod error;
mod publisher;

use std::path::Path;
use std::sync::Arc;

use chrono::TimeDelta;
use greenwave_observer::ServerConfig;
use greenwave_observer::state::AppState;
use greenwave_routing::incidents::IncidentFeed;
use greenwave_routing::provider::{OsrmClient, RouteSource};
use greenwave_signals::config::{self, GreenwaveConfig};
use greenwave_signals::registry::{self, SignalSeed};
use greenwave_signals::runner::{self, ClockControl};
use greenwave_signals::store::SignalStore;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::publisher::SnapshotPublisher;

/// Application entry point for the engine.
///
/// Initializes all subsystems and runs the clock loop. Returns an
/// error code on failure.
///
/// # Errors
///
/// Returns an error if any initialization step fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("greenwave-engine starting");

    // 2. Load configuration.
    let config = load_config()?;
    info!(
        tick_interval_ms = config.simulation.tick_interval_ms,
        provider_url = config.routing.provider_url,
        observer_port = config.observer.port,
        "Configuration loaded"
    );

    // 3. Load the intersection registry.
    let seeds = load_registry(&config)?;
    info!(count = seeds.len(), "Intersection registry loaded");

    // 4. Build the shared state the clock and observer both work on.
    let store = Arc::new(SignalStore::from_seeds(&seeds));
    let incidents = Arc::new(IncidentFeed::new());
    let routes = Arc::new(RouteSource::Osrm(OsrmClient::new(
        config.routing.provider_url.clone(),
        config.routing.request_timeout_ms,
    )));

    // A window that does not fit the duration type is effectively infinite.
    let incident_window = i64::try_from(config.routing.incident_window_hours)
        .ok()
        .and_then(TimeDelta::try_hours)
        .unwrap_or(TimeDelta::MAX);

    let app_state = Arc::new(AppState::new(
        Arc::clone(&store),
        incidents,
        routes,
        incident_window,
    ));
    info!(source = app_state.routes.name(), "Route source ready");

    // 5. Start the observer API server.
    let server_config = ServerConfig {
        host: config.observer.host.clone(),
        port: config.observer.port,
    };
    let _observer_handle = greenwave_observer::spawn_observer(server_config, Arc::clone(&app_state))
        .map_err(|e| EngineError::Observer {
            message: format!("{e}"),
        })?;
    info!(port = config.observer.port, "Observer API server started");

    // 6. Create the clock control block and RNG.
    let control = Arc::new(ClockControl::new(config.simulation.tick_interval_ms, 0));
    let mut rng = match config.simulation.seed {
        Some(seed) => {
            info!(seed, "Deterministic RNG seeded from config");
            SmallRng::seed_from_u64(seed)
        }
        None => SmallRng::from_os_rng(),
    };

    // 7. Run the clock until stopped.
    let mut publisher = SnapshotPublisher::new(Arc::clone(&app_state));
    let report = runner::run_clock(&store, &control, &mut publisher, &mut rng).await;

    // 8. Log results.
    info!(
        end_reason = ?report.end_reason,
        total_ticks = report.total_ticks,
        "greenwave-engine shutdown complete"
    );

    Ok(())
}

/// Load the main configuration.
///
/// The path comes from `GREENWAVE_CONFIG` when set, otherwise
/// `greenwave.yaml` in the working directory. A missing file is not
/// fatal: the engine runs on defaults and logs that it did so.
fn load_config() -> Result<GreenwaveConfig, EngineError> {
    let path = std::env::var(config::ENV_CONFIG_PATH)
        .unwrap_or_else(|_| config::DEFAULT_CONFIG_FILE.to_string());
    let config_path = Path::new(&path);
    if config_path.exists() {
        let config = GreenwaveConfig::from_file(config_path)?;
        info!(path = %config_path.display(), "Configuration file loaded");
        Ok(config)
    } else {
        info!(path = %config_path.display(), "Config file not found, using defaults");
        Ok(GreenwaveConfig::default())
    }
}

/// Load intersection seeds from the configured file, falling back to the
/// built-in downtown set when no file is configured.
fn load_registry(config: &GreenwaveConfig) -> Result<Vec<SignalSeed>, EngineError> {
    match &config.simulation.seed_file {
        Some(path) => {
            let seeds = registry::load_seeds(path)?;
            info!(path = %path.display(), "Seed file loaded");
            Ok(seeds)
        }
        None => Ok(registry::default_seeds()),
    }
}
