//! Observer server startup helper for embedding in the engine binary.
//!
//! Provides [`spawn_observer`] which launches the observer HTTP +
//! `WebSocket` server on a background Tokio task. The engine binary
//! calls this during startup so the observer API runs concurrently
//! with the simulation clock.
//!
//! # Usage
//!
//! ```rust,ignore
//! use greenwave_observer::server::ServerConfig;
//! use greenwave_observer::startup::spawn_observer;
//!
//! let handle = spawn_observer(ServerConfig::default(), state)?;
//! // The server is now running. The handle can be awaited on shutdown.
//! ```

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::server::{ServerConfig, ServerError};
use crate::state::AppState;

/// Errors that can occur when spawning the observer server.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The server failed to bind or start.
    #[error("server start error: {0}")]
    Server(#[from] ServerError),
}

/// Spawn the observer HTTP server on a background Tokio task.
///
/// Binds to the configured host and port and serves the REST API plus
/// the `WebSocket` endpoint for real-time traffic streaming. Returns a
/// [`JoinHandle`] so the caller can manage the server's lifecycle
/// alongside the simulation clock.
///
/// The server runs until the Tokio runtime is shut down or the task
/// is aborted. The caller should hold the returned handle and abort
/// or await it during clean shutdown.
///
/// # Arguments
///
/// * `config` -- Bind address for the listener.
/// * `state` -- Shared application state containing the signal store,
///   incident feed, route source, and broadcast channel. The clock
///   mutates the store; the observer serves it read-only.
///
/// # Errors
///
/// Returns [`StartupError::Server`] if the configured address does not
/// parse. Bind failures surface later inside the background task, where
/// they are logged and end the task.
///
/// Must be called from within a Tokio runtime.
pub fn spawn_observer(
    config: ServerConfig,
    state: Arc<AppState>,
) -> Result<JoinHandle<()>, StartupError> {
    // Catch address misconfiguration here; the real bind happens inside
    // start_server once the task is running.
    let addr_str = format!("{}:{}", config.host, config.port);
    let _: std::net::SocketAddr = addr_str.parse().map_err(|e| {
        StartupError::Server(ServerError::Bind(format!("invalid address {addr_str}: {e}")))
    })?;

    let port = config.port;
    let handle = tokio::spawn(async move {
        if let Err(e) = crate::server::start_server(&config, state).await {
            tracing::error!(error = %e, "Observer server exited with error");
        }
    });

    tracing::info!(port, "Observer server spawned on background task");

    Ok(handle)
}
