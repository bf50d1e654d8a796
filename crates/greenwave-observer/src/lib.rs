//! Observer API server for the Greenwave traffic platform.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **`WebSocket` endpoint** (`/ws/traffic`) for real-time traffic
//!   update streaming via [`tokio::sync::broadcast`]
//! - **REST endpoints** for querying live state (signals, incidents)
//!   and for congestion-aware route optimization
//! - **Operator REST endpoint** for forcing signal phases out of band
//! - **Minimal HTML status page** (`GET /`) showing current tick,
//!   signal counts, and links to API endpoints
//!
//! # Architecture
//!
//! The observer reads from the shared [`SignalStore`] that the
//! simulation clock rewrites each tick. All REST reads are snapshot
//! clones taken under a short read lock, so the observer never blocks
//! the tick cycle for longer than one copy. `WebSocket` clients receive
//! traffic updates via a broadcast channel with automatic lag handling.
//!
//! The server is embedded in the engine binary via
//! [`spawn_observer`], which runs it on a background Tokio task
//! alongside the clock.
//!
//! [`SignalStore`]: greenwave_signals::store::SignalStore

pub mod error;
pub mod handlers;
pub mod operator;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use startup::{StartupError, spawn_observer};
pub use state::AppState;
