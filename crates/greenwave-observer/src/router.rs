//! Axum router construction for the observer API.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with CORS middleware enabled for cross-origin dashboard access.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::operator;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router for the observer server.
///
/// The router includes:
/// - `GET /` -- minimal HTML status page
/// - `GET /health` -- liveness probe
/// - `GET /ws/traffic` -- `WebSocket` traffic update stream
/// - `GET /api/signals` -- current signal snapshot
/// - `GET /api/signals/{id}` -- single signal
/// - `POST /api/signals/{id}/override` -- operator phase override
/// - `GET /api/incidents` -- list incidents
/// - `POST /api/incidents` -- report an incident
/// - `PUT /api/incidents/{id}/status` -- update incident status
/// - `POST /api/routes/optimize` -- congestion-aware route scoring
///
/// CORS is configured to allow any origin for development. In
/// production this should be restricted.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Status page
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        // WebSocket
        .route("/ws/traffic", get(ws::ws_traffic))
        // REST API
        .route("/api/signals", get(handlers::list_signals))
        .route("/api/signals/{id}", get(handlers::get_signal))
        .route(
            "/api/signals/{id}/override",
            post(operator::override_signal),
        )
        .route(
            "/api/incidents",
            get(handlers::list_incidents).post(handlers::report_incident),
        )
        .route(
            "/api/incidents/{id}/status",
            put(handlers::set_incident_status),
        )
        .route("/api/routes/optimize", post(handlers::optimize_route))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
