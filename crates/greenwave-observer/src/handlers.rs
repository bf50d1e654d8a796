//! REST API endpoint handlers for the observer server.
//!
//! Signal reads are served from [`SignalStore`] snapshots so a request
//! never holds the write path up for longer than one clone.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `GET` | `/health` | Liveness probe |
//! | `GET` | `/api/signals` | Full signal snapshot |
//! | `GET` | `/api/signals/{id}` | Single signal |
//! | `GET` | `/api/incidents` | List incidents (`?active=true` filters) |
//! | `POST` | `/api/incidents` | Report a new incident |
//! | `PUT` | `/api/incidents/{id}/status` | Update incident status |
//! | `POST` | `/api/routes/optimize` | Fetch, score, and rank routes |
//!
//! [`SignalStore`]: greenwave_signals::store::SignalStore

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use chrono::Utc;
use greenwave_routing::incidents::IncidentError;
use greenwave_routing::scorer;
use greenwave_types::{CongestionLevel, GeoPoint, IncidentId, IncidentStatus, RouteMode, SignalId};
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /api/incidents`.
#[derive(Debug, serde::Deserialize)]
pub struct IncidentsQuery {
    /// When true, only incidents inside the recency window that are not
    /// resolved.
    pub active: Option<bool>,
}

/// Request body for `POST /api/incidents`.
#[derive(Debug, serde::Deserialize)]
pub struct ReportIncidentRequest {
    /// Free-form category, e.g. `accident` or `roadwork`.
    pub incident_type: String,
    /// Where it happened.
    pub location: GeoPoint,
}

/// Request body for `PUT /api/incidents/{id}/status`.
#[derive(Debug, serde::Deserialize)]
pub struct SetIncidentStatusRequest {
    /// The new lifecycle status.
    pub status: IncidentStatus,
}

/// Request body for `POST /api/routes/optimize`.
///
/// Both endpoints are optional at the wire level so their absence can be
/// answered with a clean 400 instead of a deserialization rejection.
#[derive(Debug, serde::Deserialize)]
pub struct OptimizeRequest {
    /// Trip origin.
    pub start: Option<GeoPoint>,
    /// Trip destination.
    pub end: Option<GeoPoint>,
    /// Ranking preference; defaults to optimal.
    #[serde(default)]
    pub mode: RouteMode,
}

// ---------------------------------------------------------------------------
// GET / -- minimal HTML status page
// ---------------------------------------------------------------------------

/// Serve a minimal HTML page showing platform status and API links.
///
/// This is the placeholder view until the React dashboard is wired up.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let signals = state.store.snapshot().await;
    let tick = state.store.current_tick();
    let signal_count = signals.len();
    let high_count = signals
        .iter()
        .filter(|s| s.congestion == CongestionLevel::High)
        .count();
    let incident_count = state.incidents.all().await.len();

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Greenwave Observer</title>
    <style>
        body {{
            background: #0d1117;
            color: #c9d1d9;
            font-family: 'Cascadia Code', 'Fira Code', 'Consolas', monospace;
            padding: 2rem;
            max-width: 800px;
            margin: 0 auto;
        }}
        h1 {{ color: #3fb950; margin-bottom: 0.25rem; }}
        .subtitle {{ color: #8b949e; margin-top: 0; }}
        .metric {{
            display: inline-block;
            background: #161b22;
            border: 1px solid #30363d;
            border-radius: 6px;
            padding: 1rem 1.5rem;
            margin: 0.5rem 0.5rem 0.5rem 0;
            min-width: 120px;
        }}
        .metric .label {{ color: #8b949e; font-size: 0.85rem; }}
        .metric .value {{ color: #3fb950; font-size: 1.5rem; font-weight: bold; }}
        a {{ color: #58a6ff; text-decoration: none; }}
        a:hover {{ text-decoration: underline; }}
        ul {{ list-style: none; padding: 0; }}
        li {{ padding: 0.3rem 0; }}
        .method {{ color: #7ee787; font-weight: bold; }}
        .status {{ color: #3fb950; font-weight: bold; }}
        hr {{ border: none; border-top: 1px solid #30363d; margin: 1.5rem 0; }}
    </style>
</head>
<body>
    <h1>Greenwave Observer</h1>
    <p class="subtitle">City traffic monitoring server</p>

    <p>Status: <span class="status">RUNNING</span></p>

    <div>
        <div class="metric">
            <div class="label">Tick</div>
            <div class="value">{tick}</div>
        </div>
        <div class="metric">
            <div class="label">Signals</div>
            <div class="value">{signal_count}</div>
        </div>
        <div class="metric">
            <div class="label">High congestion</div>
            <div class="value">{high_count}</div>
        </div>
        <div class="metric">
            <div class="label">Incidents</div>
            <div class="value">{incident_count}</div>
        </div>
    </div>

    <hr>

    <h2>API Endpoints</h2>
    <ul>
        <li><span class="method">GET</span> <a href="/api/signals">/api/signals</a> -- Live signal snapshot</li>
        <li><span class="method">GET</span> /api/signals/{{id}} -- Single signal detail</li>
        <li><span class="method">POST</span> /api/signals/{{id}}/override -- Force a signal phase</li>
        <li><span class="method">GET</span> <a href="/api/incidents">/api/incidents</a> -- List incidents (?active=true)</li>
        <li><span class="method">POST</span> /api/incidents -- Report an incident</li>
        <li><span class="method">PUT</span> /api/incidents/{{id}}/status -- Update incident status</li>
        <li><span class="method">POST</span> /api/routes/optimize -- Congestion-aware route scoring</li>
    </ul>

    <h2>WebSocket</h2>
    <ul>
        <li><code>ws://host:port/ws/traffic</code> -- Live traffic update stream</li>
    </ul>
</body>
</html>"#
    ))
}

// ---------------------------------------------------------------------------
// GET /health -- liveness probe
// ---------------------------------------------------------------------------

/// Liveness probe for load balancers and uptime checks.
///
/// Touches the store so a wedged write lock shows up here instead of
/// only on the data endpoints.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let signal_count = state.store.snapshot().await.len();

    Json(serde_json::json!({
        "status": "ok",
        "service": "greenwave-observer",
        "signals": signal_count,
    }))
}

// ---------------------------------------------------------------------------
// GET /api/signals -- full snapshot
// ---------------------------------------------------------------------------

/// Return every signal in registry order, plus the current tick.
pub async fn list_signals(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let signals = state.store.snapshot().await;

    Ok(Json(serde_json::json!({
        "tick": state.store.current_tick(),
        "count": signals.len(),
        "signals": signals,
    })))
}

// ---------------------------------------------------------------------------
// GET /api/signals/{id} -- single signal
// ---------------------------------------------------------------------------

/// Return one signal by id.
pub async fn get_signal(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = SignalId::from(parse_uuid(&id_str)?);

    let signal = state
        .store
        .signal(id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("signal {id}")))?;

    Ok(Json(signal))
}

// ---------------------------------------------------------------------------
// GET /api/incidents -- list incidents
// ---------------------------------------------------------------------------

/// List incidents, newest first by id ordering.
///
/// # Query Parameters
///
/// - `active`: when `true`, only unresolved incidents inside the recency
///   window (what the scorer sees).
pub async fn list_incidents(
    State(state): State<Arc<AppState>>,
    Query(params): Query<IncidentsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let incidents = if params.active.unwrap_or(false) {
        state
            .incidents
            .active(state.incident_window, Utc::now())
            .await
    } else {
        state.incidents.all().await
    };

    Ok(Json(serde_json::json!({
        "count": incidents.len(),
        "incidents": incidents,
    })))
}

// ---------------------------------------------------------------------------
// POST /api/incidents -- report an incident
// ---------------------------------------------------------------------------

/// Record a new incident and return it with `201 Created`.
pub async fn report_incident(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ReportIncidentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload.map_err(bad_body)?;

    let incident = state
        .incidents
        .report(body.incident_type, body.location, Utc::now())
        .await;
    info!(id = %incident.id, incident_type = %incident.incident_type, "incident reported");

    Ok((StatusCode::CREATED, Json(incident)))
}

// ---------------------------------------------------------------------------
// PUT /api/incidents/{id}/status -- update incident status
// ---------------------------------------------------------------------------

/// Move an incident through its lifecycle.
pub async fn set_incident_status(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
    payload: Result<Json<SetIncidentStatusRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = IncidentId::from(parse_uuid(&id_str)?);
    let Json(body) = payload.map_err(bad_body)?;

    let incident = state
        .incidents
        .set_status(id, body.status)
        .await
        .map_err(|e: IncidentError| ApiError::NotFound(e.to_string()))?;
    info!(id = %incident.id, status = ?incident.status, "incident status updated");

    Ok(Json(incident))
}

// ---------------------------------------------------------------------------
// POST /api/routes/optimize -- fetch, score, rank
// ---------------------------------------------------------------------------

/// Run one route optimization: fetch candidates from the provider, score
/// them against the live snapshot and active incidents, and return the
/// ranked analysis.
pub async fn optimize_route(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<OptimizeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload.map_err(bad_body)?;

    let Some(start) = body.start else {
        return Err(ApiError::InvalidRequest(String::from(
            "start and end coordinates are required",
        )));
    };
    let Some(end) = body.end else {
        return Err(ApiError::InvalidRequest(String::from(
            "start and end coordinates are required",
        )));
    };

    let candidates = state.routes.fetch_routes(start, end).await?;
    let signals = state.store.snapshot().await;
    let incidents = state
        .incidents
        .active(state.incident_window, Utc::now())
        .await;

    let analysis = scorer::score_routes(candidates, &signals, &incidents, body.mode)?;
    info!(
        mode = ?body.mode,
        routes = analysis.routes.len(),
        penalty = analysis.routes.first().map_or(0, |r| r.congestion_penalty),
        "route analysis complete"
    );

    Ok(Json(analysis))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a UUID from a path segment, rejecting with a 400 on failure.
pub(crate) fn parse_uuid(s: &str) -> Result<Uuid, ApiError> {
    s.parse::<Uuid>()
        .map_err(|e| ApiError::InvalidRequest(format!("invalid id {s:?}: {e}")))
}

/// Collapse a body rejection into the shared 400 envelope.
pub(crate) fn bad_body(rejection: JsonRejection) -> ApiError {
    ApiError::InvalidRequest(rejection.body_text())
}
