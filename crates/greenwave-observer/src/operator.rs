//! Operator control surface.
//!
//! Overrides let a human force a signal phase out of band, bypassing the
//! automatic congestion cycle. The forced phase holds for the requested
//! duration (or the per-action default) and then the next tick resumes
//! normal cycling from wherever the countdown lands.
//!
//! Every override is followed by an immediate broadcast so websocket
//! subscribers see the forced phase without waiting for the next tick.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use chrono::Utc;
use greenwave_signals::store::StoreError;
use greenwave_types::{OverrideAction, SignalId, TrafficUpdate};
use tracing::info;

use crate::error::ApiError;
use crate::handlers::{bad_body, parse_uuid};
use crate::state::AppState;

/// Request body for `POST /api/signals/{id}/override`.
#[derive(Debug, serde::Deserialize)]
pub struct OverrideRequest {
    /// Which phase to force.
    pub action: OverrideAction,
    /// How long to hold it, in seconds. Omitted means the per-action
    /// default (30s for green and red, 5s for yellow).
    pub duration_seconds: Option<u32>,
}

/// Force a signal into a phase chosen by the operator.
///
/// Returns the updated signal together with a human-readable
/// confirmation message.
pub async fn override_signal(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
    payload: Result<Json<OverrideRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = SignalId::from(parse_uuid(&id_str)?);
    let Json(body) = payload.map_err(bad_body)?;

    let updated = state
        .store
        .apply_override(id, body.action, body.duration_seconds, Utc::now())
        .await
        .map_err(|e: StoreError| ApiError::NotFound(e.to_string()))?;

    info!(
        signal = %updated.name,
        action = ?body.action,
        duration_seconds = updated.timer_seconds,
        "operator override applied"
    );

    // Out-of-band frame so subscribers see the override immediately.
    let update = TrafficUpdate {
        tick: state.store.current_tick(),
        signals: state.store.snapshot().await,
    };
    state.broadcast(&update);

    Ok(Json(serde_json::json!({
        "ok": true,
        "message": format!(
            "Signal '{}' overridden for {} seconds",
            updated.name, updated.timer_seconds
        ),
        "signal": updated,
    })))
}
