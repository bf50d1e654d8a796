//! Integration tests for the observer API endpoints.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server. This validates handler logic and routing
//! without needing a live network connection. The route source is the
//! fixed in-memory provider, so no test touches the network at all.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{TimeDelta, Utc};
use greenwave_observer::router::build_router;
use greenwave_observer::state::AppState;
use greenwave_routing::incidents::IncidentFeed;
use greenwave_routing::provider::{FixedRoutes, RouteSource};
use greenwave_signals::registry::default_seeds;
use greenwave_signals::store::SignalStore;
use greenwave_types::{CandidateRoute, GeoPoint, TrafficUpdate};
use serde_json::{Value, json};
use tower::ServiceExt;

/// Geometry shared by the preset candidates: starts on top of the
/// first seeded intersection (Market St / Van Ness Ave).
const ROUTE_HEAD: [f64; 2] = [-122.4193, 37.7752];

fn candidate(summary: &str, duration_seconds: f64, distance_meters: f64) -> CandidateRoute {
    CandidateRoute {
        geometry: vec![ROUTE_HEAD, [-122.4100, 37.7800]],
        duration_seconds,
        distance_meters,
        summary: String::from(summary),
        steps: serde_json::Value::Null,
    }
}

fn make_state_with_routes(routes: Vec<CandidateRoute>) -> Arc<AppState> {
    let store = Arc::new(SignalStore::from_seeds(&default_seeds()));
    let incidents = Arc::new(IncidentFeed::new());
    let source = Arc::new(RouteSource::Fixed(FixedRoutes::new(routes)));
    Arc::new(AppState::new(store, incidents, source, TimeDelta::hours(24)))
}

/// Fresh state: eight seeded signals at tick 0 (all Low congestion),
/// no incidents, and two clean preset routes.
fn make_test_state() -> Arc<AppState> {
    make_state_with_routes(vec![
        candidate("Fast", 300.0, 2400.0),
        candidate("Slow", 420.0, 3100.0),
    ])
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(path: &str, body: &Value) -> Request<Body> {
    Request::post(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn put_json(path: &str, body: &Value) -> Request<Body> {
    Request::put(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_index_returns_html() {
    let state = make_test_state();
    let router = build_router(state);

    let response = router
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(content_type.contains("text/html"));
}

#[tokio::test]
async fn test_health() {
    let state = make_test_state();
    let router = build_router(state);

    let response = router
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["signals"], 8);
}

#[tokio::test]
async fn test_list_signals() {
    let state = make_test_state();
    let router = build_router(state);

    let response = router
        .oneshot(Request::get("/api/signals").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["tick"], 0);
    assert_eq!(json["count"], 8);
    assert_eq!(json["signals"][0]["name"], "Market St / Van Ness Ave");
    assert_eq!(json["signals"][0]["phase"], "RED");
    assert_eq!(json["signals"][0]["congestion"], "LOW");
}

#[tokio::test]
async fn test_get_signal_by_id() {
    let state = make_test_state();

    let signal = state.store.snapshot().await.into_iter().next().unwrap();

    let router = build_router(state);
    let path = format!("/api/signals/{}", signal.id.into_inner());
    let response = router
        .oneshot(Request::get(&path).body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["name"], "Market St / Van Ness Ave");
    assert_eq!(json["vehicle_count"], 110);
}

#[tokio::test]
async fn test_get_signal_not_found() {
    let state = make_test_state();
    let router = build_router(state);

    let fake_id = uuid::Uuid::now_v7();
    let path = format!("/api/signals/{fake_id}");
    let response = router
        .oneshot(Request::get(&path).body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], 404);
    assert!(json["error"].as_str().unwrap().contains("signal"));
}

#[tokio::test]
async fn test_get_signal_invalid_uuid() {
    let state = make_test_state();
    let router = build_router(state);

    let response = router
        .oneshot(
            Request::get("/api/signals/not-a-uuid")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_override_signal() {
    let state = make_test_state();
    let mut rx = state.subscribe();

    let signal = state.store.snapshot().await.into_iter().next().unwrap();

    let router = build_router(Arc::clone(&state));
    let path = format!("/api/signals/{}/override", signal.id.into_inner());
    let response = router
        .oneshot(post_json(
            &path,
            &json!({"action": "forceRed", "duration_seconds": 45}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["ok"], true);
    assert_eq!(json["signal"]["phase"], "RED");
    assert_eq!(json["signal"]["timer_seconds"], 45);
    assert_eq!(
        json["message"],
        "Signal 'Market St / Van Ness Ave' overridden for 45 seconds"
    );

    // The override pushed an out-of-band frame to subscribers.
    let update = rx.recv().await.unwrap();
    assert_eq!(update.signals.len(), 8);
    assert!(
        update
            .signals
            .iter()
            .any(|s| s.id == signal.id && s.timer_seconds == 45)
    );
}

#[tokio::test]
async fn test_override_default_duration() {
    let state = make_test_state();

    let signal = state.store.snapshot().await.into_iter().next().unwrap();

    let router = build_router(state);
    let path = format!("/api/signals/{}/override", signal.id.into_inner());
    let response = router
        .oneshot(post_json(&path, &json!({"action": "forceYellow"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["signal"]["phase"], "YELLOW");
    assert_eq!(json["signal"]["timer_seconds"], 5);
}

#[tokio::test]
async fn test_override_unknown_signal() {
    let state = make_test_state();
    let router = build_router(state);

    let fake_id = uuid::Uuid::now_v7();
    let path = format!("/api/signals/{fake_id}/override");
    let response = router
        .oneshot(post_json(&path, &json!({"action": "forceGreen"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_override_rejects_unknown_action() {
    let state = make_test_state();

    let signal = state.store.snapshot().await.into_iter().next().unwrap();

    let router = build_router(state);
    let path = format!("/api/signals/{}/override", signal.id.into_inner());
    let response = router
        .oneshot(post_json(&path, &json!({"action": "forcePurple"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_report_incident() {
    let state = make_test_state();
    let router = build_router(state);

    let response = router
        .clone()
        .oneshot(post_json(
            "/api/incidents",
            &json!({
                "incident_type": "accident",
                "location": {"lat": 37.7752, "lng": -122.4193}
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["incident_type"], "accident");
    assert_eq!(json["status"], "REPORTED");

    let response = router
        .oneshot(Request::get("/api/incidents").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["count"], 1);
}

#[tokio::test]
async fn test_resolved_incident_leaves_active_set() {
    let state = make_test_state();

    let incident = state
        .incidents
        .report(
            String::from("road closure"),
            GeoPoint::new(37.7816, -122.4470),
            Utc::now(),
        )
        .await;

    let router = build_router(state);
    let path = format!("/api/incidents/{}/status", incident.id.into_inner());
    let response = router
        .clone()
        .oneshot(put_json(&path, &json!({"status": "RESOLVED"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "RESOLVED");

    // Resolved incidents drop out of the active view but stay listed.
    let response = router
        .clone()
        .oneshot(
            Request::get("/api/incidents?active=true")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["count"], 0);

    let response = router
        .oneshot(Request::get("/api/incidents").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["count"], 1);
}

#[tokio::test]
async fn test_set_status_unknown_incident() {
    let state = make_test_state();
    let router = build_router(state);

    let fake_id = uuid::Uuid::now_v7();
    let path = format!("/api/incidents/{fake_id}/status");
    let response = router
        .oneshot(put_json(&path, &json!({"status": "RESPONDING"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_optimize_requires_coordinates() {
    let state = make_test_state();
    let router = build_router(state);

    let response = router
        .oneshot(post_json("/api/routes/optimize", &json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["error"], "start and end coordinates are required");
}

#[tokio::test]
async fn test_optimize_rejects_unknown_mode() {
    let state = make_test_state();
    let router = build_router(state);

    let response = router
        .oneshot(post_json(
            "/api/routes/optimize",
            &json!({
                "start": {"lat": 37.7752, "lng": -122.4193},
                "end": {"lat": 37.7800, "lng": -122.4100},
                "mode": "scenic"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_optimize_success() {
    let state = make_test_state();
    let router = build_router(state);

    let response = router
        .oneshot(post_json(
            "/api/routes/optimize",
            &json!({
                "start": {"lat": 37.7752, "lng": -122.4193},
                "end": {"lat": 37.7800, "lng": -122.4100}
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["selected_index"], 0);
    assert_eq!(json["routes"].as_array().unwrap().len(), 2);
    // All seeded signals start at Low congestion, so both presets are
    // clean and the faster one wins.
    assert_eq!(json["routes"][0]["summary"], "Fast");
    assert_eq!(json["routes"][0]["congestion_penalty"], 0);
    assert_eq!(json["routes"][0]["duration_minutes"], "5.0");
    assert_eq!(
        json["reasoning"],
        "Traffic conditions are stable, so the shortest route is also the optimal one."
    );
}

#[tokio::test]
async fn test_optimize_shortest_mode() {
    let state = make_test_state();
    let router = build_router(state);

    let response = router
        .oneshot(post_json(
            "/api/routes/optimize",
            &json!({
                "start": {"lat": 37.7752, "lng": -122.4193},
                "end": {"lat": 37.7800, "lng": -122.4100},
                "mode": "shortest"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["routes"][0]["summary"], "Fast");
    assert_eq!(
        json["reasoning"],
        "We selected the route with the absolute shortest travel time, \
         regardless of potential congestion."
    );
}

#[tokio::test]
async fn test_optimize_sees_reported_incident() {
    let state = make_test_state();

    // Incident right on the shared route head, inside the 0.2 km radius.
    state
        .incidents
        .report(
            String::from("accident"),
            GeoPoint::new(37.7752, -122.4193),
            Utc::now(),
        )
        .await;

    let router = build_router(state);
    let response = router
        .oneshot(post_json(
            "/api/routes/optimize",
            &json!({
                "start": {"lat": 37.7752, "lng": -122.4193},
                "end": {"lat": 37.7800, "lng": -122.4100}
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["routes"][0]["congestion_penalty"], 500);
    assert_eq!(json["routes"][0]["congestion_details"][0], "Incident: accident");
}

#[tokio::test]
async fn test_optimize_no_routes() {
    let state = make_state_with_routes(Vec::new());
    let router = build_router(state);

    let response = router
        .oneshot(post_json(
            "/api/routes/optimize",
            &json!({
                "start": {"lat": 37.7752, "lng": -122.4193},
                "end": {"lat": 37.7800, "lng": -122.4100}
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], 404);
}

#[tokio::test]
async fn test_broadcast_channel() {
    let state = make_test_state();
    let mut rx = state.subscribe();

    let update = TrafficUpdate {
        tick: 42,
        signals: state.store.snapshot().await,
    };

    let receivers = state.broadcast(&update);
    assert_eq!(receivers, 1);

    let received = rx.recv().await.unwrap();
    assert_eq!(received.tick, 42);
    assert_eq!(received.signals.len(), 8);
}

#[tokio::test]
async fn test_nonexistent_route_returns_404() {
    let state = make_test_state();
    let router = build_router(state);

    let response = router
        .oneshot(
            Request::get("/api/nonexistent")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
