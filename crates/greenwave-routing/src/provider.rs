//! Candidate route retrieval.
//!
//! Routes come from an OSRM-compatible HTTP provider in production and
//! from a fixed in-memory set in tests and offline demos. Uses enum
//! dispatch instead of trait objects because async methods are not
//! dyn-compatible in Rust.
//!
//! The provider is queried once per scoring request and never cached;
//! candidate routes are only meaningful against the traffic snapshot
//! taken in the same request.

use std::time::Duration;

use greenwave_types::{CandidateRoute, GeoPoint};
use serde::Deserialize;
use tracing::debug;

use crate::error::RoutingError;

// ---------------------------------------------------------------------------
// Unified source enum (dyn-compatible alternative to async trait)
// ---------------------------------------------------------------------------

/// A source of candidate routes between two coordinates.
pub enum RouteSource {
    /// OSRM-compatible HTTP routing service.
    Osrm(OsrmClient),
    /// Preset candidates, served verbatim.
    Fixed(FixedRoutes),
}

impl RouteSource {
    /// Fetch candidate routes from start to end.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::NoRoutes`] when the source has no route
    /// between the coordinates, and the transport variants when the
    /// provider cannot be reached, times out, or answers garbage.
    pub async fn fetch_routes(
        &self,
        start: GeoPoint,
        end: GeoPoint,
    ) -> Result<Vec<CandidateRoute>, RoutingError> {
        match self {
            Self::Osrm(client) => client.fetch_routes(start, end).await,
            Self::Fixed(fixed) => fixed.fetch_routes(),
        }
    }

    /// Human-readable name for logging.
    pub const fn name(&self) -> &str {
        match self {
            Self::Osrm(_) => "osrm",
            Self::Fixed(_) => "fixed",
        }
    }
}

// ---------------------------------------------------------------------------
// OSRM client
// ---------------------------------------------------------------------------

/// Client for the OSRM `route` service.
///
/// Requests alternatives with full GeoJSON geometry and turn-by-turn
/// steps, the shape the scorer and dashboard consume.
pub struct OsrmClient {
    client: reqwest::Client,
    base_url: String,
    timeout_ms: u64,
}

impl OsrmClient {
    /// New client against an OSRM-compatible base URL.
    pub fn new(base_url: String, timeout_ms: u64) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            timeout_ms,
        }
    }

    /// Fetch driving routes from start to end.
    async fn fetch_routes(
        &self,
        start: GeoPoint,
        end: GeoPoint,
    ) -> Result<Vec<CandidateRoute>, RoutingError> {
        // OSRM takes coordinates in lng,lat order.
        let url = format!(
            "{}/route/v1/driving/{},{};{},{}?alternatives=true&steps=true&overview=full&geometries=geojson",
            self.base_url, start.lng, start.lat, end.lng, end.lat
        );
        debug!(url = %url, "querying route provider");

        let response = self
            .client
            .get(&url)
            .timeout(Duration::from_millis(self.timeout_ms))
            .send()
            .await
            .map_err(|e| self.classify_send_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(RoutingError::ProviderUnavailable(format!(
                "provider returned {status}: {body}"
            )));
        }

        let payload: OsrmResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                RoutingError::ProviderTimeout {
                    timeout_ms: self.timeout_ms,
                }
            } else {
                RoutingError::MalformedResponse(format!("body decode failed: {e}"))
            }
        })?;

        routes_from_payload(payload)
    }

    fn classify_send_error(&self, error: &reqwest::Error) -> RoutingError {
        if error.is_timeout() {
            RoutingError::ProviderTimeout {
                timeout_ms: self.timeout_ms,
            }
        } else {
            RoutingError::ProviderUnavailable(format!("request failed: {error}"))
        }
    }
}

// ---------------------------------------------------------------------------
// OSRM wire shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: OsrmGeometry,
    duration: f64,
    distance: f64,
    #[serde(default)]
    legs: Vec<OsrmLeg>,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct OsrmLeg {
    #[serde(default)]
    summary: String,
    #[serde(default)]
    steps: serde_json::Value,
}

/// Flatten the OSRM payload into candidate routes.
///
/// Summary and steps come from the first leg; a single start-to-end
/// request always has exactly one.
fn routes_from_payload(payload: OsrmResponse) -> Result<Vec<CandidateRoute>, RoutingError> {
    if payload.routes.is_empty() {
        return Err(RoutingError::NoRoutes);
    }
    Ok(payload
        .routes
        .into_iter()
        .map(|route| {
            let (summary, steps) = route.legs.into_iter().next().map_or_else(
                || (String::new(), serde_json::Value::Null),
                |leg| (leg.summary, leg.steps),
            );
            CandidateRoute {
                geometry: route.geometry.coordinates,
                duration_seconds: route.duration,
                distance_meters: route.distance,
                summary,
                steps,
            }
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Fixed source
// ---------------------------------------------------------------------------

/// Preset candidate routes for tests and offline demos.
pub struct FixedRoutes {
    routes: Vec<CandidateRoute>,
}

impl FixedRoutes {
    /// Source that always returns these candidates.
    pub const fn new(routes: Vec<CandidateRoute>) -> Self {
        Self { routes }
    }

    fn fetch_routes(&self) -> Result<Vec<CandidateRoute>, RoutingError> {
        if self.routes.is_empty() {
            return Err(RoutingError::NoRoutes);
        }
        Ok(self.routes.clone())
    }
}
