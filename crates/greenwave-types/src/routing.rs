//! Route candidates and scoring results.
//!
//! A [`CandidateRoute`] is what the external routing provider hands back
//! for one start/end pair; a [`ScoredRoute`] is the same route after the
//! scorer has walked it against live signal and incident state. Both are
//! scoped to a single optimization request and never persisted.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// CandidateRoute
// ---------------------------------------------------------------------------

/// One path returned by the routing provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CandidateRoute {
    /// Route geometry as GeoJSON-order `[lng, lat]` pairs.
    pub geometry: Vec<[f64; 2]>,
    /// Total travel time in seconds.
    pub duration_seconds: f64,
    /// Total length in meters.
    pub distance_meters: f64,
    /// Provider's one-line description of the route (main road names).
    pub summary: String,
    /// Opaque turn-by-turn steps, passed through to the dashboard untouched.
    pub steps: serde_json::Value,
}

// ---------------------------------------------------------------------------
// ScoredRoute
// ---------------------------------------------------------------------------

/// A candidate route annotated with congestion and incident penalties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ScoredRoute {
    /// Route geometry as GeoJSON-order `[lng, lat]` pairs.
    pub geometry: Vec<[f64; 2]>,
    /// Raw travel time in seconds (ranking input for shortest mode).
    pub duration_seconds: f64,
    /// Length in kilometers, two decimal places.
    #[ts(as = "String")]
    pub distance_km: Decimal,
    /// Travel time in minutes, one decimal place.
    #[ts(as = "String")]
    pub duration_minutes: Decimal,
    /// Accumulated penalty from nearby congested signals and incidents.
    pub congestion_penalty: u32,
    /// Human-readable penalty causes, insertion order, deduplicated.
    pub congestion_details: Vec<String>,
    /// Ranking score: raw travel minutes plus penalty.
    pub score: f64,
    /// Provider's one-line description of the route.
    pub summary: String,
    /// Opaque turn-by-turn steps from the provider.
    pub steps: serde_json::Value,
}

// ---------------------------------------------------------------------------
// RouteAnalysis
// ---------------------------------------------------------------------------

/// The complete result of one route-optimization request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RouteAnalysis {
    /// All scored routes, best first.
    pub routes: Vec<ScoredRoute>,
    /// Index of the recommended route. Always 0 after ranking; kept
    /// explicit so the dashboard contract never has to assume it.
    pub selected_index: u32,
    /// Human-readable justification for the recommendation.
    pub reasoning: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn scored_route_serializes_formatted_fields_as_strings() {
        let route = ScoredRoute {
            geometry: vec![[77.59, 12.97], [77.60, 12.98]],
            duration_seconds: 732.0,
            distance_km: Decimal::new(1234, 2),
            duration_minutes: Decimal::new(122, 1),
            congestion_penalty: 70,
            congestion_details: vec![String::from("Harbor Blvd / 5th Ave")],
            score: 82.2,
            summary: String::from("Harbor Blvd"),
            steps: serde_json::Value::Array(vec![]),
        };
        let json = serde_json::to_value(&route).unwrap();
        assert_eq!(json["distance_km"], "12.34");
        assert_eq!(json["duration_minutes"], "12.2");
        assert_eq!(json["congestion_penalty"], 70);
        assert_eq!(json["geometry"][0][0], 77.59);
    }

    #[test]
    fn analysis_roundtrip() {
        let analysis = RouteAnalysis {
            routes: vec![],
            selected_index: 0,
            reasoning: String::from("Traffic conditions are stable."),
        };
        let json = serde_json::to_string(&analysis).unwrap();
        let back: RouteAnalysis = serde_json::from_str(&json).unwrap();
        assert_eq!(back, analysis);
    }
}
