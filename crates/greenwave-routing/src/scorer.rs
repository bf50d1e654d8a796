//! Congestion-aware route scoring.
//!
//! Stateless and synchronous: the caller hands in a signal snapshot, the
//! active incidents, and the provider's candidates, and gets back a ranked
//! [`RouteAnalysis`]. Scoring the same inputs always produces the same
//! output.
//!
//! Each route's geometry is sampled down to roughly [`SAMPLE_TARGET`]
//! points. Every sampled point is checked against every signal (within
//! [`SIGNAL_PROXIMITY_KM`]) and every active incident (within
//! [`INCIDENT_PROXIMITY_KM`]); penalties accumulate per point/entity pair
//! so a route that hugs a congested corridor pays more than one that
//! clips it. Labels deduplicate, penalties never do.

use greenwave_types::{
    CandidateRoute, CongestionLevel, GeoPoint, Incident, RouteAnalysis, RouteMode, ScoredRoute,
    SignalState, haversine_km,
};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::RoutingError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// A signal affects a route point within this distance.
pub const SIGNAL_PROXIMITY_KM: f64 = 0.5;

/// An incident affects a route point within this distance. Tighter than
/// the signal radius so incidents do not block parallel streets a block
/// over.
pub const INCIDENT_PROXIMITY_KM: f64 = 0.2;

/// Penalty per sampled point near a High-congestion signal.
pub const HIGH_SIGNAL_PENALTY: u32 = 50;

/// Penalty per sampled point near a Medium-congestion signal.
pub const MEDIUM_SIGNAL_PENALTY: u32 = 20;

/// Penalty per sampled point near an active incident.
pub const INCIDENT_PENALTY: u32 = 500;

/// Total penalty at or above this marks the route as incident-carrying.
pub const INCIDENT_VETO_THRESHOLD: u32 = 400;

/// Seconds added to an incident-carrying route's shortest-mode key, enough
/// to push it behind any clean candidate.
const SHORTEST_VETO_OFFSET_SECONDS: f64 = 10_000.0;

/// Approximate number of geometry points sampled per route.
pub const SAMPLE_TARGET: usize = 20;

// ---------------------------------------------------------------------------
// Sampling and proximity
// ---------------------------------------------------------------------------

/// Stride that thins a geometry of `len` points down to roughly
/// [`SAMPLE_TARGET`] samples. Short geometries keep every point.
pub fn sample_stride(len: usize) -> usize {
    len.checked_div(SAMPLE_TARGET).unwrap_or(0).max(1)
}

/// Whether a signal this far away affects the route point.
pub const fn within_signal_radius(distance_km: f64) -> bool {
    distance_km < SIGNAL_PROXIMITY_KM
}

/// Whether an incident this far away affects the route point.
pub const fn within_incident_radius(distance_km: f64) -> bool {
    distance_km < INCIDENT_PROXIMITY_KM
}

// ---------------------------------------------------------------------------
// Per-route analysis
// ---------------------------------------------------------------------------

/// Score one candidate against the live snapshot.
///
/// High signals contribute penalty and their name; Medium signals
/// contribute penalty only; incidents contribute penalty and an
/// `Incident: <type>` label. The score is travel minutes plus penalty.
pub fn analyze_route(
    candidate: CandidateRoute,
    signals: &[SignalState],
    incidents: &[Incident],
) -> ScoredRoute {
    let stride = sample_stride(candidate.geometry.len());
    let mut penalty: u32 = 0;
    let mut details: Vec<String> = Vec::new();

    for pair in candidate.geometry.iter().step_by(stride) {
        let point = GeoPoint::from_lng_lat(*pair);

        for signal in signals {
            if !within_signal_radius(haversine_km(point, signal.location)) {
                continue;
            }
            match signal.congestion {
                CongestionLevel::High => {
                    penalty = penalty.saturating_add(HIGH_SIGNAL_PENALTY);
                    if !details.contains(&signal.name) {
                        details.push(signal.name.clone());
                    }
                }
                CongestionLevel::Medium => {
                    penalty = penalty.saturating_add(MEDIUM_SIGNAL_PENALTY);
                }
                CongestionLevel::Low => {}
            }
        }

        for incident in incidents {
            if within_incident_radius(haversine_km(point, incident.location)) {
                penalty = penalty.saturating_add(INCIDENT_PENALTY);
                let label = format!("Incident: {}", incident.incident_type);
                if !details.contains(&label) {
                    details.push(label);
                }
            }
        }
    }

    let duration_minutes = candidate.duration_seconds / 60.0;
    let score = duration_minutes + f64::from(penalty);

    ScoredRoute {
        geometry: candidate.geometry,
        duration_seconds: candidate.duration_seconds,
        distance_km: format_decimal(candidate.distance_meters / 1000.0, 2),
        duration_minutes: format_decimal(duration_minutes, 1),
        congestion_penalty: penalty,
        congestion_details: details,
        score,
        summary: candidate.summary,
        steps: candidate.steps,
    }
}

/// Round to fixed decimal places, half away from zero, keeping trailing
/// zeros so the wire strings read like gauge values (`"5.0"`, `"2.40"`).
fn format_decimal(value: f64, places: u32) -> Decimal {
    let mut rounded = Decimal::try_from(value)
        .unwrap_or_default()
        .round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(places);
    rounded
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// Sort routes best-first for the requested mode.
///
/// Both modes use a stable ascending sort, so candidates the keys cannot
/// separate keep their provider order.
pub fn rank_routes(routes: &mut [ScoredRoute], mode: RouteMode) {
    match mode {
        RouteMode::Optimal => routes.sort_by(|a, b| a.score.total_cmp(&b.score)),
        RouteMode::Shortest => {
            routes.sort_by(|a, b| shortest_key(a).total_cmp(&shortest_key(b)));
        }
    }
}

/// Shortest-mode ranking key: raw seconds, with incident-carrying routes
/// pushed behind every clean one.
fn shortest_key(route: &ScoredRoute) -> f64 {
    if route.congestion_penalty >= INCIDENT_VETO_THRESHOLD {
        route.duration_seconds + SHORTEST_VETO_OFFSET_SECONDS
    } else {
        route.duration_seconds
    }
}

// ---------------------------------------------------------------------------
// Reasoning
// ---------------------------------------------------------------------------

/// Explain the top-ranked route. Empty input yields an empty string; the
/// scoring entry point rejects that case before ranking.
pub fn build_reasoning(ranked: &[ScoredRoute], mode: RouteMode) -> String {
    let Some(top) = ranked.first() else {
        return String::new();
    };

    match mode {
        RouteMode::Shortest => {
            if top.congestion_penalty >= INCIDENT_VETO_THRESHOLD {
                String::from("Even the shortest route has a reported incident. Use caution.")
            } else {
                String::from(
                    "We selected the route with the absolute shortest travel time, \
                     regardless of potential congestion.",
                )
            }
        }
        RouteMode::Optimal => {
            if let Some(second) = ranked.get(1) {
                if top.congestion_penalty < second.congestion_penalty {
                    return format!(
                        "Recommended to avoid heavy congestion detected at {}.",
                        detail_labels(&second.congestion_details)
                    );
                }
                if top.duration_seconds < second.duration_seconds {
                    return String::from(
                        "Traffic conditions are stable, so the shortest route is also the \
                         optimal one.",
                    );
                }
            }
            if top.congestion_penalty > 0 {
                return format!(
                    "Heavy traffic detected at {}, but this remains the most efficient option.",
                    detail_labels(&top.congestion_details)
                );
            }
            String::from("This is the best balance of speed and traffic avoidance.")
        }
    }
}

/// Up to two labels joined for prose, or a generic stand-in when the
/// penalty came from unlabeled (Medium) signals.
fn detail_labels(details: &[String]) -> String {
    let labels = details
        .iter()
        .take(2)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if labels.is_empty() {
        String::from("key intersections")
    } else {
        labels
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Score, rank, and explain a set of candidates.
///
/// # Errors
///
/// Returns [`RoutingError::NoRoutes`] when `candidates` is empty.
pub fn score_routes(
    candidates: Vec<CandidateRoute>,
    signals: &[SignalState],
    incidents: &[Incident],
    mode: RouteMode,
) -> Result<RouteAnalysis, RoutingError> {
    if candidates.is_empty() {
        return Err(RoutingError::NoRoutes);
    }

    let mut routes: Vec<ScoredRoute> = candidates
        .into_iter()
        .map(|candidate| analyze_route(candidate, signals, incidents))
        .collect();
    rank_routes(&mut routes, mode);
    let reasoning = build_reasoning(&routes, mode);

    Ok(RouteAnalysis {
        routes,
        selected_index: 0,
        reasoning,
    })
}
