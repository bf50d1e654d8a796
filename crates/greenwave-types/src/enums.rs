//! Enumeration types for the Greenwave traffic platform.
//!
//! Wire names follow the dashboard contract: signal phases and congestion
//! buckets are upper-case strings, operator actions are camelCase commands,
//! route modes are lower-case query values.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Signal phase
// ---------------------------------------------------------------------------

/// The color state of a traffic signal.
///
/// The tick path only ever walks the cycle Red -> Green -> Yellow -> Red;
/// operator overrides may force any phase, after which the cycle resumes
/// from the forced phase once its timer expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalPhase {
    /// Stop. Entered from Yellow, runs 20 s in the normal cycle.
    Red,
    /// Clear the intersection. Fixed 5 s in the normal cycle.
    Yellow,
    /// Go. Duration depends on congestion at transition time.
    Green,
}

// ---------------------------------------------------------------------------
// Congestion level
// ---------------------------------------------------------------------------

/// Coarse congestion bucket derived from a signal's vehicle count.
///
/// Thresholds are fixed: below 60 vehicles is Low, below 130 is Medium,
/// everything else is High.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CongestionLevel {
    /// Fewer than 60 vehicles. Free-flowing traffic.
    Low,
    /// 60 to 129 vehicles. Noticeable queuing.
    Medium,
    /// 130 vehicles or more. Saturated approach.
    High,
}

// ---------------------------------------------------------------------------
// Operator override action
// ---------------------------------------------------------------------------

/// An operator command forcing a signal's phase outside the normal cycle.
///
/// Wire names are the camelCase commands the control-room dashboard sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase")]
pub enum OverrideAction {
    /// Force the signal to Green (default hold 30 s).
    ForceGreen,
    /// Force the signal to Red (default hold 30 s).
    ForceRed,
    /// Force the signal to Yellow (default hold 5 s).
    ForceYellow,
}

// ---------------------------------------------------------------------------
// Incident status
// ---------------------------------------------------------------------------

/// Lifecycle status of a reported incident.
///
/// Only non-[`Resolved`](IncidentStatus::Resolved) incidents inside the
/// recency window count toward route penalties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IncidentStatus {
    /// Freshly reported, not yet acknowledged.
    Reported,
    /// Crews dispatched or on scene.
    Responding,
    /// Cleared. No longer affects routing.
    Resolved,
}

// ---------------------------------------------------------------------------
// Route mode
// ---------------------------------------------------------------------------

/// Ranking preference for a route-optimization request.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "lowercase")]
pub enum RouteMode {
    /// Balance travel time against congestion and incident penalties.
    #[default]
    Optimal,
    /// Raw travel time, except routes carrying an incident-level penalty
    /// are pushed behind every clean route.
    Shortest,
}
