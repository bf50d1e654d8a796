//! Shared type definitions for the Greenwave traffic platform.
//!
//! This crate is the single source of truth for all types used across the
//! Greenwave workspace. Types defined here flow downstream to `TypeScript`
//! via `ts-rs` for the traffic dashboard.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for signals and incidents
//! - [`enums`] -- Phases, congestion buckets, override actions, route modes
//! - [`geo`] -- Coordinate pairs and great-circle distance
//! - [`signal`] -- Live signal state and the broadcast payload
//! - [`incident`] -- Reported incident records
//! - [`routing`] -- Route candidates and scoring results

pub mod enums;
pub mod geo;
pub mod ids;
pub mod incident;
pub mod routing;
pub mod signal;

// Re-export all public types at crate root for convenience.
pub use enums::{CongestionLevel, IncidentStatus, OverrideAction, RouteMode, SignalPhase};
pub use geo::{EARTH_RADIUS_KM, GeoPoint, haversine_km};
pub use ids::{IncidentId, SignalId};
pub use incident::Incident;
pub use routing::{CandidateRoute, RouteAnalysis, ScoredRoute};
pub use signal::{SignalState, TrafficUpdate};

#[cfg(test)]
mod tests {
    //! Integration tests for type exports and `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // ts-rs generates TypeScript bindings when types with
        // #[ts(export)] are used. Importing them here triggers generation.
        // The actual files are written to the `bindings/` directory
        // relative to the crate root.
        use ts_rs::TS;

        // IDs
        let _ = crate::ids::SignalId::export_all();
        let _ = crate::ids::IncidentId::export_all();

        // Enums
        let _ = crate::enums::SignalPhase::export_all();
        let _ = crate::enums::CongestionLevel::export_all();
        let _ = crate::enums::OverrideAction::export_all();
        let _ = crate::enums::IncidentStatus::export_all();
        let _ = crate::enums::RouteMode::export_all();

        // Geo
        let _ = crate::geo::GeoPoint::export_all();

        // Signals
        let _ = crate::signal::SignalState::export_all();
        let _ = crate::signal::TrafficUpdate::export_all();

        // Incidents
        let _ = crate::incident::Incident::export_all();

        // Routing
        let _ = crate::routing::CandidateRoute::export_all();
        let _ = crate::routing::ScoredRoute::export_all();
        let _ = crate::routing::RouteAnalysis::export_all();
    }
}
