//! Signal state and the live-update broadcast payload.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{CongestionLevel, SignalPhase};
use crate::geo::GeoPoint;
use crate::ids::SignalId;

// ---------------------------------------------------------------------------
// SignalState
// ---------------------------------------------------------------------------

/// Live state of one signalized intersection.
///
/// Identity and location are immutable after seeding; everything else is
/// rewritten by the tick engine or by operator overrides. The unsigned
/// timer makes a negative countdown unrepresentable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SignalState {
    /// Stable identifier, minted when the store is seeded.
    pub id: SignalId,
    /// Human-readable intersection name, e.g. `"Harbor Blvd / 5th Ave"`.
    pub name: String,
    /// Intersection coordinates.
    pub location: GeoPoint,
    /// Current light color.
    pub phase: SignalPhase,
    /// Seconds remaining in the current phase.
    pub timer_seconds: u32,
    /// Seconds the current phase was set to run. Display only, the
    /// countdown in [`timer_seconds`](Self::timer_seconds) is authoritative.
    pub phase_duration_seconds: u32,
    /// Vehicles currently queued at the approach, clamped to `[0, 200]`.
    pub vehicle_count: u32,
    /// Congestion bucket recomputed from the vehicle count every tick.
    pub congestion: CongestionLevel,
    /// Average approach speed in km/h, one decimal place.
    #[ts(as = "String")]
    pub avg_speed_kmh: Decimal,
    /// Air-quality index at the intersection, floor 40.
    pub air_quality_index: u32,
    /// Timestamp of the last mutation (tick or override).
    pub last_updated: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// TrafficUpdate
// ---------------------------------------------------------------------------

/// One frame of the live update stream.
///
/// Broadcast after every tick and every operator override. Carries the
/// full snapshot in registry order so subscribers never need to reconcile
/// partial diffs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TrafficUpdate {
    /// Simulation tick this frame was produced at.
    pub tick: u64,
    /// Every signal's current state, registry order.
    pub signals: Vec<SignalState>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::enums::{CongestionLevel, SignalPhase};

    fn sample_signal() -> SignalState {
        SignalState {
            id: SignalId::new(),
            name: String::from("Harbor Blvd / 5th Ave"),
            location: GeoPoint::new(37.7749, -122.4194),
            phase: SignalPhase::Red,
            timer_seconds: 0,
            phase_duration_seconds: 10,
            vehicle_count: 42,
            congestion: CongestionLevel::Low,
            avg_speed_kmh: Decimal::new(400, 1),
            air_quality_index: 50,
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn signal_state_wire_shape() {
        let json = serde_json::to_value(sample_signal()).unwrap();
        assert_eq!(json["phase"], "RED");
        assert_eq!(json["congestion"], "LOW");
        assert_eq!(json["vehicle_count"], 42);
        // Decimal serializes as a string with the serde feature.
        assert_eq!(json["avg_speed_kmh"], "40.0");
        assert!(json["location"]["lat"].is_f64());
    }

    #[test]
    fn traffic_update_roundtrip() {
        let update = TrafficUpdate {
            tick: 7,
            signals: vec![sample_signal()],
        };
        let json = serde_json::to_string(&update).unwrap();
        let back: TrafficUpdate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, update);
    }
}
