//! Geographic primitives shared by signals, incidents, and route geometry.
//!
//! Distances use the haversine great-circle formula with a spherical Earth
//! of radius 6371 km. At the sub-kilometer proximity thresholds used for
//! route scoring the spherical error is negligible.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Mean Earth radius in kilometers for great-circle distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A WGS-84 coordinate pair.
///
/// Route geometry arrives from the provider in GeoJSON `[lng, lat]` order;
/// use [`GeoPoint::from_lng_lat`] when converting those pairs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GeoPoint {
    /// Latitude in decimal degrees (positive north).
    pub lat: f64,
    /// Longitude in decimal degrees (positive east).
    pub lng: f64,
}

impl GeoPoint {
    /// Create a point from latitude and longitude in decimal degrees.
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Create a point from a GeoJSON-order `[lng, lat]` pair.
    pub const fn from_lng_lat(pair: [f64; 2]) -> Self {
        let [lng, lat] = pair;
        Self { lat, lng }
    }
}

/// Great-circle distance between two points in kilometers.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let half_lat = (d_lat / 2.0).sin();
    let half_lng = (d_lng / 2.0).sin();
    let h = half_lat.mul_add(
        half_lat,
        a.lat.to_radians().cos() * b.lat.to_radians().cos() * half_lng * half_lng,
    );
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}
