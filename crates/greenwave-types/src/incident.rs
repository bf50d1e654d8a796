//! Incident records consumed by the route scorer and the observer API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::IncidentStatus;
use crate::geo::GeoPoint;
use crate::ids::IncidentId;

/// A reported traffic incident.
///
/// The location is always the nested [`GeoPoint`] field; there is exactly
/// one canonical shape on the wire. Category is free-form text supplied by
/// the reporter (`"accident"`, `"road closure"`, ...). It feeds the
/// `"Incident: <type>"` labels in route scoring verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Incident {
    /// Stable identifier assigned at report time.
    pub id: IncidentId,
    /// Free-form incident category.
    pub incident_type: String,
    /// Where the incident was reported.
    pub location: GeoPoint,
    /// Current lifecycle status.
    pub status: IncidentStatus,
    /// When the incident was reported.
    pub reported_at: DateTime<Utc>,
}
