//! In-memory incident feed.
//!
//! Reported incidents live here for the process lifetime. The scorer only
//! ever sees the *active* slice: incidents reported within the recency
//! window that have not been resolved. Durable storage is a separate
//! concern and stays behind this surface.

use chrono::{DateTime, TimeDelta, Utc};
use greenwave_types::{GeoPoint, Incident, IncidentId, IncidentStatus};
use tokio::sync::RwLock;

/// Incident lookup failures.
#[derive(Debug, thiserror::Error)]
pub enum IncidentError {
    /// No incident with the requested id.
    #[error("incident {0} not found")]
    NotFound(IncidentId),
}

/// Shared, append-only store of reported incidents.
#[derive(Default)]
pub struct IncidentFeed {
    incidents: RwLock<Vec<Incident>>,
}

impl IncidentFeed {
    /// Empty feed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new incident and return it.
    pub async fn report(
        &self,
        incident_type: String,
        location: GeoPoint,
        now: DateTime<Utc>,
    ) -> Incident {
        let incident = Incident {
            id: IncidentId::new(),
            incident_type,
            location,
            status: IncidentStatus::Reported,
            reported_at: now,
        };
        self.incidents.write().await.push(incident.clone());
        incident
    }

    /// Update an incident's status, returning the updated record.
    pub async fn set_status(
        &self,
        id: IncidentId,
        status: IncidentStatus,
    ) -> Result<Incident, IncidentError> {
        let mut incidents = self.incidents.write().await;
        let incident = incidents
            .iter_mut()
            .find(|incident| incident.id == id)
            .ok_or(IncidentError::NotFound(id))?;
        incident.status = status;
        Ok(incident.clone())
    }

    /// Incidents the scorer should still consider: reported within the
    /// window and not resolved.
    pub async fn active(&self, window: TimeDelta, now: DateTime<Utc>) -> Vec<Incident> {
        let cutoff = now.checked_sub_signed(window);
        self.incidents
            .read()
            .await
            .iter()
            .filter(|incident| incident.status != IncidentStatus::Resolved)
            .filter(|incident| cutoff.is_none_or(|cutoff| incident.reported_at >= cutoff))
            .cloned()
            .collect()
    }

    /// Every stored incident, regardless of age or status.
    pub async fn all(&self) -> Vec<Incident> {
        self.incidents.read().await.clone()
    }
}
