//! Shared application state for the observer server.
//!
//! [`AppState`] ties the serving layer to its collaborators: the signal
//! store the clock mutates, the incident feed, the route source, and the
//! broadcast channel that fans each [`TrafficUpdate`] out to every
//! connected `WebSocket` client.

use std::sync::Arc;

use chrono::TimeDelta;
use greenwave_routing::incidents::IncidentFeed;
use greenwave_routing::provider::RouteSource;
use greenwave_signals::store::SignalStore;
use greenwave_types::TrafficUpdate;
use tokio::sync::broadcast;

/// Capacity of the broadcast channel for traffic updates.
///
/// A subscriber that falls more than this many messages behind receives
/// a [`broadcast::error::RecvError::Lagged`] and resumes from the newest
/// update.
const BROADCAST_CAPACITY: usize = 256;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor. The
/// store and feed are shared with the engine, which keeps ticking and
/// reporting regardless of how many observers are connected.
#[derive(Clone)]
pub struct AppState {
    /// Broadcast sender for per-tick (and per-override) traffic updates.
    pub tx: broadcast::Sender<TrafficUpdate>,
    /// Live signal state, shared with the simulation clock.
    pub store: Arc<SignalStore>,
    /// Reported incidents.
    pub incidents: Arc<IncidentFeed>,
    /// Candidate route source for optimization requests.
    pub routes: Arc<RouteSource>,
    /// Recency window defining which incidents still penalize routes.
    pub incident_window: TimeDelta,
}

impl AppState {
    /// New state around the given collaborators.
    pub fn new(
        store: Arc<SignalStore>,
        incidents: Arc<IncidentFeed>,
        routes: Arc<RouteSource>,
        incident_window: TimeDelta,
    ) -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            tx,
            store,
            incidents,
            routes,
            incident_window,
        }
    }

    /// Subscribe to the traffic update stream.
    pub fn subscribe(&self) -> broadcast::Receiver<TrafficUpdate> {
        self.tx.subscribe()
    }

    /// Push an update to every connected client.
    ///
    /// Returns the number of receivers reached. Zero receivers is normal
    /// when no dashboard is connected, so the send error collapses to 0.
    pub fn broadcast(&self, update: &TrafficUpdate) -> usize {
        self.tx.send(update.clone()).unwrap_or(0)
    }
}
