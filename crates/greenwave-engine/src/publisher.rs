//! Bridges the simulation clock to the observer broadcast channel.
//!
//! The clock loop is deliberately ignorant of HTTP; it hands each tick's
//! snapshot to an [`UpdatePublisher`]. This module's publisher forwards
//! those snapshots into the shared [`AppState`] broadcast channel, where
//! the observer's `WebSocket` handlers fan them out to clients.

use std::sync::Arc;

use greenwave_observer::state::AppState;
use greenwave_signals::runner::UpdatePublisher;
use greenwave_types::TrafficUpdate;
use tracing::debug;

/// Publishes each tick's snapshot to every connected observer client.
pub struct SnapshotPublisher {
    state: Arc<AppState>,
}

impl SnapshotPublisher {
    /// New publisher feeding the given application state.
    pub const fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }
}

impl UpdatePublisher for SnapshotPublisher {
    fn publish_update(&mut self, update: &TrafficUpdate) {
        let receivers = self.state.broadcast(update);
        debug!(tick = update.tick, receivers, "traffic update broadcast");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeDelta;
    use greenwave_routing::incidents::IncidentFeed;
    use greenwave_routing::provider::{FixedRoutes, RouteSource};
    use greenwave_signals::registry::default_seeds;
    use greenwave_signals::store::SignalStore;

    use super::*;

    #[test]
    fn publisher_forwards_updates_to_subscribers() {
        let store = Arc::new(SignalStore::from_seeds(&default_seeds()));
        let incidents = Arc::new(IncidentFeed::new());
        let routes = Arc::new(RouteSource::Fixed(FixedRoutes::new(Vec::new())));
        let state = Arc::new(AppState::new(store, incidents, routes, TimeDelta::hours(24)));

        let mut rx = state.subscribe();
        let mut publisher = SnapshotPublisher::new(Arc::clone(&state));

        publisher.publish_update(&TrafficUpdate {
            tick: 3,
            signals: Vec::new(),
        });

        let received = rx.try_recv().unwrap();
        assert_eq!(received.tick, 3);
    }

    #[test]
    fn publisher_tolerates_zero_subscribers() {
        let store = Arc::new(SignalStore::from_seeds(&default_seeds()));
        let incidents = Arc::new(IncidentFeed::new());
        let routes = Arc::new(RouteSource::Fixed(FixedRoutes::new(Vec::new())));
        let state = Arc::new(AppState::new(store, incidents, routes, TimeDelta::hours(24)));

        let mut publisher = SnapshotPublisher::new(state);
        publisher.publish_update(&TrafficUpdate {
            tick: 1,
            signals: Vec::new(),
        });
    }
}
