//! Shared signal state.
//!
//! One [`SignalStore`] owns every [`SignalState`] for the process lifetime.
//! The tick loop and operator overrides both mutate through the same write
//! lock, so a tick never observes a half-applied override; readers get
//! cloned snapshots and never see internal references.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use greenwave_types::{CongestionLevel, OverrideAction, SignalId, SignalPhase, SignalState};
use rand::Rng;
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use crate::registry::SignalSeed;
use crate::tick::{self, TickError, VEHICLE_MAX};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Store lookup failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No signal with the requested id.
    #[error("signal {0} not found")]
    SignalNotFound(SignalId),
}

// ---------------------------------------------------------------------------
// Override defaults
// ---------------------------------------------------------------------------

/// Phase a forced action pins the signal to.
pub const fn forced_phase(action: OverrideAction) -> SignalPhase {
    match action {
        OverrideAction::ForceGreen => SignalPhase::Green,
        OverrideAction::ForceRed => SignalPhase::Red,
        OverrideAction::ForceYellow => SignalPhase::Yellow,
    }
}

/// Hold duration applied when the operator does not supply one.
pub const fn default_override_duration(action: OverrideAction) -> u32 {
    match action {
        OverrideAction::ForceGreen | OverrideAction::ForceRed => 30,
        OverrideAction::ForceYellow => 5,
    }
}

// ---------------------------------------------------------------------------
// Tick report
// ---------------------------------------------------------------------------

/// Outcome of advancing every signal by one tick.
#[derive(Debug)]
pub struct TickReport {
    /// The tick number just completed (first tick is 1).
    pub tick: u64,
    /// How many signals advanced cleanly.
    pub advanced: u32,
    /// Per-signal failures; the affected signals kept their prior state.
    pub failures: Vec<TickError>,
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Owner of all live signal state plus the monotonic tick counter.
pub struct SignalStore {
    signals: RwLock<Vec<SignalState>>,
    tick: AtomicU64,
}

impl SignalStore {
    /// Build the store from intersection seeds.
    ///
    /// Every signal starts Red with an expired timer so the first tick
    /// immediately measures congestion and assigns a green window from it.
    pub fn from_seeds(seeds: &[SignalSeed]) -> Self {
        let now = Utc::now();
        let signals = seeds
            .iter()
            .map(|seed| SignalState {
                id: SignalId::new(),
                name: seed.name.clone(),
                location: seed.location,
                phase: SignalPhase::Red,
                timer_seconds: 0,
                phase_duration_seconds: 10,
                vehicle_count: seed.initial_vehicles.min(VEHICLE_MAX),
                congestion: CongestionLevel::Low,
                avg_speed_kmh: Decimal::new(400, 1),
                air_quality_index: 50,
                last_updated: now,
            })
            .collect();
        Self {
            signals: RwLock::new(signals),
            tick: AtomicU64::new(0),
        }
    }

    /// Consistent copy of every signal, in registry order.
    pub async fn snapshot(&self) -> Vec<SignalState> {
        self.signals.read().await.clone()
    }

    /// Copy of a single signal, if it exists.
    pub async fn signal(&self, id: SignalId) -> Option<SignalState> {
        self.signals
            .read()
            .await
            .iter()
            .find(|signal| signal.id == id)
            .cloned()
    }

    /// Number of ticks completed so far.
    pub fn current_tick(&self) -> u64 {
        self.tick.load(Ordering::Acquire)
    }

    /// Advance every signal by one simulated second.
    ///
    /// A signal that fails keeps its previous state and is reported in
    /// the result; the rest of the registry still advances.
    pub async fn advance_all(&self, now: DateTime<Utc>, rng: &mut impl Rng) -> TickReport {
        let mut signals = self.signals.write().await;
        let tick = self.tick.fetch_add(1, Ordering::AcqRel).saturating_add(1);

        let mut advanced = 0_u32;
        let mut failures = Vec::new();
        for signal in signals.iter_mut() {
            match tick::advance_signal(signal, now, rng) {
                Ok(()) => advanced = advanced.saturating_add(1),
                Err(error) => failures.push(error),
            }
        }

        TickReport {
            tick,
            advanced,
            failures,
        }
    }

    /// Force a signal's phase for a hold period.
    ///
    /// The timer is set to the requested duration, or the per-action
    /// default when none is given, and the regular cycle resumes from the
    /// forced phase once it expires. Returns the updated signal so the
    /// caller can broadcast it without waiting for the next tick.
    pub async fn apply_override(
        &self,
        id: SignalId,
        action: OverrideAction,
        duration_seconds: Option<u32>,
        now: DateTime<Utc>,
    ) -> Result<SignalState, StoreError> {
        let mut signals = self.signals.write().await;
        let signal = signals
            .iter_mut()
            .find(|signal| signal.id == id)
            .ok_or(StoreError::SignalNotFound(id))?;

        let duration = duration_seconds.unwrap_or_else(|| default_override_duration(action));
        signal.phase = forced_phase(action);
        signal.timer_seconds = duration;
        signal.phase_duration_seconds = duration;
        signal.last_updated = now;
        Ok(signal.clone())
    }
}
