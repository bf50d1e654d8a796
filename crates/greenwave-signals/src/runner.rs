//! The simulation clock.
//!
//! [`run_clock`] drives the whole registry: one [`SignalStore::advance_all`]
//! per tick, a [`TrafficUpdate`] handed to the publisher after each, then a
//! sleep at the operator-adjustable interval. The loop owns nothing; it
//! borrows the store and control block so the serving layer can read and
//! override concurrently.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use chrono::Utc;
use greenwave_types::TrafficUpdate;
use rand::Rng;
use tracing::{debug, error, info};

use crate::store::SignalStore;

/// Default wall-clock milliseconds per simulated second.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;

/// Smallest accepted tick interval.
pub const MIN_TICK_INTERVAL_MS: u64 = 100;

// ---------------------------------------------------------------------------
// Operator control
// ---------------------------------------------------------------------------

/// Shared knobs the operator can turn while the clock runs.
pub struct ClockControl {
    stop_requested: AtomicBool,
    tick_interval_ms: AtomicU64,
    max_ticks: u64,
}

impl ClockControl {
    /// New control block. `max_ticks` of zero means run unbounded.
    pub const fn new(tick_interval_ms: u64, max_ticks: u64) -> Self {
        Self {
            stop_requested: AtomicBool::new(false),
            tick_interval_ms: AtomicU64::new(tick_interval_ms),
            max_ticks,
        }
    }

    /// Ask the clock to stop before its next tick.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
    }

    /// Whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    /// Current tick interval in milliseconds.
    pub fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms.load(Ordering::Acquire)
    }

    /// Change the tick interval, returning the previous value.
    ///
    /// Intervals below [`MIN_TICK_INTERVAL_MS`] are rejected with `None`
    /// (zero included; a free-running clock is a test-only construction).
    pub fn set_tick_interval_ms(&self, interval_ms: u64) -> Option<u64> {
        if interval_ms < MIN_TICK_INTERVAL_MS {
            return None;
        }
        Some(self.tick_interval_ms.swap(interval_ms, Ordering::AcqRel))
    }

    /// Whether the configured tick budget is spent.
    pub const fn tick_limit_reached(&self, current_tick: u64) -> bool {
        self.max_ticks > 0 && current_tick >= self.max_ticks
    }

    /// Configured tick budget (zero means unbounded).
    pub const fn max_ticks(&self) -> u64 {
        self.max_ticks
    }
}

// ---------------------------------------------------------------------------
// Publisher seam
// ---------------------------------------------------------------------------

/// Receives the full state snapshot produced by each tick.
pub trait UpdatePublisher: Send {
    /// Called once per tick, after every signal has advanced.
    fn publish_update(&mut self, update: &TrafficUpdate);
}

/// Publisher that drops every update; for detached or test runs.
pub struct NoOpPublisher;

impl UpdatePublisher for NoOpPublisher {
    fn publish_update(&mut self, _update: &TrafficUpdate) {}
}

// ---------------------------------------------------------------------------
// Clock loop
// ---------------------------------------------------------------------------

/// Why [`run_clock`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockEndReason {
    /// The configured tick budget was reached.
    MaxTicksReached,
    /// An operator asked the clock to stop.
    OperatorStop,
}

/// Summary of a finished clock run.
#[derive(Debug)]
pub struct ClockReport {
    /// Why the loop ended.
    pub end_reason: ClockEndReason,
    /// Ticks completed before it ended.
    pub total_ticks: u64,
}

/// Run the clock until stopped or the tick budget is spent.
///
/// Per-signal tick failures are logged and skipped; they never bring the
/// clock down. The interval is re-read every iteration so operator changes
/// take effect on the next tick.
pub async fn run_clock(
    store: &SignalStore,
    control: &Arc<ClockControl>,
    publisher: &mut dyn UpdatePublisher,
    rng: &mut impl Rng,
) -> ClockReport {
    info!(
        signals = store.snapshot().await.len(),
        tick_interval_ms = control.tick_interval_ms(),
        max_ticks = control.max_ticks(),
        "clock started"
    );

    let mut total_ticks = 0_u64;
    loop {
        if control.is_stop_requested() {
            info!(total_ticks, "clock stopped by operator");
            return ClockReport {
                end_reason: ClockEndReason::OperatorStop,
                total_ticks,
            };
        }

        let now = Utc::now();
        let report = store.advance_all(now, rng).await;
        total_ticks = total_ticks.saturating_add(1);

        for failure in &report.failures {
            error!(tick = report.tick, error = %failure, "signal tick failed");
        }

        let update = TrafficUpdate {
            tick: report.tick,
            signals: store.snapshot().await,
        };
        publisher.publish_update(&update);
        debug!(
            tick = report.tick,
            advanced = report.advanced,
            failed = report.failures.len(),
            "tick complete"
        );

        if control.tick_limit_reached(report.tick) {
            info!(total_ticks, "tick limit reached");
            return ClockReport {
                end_reason: ClockEndReason::MaxTicksReached,
                total_ticks,
            };
        }

        let interval_ms = control.tick_interval_ms();
        if interval_ms > 0 {
            tokio::time::sleep(Duration::from_millis(interval_ms)).await;
        }
    }
}
