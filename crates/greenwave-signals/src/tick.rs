//! Per-signal tick advancement.
//!
//! Every simulated second each signal takes one step of a bounded random
//! walk on its vehicle count, recomputes the metrics derived from that
//! count, and either counts its phase timer down or transitions to the
//! next phase in the fixed cycle Red -> Green -> Yellow -> Red.
//!
//! All randomness is drawn from an injected [`Rng`] so callers control
//! determinism: production uses a seeded or entropy-backed generator, tests
//! pin a seed and replay exact sequences.
//!
//! The vehicle walk is deliberately not a queueing model. The platform
//! needs a plausible live feed; the clamp to `[0, 200]` is the invariant
//! that keeps every derived metric well-defined.

use chrono::{DateTime, Utc};
use greenwave_types::{CongestionLevel, SignalId, SignalPhase, SignalState};
use rand::Rng;
use rust_decimal::{Decimal, RoundingStrategy};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Upper bound on queued vehicles at an approach.
pub const VEHICLE_MAX: u32 = 200;

/// Vehicle counts below this are Low congestion.
pub const MEDIUM_THRESHOLD: u32 = 60;

/// Vehicle counts below this (and at least [`MEDIUM_THRESHOLD`]) are
/// Medium congestion; everything at or above is High.
pub const HIGH_THRESHOLD: u32 = 130;

/// Fixed Yellow phase duration in seconds.
pub const YELLOW_DURATION_SECONDS: u32 = 5;

/// Fixed Red phase duration in seconds.
pub const RED_DURATION_SECONDS: u32 = 20;

/// Lowest reportable air-quality index.
pub const AIR_QUALITY_FLOOR: u32 = 40;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A single signal's tick failed.
///
/// These indicate logic defects, not environmental conditions: the clamp
/// and the checked metric arithmetic cannot fail while the documented
/// bounds hold. The failing signal's state is left untouched; other
/// signals tick on.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// The post-clamp vehicle count fell outside `[0, 200]`.
    #[error("signal {signal}: vehicle count {count} escaped [0, {VEHICLE_MAX}] after clamp")]
    VehicleCountOutOfRange {
        /// The signal whose update was halted.
        signal: SignalId,
        /// The out-of-range value.
        count: i64,
    },

    /// A derived-metric computation overflowed.
    #[error("signal {signal}: arithmetic overflow computing {metric}")]
    MetricOverflow {
        /// The signal whose update was halted.
        signal: SignalId,
        /// Which metric overflowed.
        metric: &'static str,
    },
}

// ---------------------------------------------------------------------------
// Pure per-field computations
// ---------------------------------------------------------------------------

/// One step of the bounded vehicle random walk.
///
/// Adds a uniform integer in `[-25, 30]` and clamps to `[0, 200]`. The
/// result is returned as `i64` so the caller can surface a clamp logic
/// defect instead of silently truncating.
pub fn vehicle_flux(current: u32, rng: &mut impl Rng) -> i64 {
    let delta: i64 = rng.random_range(-25..=30);
    i64::from(current)
        .saturating_add(delta)
        .clamp(0, i64::from(VEHICLE_MAX))
}

/// Congestion bucket for a vehicle count.
pub const fn classify_congestion(vehicle_count: u32) -> CongestionLevel {
    if vehicle_count < MEDIUM_THRESHOLD {
        CongestionLevel::Low
    } else if vehicle_count < HIGH_THRESHOLD {
        CongestionLevel::Medium
    } else {
        CongestionLevel::High
    }
}

/// Green duration assigned when a signal leaves Red, keyed by the
/// congestion measured at transition time.
pub const fn green_duration_seconds(congestion: CongestionLevel) -> u32 {
    match congestion {
        CongestionLevel::High => 40,
        CongestionLevel::Medium => 20,
        CongestionLevel::Low => 10,
    }
}

/// The next phase in the cycle and the timer it starts with.
pub const fn transition(phase: SignalPhase, congestion: CongestionLevel) -> (SignalPhase, u32) {
    match phase {
        SignalPhase::Red => (SignalPhase::Green, green_duration_seconds(congestion)),
        SignalPhase::Green => (SignalPhase::Yellow, YELLOW_DURATION_SECONDS),
        SignalPhase::Yellow => (SignalPhase::Red, RED_DURATION_SECONDS),
    }
}

/// Average approach speed in km/h for a vehicle count, one decimal place.
///
/// `70 - 0.45 * count` plus uniform noise in `[-10, 10]`, rounded
/// half-away-from-zero, floored at 2 km/h. Returns `None` only on
/// arithmetic overflow, which the documented count bound rules out.
pub fn average_speed_kmh(vehicle_count: u32, rng: &mut impl Rng) -> Option<Decimal> {
    let noise: i32 = rng.random_range(-10..=10);
    let load = Decimal::new(45, 2).checked_mul(Decimal::from(vehicle_count))?;
    let raw = Decimal::from(70_u32)
        .checked_sub(load)?
        .checked_add(Decimal::from(noise))?;
    let rounded = raw.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    Some(rounded.max(Decimal::TWO))
}

/// Air-quality index for a vehicle count, floored at 40.
///
/// `50 + 2.5 * count` plus uniform noise in `[-20, 20]`, with the
/// half-up rounding of the fractional term folded into integer math.
pub fn air_quality_index(vehicle_count: u32, rng: &mut impl Rng) -> Option<u32> {
    let noise: i64 = rng.random_range(-20..=20);
    // round(2.5 * count) == (5 * count + 1) / 2 for non-negative counts.
    let emission = i64::from(vehicle_count)
        .checked_mul(5)?
        .checked_add(1)?
        .checked_div(2)?;
    let raw = emission.checked_add(50)?.checked_add(noise)?;
    u32::try_from(raw.max(i64::from(AIR_QUALITY_FLOOR))).ok()
}

// ---------------------------------------------------------------------------
// Full-signal advance
// ---------------------------------------------------------------------------

/// Advance one signal by one simulated second.
///
/// Order matters: the vehicle count moves first, congestion and the
/// derived metrics are recomputed from the new count, and only then does
/// the timer/phase logic run, so a Red signal leaving its phase this tick
/// picks its green duration from the congestion it just measured.
///
/// On error the signal is left exactly as it was.
pub fn advance_signal(
    state: &mut SignalState,
    now: DateTime<Utc>,
    rng: &mut impl Rng,
) -> Result<(), TickError> {
    let walked = vehicle_flux(state.vehicle_count, rng);
    let vehicle_count =
        u32::try_from(walked).map_err(|_| TickError::VehicleCountOutOfRange {
            signal: state.id,
            count: walked,
        })?;
    if vehicle_count > VEHICLE_MAX {
        return Err(TickError::VehicleCountOutOfRange {
            signal: state.id,
            count: walked,
        });
    }

    let congestion = classify_congestion(vehicle_count);
    let avg_speed = average_speed_kmh(vehicle_count, rng).ok_or(TickError::MetricOverflow {
        signal: state.id,
        metric: "avg_speed_kmh",
    })?;
    let air_quality = air_quality_index(vehicle_count, rng).ok_or(TickError::MetricOverflow {
        signal: state.id,
        metric: "air_quality_index",
    })?;

    state.vehicle_count = vehicle_count;
    state.congestion = congestion;
    state.avg_speed_kmh = avg_speed;
    state.air_quality_index = air_quality;

    if state.timer_seconds > 0 {
        state.timer_seconds = state.timer_seconds.saturating_sub(1);
    } else {
        let (phase, duration) = transition(state.phase, congestion);
        state.phase = phase;
        state.timer_seconds = duration;
        state.phase_duration_seconds = duration;
    }

    state.last_updated = now;
    Ok(())
}
