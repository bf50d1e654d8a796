//! Signal registry, tick engine, and simulation clock for Greenwave.
//!
//! This crate owns the live half of the platform: the set of monitored
//! intersections, the per-second tick that moves vehicle counts and signal
//! phases, and the clock loop that drives it all and hands each finished
//! tick to a publisher.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `greenwave.yaml` into
//!   strongly-typed structs, with environment overrides.
//! - [`registry`] -- Intersection seed definitions, the built-in registry,
//!   and JSON loading.
//! - [`runner`] -- [`ClockControl`], the [`UpdatePublisher`] seam, and the
//!   clock loop itself.
//! - [`store`] -- [`SignalStore`], the single owner of mutable signal
//!   state, plus operator overrides.
//! - [`tick`] -- Pure per-signal advancement: vehicle walk, congestion,
//!   derived metrics, phase transitions.
//!
//! [`ClockControl`]: runner::ClockControl
//! [`UpdatePublisher`]: runner::UpdatePublisher
//! [`SignalStore`]: store::SignalStore

pub mod config;
pub mod registry;
pub mod runner;
pub mod store;
pub mod tick;
