//! Route retrieval, incident tracking, and congestion-aware scoring.
//!
//! This crate is the request-time half of Greenwave: given a start and
//! end, it fetches candidate routes from an OSRM-compatible provider,
//! walks each one against the live signal snapshot and active incidents,
//! and returns a ranked analysis with a human-readable recommendation.
//!
//! # Modules
//!
//! - [`error`] -- [`RoutingError`], keeping "no route exists" distinct
//!   from transport failures.
//! - [`incidents`] -- The in-memory [`IncidentFeed`] and its recency
//!   window.
//! - [`provider`] -- [`RouteSource`]: the OSRM client and the fixed
//!   offline source.
//! - [`scorer`] -- Penalty accumulation, ranking, and reasoning.
//!
//! [`RoutingError`]: error::RoutingError
//! [`IncidentFeed`]: incidents::IncidentFeed
//! [`RouteSource`]: provider::RouteSource

pub mod error;
pub mod incidents;
pub mod provider;
pub mod scorer;
