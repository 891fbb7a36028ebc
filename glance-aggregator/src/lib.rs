//! Glance Aggregator
//!
//! The aggregation engine behind the "at-a-glance" dashboard: request-scoped
//! fan-out to upstream gateways, a two-tier (fresh/stale) per-key cache, the
//! degrade-or-fail policy for partial upstream failure, and deterministic
//! derivation of the prioritized next-actions list.
//!
//! The transport layer that exposes [`service::DashboardService`] over a
//! network API, and the concrete upstream adapters, live outside this crate;
//! they interact only through the gateway traits in `glance-core` and the
//! error taxonomy's variant predicates.

pub mod actions;
pub mod cache;
pub mod config;
pub mod constants;
pub mod service;

pub use actions::derive_actions;
pub use cache::{CacheKey, DashboardCache};
pub use config::AggregatorConfig;
pub use service::{DashboardRequest, DashboardService, DashboardServiceBuilder};
