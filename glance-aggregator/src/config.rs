//! Aggregator configuration.
//!
//! Configuration is loaded from environment variables with sensible
//! defaults; an unset or unparseable variable falls back to its default
//! silently.

use std::time::Duration;

use crate::constants::{
    DEFAULT_FRESH_TTL, DEFAULT_PREVIEW_LIMIT, DEFAULT_STALE_TTL, MAX_PREVIEW_LIMIT,
};

/// Tunables for the aggregation service.
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Age up to which a cached dashboard is served without any fan-out.
    pub fresh_ttl: Duration,

    /// Age up to which a cached dashboard is usable as a fallback when an
    /// upstream fails. Always at least `fresh_ttl`.
    pub stale_ttl: Duration,

    /// Preview limit substituted for zero/negative caller limits.
    pub default_preview_limit: u32,

    /// Upper bound on caller preview limits.
    pub max_preview_limit: u32,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            fresh_ttl: DEFAULT_FRESH_TTL,
            stale_ttl: DEFAULT_STALE_TTL,
            default_preview_limit: DEFAULT_PREVIEW_LIMIT,
            max_preview_limit: MAX_PREVIEW_LIMIT,
        }
    }
}

impl AggregatorConfig {
    /// Create AggregatorConfig from environment variables.
    ///
    /// Environment variables:
    /// - `GLANCE_FRESH_TTL_SECS`: fresh cache threshold (default: 15)
    /// - `GLANCE_STALE_TTL_SECS`: stale fallback threshold (default: 120)
    /// - `GLANCE_DEFAULT_PREVIEW_LIMIT`: substituted preview limit (default: 3)
    /// - `GLANCE_MAX_PREVIEW_LIMIT`: preview limit cap (default: 10)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let fresh_ttl = env_secs("GLANCE_FRESH_TTL_SECS").unwrap_or(defaults.fresh_ttl);
        let stale_ttl = env_secs("GLANCE_STALE_TTL_SECS").unwrap_or(defaults.stale_ttl);
        let default_preview_limit = env_u32("GLANCE_DEFAULT_PREVIEW_LIMIT")
            .unwrap_or(defaults.default_preview_limit);
        let max_preview_limit =
            env_u32("GLANCE_MAX_PREVIEW_LIMIT").unwrap_or(defaults.max_preview_limit);

        Self {
            fresh_ttl,
            stale_ttl,
            default_preview_limit,
            max_preview_limit,
        }
    }

    /// Set the fresh TTL.
    pub fn with_fresh_ttl(mut self, ttl: Duration) -> Self {
        self.fresh_ttl = ttl;
        self
    }

    /// Set the stale TTL.
    pub fn with_stale_ttl(mut self, ttl: Duration) -> Self {
        self.stale_ttl = ttl;
        self
    }

    /// Set the default preview limit.
    pub fn with_default_preview_limit(mut self, limit: u32) -> Self {
        self.default_preview_limit = limit;
        self
    }

    /// Set the max preview limit.
    pub fn with_max_preview_limit(mut self, limit: u32) -> Self {
        self.max_preview_limit = limit;
        self
    }
}

fn env_secs(name: &str) -> Option<Duration> {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs)
}

fn env_u32(name: &str) -> Option<u32> {
    std::env::var(name).ok().and_then(|s| s.parse().ok())
}
