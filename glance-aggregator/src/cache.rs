//! Two-tier dashboard cache.
//!
//! Stores the last successfully assembled dashboard per `(user_id, locale)`
//! key and answers "do I have one no older than T?" for two thresholds: the
//! fresh TTL (serve without fan-out) and the stale TTL (fallback when an
//! upstream fails). Entries expire passively by age comparison; nothing is
//! ever deleted.
//!
//! Every read and write deep-copies the stored dashboard. All fields are
//! owned, so `Clone` is that deep copy: a caller mutating a returned value
//! can never contaminate the cached snapshot, and vice versa.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use chrono::Duration as ChronoDuration;
use glance_core::{Dashboard, Timestamp};

use crate::constants::{DEFAULT_FRESH_TTL, DEFAULT_STALE_TTL};

/// Cache partition key: trimmed user id plus trimmed locale.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    user_id: String,
    locale: String,
}

impl CacheKey {
    pub fn new(user_id: &str, locale: &str) -> Self {
        Self {
            user_id: user_id.trim().to_string(),
            locale: locale.trim().to_string(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }
}

struct CacheEntry {
    dashboard: Dashboard,
    cached_at: Timestamp,
}

/// In-process store of the last non-degraded dashboard per key.
///
/// Reads take a shared lock, writes an exclusive one; locking is scoped
/// strictly to the map access and never held across an upstream call.
pub struct DashboardCache {
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
    fresh_ttl: Duration,
    stale_ttl: Duration,
}

impl DashboardCache {
    /// Create a cache with the given thresholds.
    ///
    /// A zero fresh or stale TTL is replaced with its default (15s / 120s).
    /// A stale TTL below the fresh TTL is silently raised to equal it.
    pub fn new(fresh_ttl: Duration, stale_ttl: Duration) -> Self {
        let fresh_ttl = if fresh_ttl.is_zero() {
            DEFAULT_FRESH_TTL
        } else {
            fresh_ttl
        };
        let stale_ttl = if stale_ttl.is_zero() {
            DEFAULT_STALE_TTL
        } else {
            stale_ttl
        };
        Self {
            entries: RwLock::new(HashMap::new()),
            fresh_ttl,
            stale_ttl: stale_ttl.max(fresh_ttl),
        }
    }

    /// Create a cache with the default thresholds.
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_FRESH_TTL, DEFAULT_STALE_TTL)
    }

    pub fn fresh_ttl(&self) -> Duration {
        self.fresh_ttl
    }

    pub fn stale_ttl(&self) -> Duration {
        self.stale_ttl
    }

    /// Get a deep copy of the entry for `key` if it is no older than the
    /// fresh TTL at `now`.
    pub fn get_fresh(&self, key: &CacheKey, now: Timestamp) -> Option<Dashboard> {
        self.get_within(key, now, self.fresh_ttl)
    }

    /// Get a deep copy of the entry for `key` if it is no older than the
    /// stale TTL at `now`.
    pub fn get_stale(&self, key: &CacheKey, now: Timestamp) -> Option<Dashboard> {
        self.get_within(key, now, self.stale_ttl)
    }

    /// Store a deep copy of `dashboard` under `key`, stamped with `now`.
    /// Overwrites any previous entry for the key.
    pub fn set(&self, key: &CacheKey, dashboard: &Dashboard, now: Timestamp) {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        entries.insert(
            key.clone(),
            CacheEntry {
                dashboard: dashboard.clone(),
                cached_at: now,
            },
        );
    }

    /// Number of entries currently stored (including expired ones, since
    /// expiry is passive).
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get_within(&self, key: &CacheKey, now: Timestamp, ttl: Duration) -> Option<Dashboard> {
        let entries = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let entry = entries.get(key)?;
        let age = now.signed_duration_since(entry.cached_at);
        // A negative age means clock skew; treat as a miss, not an error.
        if age < ChronoDuration::zero() {
            return None;
        }
        let ttl = ChronoDuration::from_std(ttl).ok()?;
        if age > ttl {
            return None;
        }
        Some(entry.dashboard.clone())
    }
}

impl Default for DashboardCache {
    fn default() -> Self {
        Self::with_defaults()
    }
}
