//! Shared constants for the aggregation engine.

use std::time::Duration;

/// Default fresh TTL when none (or zero) is configured.
pub const DEFAULT_FRESH_TTL: Duration = Duration::from_secs(15);

/// Default stale TTL when none (or zero) is configured.
pub const DEFAULT_STALE_TTL: Duration = Duration::from_secs(120);

/// Preview limit substituted when the caller passes zero or a negative.
pub const DEFAULT_PREVIEW_LIMIT: u32 = 3;

/// Upper bound on preview limits, capping upstream request cost.
pub const MAX_PREVIEW_LIMIT: u32 = 10;
