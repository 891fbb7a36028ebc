//! Glance Core - Dashboard Types
//!
//! Pure data structures with no behavior. All other crates depend on this.
//! This crate contains ONLY data types and the error taxonomy - no
//! orchestration logic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub mod error;
pub mod gateway;

pub use error::{AggregateError, AggregateResult, GatewayError, GatewayResult};
pub use gateway::{CampaignGateway, NotificationGateway, Page, ProfileGateway};

// ============================================================================
// IDENTITY TYPES
// ============================================================================

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

// ============================================================================
// ENUMS
// ============================================================================

/// Freshness of a returned dashboard.
///
/// `Fresh` means the response came from a live assembly or a cache entry
/// within the fresh TTL. `Stale` means the response is a cache fallback
/// older than the fresh TTL but within the stale TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Freshness {
    #[default]
    Unspecified,
    Fresh,
    Stale,
}

/// Upstream dependencies the aggregator fans out to.
///
/// Closed set: `degraded_dependencies` in [`DashboardMetadata`] only ever
/// contains these values, sorted and deduplicated. Variants are declared
/// in lexical order of their wire names so the derived `Ord` sorts the
/// same way the serialized names do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dependency {
    /// Campaign preview listing. The one critical dependency.
    CampaignPreviews,
    /// Unread notification status.
    Notifications,
    /// Pending invite listing.
    PendingInvites,
    /// Social profile lookup.
    Profile,
}

impl Dependency {
    /// Stable wire name for this dependency.
    pub fn as_str(&self) -> &'static str {
        match self {
            Dependency::CampaignPreviews => "campaign_previews",
            Dependency::Notifications => "notifications",
            Dependency::PendingInvites => "pending_invites",
            Dependency::Profile => "profile",
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    Active,
    Paused,
    Completed,
    Archived,
}

/// Suggested next actions, derived deterministically from dashboard state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    ReviewPendingInvites,
    CompleteProfile,
    CreateOrJoinCampaign,
    ContinueActiveCampaign,
    ReviewNotifications,
}

// ============================================================================
// SECTION SUMMARIES
// ============================================================================

/// A single campaign in the dashboard's preview list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignPreview {
    pub campaign_id: Uuid,
    pub name: String,
    pub status: CampaignStatus,
    pub member_count: u32,
}

/// A single pending invite in the dashboard's preview list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvitePreview {
    pub invite_id: Uuid,
    pub campaign_name: String,
    pub inviter_name: String,
}

/// Campaign section of the dashboard.
///
/// When `available` is false the remaining fields hold zero-values or a
/// from-cache fallback and must not be read as live data.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CampaignSummary {
    pub available: bool,
    pub campaign_count: u32,
    pub active_count: u32,
    pub has_more: bool,
    pub campaigns: Vec<CampaignPreview>,
}

/// Pending-invite section of the dashboard.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InviteSummary {
    pub available: bool,
    pub pending_count: u32,
    pub has_more: bool,
    pub invites: Vec<InvitePreview>,
}

/// Social profile section of the dashboard.
///
/// `available = false` covers both a degraded profile gateway and the
/// legitimate "profile not found" business state; only the former marks
/// the dashboard degraded.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserSummary {
    pub available: bool,
    pub username: String,
    pub display_name: String,
    pub discoverable: bool,
    pub needs_profile_completion: bool,
}

/// Unread-notification section of the dashboard.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NotificationSummary {
    pub available: bool,
    pub has_unread: bool,
    pub unread_count: u32,
}

// ============================================================================
// DASHBOARD AGGREGATE
// ============================================================================

/// A suggested next action with its fixed priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardAction {
    pub kind: ActionKind,
    pub priority: u8,
}

/// Freshness and degradation metadata for an assembled dashboard.
///
/// Invariant: `freshness == Stale` implies `cache_hit && degraded`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardMetadata {
    pub freshness: Freshness,
    pub cache_hit: bool,
    pub degraded: bool,
    /// Sorted, deduplicated set of dependencies that failed during assembly.
    pub degraded_dependencies: Vec<Dependency>,
    pub generated_at: Timestamp,
}

/// The aggregate "at-a-glance" view returned to the caller.
///
/// Fully owned: every nested collection is a deep copy, so the caller may
/// mutate the value freely without affecting any cached snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub metadata: DashboardMetadata,
    pub user: UserSummary,
    pub invites: InviteSummary,
    pub notifications: NotificationSummary,
    pub campaigns: CampaignSummary,
    /// Sorted by priority descending; ties keep first-computed order.
    pub actions: Vec<DashboardAction>,
}

// ============================================================================
// GATEWAY DTOS
// ============================================================================

/// Profile data returned by the profile gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    pub display_name: String,
}

/// Unread status returned by the notification gateway.
///
/// `unread_count` is signed because upstreams have been observed to report
/// negative counts; the aggregator clamps to zero before surfacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreadStatus {
    pub has_unread: bool,
    pub unread_count: i64,
}
