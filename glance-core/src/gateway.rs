//! Upstream gateway contracts.
//!
//! Each upstream domain is a narrow, read-only capability trait. The
//! aggregator holds these as `Arc<dyn Trait>` and never a concrete client,
//! so tests substitute deterministic fakes and production wires adapters
//! per external collaborator.
//!
//! Failures are opaque [`GatewayError`]s; the degrade-or-fail policy is the
//! aggregator's, not the gateway's. Cancellation is the caller's: dropping
//! or timing out the aggregation future cancels the in-flight gateway call,
//! and a gateway that observes its own deadline returns an error that flows
//! through the same policy as any other failure.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::GatewayResult;
use crate::{CampaignPreview, InvitePreview, UnreadStatus, UserProfile};

/// One page of preview items plus a continuation flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub has_more: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, has_more: bool) -> Self {
        Self { items, has_more }
    }
}

// Manual impl: the derive would require `T: Default`.
impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            has_more: false,
        }
    }
}

/// Campaign and invite previews for a user.
#[async_trait]
pub trait CampaignGateway: Send + Sync {
    /// List campaign previews. The one critical dependency: if this fails
    /// with no stale fallback, the whole request fails.
    async fn list_campaign_previews(
        &self,
        user_id: &str,
        limit: u32,
    ) -> GatewayResult<Page<CampaignPreview>>;

    /// List pending invite previews. Degradable.
    async fn list_pending_invite_previews(
        &self,
        user_id: &str,
        limit: u32,
    ) -> GatewayResult<Page<InvitePreview>>;
}

/// Social profile lookup. Degradable.
#[async_trait]
pub trait ProfileGateway: Send + Sync {
    /// Fetch a user's profile. `Ok(None)` means the profile does not exist,
    /// which is a legitimate business state rather than a failure.
    async fn get_user_profile(&self, user_id: &str) -> GatewayResult<Option<UserProfile>>;
}

/// Unread notification status. Degradable.
#[async_trait]
pub trait NotificationGateway: Send + Sync {
    async fn unread_status(&self, user_id: &str) -> GatewayResult<UnreadStatus>;
}
