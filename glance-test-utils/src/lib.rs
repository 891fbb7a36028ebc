//! Glance Test Utilities
//!
//! Centralized test infrastructure for the Glance workspace:
//! - Deterministic fake gateways with failure injection
//! - Call and limit recording for fan-out assertions
//! - Fixtures for common preview values
//!
//! The fakes use interior mutability so a test can hold an `Arc` clone of
//! the fake it handed to the service and reconfigure or inspect it between
//! calls.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use glance_core::{
    CampaignGateway, CampaignPreview, CampaignStatus, GatewayError, GatewayResult, InvitePreview,
    NotificationGateway, Page, ProfileGateway, UnreadStatus, UserProfile,
};

// ============================================================================
// FIXTURES
// ============================================================================

/// A campaign preview with a fresh id and the given name and status.
pub fn campaign(name: &str, status: CampaignStatus) -> CampaignPreview {
    CampaignPreview {
        campaign_id: Uuid::now_v7(),
        name: name.to_string(),
        status,
        member_count: 4,
    }
}

/// An invite preview with a fresh id.
pub fn invite(campaign_name: &str, inviter_name: &str) -> InvitePreview {
    InvitePreview {
        invite_id: Uuid::now_v7(),
        campaign_name: campaign_name.to_string(),
        inviter_name: inviter_name.to_string(),
    }
}

/// A profile with the given username; display name is derived.
pub fn profile(username: &str) -> UserProfile {
    UserProfile {
        username: username.to_string(),
        display_name: format!("{} (display)", username),
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

// ============================================================================
// FAKE CAMPAIGN GATEWAY
// ============================================================================

/// Fake campaign/invite gateway with scripted pages and failure injection.
#[derive(Default)]
pub struct FakeCampaignGateway {
    campaigns: Mutex<Vec<CampaignPreview>>,
    campaigns_have_more: AtomicBool,
    fail_campaigns: AtomicBool,
    invites: Mutex<Vec<InvitePreview>>,
    invites_have_more: AtomicBool,
    fail_invites: AtomicBool,
    campaign_calls: AtomicUsize,
    invite_calls: AtomicUsize,
    campaign_limits: Mutex<Vec<u32>>,
    invite_limits: Mutex<Vec<u32>>,
}

impl FakeCampaignGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_campaigns(&self, campaigns: Vec<CampaignPreview>, has_more: bool) {
        *lock(&self.campaigns) = campaigns;
        self.campaigns_have_more.store(has_more, Ordering::SeqCst);
    }

    pub fn set_invites(&self, invites: Vec<InvitePreview>, has_more: bool) {
        *lock(&self.invites) = invites;
        self.invites_have_more.store(has_more, Ordering::SeqCst);
    }

    pub fn fail_campaigns(&self, fail: bool) {
        self.fail_campaigns.store(fail, Ordering::SeqCst);
    }

    pub fn fail_invites(&self, fail: bool) {
        self.fail_invites.store(fail, Ordering::SeqCst);
    }

    pub fn campaign_calls(&self) -> usize {
        self.campaign_calls.load(Ordering::SeqCst)
    }

    pub fn invite_calls(&self) -> usize {
        self.invite_calls.load(Ordering::SeqCst)
    }

    /// Limits passed to `list_campaign_previews`, in call order.
    pub fn recorded_campaign_limits(&self) -> Vec<u32> {
        lock(&self.campaign_limits).clone()
    }

    /// Limits passed to `list_pending_invite_previews`, in call order.
    pub fn recorded_invite_limits(&self) -> Vec<u32> {
        lock(&self.invite_limits).clone()
    }
}

#[async_trait]
impl CampaignGateway for FakeCampaignGateway {
    async fn list_campaign_previews(
        &self,
        _user_id: &str,
        limit: u32,
    ) -> GatewayResult<Page<CampaignPreview>> {
        self.campaign_calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.campaign_limits).push(limit);
        if self.fail_campaigns.load(Ordering::SeqCst) {
            return Err(GatewayError::new("campaign gateway unavailable"));
        }
        let mut items = lock(&self.campaigns).clone();
        items.truncate(limit as usize);
        Ok(Page::new(items, self.campaigns_have_more.load(Ordering::SeqCst)))
    }

    async fn list_pending_invite_previews(
        &self,
        _user_id: &str,
        limit: u32,
    ) -> GatewayResult<Page<InvitePreview>> {
        self.invite_calls.fetch_add(1, Ordering::SeqCst);
        lock(&self.invite_limits).push(limit);
        if self.fail_invites.load(Ordering::SeqCst) {
            return Err(GatewayError::new("invite gateway unavailable"));
        }
        let mut items = lock(&self.invites).clone();
        items.truncate(limit as usize);
        Ok(Page::new(items, self.invites_have_more.load(Ordering::SeqCst)))
    }
}

// ============================================================================
// FAKE PROFILE GATEWAY
// ============================================================================

/// Fake profile gateway.
///
/// Scripted as found (`Some`), not-found (`None`), or failing.
#[derive(Default)]
pub struct FakeProfileGateway {
    profile: Mutex<Option<UserProfile>>,
    fail: AtomicBool,
    calls: AtomicUsize,
}

impl FakeProfileGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_profile(&self, profile: Option<UserProfile>) {
        *lock(&self.profile) = profile;
    }

    pub fn fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileGateway for FakeProfileGateway {
    async fn get_user_profile(&self, _user_id: &str) -> GatewayResult<Option<UserProfile>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(GatewayError::new("profile gateway unavailable"));
        }
        Ok(lock(&self.profile).clone())
    }
}

// ============================================================================
// FAKE NOTIFICATION GATEWAY
// ============================================================================

/// Fake notification gateway.
pub struct FakeNotificationGateway {
    status: Mutex<UnreadStatus>,
    fail: AtomicBool,
    calls: AtomicUsize,
}

impl Default for FakeNotificationGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeNotificationGateway {
    pub fn new() -> Self {
        Self {
            status: Mutex::new(UnreadStatus {
                has_unread: false,
                unread_count: 0,
            }),
            fail: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_status(&self, status: UnreadStatus) {
        *lock(&self.status) = status;
    }

    pub fn fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NotificationGateway for FakeNotificationGateway {
    async fn unread_status(&self, _user_id: &str) -> GatewayResult<UnreadStatus> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(GatewayError::new("notification gateway unavailable"));
        }
        Ok(*lock(&self.status))
    }
}
