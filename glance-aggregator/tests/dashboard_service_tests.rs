//! End-to-end tests for the aggregation service against fake gateways.
//!
//! These assert on `DashboardMetadata`, not just on errors: degradation is
//! the service's primary failure-absorption mechanism and is only visible
//! there.

use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};

use glance_aggregator::{CacheKey, DashboardRequest, DashboardService};
use glance_core::{
    ActionKind, CampaignStatus, Dependency, Freshness, UnreadStatus, UserProfile,
};
use glance_test_utils::{
    campaign, invite, profile, FakeCampaignGateway, FakeNotificationGateway, FakeProfileGateway,
};

struct Harness {
    service: DashboardService,
    campaigns: Arc<FakeCampaignGateway>,
    profiles: Arc<FakeProfileGateway>,
    notifications: Arc<FakeNotificationGateway>,
}

/// Service wired to fakes: one active campaign page, a discoverable
/// profile, and no unread notifications. Tests reconfigure from there.
fn harness() -> Harness {
    let campaigns = Arc::new(FakeCampaignGateway::new());
    let profiles = Arc::new(FakeProfileGateway::new());
    let notifications = Arc::new(FakeNotificationGateway::new());

    campaigns.set_campaigns(vec![campaign("Dragon Heist", CampaignStatus::Active)], false);
    profiles.set_profile(Some(profile("ada")));

    let service = DashboardService::builder()
        .campaigns(campaigns.clone())
        .profiles(profiles.clone())
        .notifications(notifications.clone())
        .build()
        .expect("service builds");

    Harness {
        service,
        campaigns,
        profiles,
        notifications,
    }
}

fn request(user_id: &str) -> DashboardRequest {
    DashboardRequest {
        user_id: user_id.to_string(),
        locale: "en".to_string(),
        campaign_preview_limit: 0,
        invite_preview_limit: 0,
    }
}

/// Age the cached entry for `user_id` so it is past the fresh TTL (15s)
/// but within the stale TTL (120s).
fn age_cache_entry(harness: &Harness, user_id: &str, dashboard: &glance_core::Dashboard) {
    let key = CacheKey::new(user_id, "en");
    let aged = Utc::now() - ChronoDuration::seconds(30);
    harness.service.cache().set(&key, dashboard, aged);
}

#[tokio::test]
async fn fresh_read_is_idempotent() {
    let h = harness();
    let req = request("user-1");

    let first = h.service.get_dashboard(&req).await.unwrap();
    let second = h.service.get_dashboard(&req).await.unwrap();

    // Exactly one fan-out for two calls within the fresh TTL.
    assert_eq!(h.campaigns.campaign_calls(), 1);
    assert_eq!(h.campaigns.invite_calls(), 1);
    assert_eq!(h.profiles.calls(), 1);
    assert_eq!(h.notifications.calls(), 1);

    assert!(!first.metadata.cache_hit);
    assert!(second.metadata.cache_hit);
    assert_eq!(second.metadata.freshness, Freshness::Fresh);
    assert_eq!(second.metadata.generated_at, first.metadata.generated_at);
    assert_eq!(second.campaigns, first.campaigns);
}

#[tokio::test]
async fn mutating_a_returned_dashboard_does_not_leak_into_the_cache() {
    let h = harness();
    h.campaigns
        .set_invites(vec![invite("Dragon Heist", "Brianna")], false);
    let req = request("user-1");

    let mut first = h.service.get_dashboard(&req).await.unwrap();
    first.campaigns.campaigns.clear();
    first.invites.invites.clear();
    first.actions.clear();

    let second = h.service.get_dashboard(&req).await.unwrap();
    assert!(second.metadata.cache_hit);
    assert_eq!(second.campaigns.campaigns.len(), 1);
    assert_eq!(second.invites.invites.len(), 1);
    assert!(!second.actions.is_empty());
}

#[tokio::test]
async fn degraded_results_are_returned_but_never_cached() {
    let h = harness();
    h.notifications.fail(true);
    let req = request("user-1");

    let first = h.service.get_dashboard(&req).await.unwrap();
    assert!(first.metadata.degraded);
    assert_eq!(
        first.metadata.degraded_dependencies,
        vec![Dependency::Notifications]
    );
    assert!(!first.notifications.available);

    let second = h.service.get_dashboard(&req).await.unwrap();
    assert!(!second.metadata.cache_hit);
    assert_eq!(h.campaigns.campaign_calls(), 2);
}

#[tokio::test]
async fn critical_failure_without_fallback_is_fatal_and_short_circuits() {
    let h = harness();
    h.campaigns.fail_campaigns(true);
    let req = request("user-1");

    let err = h.service.get_dashboard(&req).await.unwrap_err();
    assert!(err.is_dependency_unavailable());
    assert_eq!(err.dependency(), Some(Dependency::CampaignPreviews));

    // No other gateway is consulted after the critical failure.
    assert_eq!(h.campaigns.invite_calls(), 0);
    assert_eq!(h.profiles.calls(), 0);
    assert_eq!(h.notifications.calls(), 0);
}

async fn assert_stale_fallback(fail: impl Fn(&Harness), expected: Dependency) {
    let h = harness();
    let req = request("user-1");
    let seeded = h.service.get_dashboard(&req).await.unwrap();
    age_cache_entry(&h, "user-1", &seeded);

    fail(&h);
    let got = h.service.get_dashboard(&req).await.unwrap();

    assert_eq!(got.metadata.freshness, Freshness::Stale);
    assert!(got.metadata.cache_hit);
    assert!(got.metadata.degraded);
    assert_eq!(got.metadata.degraded_dependencies, vec![expected]);
    assert_eq!(got.metadata.generated_at, seeded.metadata.generated_at);
    // Section data comes from the seed, untouched.
    assert_eq!(got.campaigns, seeded.campaigns);
    assert_eq!(got.user, seeded.user);
}

#[tokio::test]
async fn stale_fallback_covers_the_critical_dependency() {
    assert_stale_fallback(
        |h| h.campaigns.fail_campaigns(true),
        Dependency::CampaignPreviews,
    )
    .await;
}

#[tokio::test]
async fn stale_fallback_covers_pending_invites() {
    assert_stale_fallback(|h| h.campaigns.fail_invites(true), Dependency::PendingInvites).await;
}

#[tokio::test]
async fn stale_fallback_covers_the_profile() {
    assert_stale_fallback(|h| h.profiles.fail(true), Dependency::Profile).await;
}

#[tokio::test]
async fn stale_fallback_covers_notifications() {
    assert_stale_fallback(|h| h.notifications.fail(true), Dependency::Notifications).await;
}

#[tokio::test]
async fn missing_profile_is_a_business_state_not_degradation() {
    let h = harness();
    h.profiles.set_profile(None);
    let req = request("user-1");

    let dashboard = h.service.get_dashboard(&req).await.unwrap();
    assert!(!dashboard.metadata.degraded);
    assert!(dashboard.metadata.degraded_dependencies.is_empty());
    assert!(!dashboard.user.available);
    assert!(!dashboard.user.discoverable);
    assert!(dashboard.user.needs_profile_completion);
    assert!(dashboard
        .actions
        .iter()
        .any(|a| a.kind == ActionKind::CompleteProfile));

    // Not degraded, so the result is cached.
    let second = h.service.get_dashboard(&req).await.unwrap();
    assert!(second.metadata.cache_hit);
}

#[tokio::test]
async fn action_list_is_priority_ordered() {
    let h = harness();
    h.campaigns
        .set_invites(vec![invite("Dragon Heist", "Brianna")], false);
    h.profiles.set_profile(Some(UserProfile {
        username: "  ".to_string(),
        display_name: "Ada".to_string(),
    }));
    h.notifications.set_status(UnreadStatus {
        has_unread: true,
        unread_count: 7,
    });

    let dashboard = h.service.get_dashboard(&request("user-1")).await.unwrap();
    let kinds: Vec<ActionKind> = dashboard.actions.iter().map(|a| a.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ActionKind::ReviewPendingInvites,
            ActionKind::CompleteProfile,
            ActionKind::ContinueActiveCampaign,
            ActionKind::ReviewNotifications,
        ]
    );
}

#[tokio::test]
async fn preview_limits_are_clamped_independently() {
    let h = harness();

    let mut req = request("user-1");
    req.campaign_preview_limit = 0;
    req.invite_preview_limit = 999;
    h.service.get_dashboard(&req).await.unwrap();

    // Different user so the second call misses the cache.
    let mut req = request("user-2");
    req.campaign_preview_limit = 999;
    req.invite_preview_limit = -3;
    h.service.get_dashboard(&req).await.unwrap();

    assert_eq!(h.campaigns.recorded_campaign_limits(), vec![3, 10]);
    assert_eq!(h.campaigns.recorded_invite_limits(), vec![10, 3]);
}

#[tokio::test]
async fn negative_unread_counts_are_clamped_to_zero() {
    let h = harness();
    h.notifications.set_status(UnreadStatus {
        has_unread: false,
        unread_count: -12,
    });

    let dashboard = h.service.get_dashboard(&request("user-1")).await.unwrap();
    assert!(dashboard.notifications.available);
    assert_eq!(dashboard.notifications.unread_count, 0);
    assert!(!dashboard.notifications.has_unread);
}

#[tokio::test]
async fn empty_campaign_list_suggests_creating_or_joining() {
    let h = harness();
    h.campaigns.set_campaigns(vec![], false);

    let dashboard = h.service.get_dashboard(&request("user-1")).await.unwrap();
    assert!(dashboard.campaigns.available);
    assert_eq!(dashboard.campaigns.campaign_count, 0);
    assert!(dashboard
        .actions
        .iter()
        .any(|a| a.kind == ActionKind::CreateOrJoinCampaign));
    assert!(!dashboard
        .actions
        .iter()
        .any(|a| a.kind == ActionKind::ContinueActiveCampaign));
}
