//! Dashboard aggregation service.
//!
//! Orchestrates one `get_dashboard` request: consult the cache, fan out to
//! the upstream gateways in fixed dependency order, apply the
//! degrade-or-fail policy per dependency, derive the next-actions list, and
//! update the cache.
//!
//! Gateways are called sequentially, one at a time. The campaign-preview
//! call is the single critical dependency; everything after it degrades
//! gracefully. A stale cache entry, when one exists, always wins over both
//! degrading a section and raising an error.
//!
//! Concurrent cache-miss requests for the same key are NOT coalesced: both
//! fan out independently and the last writer wins on the cache. Both
//! compute the same snapshot type, so this is a deliberate simplification
//! rather than a race to be fixed.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use glance_core::{
    AggregateError, AggregateResult, CampaignGateway, CampaignStatus, CampaignSummary, Dashboard,
    DashboardMetadata, Dependency, Freshness, InviteSummary, NotificationGateway,
    NotificationSummary, ProfileGateway, UserSummary,
};

use crate::actions::derive_actions;
use crate::cache::{CacheKey, DashboardCache};
use crate::config::AggregatorConfig;

/// Inbound request for one dashboard assembly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardRequest {
    /// Subject of the dashboard. Required; whitespace-only is rejected.
    pub user_id: String,
    /// Used only to partition the cache.
    #[serde(default)]
    pub locale: String,
    /// Zero or negative means the configured default; clamped to the
    /// configured maximum.
    #[serde(default)]
    pub campaign_preview_limit: i32,
    #[serde(default)]
    pub invite_preview_limit: i32,
}

/// The aggregation orchestrator.
///
/// Holds each upstream as a narrow capability trait object, never a
/// concrete client. Build through [`DashboardService::builder`].
pub struct DashboardService {
    campaigns: Arc<dyn CampaignGateway>,
    profiles: Arc<dyn ProfileGateway>,
    notifications: Arc<dyn NotificationGateway>,
    cache: DashboardCache,
    config: AggregatorConfig,
}

impl std::fmt::Debug for DashboardService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardService").finish_non_exhaustive()
    }
}

/// Builder for [`DashboardService`].
///
/// A missing gateway is a deployment defect; `build` surfaces it as
/// [`AggregateError::NotConfigured`] naming the absent component.
#[derive(Default)]
pub struct DashboardServiceBuilder {
    campaigns: Option<Arc<dyn CampaignGateway>>,
    profiles: Option<Arc<dyn ProfileGateway>>,
    notifications: Option<Arc<dyn NotificationGateway>>,
    config: Option<AggregatorConfig>,
}

impl DashboardServiceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn campaigns(mut self, gateway: Arc<dyn CampaignGateway>) -> Self {
        self.campaigns = Some(gateway);
        self
    }

    pub fn profiles(mut self, gateway: Arc<dyn ProfileGateway>) -> Self {
        self.profiles = Some(gateway);
        self
    }

    pub fn notifications(mut self, gateway: Arc<dyn NotificationGateway>) -> Self {
        self.notifications = Some(gateway);
        self
    }

    pub fn config(mut self, config: AggregatorConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn build(self) -> AggregateResult<DashboardService> {
        let campaigns = self.campaigns.ok_or(AggregateError::NotConfigured {
            component: "campaign gateway",
        })?;
        let profiles = self.profiles.ok_or(AggregateError::NotConfigured {
            component: "profile gateway",
        })?;
        let notifications = self.notifications.ok_or(AggregateError::NotConfigured {
            component: "notification gateway",
        })?;
        let config = self.config.unwrap_or_default();
        let cache = DashboardCache::new(config.fresh_ttl, config.stale_ttl);

        Ok(DashboardService {
            campaigns,
            profiles,
            notifications,
            cache,
            config,
        })
    }
}

impl DashboardService {
    pub fn builder() -> DashboardServiceBuilder {
        DashboardServiceBuilder::new()
    }

    /// The underlying cache. Exposed for cache warming and tests.
    pub fn cache(&self) -> &DashboardCache {
        &self.cache
    }

    /// Assemble one dashboard for the requested user.
    ///
    /// Returns a fresh cache hit when one exists; otherwise fans out to the
    /// gateways in dependency order, degrading sections per policy. The
    /// only upstream failure that escapes is the critical campaign
    /// dependency with no stale fallback in hand.
    pub async fn get_dashboard(&self, req: &DashboardRequest) -> AggregateResult<Dashboard> {
        let user_id = req.user_id.trim();
        if user_id.is_empty() {
            return Err(AggregateError::MissingUserId);
        }
        let campaign_limit = self.clamp_preview_limit(req.campaign_preview_limit);
        let invite_limit = self.clamp_preview_limit(req.invite_preview_limit);
        let key = CacheKey::new(user_id, &req.locale);
        let now = Utc::now();

        // Only early-exit path: a fresh cache hit.
        if let Some(mut cached) = self.cache.get_fresh(&key, now) {
            debug!(user_id, "dashboard served from fresh cache");
            cached.metadata.freshness = Freshness::Fresh;
            cached.metadata.cache_hit = true;
            return Ok(cached);
        }

        // Kept in hand as the fallback target for any upstream failure.
        let mut stale = self.cache.get_stale(&key, now);
        let mut degraded: Vec<Dependency> = Vec::new();

        // Critical dependency. No other gateway is called if this fails.
        let campaign_page = match self
            .campaigns
            .list_campaign_previews(user_id, campaign_limit)
            .await
        {
            Ok(page) => page,
            Err(source) => {
                return match stale.take() {
                    Some(cached) => {
                        Ok(stale_fallback(cached, Dependency::CampaignPreviews, user_id))
                    }
                    None => Err(AggregateError::DependencyUnavailable {
                        dependency: Dependency::CampaignPreviews,
                        source,
                    }),
                };
            }
        };

        let active_count = campaign_page
            .items
            .iter()
            .filter(|c| c.status == CampaignStatus::Active)
            .count() as u32;
        let campaigns = CampaignSummary {
            available: true,
            campaign_count: campaign_page.items.len() as u32,
            active_count,
            has_more: campaign_page.has_more,
            campaigns: campaign_page.items,
        };

        let invites = match self
            .campaigns
            .list_pending_invite_previews(user_id, invite_limit)
            .await
        {
            Ok(page) => InviteSummary {
                available: true,
                pending_count: page.items.len() as u32,
                has_more: page.has_more,
                invites: page.items,
            },
            Err(error) => {
                if let Some(cached) = stale.take() {
                    return Ok(stale_fallback(cached, Dependency::PendingInvites, user_id));
                }
                warn!(user_id, dependency = %Dependency::PendingInvites, %error, "section degraded");
                degraded.push(Dependency::PendingInvites);
                InviteSummary::default()
            }
        };

        let user = match self.profiles.get_user_profile(user_id).await {
            Ok(Some(profile)) => {
                let discoverable = !profile.username.trim().is_empty();
                UserSummary {
                    available: true,
                    username: profile.username,
                    display_name: profile.display_name,
                    discoverable,
                    needs_profile_completion: !discoverable,
                }
            }
            // A missing profile is a business state, not a failure.
            Ok(None) => UserSummary {
                needs_profile_completion: true,
                ..UserSummary::default()
            },
            Err(error) => {
                if let Some(cached) = stale.take() {
                    return Ok(stale_fallback(cached, Dependency::Profile, user_id));
                }
                warn!(user_id, dependency = %Dependency::Profile, %error, "section degraded");
                degraded.push(Dependency::Profile);
                UserSummary {
                    needs_profile_completion: true,
                    ..UserSummary::default()
                }
            }
        };

        let notifications = match self.notifications.unread_status(user_id).await {
            Ok(status) => NotificationSummary {
                available: true,
                has_unread: status.has_unread,
                // Upstreams have reported negative counts; clamp.
                unread_count: status.unread_count.max(0) as u32,
            },
            Err(error) => {
                if let Some(cached) = stale.take() {
                    return Ok(stale_fallback(cached, Dependency::Notifications, user_id));
                }
                warn!(user_id, dependency = %Dependency::Notifications, %error, "section degraded");
                degraded.push(Dependency::Notifications);
                NotificationSummary::default()
            }
        };

        let actions = derive_actions(&user, &invites, &notifications, &campaigns);

        degraded.sort();
        degraded.dedup();
        let metadata = DashboardMetadata {
            freshness: Freshness::Fresh,
            cache_hit: false,
            degraded: !degraded.is_empty(),
            degraded_dependencies: degraded,
            generated_at: now,
        };

        let dashboard = Dashboard {
            metadata,
            user,
            invites,
            notifications,
            campaigns,
            actions,
        };

        // A degraded result must never poison the cache with partial data.
        if dashboard.metadata.degraded {
            warn!(
                user_id,
                dependencies = ?dashboard.metadata.degraded_dependencies,
                "dashboard assembled degraded; not cached"
            );
        } else {
            self.cache.set(&key, &dashboard, now);
            debug!(user_id, "dashboard assembled and cached");
        }

        Ok(dashboard)
    }

    fn clamp_preview_limit(&self, limit: i32) -> u32 {
        if limit <= 0 {
            self.config.default_preview_limit
        } else {
            (limit as u32).min(self.config.max_preview_limit)
        }
    }
}

/// Rewrite a cached dashboard as a stale, degraded fallback for `failed`.
/// `generated_at` keeps the original assembly timestamp.
fn stale_fallback(cached: Dashboard, failed: Dependency, user_id: &str) -> Dashboard {
    warn!(user_id, dependency = %failed, "serving stale dashboard after upstream failure");
    let mut dashboard = cached;
    dashboard.metadata.freshness = Freshness::Stale;
    dashboard.metadata.cache_hit = true;
    dashboard.metadata.degraded = true;
    dashboard.metadata.degraded_dependencies = vec![failed];
    dashboard
}
