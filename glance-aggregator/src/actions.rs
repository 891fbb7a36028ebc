//! Next-action derivation.
//!
//! A pure function from assembled section state to a priority-ordered list
//! of suggested actions. Candidates are appended in fixed table order and
//! then stable-sorted by priority descending, so equal priorities (none
//! today) would keep first-computed order.

use glance_core::{
    ActionKind, CampaignSummary, DashboardAction, InviteSummary, NotificationSummary, UserSummary,
};

pub const PRIORITY_REVIEW_INVITES: u8 = 100;
pub const PRIORITY_COMPLETE_PROFILE: u8 = 90;
pub const PRIORITY_CREATE_OR_JOIN_CAMPAIGN: u8 = 80;
pub const PRIORITY_CONTINUE_ACTIVE_CAMPAIGN: u8 = 70;
pub const PRIORITY_REVIEW_NOTIFICATIONS: u8 = 60;

/// Derive the next-actions list from the current (possibly degraded)
/// section state. Each trigger is evaluated against the sections as
/// assembled, not against live upstream data.
pub fn derive_actions(
    user: &UserSummary,
    invites: &InviteSummary,
    notifications: &NotificationSummary,
    campaigns: &CampaignSummary,
) -> Vec<DashboardAction> {
    let mut actions = Vec::new();

    if invites.available && invites.pending_count > 0 {
        actions.push(DashboardAction {
            kind: ActionKind::ReviewPendingInvites,
            priority: PRIORITY_REVIEW_INVITES,
        });
    }
    if !user.discoverable {
        actions.push(DashboardAction {
            kind: ActionKind::CompleteProfile,
            priority: PRIORITY_COMPLETE_PROFILE,
        });
    }
    if campaigns.available && campaigns.campaign_count == 0 && !campaigns.has_more {
        actions.push(DashboardAction {
            kind: ActionKind::CreateOrJoinCampaign,
            priority: PRIORITY_CREATE_OR_JOIN_CAMPAIGN,
        });
    }
    if campaigns.available && campaigns.active_count > 0 {
        actions.push(DashboardAction {
            kind: ActionKind::ContinueActiveCampaign,
            priority: PRIORITY_CONTINUE_ACTIVE_CAMPAIGN,
        });
    }
    if notifications.available && notifications.has_unread {
        actions.push(DashboardAction {
            kind: ActionKind::ReviewNotifications,
            priority: PRIORITY_REVIEW_NOTIFICATIONS,
        });
    }

    // Stable sort: ties keep insertion order.
    actions.sort_by(|a, b| b.priority.cmp(&a.priority));
    actions
}
