//! Per-user plan checks.
//!
//! A [`PlanGate`] pairs a user's plan with the system-admin bypass. System
//! admins pass every creation check and see every feature as it is on the
//! top tier, whatever plan their organization is on.

use serde::Serialize;

use super::feature::FeatureValue;
use super::tier::{PlanTier, Resource};
use crate::access::RoleId;

/// Usage at or above this share of a finite limit is reported as near the limit.
pub const NEAR_LIMIT_PERCENT: u32 = 80;

/// Plan checks for one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanGate {
    tier: PlanTier,
    bypass: bool,
}

/// Outcome of a creation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CreateDecision {
    pub resource: Resource,
    pub allowed: bool,
    /// `None` when unlimited or bypassed.
    pub limit: Option<u32>,
    /// `None` when unlimited or bypassed.
    pub remaining: Option<u32>,
}

/// How much of a limit is in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UsageStatus {
    pub resource: Resource,
    pub used: u32,
    pub limit: Option<u32>,
    pub remaining: Option<u32>,
    /// Share of the limit in use, capped at 100. `None` when unlimited.
    pub percent_used: Option<u32>,
    pub near_limit: bool,
    pub at_limit: bool,
}

impl PlanGate {
    #[must_use]
    pub const fn new(tier: PlanTier, bypass: bool) -> Self {
        Self { tier, bypass }
    }

    /// Build the gate for a role and plan identifier.
    ///
    /// `system-admin` bypasses all checks. An unknown plan identifier falls
    /// back to [`PlanTier::Basic`].
    #[must_use]
    pub fn for_user(role: &str, plan: &str) -> Self {
        Self {
            tier: PlanTier::parse(plan).unwrap_or(PlanTier::Basic),
            bypass: RoleId::parse(role) == Some(RoleId::SystemAdmin),
        }
    }

    #[must_use]
    pub const fn tier(&self) -> PlanTier {
        self.tier
    }

    #[must_use]
    pub const fn is_bypassed(&self) -> bool {
        self.bypass
    }

    const fn effective_tier(&self) -> PlanTier {
        if self.bypass { PlanTier::Pro } else { self.tier }
    }

    /// Feature value as this user experiences it.
    #[must_use]
    pub fn feature(&self, name: &str) -> Option<FeatureValue> {
        self.effective_tier().definition().feature(name)
    }

    /// Whether a feature is usable. Unknown features are not.
    #[must_use]
    pub fn has_feature(&self, name: &str) -> bool {
        self.feature(name).is_some_and(FeatureValue::is_enabled)
    }

    /// The effective limit for a resource.
    #[must_use]
    pub fn limit(&self, resource: Resource) -> Option<u32> {
        if self.bypass {
            return None;
        }
        self.tier.definition().limits.get(resource)
    }

    /// Decide whether one more `resource` may be created at `usage`.
    #[must_use]
    pub fn can_create(&self, resource: Resource, usage: u32) -> CreateDecision {
        let limit = self.limit(resource);
        CreateDecision {
            resource,
            allowed: limit.is_none_or(|limit| usage < limit),
            limit,
            remaining: limit.map(|limit| limit.saturating_sub(usage)),
        }
    }

    /// Summarize usage against the effective limit.
    #[must_use]
    pub fn usage_status(&self, resource: Resource, used: u32) -> UsageStatus {
        let limit = self.limit(resource);
        let percent_used = limit.map(|limit| {
            if limit == 0 {
                100
            } else {
                let percent = u64::from(used) * 100 / u64::from(limit);
                u32::try_from(percent.min(100)).unwrap_or(100)
            }
        });

        UsageStatus {
            resource,
            used,
            limit,
            remaining: limit.map(|limit| limit.saturating_sub(used)),
            percent_used,
            near_limit: percent_used.is_some_and(|p| p >= NEAR_LIMIT_PERCENT),
            at_limit: limit.is_some_and(|limit| used >= limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_user_resolves_plan() {
        let gate = PlanGate::for_user("admin", "growth");
        assert_eq!(gate.tier(), PlanTier::Growth);
        assert!(!gate.is_bypassed());
    }

    #[test]
    fn test_unknown_plan_falls_back_to_basic() {
        assert_eq!(PlanGate::for_user("admin", "platinum").tier(), PlanTier::Basic);
    }

    #[test]
    fn test_system_admin_bypasses_limits() {
        let gate = PlanGate::for_user("system-admin", "basic");
        for resource in Resource::ALL {
            let decision = gate.can_create(resource, 1_000_000);
            assert!(decision.allowed);
            assert_eq!(decision.limit, None);
        }
        assert!(gate.has_feature("api_access"));
    }

    #[test]
    fn test_can_create_reports_remaining() {
        let gate = PlanGate::for_user("manager", "basic");
        let decision = gate.can_create(Resource::BookingsPerMonth, 150);
        assert!(decision.allowed);
        assert_eq!(decision.limit, Some(200));
        assert_eq!(decision.remaining, Some(50));

        let decision = gate.can_create(Resource::Venues, 1);
        assert!(!decision.allowed);
        assert_eq!(decision.remaining, Some(0));
    }

    #[test]
    fn test_has_feature() {
        let gate = PlanGate::for_user("admin", "basic");
        assert!(gate.has_feature("waivers"));
        assert!(!gate.has_feature("qr_codes"));
        assert!(gate.has_feature("analytics"));
        assert!(!gate.has_feature("unknown_feature"));
    }

    #[test]
    fn test_usage_status_near_limit() {
        let gate = PlanGate::for_user("admin", "basic");
        let status = gate.usage_status(Resource::BookingsPerMonth, 160);
        assert_eq!(status.percent_used, Some(80));
        assert!(status.near_limit);
        assert!(!status.at_limit);

        let status = gate.usage_status(Resource::BookingsPerMonth, 159);
        assert!(!status.near_limit);
    }

    #[test]
    fn test_usage_status_over_limit_is_capped() {
        let gate = PlanGate::for_user("admin", "basic");
        let status = gate.usage_status(Resource::Staff, 9);
        assert_eq!(status.percent_used, Some(100));
        assert_eq!(status.remaining, Some(0));
        assert!(status.at_limit);
    }

    #[test]
    fn test_usage_status_unlimited() {
        let gate = PlanGate::for_user("admin", "pro");
        let status = gate.usage_status(Resource::Venues, 40);
        assert_eq!(status.limit, None);
        assert_eq!(status.percent_used, None);
        assert!(!status.near_limit);
        assert!(!status.at_limit);
    }
}
