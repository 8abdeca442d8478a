//! The authenticated caller.

use serde::{Deserialize, Serialize};

use venuedesk_core::access::{self, RoleId};
use venuedesk_core::{OrganizationId, PlanGate, PlanTier, UserId};

/// Identity derived from a verified access token.
///
/// `role` and `plan` stay as raw identifiers: an unknown role simply holds no
/// permissions and an unknown plan is treated as the most restrictive tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: Option<String>,
    pub role: String,
    pub plan: Option<String>,
    pub organization_id: Option<OrganizationId>,
}

impl CurrentUser {
    /// The caller's role, if it is one the console knows.
    #[must_use]
    pub fn role_id(&self) -> Option<RoleId> {
        RoleId::parse(&self.role)
    }

    /// Whether the caller's role holds `permission`.
    #[must_use]
    pub fn can(&self, permission: &str) -> bool {
        access::has_permission(&self.role, permission)
    }

    /// Plan checks for the caller.
    #[must_use]
    pub fn plan_gate(&self) -> PlanGate {
        let plan = self.plan.as_deref().unwrap_or_default();
        if PlanTier::parse(plan).is_none() && self.role_id() != Some(RoleId::SystemAdmin) {
            tracing::warn!(
                user_id = %self.id,
                plan,
                "Unknown plan identifier, applying basic plan limits"
            );
        }
        PlanGate::for_user(&self.role, plan)
    }
}
