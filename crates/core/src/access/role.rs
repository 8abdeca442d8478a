//! Role definitions.
//!
//! Each role carries a display name, a badge color for the console and a
//! fixed, ordered permission set. The tables are static; nothing here is
//! computed at runtime.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::catalog::{
    BILLING_MANAGE, BILLING_VIEW, BOOKINGS_CREATE, BOOKINGS_DELETE, BOOKINGS_EDIT, BOOKINGS_VIEW,
    CUSTOMERS_CREATE, CUSTOMERS_DELETE, CUSTOMERS_EDIT, CUSTOMERS_VIEW, DASHBOARD_VIEW,
    EMAIL_TEMPLATES_MANAGE, GAMES_CREATE, GAMES_DELETE, GAMES_EDIT, GAMES_VIEW,
    NOTIFICATIONS_VIEW, REPORTS_EXPORT, REPORTS_VIEW, SETTINGS_EDIT, SETTINGS_VIEW, STAFF_MANAGE,
    STAFF_VIEW, USERS_MANAGE, WAIVERS_MANAGE, WAIVERS_VIEW, WIDGETS_MANAGE, WIDGETS_VIEW,
};

/// Known console roles, from most to least privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoleId {
    /// Platform operator. Holds every permission and bypasses plan limits.
    SystemAdmin,
    /// Organization owner.
    SuperAdmin,
    /// Runs day-to-day operations for an organization.
    Admin,
    /// Manages bookings, games and customers.
    Manager,
    /// Front-desk staff.
    Staff,
}

impl RoleId {
    /// All roles, most privileged first.
    pub const ALL: [Self; 5] = [
        Self::SystemAdmin,
        Self::SuperAdmin,
        Self::Admin,
        Self::Manager,
        Self::Staff,
    ];

    /// Look up a role by its identifier. Unknown identifiers return `None`.
    #[must_use]
    pub fn parse(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.as_str() == id)
    }

    /// The wire identifier (e.g. `super-admin`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SystemAdmin => "system-admin",
            Self::SuperAdmin => "super-admin",
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Staff => "staff",
        }
    }

    /// The static definition for this role.
    #[must_use]
    pub fn definition(self) -> &'static RoleDefinition {
        match self {
            Self::SystemAdmin => &SYSTEM_ADMIN,
            Self::SuperAdmin => &SUPER_ADMIN,
            Self::Admin => &ADMIN,
            Self::Manager => &MANAGER,
            Self::Staff => &STAFF,
        }
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RoleId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid role: {s}"))
    }
}

/// A role with its presentation data and permission set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleDefinition {
    /// Role identifier.
    pub id: RoleId,
    /// Human-readable name shown in the console.
    pub name: &'static str,
    /// Badge color (hex).
    pub color: &'static str,
    /// Ordered permission tags.
    pub permissions: &'static [&'static str],
}

impl RoleDefinition {
    /// Every role definition, most privileged first.
    pub fn all() -> impl Iterator<Item = &'static Self> {
        RoleId::ALL.into_iter().map(RoleId::definition)
    }

    /// Look up a definition by role identifier.
    #[must_use]
    pub fn find(id: &str) -> Option<&'static Self> {
        RoleId::parse(id).map(RoleId::definition)
    }
}

/// The permission set for a role identifier.
///
/// Unknown identifiers get an empty set.
#[must_use]
pub fn permissions_for(role: &str) -> &'static [&'static str] {
    RoleDefinition::find(role).map_or(&[], |definition| definition.permissions)
}

static SYSTEM_ADMIN: RoleDefinition = RoleDefinition {
    id: RoleId::SystemAdmin,
    name: "System Admin",
    color: "#dc2626",
    permissions: super::catalog::ALL,
};

static SUPER_ADMIN: RoleDefinition = RoleDefinition {
    id: RoleId::SuperAdmin,
    name: "Super Admin",
    color: "#7c3aed",
    permissions: &[
        DASHBOARD_VIEW,
        BOOKINGS_VIEW,
        BOOKINGS_CREATE,
        BOOKINGS_EDIT,
        BOOKINGS_DELETE,
        GAMES_VIEW,
        GAMES_CREATE,
        GAMES_EDIT,
        GAMES_DELETE,
        CUSTOMERS_VIEW,
        CUSTOMERS_CREATE,
        CUSTOMERS_EDIT,
        CUSTOMERS_DELETE,
        STAFF_VIEW,
        STAFF_MANAGE,
        REPORTS_VIEW,
        REPORTS_EXPORT,
        WIDGETS_VIEW,
        WIDGETS_MANAGE,
        WAIVERS_VIEW,
        WAIVERS_MANAGE,
        EMAIL_TEMPLATES_MANAGE,
        SETTINGS_VIEW,
        SETTINGS_EDIT,
        BILLING_VIEW,
        BILLING_MANAGE,
        USERS_MANAGE,
        NOTIFICATIONS_VIEW,
    ],
};

static ADMIN: RoleDefinition = RoleDefinition {
    id: RoleId::Admin,
    name: "Admin",
    color: "#2563eb",
    permissions: &[
        DASHBOARD_VIEW,
        BOOKINGS_VIEW,
        BOOKINGS_CREATE,
        BOOKINGS_EDIT,
        BOOKINGS_DELETE,
        GAMES_VIEW,
        GAMES_CREATE,
        GAMES_EDIT,
        GAMES_DELETE,
        CUSTOMERS_VIEW,
        CUSTOMERS_CREATE,
        CUSTOMERS_EDIT,
        CUSTOMERS_DELETE,
        STAFF_VIEW,
        STAFF_MANAGE,
        REPORTS_VIEW,
        REPORTS_EXPORT,
        WIDGETS_VIEW,
        WIDGETS_MANAGE,
        WAIVERS_VIEW,
        WAIVERS_MANAGE,
        EMAIL_TEMPLATES_MANAGE,
        SETTINGS_VIEW,
        SETTINGS_EDIT,
        BILLING_VIEW,
        NOTIFICATIONS_VIEW,
    ],
};

static MANAGER: RoleDefinition = RoleDefinition {
    id: RoleId::Manager,
    name: "Manager",
    color: "#059669",
    permissions: &[
        DASHBOARD_VIEW,
        BOOKINGS_VIEW,
        BOOKINGS_CREATE,
        BOOKINGS_EDIT,
        GAMES_VIEW,
        GAMES_EDIT,
        CUSTOMERS_VIEW,
        CUSTOMERS_CREATE,
        CUSTOMERS_EDIT,
        STAFF_VIEW,
        REPORTS_VIEW,
        WAIVERS_VIEW,
        SETTINGS_VIEW,
        NOTIFICATIONS_VIEW,
    ],
};

static STAFF: RoleDefinition = RoleDefinition {
    id: RoleId::Staff,
    name: "Staff",
    color: "#6b7280",
    permissions: &[
        DASHBOARD_VIEW,
        BOOKINGS_VIEW,
        BOOKINGS_CREATE,
        BOOKINGS_EDIT,
        GAMES_VIEW,
        CUSTOMERS_VIEW,
        WAIVERS_VIEW,
        NOTIFICATIONS_VIEW,
    ],
};

#[cfg(test)]
mod tests {
    use super::super::catalog::{ORGANIZATIONS_MANAGE, PLANS_MANAGE};
    use super::*;

    #[test]
    fn test_parse_round_trips_every_role() {
        for role in RoleId::ALL {
            assert_eq!(RoleId::parse(role.as_str()), Some(role));
        }
        assert_eq!(RoleId::parse("owner"), None);
        assert_eq!(RoleId::parse("Admin"), None);
    }

    #[test]
    fn test_unknown_role_has_empty_set() {
        assert!(permissions_for("guest").is_empty());
    }

    #[test]
    fn test_system_admin_holds_catalog() {
        assert_eq!(
            permissions_for("system-admin").len(),
            super::super::catalog::ALL.len()
        );
    }

    #[test]
    fn test_super_admin_lacks_platform_permissions() {
        let permissions = permissions_for("super-admin");
        assert!(!permissions.contains(&ORGANIZATIONS_MANAGE));
        assert!(!permissions.contains(&PLANS_MANAGE));
        assert!(permissions.contains(&USERS_MANAGE));
    }

    #[test]
    fn test_each_role_is_subset_of_more_privileged_role() {
        let definitions: Vec<_> = RoleDefinition::all().collect();
        for pair in definitions.windows(2) {
            if let [higher, lower] = pair {
                for permission in lower.permissions {
                    assert!(
                        higher.permissions.contains(permission),
                        "{} has {permission} but {} does not",
                        lower.id,
                        higher.id
                    );
                }
            }
        }
    }

    #[test]
    fn test_role_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&RoleId::SystemAdmin).ok().as_deref(),
            Some("\"system-admin\"")
        );
    }
}
