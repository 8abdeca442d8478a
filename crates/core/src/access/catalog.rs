//! The permission catalog.
//!
//! Every tag a role can hold is declared here. Tags follow the
//! `resource.action` shape checked by [`super::Permission::parse`].

pub const DASHBOARD_VIEW: &str = "dashboard.view";

pub const BOOKINGS_VIEW: &str = "bookings.view";
pub const BOOKINGS_CREATE: &str = "bookings.create";
pub const BOOKINGS_EDIT: &str = "bookings.edit";
pub const BOOKINGS_DELETE: &str = "bookings.delete";

pub const GAMES_VIEW: &str = "games.view";
pub const GAMES_CREATE: &str = "games.create";
pub const GAMES_EDIT: &str = "games.edit";
pub const GAMES_DELETE: &str = "games.delete";

pub const CUSTOMERS_VIEW: &str = "customers.view";
pub const CUSTOMERS_CREATE: &str = "customers.create";
pub const CUSTOMERS_EDIT: &str = "customers.edit";
pub const CUSTOMERS_DELETE: &str = "customers.delete";

pub const STAFF_VIEW: &str = "staff.view";
pub const STAFF_MANAGE: &str = "staff.manage";

pub const REPORTS_VIEW: &str = "reports.view";
pub const REPORTS_EXPORT: &str = "reports.export";

pub const WIDGETS_VIEW: &str = "widgets.view";
pub const WIDGETS_MANAGE: &str = "widgets.manage";

pub const WAIVERS_VIEW: &str = "waivers.view";
pub const WAIVERS_MANAGE: &str = "waivers.manage";

pub const EMAIL_TEMPLATES_MANAGE: &str = "email_templates.manage";

pub const SETTINGS_VIEW: &str = "settings.view";
pub const SETTINGS_EDIT: &str = "settings.edit";

pub const BILLING_VIEW: &str = "billing.view";
pub const BILLING_MANAGE: &str = "billing.manage";

pub const USERS_MANAGE: &str = "users.manage";

pub const NOTIFICATIONS_VIEW: &str = "notifications.view";

/// Platform-level: create, suspend and inspect tenant organizations.
pub const ORGANIZATIONS_MANAGE: &str = "organizations.manage";
/// Platform-level: edit the subscription plan catalog.
pub const PLANS_MANAGE: &str = "plans.manage";

/// Every permission, in display order.
pub const ALL: &[&str] = &[
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
    ORGANIZATIONS_MANAGE,
    PLANS_MANAGE,
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::Permission;

    #[test]
    fn test_catalog_tags_are_well_formed() {
        for tag in ALL {
            assert!(Permission::parse(tag).is_ok(), "{tag}");
        }
    }

    #[test]
    fn test_catalog_has_no_duplicates() {
        let mut seen = std::collections::HashSet::new();
        for tag in ALL {
            assert!(seen.insert(*tag), "duplicate {tag}");
        }
    }
}
