//! Console route requirements.
//!
//! Maps a console path to the permission needed to view it. A path matches
//! an entry when it equals the entry's prefix or continues past it with `/`,
//! so `/bookings/42/edit` needs the same tag as `/bookings`.

use super::catalog::{
    BILLING_VIEW, BOOKINGS_VIEW, CUSTOMERS_VIEW, DASHBOARD_VIEW, EMAIL_TEMPLATES_MANAGE,
    GAMES_VIEW, NOTIFICATIONS_VIEW, ORGANIZATIONS_MANAGE, PLANS_MANAGE, REPORTS_VIEW,
    SETTINGS_VIEW, STAFF_VIEW, USERS_MANAGE, WAIVERS_VIEW, WIDGETS_VIEW,
};

/// Route prefix to required permission.
pub const ROUTE_PERMISSIONS: &[(&str, &str)] = &[
    ("/dashboard", DASHBOARD_VIEW),
    ("/bookings", BOOKINGS_VIEW),
    ("/games", GAMES_VIEW),
    ("/customers", CUSTOMERS_VIEW),
    ("/staff", STAFF_VIEW),
    ("/reports", REPORTS_VIEW),
    ("/widgets", WIDGETS_VIEW),
    ("/waivers", WAIVERS_VIEW),
    ("/email-templates", EMAIL_TEMPLATES_MANAGE),
    ("/settings", SETTINGS_VIEW),
    ("/billing", BILLING_VIEW),
    ("/users", USERS_MANAGE),
    ("/notifications", NOTIFICATIONS_VIEW),
    ("/organizations", ORGANIZATIONS_MANAGE),
    ("/plans", PLANS_MANAGE),
    ("/system-admin", ORGANIZATIONS_MANAGE),
];

/// The permission required to view a console path, if any.
///
/// Query strings and fragments are ignored.
///
/// # Example
///
/// ```
/// use venuedesk_core::access::required_permission;
///
/// assert_eq!(required_permission("/bookings/42"), Some("bookings.view"));
/// assert_eq!(required_permission("/bookings-archive"), None);
/// assert_eq!(required_permission("/login"), None);
/// ```
#[must_use]
pub fn required_permission(path: &str) -> Option<&'static str> {
    let path = path
        .split(['?', '#'])
        .next()
        .unwrap_or_default();

    ROUTE_PERMISSIONS
        .iter()
        .filter(|(prefix, _)| {
            path.strip_prefix(*prefix)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        })
        .max_by_key(|(prefix, _)| prefix.len())
        .map(|(_, permission)| *permission)
}
