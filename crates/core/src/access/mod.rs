//! Role-based access control.
//!
//! Roles map to fixed permission sets defined in [`role`]. A permission is a
//! `resource.action` tag; the full catalog lives in [`catalog`]. Console
//! routes map to the tag needed to view them in [`route`].
//!
//! Unknown role identifiers resolve to an empty permission set, so every
//! check against them denies.

pub mod catalog;
pub mod permission;
pub mod role;
pub mod route;

pub use permission::{Permission, PermissionError};
pub use role::{RoleDefinition, RoleId, permissions_for};
pub use route::required_permission;

/// Check whether a role identifier holds a permission tag.
///
/// # Example
///
/// ```
/// use venuedesk_core::access::has_permission;
///
/// assert!(has_permission("manager", "bookings.edit"));
/// assert!(!has_permission("staff", "bookings.delete"));
/// assert!(!has_permission("intern", "dashboard.view"));
/// ```
#[must_use]
pub fn has_permission(role: &str, permission: &str) -> bool {
    permissions_for(role).contains(&permission)
}

/// True when the role holds at least one of the given tags.
#[must_use]
pub fn has_any_permission(role: &str, permissions: &[&str]) -> bool {
    permissions.iter().any(|p| has_permission(role, p))
}

/// True when the role holds every one of the given tags.
///
/// An empty list is vacuously satisfied.
#[must_use]
pub fn has_all_permissions(role: &str, permissions: &[&str]) -> bool {
    permissions.iter().all(|p| has_permission(role, p))
}

/// Check whether a role may view a console route.
///
/// Routes without a required permission are open to every role, including
/// unknown ones.
#[must_use]
pub fn can_access_route(role: &str, path: &str) -> bool {
    required_permission(path).is_none_or(|permission| has_permission(role, permission))
}
