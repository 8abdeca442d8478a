//! Role table inspection.
//!
//! ```bash
//! vd-cli roles list
//! vd-cli roles check viewer bookings.edit
//! vd-cli roles route staff /settings/billing
//! ```

use thiserror::Error;
use venuedesk_core::access::{self, RoleDefinition};
use venuedesk_core::{Permission, PermissionError};

#[derive(Debug, Error)]
pub enum RolesError {
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error(transparent)]
    Permission(#[from] PermissionError),

    #[error("Route path must start with '/': {0}")]
    InvalidPath(String),
}

fn find_role(role: &str) -> Result<&'static RoleDefinition, RolesError> {
    RoleDefinition::find(role).ok_or_else(|| RolesError::UnknownRole(role.to_string()))
}

/// Print every role with its permissions.
#[allow(clippy::print_stdout)]
pub fn list() {
    for role in RoleDefinition::all() {
        println!("{} ({}) - {} permissions", role.id, role.name, role.permissions.len());
        for permission in role.permissions {
            println!("  {permission}");
        }
    }
}

/// Print whether `role` holds `permission`.
///
/// # Errors
///
/// Returns `RolesError` for an unknown role or a malformed permission tag.
#[allow(clippy::print_stdout)]
pub fn check(role: &str, permission: &str) -> Result<bool, RolesError> {
    let definition = find_role(role)?;
    let permission = Permission::parse(permission)?;
    let allowed = access::has_permission(role, permission.as_str());

    println!(
        "{} {} {}",
        definition.id,
        if allowed { "has" } else { "lacks" },
        permission
    );
    Ok(allowed)
}

/// Print the permission a console route needs and whether `role` may open it.
///
/// # Errors
///
/// Returns `RolesError` for an unknown role or a path without a leading `/`.
#[allow(clippy::print_stdout)]
pub fn route(role: &str, path: &str) -> Result<bool, RolesError> {
    let definition = find_role(role)?;
    if !path.starts_with('/') {
        return Err(RolesError::InvalidPath(path.to_string()));
    }

    let allowed = access::can_access_route(role, path);
    match access::required_permission(path) {
        Some(required) => println!("{path} requires {required}"),
        None => println!("{path} is open to every role"),
    }
    println!(
        "{} {}",
        definition.id,
        if allowed { "may open it" } else { "may not open it" }
    );
    Ok(allowed)
}
