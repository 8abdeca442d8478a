//! Access-control routes.
//!
//! Read-only views over the static role table for the console's navigation
//! and button states.

use axum::{
    Json, Router,
    extract::Query,
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use venuedesk_core::Permission;
use venuedesk_core::access::{self, RoleDefinition};

use crate::error::AppError;
use crate::middleware::RequireUser;
use crate::state::AppState;

/// Build the access router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/access", get(current_access))
        .route("/api/access/roles", get(list_roles))
        .route("/api/access/check", get(check_permission))
        .route("/api/access/route", get(check_route))
}

#[derive(Debug, Serialize)]
pub struct AccessResponse {
    /// Role identifier as carried in the token.
    pub role_id: String,
    /// Role definition, `null` for unknown roles.
    pub role: Option<&'static RoleDefinition>,
    pub permissions: &'static [&'static str],
}

/// GET /api/access
async fn current_access(RequireUser(user): RequireUser) -> Json<AccessResponse> {
    Json(AccessResponse {
        role: RoleDefinition::find(&user.role),
        permissions: access::permissions_for(&user.role),
        role_id: user.role,
    })
}

/// GET /api/access/roles
async fn list_roles(RequireUser(_user): RequireUser) -> Json<Vec<&'static RoleDefinition>> {
    Json(RoleDefinition::all().collect())
}

/// How several permissions combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckMode {
    #[default]
    All,
    Any,
}

#[derive(Debug, Deserialize)]
pub struct CheckQuery {
    /// One tag, or several separated by commas.
    pub permission: String,
    #[serde(default)]
    pub mode: CheckMode,
}

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub permissions: Vec<Permission>,
    pub mode: CheckMode,
    pub allowed: bool,
}

/// GET /api/access/check?permission=bookings.edit,bookings.delete&mode=any
#[instrument(skip(user), fields(user_id = %user.id))]
async fn check_permission(
    RequireUser(user): RequireUser,
    Query(query): Query<CheckQuery>,
) -> Result<Json<CheckResponse>, AppError> {
    let permissions = query
        .permission
        .split(',')
        .map(|tag| Permission::parse(tag.trim()))
        .collect::<Result<Vec<_>, _>>()?;

    let tags: Vec<&str> = permissions.iter().map(Permission::as_str).collect();
    let allowed = match query.mode {
        CheckMode::All => access::has_all_permissions(&user.role, &tags),
        CheckMode::Any => access::has_any_permission(&user.role, &tags),
    };

    Ok(Json(CheckResponse {
        permissions,
        mode: query.mode,
        allowed,
    }))
}

#[derive(Debug, Deserialize)]
pub struct RouteQuery {
    pub path: String,
}

#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub path: String,
    pub required_permission: Option<&'static str>,
    pub allowed: bool,
}

/// GET /api/access/route?path=/bookings/123
async fn check_route(
    RequireUser(user): RequireUser,
    Query(query): Query<RouteQuery>,
) -> Result<Json<RouteResponse>, AppError> {
    if !query.path.starts_with('/') {
        return Err(AppError::BadRequest(format!(
            "route path must start with '/': {}",
            query.path
        )));
    }

    Ok(Json(RouteResponse {
        required_permission: access::required_permission(&query.path),
        allowed: access::can_access_route(&user.role, &query.path),
        path: query.path,
    }))
}
