//! Authentication extractors for admin.
//!
//! Every `/api/*` route except the realtime webhook takes a bearer access
//! token issued by the backend-as-a-service.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::{AppError, set_sentry_user};
use crate::models::CurrentUser;
use crate::services::auth::{AuthError, bearer_token};
use crate::state::AppState;

/// Extractor that requires a valid access token.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(RequireUser(user): RequireUser) -> impl IntoResponse {
///     format!("Hello, {}!", user.id)
/// }
/// ```
pub struct RequireUser(pub CurrentUser);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingToken)?
            .to_str()
            .map_err(|_| AuthError::MalformedHeader)?;

        let user = state.tokens().verify(bearer_token(header)?)?;
        set_sentry_user(user.id, user.email.as_deref());
        tracing::debug!(user_id = %user.id, role = %user.role, "Authenticated request");

        Ok(Self(user))
    }
}

/// Reject with 403 unless the caller's role holds `permission`.
///
/// # Errors
///
/// Returns `AppError::Forbidden` naming the missing permission.
pub fn require_permission(user: &CurrentUser, permission: &str) -> Result<(), AppError> {
    if user.can(permission) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!("missing permission {permission}")))
    }
}
