//! Development access tokens.
//!
//! Mints a token signed with `VENUEDESK_JWT_SECRET`, carrying the same claims
//! the backend-as-a-service puts in its access tokens. Useful for calling the
//! admin API locally without a login flow.
//!
//! ```bash
//! vd-cli token mint --role manager --plan growth --org <uuid>
//! ```

use chrono::Duration;
use thiserror::Error;
use venuedesk_admin::config::{ConfigError, get_validated_secret};
use venuedesk_admin::models::CurrentUser;
use venuedesk_admin::services::{AuthError, TokenService};
use venuedesk_core::{OrganizationId, PlanTier, RoleId, UserId};

#[derive(Debug, Error)]
pub enum TokenError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Unknown plan: {0}")]
    UnknownPlan(String),

    #[error("Token lifetime must be a positive number of hours within chrono's range")]
    InvalidTtl,
}

/// Claims to put in a minted token.
#[derive(Debug, Clone)]
pub struct MintRequest {
    pub user_id: Option<UserId>,
    pub email: Option<String>,
    pub role: String,
    pub plan: Option<String>,
    pub organization_id: Option<OrganizationId>,
    pub ttl_hours: i64,
}

impl MintRequest {
    /// Check the request and turn it into the user the token stands for.
    ///
    /// # Errors
    ///
    /// Returns `TokenError` for an unknown role or plan, or a lifetime under
    /// one hour or too large to represent.
    pub fn into_user(self) -> Result<(CurrentUser, Duration), TokenError> {
        if RoleId::parse(&self.role).is_none() {
            return Err(TokenError::UnknownRole(self.role));
        }
        if let Some(plan) = self.plan.as_deref().filter(|p| PlanTier::parse(p).is_none()) {
            return Err(TokenError::UnknownPlan(plan.to_string()));
        }
        let ttl = Duration::try_hours(self.ttl_hours)
            .filter(|ttl| *ttl >= Duration::hours(1))
            .ok_or(TokenError::InvalidTtl)?;

        let user = CurrentUser {
            id: self.user_id.unwrap_or_else(UserId::new_v4),
            email: self.email,
            role: self.role,
            plan: self.plan,
            organization_id: self.organization_id,
        };
        Ok((user, ttl))
    }
}

/// Mint a token and print it on stdout.
///
/// # Errors
///
/// Returns `TokenError` if the signing key is missing or weak, the request is
/// invalid, or signing fails.
#[allow(clippy::print_stdout)]
pub fn mint(request: MintRequest) -> Result<(), TokenError> {
    dotenvy::dotenv().ok();
    let secret = get_validated_secret("VENUEDESK_JWT_SECRET")?;

    let (user, ttl) = request.into_user()?;
    let token = TokenService::new(&secret).mint(&user, ttl)?;

    tracing::info!(user_id = %user.id, role = %user.role, "Minted access token");
    println!("{token}");
    Ok(())
}
