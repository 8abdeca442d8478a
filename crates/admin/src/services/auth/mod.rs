//! Access-token authentication.
//!
//! The backend-as-a-service signs HS256 access tokens with a shared key. The
//! console's role, plan and organization travel in `app_metadata`, which only
//! the backend can write, so they are trusted as-is once the signature checks
//! out.

mod error;

pub use error::AuthError;

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use venuedesk_core::{OrganizationId, UserId};

use crate::models::CurrentUser;

/// Server-controlled claims attached to every user by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<OrganizationId>,
}

/// Access-token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub exp: i64,
    #[serde(default)]
    pub iat: i64,
    #[serde(default)]
    pub app_metadata: AppMetadata,
}

impl Claims {
    /// Claims for `user`, valid for `ttl` from now.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::LifetimeOutOfRange` if `now + ttl` overflows.
    pub fn for_user(user: &CurrentUser, ttl: Duration) -> Result<Self, AuthError> {
        let now = Utc::now();
        let expires = now
            .checked_add_signed(ttl)
            .ok_or(AuthError::LifetimeOutOfRange)?;
        Ok(Self {
            sub: user.id,
            email: user.email.clone(),
            exp: expires.timestamp(),
            iat: now.timestamp(),
            app_metadata: AppMetadata {
                role: Some(user.role.clone()),
                plan: user.plan.clone(),
                organization_id: user.organization_id,
            },
        })
    }
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            role: claims.app_metadata.role.unwrap_or_default(),
            plan: claims.app_metadata.plan,
            organization_id: claims.app_metadata.organization_id,
        }
    }
}

/// Signs and verifies access tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &Algorithm::HS256)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let key = secret.expose_secret().as_bytes();
        let mut validation = Validation::new(Algorithm::HS256);
        // Backend tokens carry `aud: "authenticated"`; the signature is what
        // binds them to this deployment.
        validation.validate_aud = false;

        Self {
            encoding: EncodingKey::from_secret(key),
            decoding: DecodingKey::from_secret(key),
            validation,
        }
    }

    /// Verify a token and extract the caller.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Expired` for stale tokens and
    /// `AuthError::InvalidToken` for anything else that fails validation.
    pub fn verify(&self, token: &str) -> Result<CurrentUser, AuthError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)?;
        Ok(data.claims.into())
    }

    /// Mint a token for `user`. Used by the CLI for local development.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::LifetimeOutOfRange` if the expiry overflows and
    /// `AuthError::Signing` if encoding fails.
    pub fn mint(&self, user: &CurrentUser, ttl: Duration) -> Result<String, AuthError> {
        encode(
            &Header::new(Algorithm::HS256),
            &Claims::for_user(user, ttl)?,
            &self.encoding,
        )
        .map_err(AuthError::Signing)
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` header value.
///
/// # Errors
///
/// Returns `AuthError::MalformedHeader` if the scheme is not `Bearer` or the
/// token is empty.
pub fn bearer_token(header: &str) -> Result<&str, AuthError> {
    let (scheme, token) = header.split_once(' ').ok_or(AuthError::MalformedHeader)?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(AuthError::MalformedHeader);
    }
    Ok(token)
}
