//! Access-token error types.

use thiserror::Error;

/// Errors that can occur while authenticating a request.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No `Authorization` header on the request.
    #[error("missing bearer token")]
    MissingToken,

    /// `Authorization` header present but not `Bearer <token>`.
    #[error("malformed authorization header")]
    MalformedHeader,

    /// Token is past its `exp` claim.
    #[error("token expired")]
    Expired,

    /// Signature, algorithm or claims did not validate.
    #[error("invalid token: {0}")]
    InvalidToken(jsonwebtoken::errors::Error),

    /// Expiry falls outside the representable date range.
    #[error("token lifetime out of range")]
    LifetimeOutOfRange,

    /// Token could not be signed.
    #[error("token signing failed: {0}")]
    Signing(jsonwebtoken::errors::Error),
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => Self::Expired,
            _ => Self::InvalidToken(err),
        }
    }
}
