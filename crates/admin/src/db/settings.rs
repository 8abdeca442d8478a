//! Per-user settings storage.
//!
//! Each row holds one JSONB document for a `(user_id, key)` pair. Callers
//! own the document shape; this layer only moves JSON in and out.

use serde_json::Value as JsonValue;
use sqlx::PgPool;
use venuedesk_core::UserId;

use super::RepositoryError;

/// Repository for `venuedesk.user_settings`.
pub struct UserSettingsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserSettingsRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user's setting document.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    #[tracing::instrument(skip(self), fields(user_id = %user_id))]
    pub async fn get(&self, user_id: UserId, key: &str) -> Result<Option<JsonValue>, RepositoryError> {
        let value = sqlx::query_scalar::<_, JsonValue>(
            r"
            SELECT value FROM venuedesk.user_settings
            WHERE user_id = $1 AND key = $2
            ",
        )
        .bind(user_id)
        .bind(key)
        .fetch_optional(self.pool)
        .await?;

        Ok(value)
    }

    /// Insert or replace a user's setting document.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    #[tracing::instrument(skip(self, value), fields(user_id = %user_id))]
    pub async fn set(
        &self,
        user_id: UserId,
        key: &str,
        value: &JsonValue,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO venuedesk.user_settings (user_id, key, value)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, key) DO UPDATE SET value = $3, updated_at = NOW()
            ",
        )
        .bind(user_id)
        .bind(key)
        .bind(value)
        .execute(self.pool)
        .await?;

        Ok(())
    }
}
