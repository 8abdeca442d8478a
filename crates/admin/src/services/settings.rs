//! Per-user notification settings.
//!
//! Settings are read on every routed notification, so reads go through a
//! `moka` cache (10 minute TTL). Writes update the backing store first and
//! then the cache.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use venuedesk_core::UserId;
use venuedesk_core::notification::NotificationSettings;

use crate::db::{RepositoryError, UserSettingsRepository};

/// Settings document key for notification preferences.
pub const NOTIFICATION_SETTINGS_KEY: &str = "notifications";

/// Where settings are persisted.
#[derive(Clone)]
enum Backend {
    Postgres(PgPool),
    Memory(Arc<RwLock<HashMap<UserId, NotificationSettings>>>),
}

/// Notification settings store with a read-through cache.
#[derive(Clone)]
pub struct SettingsStore {
    inner: Arc<SettingsStoreInner>,
}

struct SettingsStoreInner {
    backend: Backend,
    cache: Cache<UserId, NotificationSettings>,
}

impl SettingsStore {
    /// Store backed by `venuedesk.user_settings`.
    #[must_use]
    pub fn postgres(pool: PgPool) -> Self {
        Self::with_backend(Backend::Postgres(pool))
    }

    /// Store that keeps settings in process memory. Nothing survives a restart.
    #[must_use]
    pub fn memory() -> Self {
        Self::with_backend(Backend::Memory(Arc::default()))
    }

    fn with_backend(backend: Backend) -> Self {
        let cache = Cache::builder()
            .max_capacity(10_000)
            .time_to_live(Duration::from_secs(600))
            .build();

        Self {
            inner: Arc::new(SettingsStoreInner { backend, cache }),
        }
    }

    /// Whether settings are persisted to `PostgreSQL`.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        matches!(self.inner.backend, Backend::Postgres(_))
    }

    /// Load a user's settings, or the defaults if they never saved any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the database query fails or the stored
    /// document no longer parses.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn get(&self, user_id: UserId) -> Result<NotificationSettings, RepositoryError> {
        if let Some(settings) = self.inner.cache.get(&user_id).await {
            debug!("Cache hit for notification settings");
            return Ok(settings);
        }

        let settings = match &self.inner.backend {
            Backend::Postgres(pool) => {
                let stored = UserSettingsRepository::new(pool)
                    .get(user_id, NOTIFICATION_SETTINGS_KEY)
                    .await?;
                match stored {
                    Some(value) => serde_json::from_value(value).map_err(|e| {
                        RepositoryError::DataCorruption(format!(
                            "invalid notification settings: {e}"
                        ))
                    })?,
                    None => NotificationSettings::default(),
                }
            }
            Backend::Memory(map) => map.read().await.get(&user_id).copied().unwrap_or_default(),
        };

        self.inner.cache.insert(user_id, settings).await;
        Ok(settings)
    }

    /// Load a user's settings, falling back to defaults on storage errors.
    ///
    /// Used on the delivery path, where a broken settings row must not stop
    /// the notification itself.
    pub async fn get_or_default(&self, user_id: UserId) -> NotificationSettings {
        match self.get(user_id).await {
            Ok(settings) => settings,
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Failed to load notification settings, using defaults");
                NotificationSettings::default()
            }
        }
    }

    /// Replace a user's settings.
    ///
    /// Callers validate first; this layer stores whatever it is given.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the database write fails.
    #[instrument(skip(self, settings), fields(user_id = %user_id))]
    pub async fn put(
        &self,
        user_id: UserId,
        settings: NotificationSettings,
    ) -> Result<(), RepositoryError> {
        match &self.inner.backend {
            Backend::Postgres(pool) => {
                let value = serde_json::to_value(settings).map_err(|e| {
                    RepositoryError::DataCorruption(format!(
                        "unserializable notification settings: {e}"
                    ))
                })?;
                UserSettingsRepository::new(pool)
                    .set(user_id, NOTIFICATION_SETTINGS_KEY, &value)
                    .await?;
            }
            Backend::Memory(map) => {
                map.write().await.insert(user_id, settings);
            }
        }

        self.inner.cache.insert(user_id, settings).await;
        Ok(())
    }
}
