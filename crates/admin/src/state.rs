//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AdminConfig;
use crate::services::{
    ChangeFeed, Clock, NotificationCenter, SettingsStore, Subscription, SystemClock, TokenService,
    WebhookVerifier,
};

/// Application state shared across all handlers.
///
/// Cheap to clone. Owns the change-feed subscriptions, so routing stops once
/// the last clone is dropped.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    pool: Option<PgPool>,
    tokens: TokenService,
    webhooks: WebhookVerifier,
    feed: ChangeFeed,
    notifications: NotificationCenter,
    _subscriptions: Vec<Subscription>,
}

impl AppState {
    /// Build state and start routing change events.
    ///
    /// Must be called inside a Tokio runtime. Without a pool, settings are
    /// kept in memory.
    #[must_use]
    pub fn new(config: AdminConfig, pool: Option<PgPool>) -> Self {
        Self::with_clock(config, pool, Arc::new(SystemClock))
    }

    /// Like [`AppState::new`] with an explicit clock for quiet-hour checks.
    #[must_use]
    pub fn with_clock(config: AdminConfig, pool: Option<PgPool>, clock: Arc<dyn Clock>) -> Self {
        let settings = pool
            .clone()
            .map_or_else(SettingsStore::memory, SettingsStore::postgres);
        if !settings.is_persistent() {
            tracing::warn!("No database configured, notification settings are kept in memory");
        }

        let notifications = NotificationCenter::with_clock(settings, config.inbox_capacity, clock);
        let feed = ChangeFeed::new();
        let subscriptions = notifications.listen(&feed);
        for subscription in &subscriptions {
            tracing::debug!(channel = %subscription.channel(), "Routing change channel");
        }

        Self {
            inner: Arc::new(AppStateInner {
                tokens: TokenService::new(&config.jwt_secret),
                webhooks: WebhookVerifier::new(config.webhook_secret.clone()),
                config,
                pool,
                feed,
                notifications,
                _subscriptions: subscriptions,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Database pool, if one is configured.
    #[must_use]
    pub fn pool(&self) -> Option<&PgPool> {
        self.inner.pool.as_ref()
    }

    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.inner.tokens
    }

    #[must_use]
    pub fn webhooks(&self) -> &WebhookVerifier {
        &self.inner.webhooks
    }

    #[must_use]
    pub fn feed(&self) -> &ChangeFeed {
        &self.inner.feed
    }

    #[must_use]
    pub fn notifications(&self) -> &NotificationCenter {
        &self.inner.notifications
    }
}
