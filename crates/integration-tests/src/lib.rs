//! Integration tests for Venuedesk.
//!
//! Each test starts the admin app in-process on an ephemeral port and talks
//! to it over HTTP. No database is needed: without one, notification
//! settings are kept in memory.
//!
//! ```bash
//! cargo test -p venuedesk-integration-tests
//! ```

use std::net::SocketAddr;
use std::time::Duration;

use chrono::Utc;
use reqwest::{Client, Response};
use secrecy::SecretString;
use serde_json::Value;
use tokio::task::JoinHandle;

use venuedesk_admin::app;
use venuedesk_admin::config::{AdminConfig, LogFormat};
use venuedesk_admin::models::CurrentUser;
use venuedesk_admin::services::webhook::{SIGNATURE_HEADER, TIMESTAMP_HEADER};
use venuedesk_admin::state::AppState;
use venuedesk_core::notification::DEFAULT_INBOX_CAPACITY;
use venuedesk_core::{OrganizationId, UserId};

/// Access-token key used by every test server.
pub const TEST_JWT_SECRET: &str = "k7Qm2Zp9Lr4Tx8Wv1Nc6Hb3Jd5Gf0Sy";
/// Webhook key used by every test server.
pub const TEST_WEBHOOK_SECRET: &str = "Pz4Rt8Lm1Xq6Vn3Kc9Bw2Hy5Jf7Gd0Ts";

/// Configuration for an in-memory test server.
#[must_use]
pub fn test_config() -> AdminConfig {
    AdminConfig {
        database_url: None,
        host: [127, 0, 0, 1].into(),
        port: 0,
        jwt_secret: SecretString::from(TEST_JWT_SECRET),
        webhook_secret: SecretString::from(TEST_WEBHOOK_SECRET),
        inbox_capacity: DEFAULT_INBOX_CAPACITY,
        log_format: LogFormat::Text,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// A user in `organization_id` with the given role and plan.
#[must_use]
pub fn user(role: &str, plan: Option<&str>, organization_id: OrganizationId) -> CurrentUser {
    CurrentUser {
        id: UserId::new_v4(),
        email: Some(format!("{role}@example.com")),
        role: role.to_string(),
        plan: plan.map(str::to_string),
        organization_id: Some(organization_id),
    }
}

/// The admin app running on an ephemeral port.
pub struct TestServer {
    pub base_url: String,
    pub client: Client,
    state: AppState,
    task: JoinHandle<()>,
}

impl TestServer {
    /// Bind to `127.0.0.1:0` and serve the app in a background task.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start() -> Self {
        let state = AppState::new(test_config(), None);
        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local address");

        let router = app(state.clone());
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Self {
            base_url: format!("http://{addr}"),
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to create HTTP client"),
            state,
            task,
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Mint a one-hour access token for `user`.
    ///
    /// # Panics
    ///
    /// Panics if signing fails.
    #[must_use]
    pub fn token(&self, user: &CurrentUser) -> String {
        self.state
            .tokens()
            .mint(user, chrono::Duration::hours(1))
            .expect("Failed to mint token")
    }

    /// Authenticated GET.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn get(&self, path: &str, user: &CurrentUser) -> Response {
        self.client
            .get(self.url(path))
            .bearer_auth(self.token(user))
            .send()
            .await
            .expect("GET failed")
    }

    /// Authenticated POST with a JSON body.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn post(&self, path: &str, user: &CurrentUser, body: &Value) -> Response {
        self.client
            .post(self.url(path))
            .bearer_auth(self.token(user))
            .json(body)
            .send()
            .await
            .expect("POST failed")
    }

    /// Authenticated PUT with a JSON body.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn put(&self, path: &str, user: &CurrentUser, body: &Value) -> Response {
        self.client
            .put(self.url(path))
            .bearer_auth(self.token(user))
            .json(body)
            .send()
            .await
            .expect("PUT failed")
    }

    /// Authenticated DELETE.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn delete(&self, path: &str, user: &CurrentUser) -> Response {
        self.client
            .delete(self.url(path))
            .bearer_auth(self.token(user))
            .send()
            .await
            .expect("DELETE failed")
    }

    /// Sign `body` the way the backend does and post it to the webhook.
    ///
    /// # Panics
    ///
    /// Panics if signing or the request fails.
    pub async fn webhook(&self, body: &Value) -> Response {
        self.webhook_at(body, Utc::now().timestamp()).await
    }

    /// Like [`TestServer::webhook`] with an explicit signing timestamp.
    ///
    /// # Panics
    ///
    /// Panics if signing or the request fails.
    pub async fn webhook_at(&self, body: &Value, timestamp: i64) -> Response {
        let bytes = serde_json::to_vec(body).expect("Failed to encode webhook body");
        let timestamp = timestamp.to_string();
        let signature = self
            .state
            .webhooks()
            .sign(&timestamp, &bytes)
            .expect("Failed to sign webhook");

        self.client
            .post(self.url("/api/realtime/webhook"))
            .header("content-type", "application/json")
            .header(TIMESTAMP_HEADER, timestamp)
            .header(SIGNATURE_HEADER, signature)
            .body(bytes)
            .send()
            .await
            .expect("Webhook request failed")
    }

    /// Poll the inbox of `user` until it holds `count` notifications.
    ///
    /// Change events are routed on a background task, so a webhook's
    /// notification shows up shortly after the 202.
    ///
    /// # Panics
    ///
    /// Panics if the inbox does not reach `count` within two seconds.
    pub async fn wait_for_inbox(&self, user: &CurrentUser, count: usize) -> Value {
        for _ in 0..40 {
            let body: Value = self
                .get("/api/notifications", user)
                .await
                .json()
                .await
                .expect("Inbox response was not JSON");
            let len = body["notifications"].as_array().map_or(0, Vec::len);
            if len >= count {
                return body;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        panic!("Inbox never reached {count} notifications");
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}
