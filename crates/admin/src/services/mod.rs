//! Business logic services for admin.
//!
//! # Services
//!
//! - `auth` - Access-token verification and dev-token minting
//! - `feed` - In-process realtime change feed
//! - `notifications` - Per-user inboxes, routing and live deliveries
//! - `settings` - Notification settings store (`PostgreSQL` or memory)
//! - `webhook` - Signed database webhook decoding

pub mod auth;
pub mod feed;
pub mod notifications;
pub mod settings;
pub mod webhook;

pub use auth::{AuthError, TokenService};
pub use feed::{ChangeFeed, Subscription};
pub use notifications::{Clock, FixedClock, NotificationCenter, SystemClock};
pub use settings::SettingsStore;
pub use webhook::{WebhookError, WebhookPayload, WebhookVerifier};
