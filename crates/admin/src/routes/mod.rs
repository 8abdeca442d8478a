//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                          - Liveness
//! GET    /health/ready                    - Readiness (database, when configured)
//!
//! # Access (bearer token)
//! GET    /api/access                      - Caller's role definition
//! GET    /api/access/roles                - All role definitions
//! GET    /api/access/check?permission=    - Allow/deny one or more tags
//! GET    /api/access/route?path=          - Permission required for a console route
//!
//! # Plans (bearer token)
//! GET    /api/plans                       - Plan catalog
//! GET    /api/plan                        - Caller's plan
//! GET    /api/plan/features/{name}        - Feature value on the caller's plan
//! POST   /api/plan/can-create             - Creation check against a limit
//! GET    /api/plan/usage/{resource}?usage= - Usage against a limit
//!
//! # Notifications (bearer token, notifications.view)
//! GET    /api/notifications               - List + unread count
//! POST   /api/notifications               - Create a local notification
//! DELETE /api/notifications               - Clear all
//! POST   /api/notifications/read-all      - Mark all read
//! POST   /api/notifications/{id}/read     - Mark one read
//! DELETE /api/notifications/{id}          - Delete one
//! GET    /api/notifications/stream        - Server-Sent Events
//! GET    /api/notifications/settings      - Settings
//! PUT    /api/notifications/settings      - Replace settings
//!
//! # Realtime (HMAC signature)
//! POST   /api/realtime/webhook            - Database change webhook
//! ```

pub mod access;
pub mod notifications;
pub mod plan;
pub mod realtime;

use axum::Router;

use crate::state::AppState;

/// Build the complete API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(access::router())
        .merge(plan::router())
        .merge(notifications::router())
        .merge(realtime::router())
}
