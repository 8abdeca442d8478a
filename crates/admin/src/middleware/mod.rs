//! HTTP middleware and extractors for admin.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, transaction per route)
//! 2. `TraceLayer` (request span with status and latency)
//! 3. `RequireUser` extractor on `/api/*` handlers (bearer token)

pub mod auth;

pub use auth::{RequireUser, require_permission};
