//! Realtime webhook route.
//!
//! The backend-as-a-service calls this for every row change on the
//! `bookings` and `customers` tables. No bearer token; the HMAC signature is
//! the authentication.

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
};
use chrono::Utc;
use serde::Serialize;
use tracing::instrument;

use venuedesk_core::notification::ChangeChannel;

use crate::error::AppError;
use crate::services::webhook::{SIGNATURE_HEADER, TIMESTAMP_HEADER, WebhookError, WebhookPayload};
use crate::state::AppState;

/// Build the realtime router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/realtime/webhook", post(webhook))
}

#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    /// Channel the change was published on, `null` if it was ignored.
    pub channel: Option<ChangeChannel>,
}

fn header<'a>(headers: &'a HeaderMap, name: &'static str) -> Result<&'a str, WebhookError> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .ok_or(WebhookError::MissingHeader(name))
}

/// POST /api/realtime/webhook
#[instrument(skip_all, fields(table = tracing::field::Empty))]
async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<WebhookResponse>), AppError> {
    let timestamp = header(&headers, TIMESTAMP_HEADER)?;
    let signature = header(&headers, SIGNATURE_HEADER)?;

    if let Err(e) = state
        .webhooks()
        .verify(timestamp, &body, signature, Utc::now().timestamp())
    {
        tracing::warn!(error = %e, "Rejected realtime webhook");
        return Err(e.into());
    }

    let payload = WebhookPayload::parse(&body)?;
    tracing::Span::current().record("table", payload.table.as_str());

    let Some(event) = payload.into_event()? else {
        return Ok((StatusCode::ACCEPTED, Json(WebhookResponse { channel: None })));
    };

    let channel = event.channel();
    let receivers = state.feed().publish(event);
    tracing::debug!(%channel, receivers, "Published change event");

    Ok((
        StatusCode::ACCEPTED,
        Json(WebhookResponse {
            channel: Some(channel),
        }),
    ))
}
