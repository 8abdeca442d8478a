//! Notification routes.
//!
//! Every handler attaches the caller to the notification center, so a user
//! starts receiving change notifications from their first request on.

use std::convert::Infallible;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{
        Sse,
        sse::{Event, KeepAlive},
    },
    routing::{delete, get, post},
};
use futures::Stream;
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tracing::{instrument, warn};

use venuedesk_core::NotificationId;
use venuedesk_core::access::catalog::NOTIFICATIONS_VIEW;
use venuedesk_core::notification::{
    Delivery, InboxFilter, Notification, NotificationDraft, NotificationSettings,
};

use crate::error::AppError;
use crate::middleware::{RequireUser, require_permission};
use crate::models::CurrentUser;
use crate::state::AppState;

/// Build the notifications router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/notifications",
            get(list).post(create).delete(clear_all),
        )
        .route("/api/notifications/read-all", post(mark_all_read))
        .route("/api/notifications/stream", get(stream))
        .route(
            "/api/notifications/settings",
            get(get_settings).put(update_settings),
        )
        .route("/api/notifications/{id}/read", post(mark_read))
        .route("/api/notifications/{id}", delete(delete_one))
}

async fn attach(state: &AppState, user: &CurrentUser) -> Result<(), AppError> {
    require_permission(user, NOTIFICATIONS_VIEW)?;
    state.notifications().attach(user).await;
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub notifications: Vec<Notification>,
    pub unread_count: usize,
}

/// GET /api/notifications?unread_only=&type=
async fn list(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Query(filter): Query<InboxFilter>,
) -> Result<Json<ListResponse>, AppError> {
    attach(&state, &user).await?;
    let (notifications, unread_count) = state.notifications().list(user.id, filter).await;
    Ok(Json(ListResponse {
        notifications,
        unread_count,
    }))
}

/// POST /api/notifications
#[instrument(skip(state, user, draft), fields(user_id = %user.id))]
async fn create(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(draft): Json<NotificationDraft>,
) -> Result<(StatusCode, Json<Delivery>), AppError> {
    require_permission(&user, NOTIFICATIONS_VIEW)?;
    if draft.title.trim().is_empty() {
        return Err(AppError::BadRequest("title must not be empty".to_string()));
    }

    let delivery = state.notifications().notify(&user, draft).await;
    Ok((StatusCode::CREATED, Json(delivery)))
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: usize,
}

/// DELETE /api/notifications
async fn clear_all(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<CountResponse>, AppError> {
    attach(&state, &user).await?;
    let count = state.notifications().clear(user.id).await;
    Ok(Json(CountResponse { count }))
}

/// POST /api/notifications/read-all
async fn mark_all_read(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<CountResponse>, AppError> {
    attach(&state, &user).await?;
    let count = state.notifications().mark_all_read(user.id).await;
    Ok(Json(CountResponse { count }))
}

/// POST /api/notifications/{id}/read
async fn mark_read(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<NotificationId>,
) -> Result<StatusCode, AppError> {
    attach(&state, &user).await?;
    if state.notifications().mark_read(user.id, id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("notification {id}")))
    }
}

/// DELETE /api/notifications/{id}
async fn delete_one(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<NotificationId>,
) -> Result<Json<Notification>, AppError> {
    attach(&state, &user).await?;
    state
        .notifications()
        .delete(user.id, id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("notification {id}")))
}

/// GET /api/notifications/stream
///
/// Server-Sent Events, one `notification` event per delivery. The stream
/// ends when the server shuts down; clients reconnect on their own.
async fn stream(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    require_permission(&user, NOTIFICATIONS_VIEW)?;
    let mut receiver = state.notifications().stream(&user).await;
    let user_id = user.id;

    let events = async_stream::stream! {
        loop {
            match receiver.recv().await {
                Ok(delivery) => {
                    let json = serde_json::to_string(&delivery).unwrap_or_else(|_| {
                        r#"{"error":"Failed to serialize delivery"}"#.to_string()
                    });
                    yield Ok(Event::default().event("notification").data(json));
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(user_id = %user_id, skipped, "Notification stream lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    };

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

/// GET /api/notifications/settings
async fn get_settings(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<NotificationSettings>, AppError> {
    attach(&state, &user).await?;
    let settings = state.notifications().settings().get(user.id).await?;
    Ok(Json(settings))
}

/// PUT /api/notifications/settings
///
/// Replaces the whole document; omitted fields take their defaults.
#[instrument(skip(state, user, settings), fields(user_id = %user.id))]
async fn update_settings(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(settings): Json<NotificationSettings>,
) -> Result<Json<NotificationSettings>, AppError> {
    attach(&state, &user).await?;
    settings
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    state.notifications().settings().put(user.id, settings).await?;
    tracing::info!("Notification settings updated");
    Ok(Json(settings))
}
