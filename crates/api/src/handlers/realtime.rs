//! Handlers for the `/realtime` resource: the REST fallback for clients
//! without a live WebSocket — notification center, chat, and profile
//! view tracking.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use pharmhub_core::error::CoreError;
use pharmhub_core::events::{EVENT_MESSAGE_RECEIVED, EVENT_PROFILE_VIEWED};
use pharmhub_core::types::DbId;
use pharmhub_db::models::message::{Message, SendMessage};
use pharmhub_db::models::notification::Notification;
use pharmhub_db::repositories::{MessageRepo, NotificationRepo, UserRepo};
use pharmhub_events::PlatformEvent;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query / request types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /realtime/notifications`.
#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    /// If `true`, return only unread notifications. Defaults to `false`.
    pub unread_only: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Request body for `POST /realtime/profile-view`.
#[derive(Debug, Deserialize)]
pub struct ProfileViewRequest {
    /// The professional whose profile was viewed.
    pub user_id: DbId,
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

/// GET /api/v1/realtime/notifications
///
/// List the authenticated user's notifications with optional filtering.
pub async fn list_notifications(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<NotificationQuery>,
) -> AppResult<Json<DataResponse<Vec<Notification>>>> {
    let pagination = PaginationParams {
        limit: params.limit,
        offset: params.offset,
    };
    let unread_only = params.unread_only.unwrap_or(false);

    let notifications = NotificationRepo::list_for_user(
        &state.pool,
        auth.user_id,
        unread_only,
        pagination.limit(),
        pagination.offset(),
    )
    .await?;

    Ok(Json(DataResponse {
        data: notifications,
    }))
}

/// PUT /api/v1/realtime/notifications/{id}/read
///
/// Mark a single notification as read. Idempotent: re-marking an
/// already-read notification succeeds. Returns 404 only when the
/// notification does not belong to the authenticated user.
pub async fn mark_read(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(notification_id): Path<DbId>,
) -> AppResult<StatusCode> {
    let found = NotificationRepo::mark_read(&state.pool, notification_id, auth.user_id).await?;

    if !found {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Notification",
            id: notification_id,
        }));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/realtime/notifications/read-all
///
/// Mark all of the authenticated user's notifications as read.
/// Returns the number of notifications that were marked.
pub async fn mark_all_read(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let count = NotificationRepo::mark_all_read(&state.pool, auth.user_id).await?;

    Ok(Json(serde_json::json!({
        "data": { "marked_read": count }
    })))
}

/// GET /api/v1/realtime/notifications/unread-count
///
/// Return the number of unread notifications for the authenticated user.
pub async fn unread_count(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let count = NotificationRepo::unread_count(&state.pool, auth.user_id).await?;

    Ok(Json(serde_json::json!({
        "data": { "count": count }
    })))
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

/// GET /api/v1/realtime/chat/{recipient_id}
///
/// The conversation between the authenticated user and `recipient_id`,
/// both directions, newest first.
pub async fn get_conversation(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(recipient_id): Path<DbId>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<Message>>>> {
    let messages = MessageRepo::conversation(
        &state.pool,
        auth.user_id,
        recipient_id,
        pagination.limit(),
        pagination.offset(),
    )
    .await?;

    Ok(Json(DataResponse { data: messages }))
}

/// POST /api/v1/realtime/chat/send
///
/// Send a direct message. The stored row is returned; delivery to the
/// recipient (WebSocket push + notification) happens through the
/// `message.received` event.
pub async fn send_message(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SendMessage>,
) -> AppResult<(StatusCode, Json<DataResponse<Message>>)> {
    input.validate()?;

    if input.recipient_id == auth.user_id {
        return Err(AppError::Core(CoreError::Validation(
            "Cannot send a message to yourself".into(),
        )));
    }

    let recipient = UserRepo::find_by_id(&state.pool, input.recipient_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: input.recipient_id,
        }))?;

    let sender = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;

    let message =
        MessageRepo::create(&state.pool, auth.user_id, recipient.id, &input.content).await?;

    // Truncate the preview for the notification row.
    let preview: String = message.content.chars().take(120).collect();

    state.event_bus.publish(
        PlatformEvent::new(EVENT_MESSAGE_RECEIVED)
            .with_source("message", message.id)
            .with_actor(auth.user_id)
            .with_payload(serde_json::json!({
                "recipient_id": recipient.id,
                "sender_username": sender.username,
                "preview": preview,
                "message": message,
            })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: message })))
}

// ---------------------------------------------------------------------------
// Profile views
// ---------------------------------------------------------------------------

/// POST /api/v1/realtime/profile-view
///
/// Record that the authenticated user viewed another user's profile,
/// so the viewed professional gets a `profile_viewed` notification.
pub async fn record_profile_view(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ProfileViewRequest>,
) -> AppResult<StatusCode> {
    if input.user_id == auth.user_id {
        // Viewing your own profile is not notable.
        return Ok(StatusCode::ACCEPTED);
    }

    let viewed = UserRepo::find_by_id(&state.pool, input.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: input.user_id,
        }))?;

    let viewer = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;

    state.event_bus.publish(
        PlatformEvent::new(EVENT_PROFILE_VIEWED)
            .with_source("user", viewed.id)
            .with_actor(viewer.id)
            .with_payload(serde_json::json!({
                "viewed_user_id": viewed.id,
                "viewer_username": viewer.username,
            })),
    );

    Ok(StatusCode::ACCEPTED)
}
