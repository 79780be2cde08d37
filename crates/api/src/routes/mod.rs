pub mod auth;
pub mod health;
pub mod job_alerts;
pub mod jobs;
pub mod realtime;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                                              WebSocket (?token=)
///
/// /auth/register                                   register (public)
/// /auth/login                                      login (public)
/// /auth/refresh                                    refresh (public)
/// /auth/logout                                     logout (requires auth)
///
/// /jobs                                            list (public), create (pharmacy)
/// /jobs/{id}                                       get (public), update, delete
///
/// /job-alerts                                      list, create
/// /job-alerts/{id}                                 get, update, delete
/// /job-alerts/{id}/check-matches                   run matcher now (POST)
/// /job-alerts/{id}/send-test                       test dispatch (POST)
///
/// /realtime/notifications                          list (?unread_only, limit, offset)
/// /realtime/notifications/read-all                 mark all read (POST)
/// /realtime/notifications/unread-count             unread count (GET)
/// /realtime/notifications/{id}/read                mark read (PUT)
/// /realtime/chat/{recipient_id}                    conversation (GET)
/// /realtime/chat/send                              send message (POST)
/// /realtime/profile-view                           record profile view (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // WebSocket endpoint.
        .route("/ws", get(ws::ws_handler))
        // Authentication routes (register, login, refresh, logout).
        .nest("/auth", auth::router())
        // Job board.
        .nest("/jobs", jobs::router())
        // Saved job alerts and matching.
        .nest("/job-alerts", job_alerts::router())
        // Notification center fallback, chat, profile views.
        .nest("/realtime", realtime::router())
}
