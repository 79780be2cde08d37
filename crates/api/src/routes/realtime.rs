//! Route definitions for the `/realtime` resource: the REST fallback
//! mirroring what the WebSocket channel pushes.
//!
//! All endpoints require authentication.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::realtime;
use crate::state::AppState;

/// Routes mounted at `/realtime`.
///
/// ```text
/// GET  /notifications                 -> list_notifications
/// POST /notifications/read-all        -> mark_all_read
/// GET  /notifications/unread-count    -> unread_count
/// PUT  /notifications/{id}/read       -> mark_read
/// GET  /chat/{recipient_id}           -> get_conversation
/// POST /chat/send                     -> send_message
/// POST /profile-view                  -> record_profile_view
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        // Notification center fallback
        .route("/notifications", get(realtime::list_notifications))
        .route("/notifications/read-all", post(realtime::mark_all_read))
        .route("/notifications/unread-count", get(realtime::unread_count))
        .route("/notifications/{id}/read", put(realtime::mark_read))
        // Chat
        .route("/chat/send", post(realtime::send_message))
        .route("/chat/{recipient_id}", get(realtime::get_conversation))
        // Profile views
        .route("/profile-view", post(realtime::record_profile_view))
}
