//! Route definitions for the `/job-alerts` resource.
//!
//! All endpoints require authentication and are owner-scoped.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::job_alerts;
use crate::state::AppState;

/// Routes mounted at `/job-alerts`.
///
/// ```text
/// GET    /                     -> list_alerts
/// POST   /                     -> create_alert
/// GET    /{id}                 -> get_alert
/// PUT    /{id}                 -> update_alert
/// DELETE /{id}                 -> delete_alert
/// POST   /{id}/check-matches   -> check_matches
/// POST   /{id}/send-test       -> send_test
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(job_alerts::list_alerts).post(job_alerts::create_alert),
        )
        .route(
            "/{id}",
            get(job_alerts::get_alert)
                .put(job_alerts::update_alert)
                .delete(job_alerts::delete_alert),
        )
        .route("/{id}/check-matches", post(job_alerts::check_matches))
        .route("/{id}/send-test", post(job_alerts::send_test))
}
