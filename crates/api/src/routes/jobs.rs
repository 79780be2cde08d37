//! Route definitions for the `/jobs` resource.
//!
//! Listing and reading are public; mutations require a pharmacy account.

use axum::routing::get;
use axum::Router;

use crate::handlers::jobs;
use crate::state::AppState;

/// Routes mounted at `/jobs`.
///
/// ```text
/// GET    /        -> list_jobs (public)
/// POST   /        -> create_job (pharmacy)
/// GET    /{id}    -> get_job (public)
/// PUT    /{id}    -> update_job (owning pharmacy)
/// DELETE /{id}    -> delete_job (owning pharmacy)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(jobs::list_jobs).post(jobs::create_job))
        .route(
            "/{id}",
            get(jobs::get_job)
                .put(jobs::update_job)
                .delete(jobs::delete_job),
        )
}
