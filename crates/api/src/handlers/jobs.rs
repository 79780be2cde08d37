//! Handlers for the `/jobs` resource.
//!
//! Listing and reading are public; posting, updating, and deleting
//! require a pharmacy account and are scoped to the posting pharmacy.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use pharmhub_core::error::CoreError;
use pharmhub_core::events::EVENT_JOB_POSTED;
use pharmhub_core::jobs::is_valid_employment_type;
use pharmhub_core::types::DbId;
use pharmhub_db::models::job::{CreateJob, Job, JobListQuery, UpdateJob};
use pharmhub_db::repositories::JobRepo;
use pharmhub_events::PlatformEvent;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::{DEFAULT_LIMIT, MAX_LIMIT};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/jobs
///
/// Public listing of open jobs with optional filters, featured first.
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(params): Query<JobListQuery>,
) -> AppResult<Json<DataResponse<Vec<Job>>>> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = params.offset.unwrap_or(0).max(0);

    let jobs = JobRepo::list(
        &state.pool,
        params.position.as_deref(),
        params.province.as_deref(),
        params.employment_type.as_deref(),
        limit,
        offset,
    )
    .await?;

    Ok(Json(DataResponse { data: jobs }))
}

/// GET /api/v1/jobs/{id}
///
/// Public read of a single job posting.
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Job>>> {
    let job = JobRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Job", id }))?;

    Ok(Json(DataResponse { data: job }))
}

/// POST /api/v1/jobs
///
/// Post a new job. Pharmacy accounts only. Publishes `job.posted` so
/// the notification router can match it against saved alerts.
pub async fn create_job(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateJob>,
) -> AppResult<(StatusCode, Json<DataResponse<Job>>)> {
    auth.require_pharmacy()?;
    input.validate()?;
    if !is_valid_employment_type(&input.employment_type) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Unknown employment type: {}",
            input.employment_type
        ))));
    }
    if let (Some(min), Some(max)) = (input.salary_min, input.salary_max) {
        if min > max {
            return Err(AppError::Core(CoreError::Validation(
                "salary_min must not exceed salary_max".into(),
            )));
        }
    }

    let job = JobRepo::create(&state.pool, auth.user_id, &input).await?;

    state.event_bus.publish(
        PlatformEvent::new(EVENT_JOB_POSTED)
            .with_source("job", job.id)
            .with_actor(auth.user_id)
            .with_payload(serde_json::json!({
                "title": job.title,
                "position": job.position,
            })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: job })))
}

/// PUT /api/v1/jobs/{id}
///
/// Update a job posting. Only the posting pharmacy may update it.
pub async fn update_job(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateJob>,
) -> AppResult<Json<DataResponse<Job>>> {
    auth.require_pharmacy()?;
    input.validate()?;
    if let Some(et) = &input.employment_type {
        if !is_valid_employment_type(et) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Unknown employment type: {et}"
            ))));
        }
    }

    let job = JobRepo::update(&state.pool, id, auth.user_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Job", id }))?;

    Ok(Json(DataResponse { data: job }))
}

/// DELETE /api/v1/jobs/{id}
///
/// Delete a job posting. Only the posting pharmacy may delete it.
pub async fn delete_job(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    auth.require_pharmacy()?;

    let deleted = JobRepo::delete(&state.pool, id, auth.user_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound { entity: "Job", id }));
    }

    Ok(StatusCode::NO_CONTENT)
}
