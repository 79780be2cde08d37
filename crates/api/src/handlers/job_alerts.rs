//! Handlers for the `/job-alerts` resource.
//!
//! Alerts are strictly owner-scoped: every query carries the
//! authenticated user's id, so one user can never read or mutate
//! another's alerts.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveTime;
use pharmhub_core::alert::{is_valid_frequency, is_valid_method};
use pharmhub_core::error::CoreError;
use pharmhub_core::types::DbId;
use pharmhub_db::models::job::Job;
use pharmhub_db::models::job_alert::{CreateJobAlert, JobAlert, UpdateJobAlert};
use pharmhub_db::repositories::{JobAlertRepo, JobRepo, UserRepo};
use serde::Serialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Response payload for `POST /job-alerts/{id}/check-matches`.
#[derive(Debug, Serialize)]
pub struct CheckMatchesResponse {
    /// Every job currently matching the alert's criteria.
    pub jobs: Vec<Job>,
    /// How many of them were new (added to the pending queue).
    pub new_matches: i64,
}

/// Response payload for `POST /job-alerts/{id}/send-test`.
#[derive(Debug, Serialize)]
pub struct SendTestResponse {
    pub email_sent: bool,
    pub sms_sent: bool,
    pub job_count: usize,
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

/// Check the notification settings strings an alert may carry.
fn validate_settings(
    frequency: Option<&str>,
    method: Option<&str>,
    digest_time: Option<&str>,
) -> Result<(), AppError> {
    if let Some(f) = frequency {
        if !is_valid_frequency(f) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Unknown frequency: {f}"
            ))));
        }
    }
    if let Some(m) = method {
        if !is_valid_method(m) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Unknown notification method: {m}"
            ))));
        }
    }
    if let Some(t) = digest_time {
        if NaiveTime::parse_from_str(t, "%H:%M").is_err() {
            return Err(AppError::Core(CoreError::Validation(format!(
                "digest_time must be HH:MM, got: {t}"
            ))));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/job-alerts
///
/// List the authenticated user's alerts, newest first.
pub async fn list_alerts(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<JobAlert>>>> {
    let alerts = JobAlertRepo::list_for_owner(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: alerts }))
}

/// POST /api/v1/job-alerts
///
/// Create a new alert for the authenticated user.
pub async fn create_alert(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateJobAlert>,
) -> AppResult<(StatusCode, Json<DataResponse<JobAlert>>)> {
    input.validate()?;
    input.criteria().validate().map_err(AppError::Core)?;
    validate_settings(
        input.frequency.as_deref(),
        input.notification_method.as_deref(),
        input.digest_time.as_deref(),
    )?;

    let alert = JobAlertRepo::create(&state.pool, auth.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: alert })))
}

/// GET /api/v1/job-alerts/{id}
pub async fn get_alert(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<JobAlert>>> {
    let alert = JobAlertRepo::find_for_owner(&state.pool, id, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "JobAlert",
            id,
        }))?;
    Ok(Json(DataResponse { data: alert }))
}

/// PUT /api/v1/job-alerts/{id}
///
/// Update an alert. Only non-`None` fields are applied.
pub async fn update_alert(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateJobAlert>,
) -> AppResult<Json<DataResponse<JobAlert>>> {
    input.validate()?;
    validate_settings(
        input.frequency.as_deref(),
        input.notification_method.as_deref(),
        input.digest_time.as_deref(),
    )?;
    if let (Some(min), Some(max)) = (input.salary_min, input.salary_max) {
        if min > max {
            return Err(AppError::Core(CoreError::Validation(
                "salary_min must not exceed salary_max".into(),
            )));
        }
    }

    let alert = JobAlertRepo::update(&state.pool, id, auth.user_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "JobAlert",
            id,
        }))?;
    Ok(Json(DataResponse { data: alert }))
}

/// DELETE /api/v1/job-alerts/{id}
pub async fn delete_alert(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = JobAlertRepo::delete(&state.pool, id, auth.user_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "JobAlert",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// POST /api/v1/job-alerts/{id}/check-matches
///
/// Run the matcher now. Matching jobs are returned and any new ones are
/// added to the alert's pending queue with the counters bumped. Zero
/// matches is an empty result, not an error.
pub async fn check_matches(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CheckMatchesResponse>>> {
    let alert = JobAlertRepo::find_for_owner(&state.pool, id, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "JobAlert",
            id,
        }))?;

    let jobs = JobRepo::find_matching(&state.pool, &alert.criteria(), None).await?;

    let mut new_matches = 0i64;
    for job in &jobs {
        if JobAlertRepo::enqueue_match(&state.pool, alert.id, job.id).await? {
            new_matches += 1;
        }
    }
    if new_matches > 0 {
        JobAlertRepo::record_matches(&state.pool, alert.id, new_matches).await?;
    }

    Ok(Json(DataResponse {
        data: CheckMatchesResponse { jobs, new_matches },
    }))
}

/// POST /api/v1/job-alerts/{id}/send-test
///
/// Dispatch a test digest right now, independent of the schedule.
/// Counters and the pending queue are left untouched.
pub async fn send_test(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<SendTestResponse>>> {
    let alert = JobAlertRepo::find_for_owner(&state.pool, id, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "JobAlert",
            id,
        }))?;

    if !state.notifier.email_configured() {
        return Err(AppError::Core(CoreError::Conflict(
            "Email delivery is not configured on this server".into(),
        )));
    }

    let owner = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;

    let jobs = JobRepo::find_matching(&state.pool, &alert.criteria(), None).await?;
    let outcome = state.notifier.dispatch_alert(&owner, &alert, &jobs).await;

    Ok(Json(DataResponse {
        data: SendTestResponse {
            email_sent: outcome.email_sent,
            sms_sent: outcome.sms_sent,
            job_count: jobs.len(),
        },
    }))
}
