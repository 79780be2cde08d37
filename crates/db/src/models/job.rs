//! Job posting entity models and DTOs.

use pharmhub_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `jobs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Job {
    pub id: DbId,
    pub pharmacy_id: DbId,
    pub title: String,
    pub position: String,
    pub description: String,
    pub location_city: String,
    pub location_province: String,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub salary_currency: String,
    pub employment_type: String,
    pub is_featured: bool,
    pub featured_until: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for posting a new job via `POST /api/v1/jobs`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateJob {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 120))]
    pub position: String,
    #[serde(default)]
    pub description: String,
    #[validate(length(min = 1, max = 120))]
    pub location_city: String,
    #[validate(length(min = 1, max = 120))]
    pub location_province: String,
    #[validate(range(min = 0))]
    pub salary_min: Option<i64>,
    #[validate(range(min = 0))]
    pub salary_max: Option<i64>,
    pub salary_currency: Option<String>,
    pub employment_type: String,
    pub is_featured: Option<bool>,
    pub featured_until: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
}

/// DTO for updating a job. Only non-`None` fields are applied.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateJob {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 120))]
    pub position: Option<String>,
    pub description: Option<String>,
    pub location_city: Option<String>,
    pub location_province: Option<String>,
    #[validate(range(min = 0))]
    pub salary_min: Option<i64>,
    #[validate(range(min = 0))]
    pub salary_max: Option<i64>,
    pub salary_currency: Option<String>,
    pub employment_type: Option<String>,
    pub is_featured: Option<bool>,
    pub featured_until: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
    pub status: Option<String>,
}

/// Query parameters for `GET /api/v1/jobs`.
#[derive(Debug, Deserialize)]
pub struct JobListQuery {
    /// Filter by position title (case-insensitive exact match).
    pub position: Option<String>,
    /// Filter by province (case-insensitive exact match).
    pub province: Option<String>,
    /// Filter by employment type.
    pub employment_type: Option<String>,
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}
