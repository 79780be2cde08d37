//! Job alert entity models and DTOs.

use pharmhub_core::alert::AlertCriteria;
use pharmhub_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `job_alerts` table.
///
/// The criteria columns (`positions`, `locations`, `employment_types`,
/// salary bounds) are denormalized onto the row so the reverse matcher
/// can filter alerts in a single query.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct JobAlert {
    pub id: DbId,
    pub owner_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub positions: Vec<String>,
    pub locations: Vec<String>,
    pub employment_types: Vec<String>,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub notification_method: String,
    pub frequency: String,
    pub digest_time: String,
    pub digest_day: i16,
    pub is_active: bool,
    pub total_matches: i64,
    pub total_notifications_sent: i64,
    pub last_job_matched_at: Option<Timestamp>,
    pub last_digest_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl JobAlert {
    /// Assemble the matcher input from the row's criteria columns.
    pub fn criteria(&self) -> AlertCriteria {
        AlertCriteria {
            positions: self.positions.clone(),
            locations: self.locations.clone(),
            employment_types: self.employment_types.clone(),
            salary_min: self.salary_min,
            salary_max: self.salary_max,
        }
    }
}

/// DTO for creating a job alert via `POST /api/v1/job-alerts`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateJobAlert {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub positions: Vec<String>,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub employment_types: Vec<String>,
    #[validate(range(min = 0))]
    pub salary_min: Option<i64>,
    #[validate(range(min = 0))]
    pub salary_max: Option<i64>,
    /// `email`, `sms`, or `both`. Defaults to `email`.
    pub notification_method: Option<String>,
    /// `instant`, `daily`, or `weekly`. Defaults to `daily`.
    pub frequency: Option<String>,
    /// Digest delivery time, `HH:MM` in Central Africa Time. Defaults to `08:00`.
    pub digest_time: Option<String>,
    /// Digest day for weekly alerts, 0 = Monday … 6 = Sunday. Defaults to 0.
    #[validate(range(min = 0, max = 6))]
    pub digest_day: Option<i16>,
    pub is_active: Option<bool>,
}

impl CreateJobAlert {
    /// Assemble the matcher input from the DTO's criteria fields.
    pub fn criteria(&self) -> AlertCriteria {
        AlertCriteria {
            positions: self.positions.clone(),
            locations: self.locations.clone(),
            employment_types: self.employment_types.clone(),
            salary_min: self.salary_min,
            salary_max: self.salary_max,
        }
    }
}

/// DTO for updating a job alert. Only non-`None` fields are applied.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateJobAlert {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub positions: Option<Vec<String>>,
    pub locations: Option<Vec<String>>,
    pub employment_types: Option<Vec<String>>,
    #[validate(range(min = 0))]
    pub salary_min: Option<i64>,
    #[validate(range(min = 0))]
    pub salary_max: Option<i64>,
    pub notification_method: Option<String>,
    pub frequency: Option<String>,
    pub digest_time: Option<String>,
    #[validate(range(min = 0, max = 6))]
    pub digest_day: Option<i16>,
    pub is_active: Option<bool>,
}
