//! Shared seed helpers for repository integration tests.

#![allow(dead_code)]

use pharmhub_core::types::DbId;
use pharmhub_db::models::job::CreateJob;
use pharmhub_db::models::job_alert::CreateJobAlert;
use pharmhub_db::models::user::CreateUser;
use pharmhub_db::repositories::{JobAlertRepo, JobRepo, UserRepo};
use sqlx::PgPool;

/// Insert a user with a throwaway password hash.
pub async fn seed_user(pool: &PgPool, username: &str, role: &str) -> DbId {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.co.zw"),
            phone: None,
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2VlZA$seedseedseedseed".to_string(),
            role: role.to_string(),
        },
    )
    .await
    .expect("seed user");
    user.id
}

/// A baseline open job posting; override fields after deserialization-free construction.
pub fn job_input(position: &str, city: &str, province: &str) -> CreateJob {
    CreateJob {
        title: format!("{position} wanted"),
        position: position.to_string(),
        description: String::new(),
        location_city: city.to_string(),
        location_province: province.to_string(),
        salary_min: None,
        salary_max: None,
        salary_currency: None,
        employment_type: "full_time".to_string(),
        is_featured: None,
        featured_until: None,
        expires_at: None,
    }
}

/// Insert a job posting for the given pharmacy.
pub async fn seed_job(pool: &PgPool, pharmacy_id: DbId, input: &CreateJob) -> DbId {
    JobRepo::create(pool, pharmacy_id, input)
        .await
        .expect("seed job")
        .id
}

/// A baseline alert DTO with no criteria.
pub fn alert_input(name: &str) -> CreateJobAlert {
    CreateJobAlert {
        name: name.to_string(),
        description: None,
        positions: vec![],
        locations: vec![],
        employment_types: vec![],
        salary_min: None,
        salary_max: None,
        notification_method: None,
        frequency: None,
        digest_time: None,
        digest_day: None,
        is_active: None,
    }
}

/// Insert an alert for the given owner.
pub async fn seed_alert(pool: &PgPool, owner_id: DbId, input: &CreateJobAlert) -> DbId {
    JobAlertRepo::create(pool, owner_id, input)
        .await
        .expect("seed alert")
        .id
}
