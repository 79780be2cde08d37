//! Integration tests for the matcher: criteria → jobs (forward),
//! job → alerts (reverse), the pending-match queue, and the digest claim.

mod common;

use chrono::{Duration, Utc};
use common::{alert_input, job_input, seed_alert, seed_job, seed_user};
use pharmhub_core::alert::AlertCriteria;
use pharmhub_db::repositories::{JobAlertRepo, JobRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Forward matching: criteria → jobs
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn position_criteria_returns_exactly_the_matching_job(pool: PgPool) {
    let pharmacy = seed_user(&pool, "greenfields", "pharmacy").await;
    let pharmacist_job = seed_job(&pool, pharmacy, &job_input("Pharmacist", "Harare", "Harare")).await;
    seed_job(&pool, pharmacy, &job_input("Dispensary Assistant", "Harare", "Harare")).await;

    let criteria = AlertCriteria {
        positions: vec!["Pharmacist".to_string()],
        ..Default::default()
    };
    let matches = JobRepo::find_matching(&pool, &criteria, None).await.unwrap();

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].id, pharmacist_job);
}

#[sqlx::test(migrations = "./migrations")]
async fn position_matching_is_case_insensitive(pool: PgPool) {
    let pharmacy = seed_user(&pool, "greenfields", "pharmacy").await;
    seed_job(&pool, pharmacy, &job_input("Pharmacist", "Harare", "Harare")).await;

    let criteria = AlertCriteria {
        positions: vec!["pharmacist".to_string()],
        ..Default::default()
    };
    let matches = JobRepo::find_matching(&pool, &criteria, None).await.unwrap();
    assert_eq!(matches.len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn salary_overlap_matches_and_rejects(pool: PgPool) {
    let pharmacy = seed_user(&pool, "greenfields", "pharmacy").await;
    let mut input = job_input("Pharmacist", "Harare", "Harare");
    input.salary_min = Some(500);
    input.salary_max = Some(1000);
    seed_job(&pool, pharmacy, &input).await;

    // Alert 600–900 overlaps 500–1000.
    let overlapping = AlertCriteria {
        salary_min: Some(600),
        salary_max: Some(900),
        ..Default::default()
    };
    let matches = JobRepo::find_matching(&pool, &overlapping, None)
        .await
        .unwrap();
    assert_eq!(matches.len(), 1);

    // Alert capped at 400 does not reach the job's 500 floor.
    let too_low = AlertCriteria {
        salary_max: Some(400),
        ..Default::default()
    };
    let matches = JobRepo::find_matching(&pool, &too_low, None).await.unwrap();
    assert!(matches.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn location_matches_city_or_province(pool: PgPool) {
    let pharmacy = seed_user(&pool, "greenfields", "pharmacy").await;
    seed_job(&pool, pharmacy, &job_input("Pharmacist", "Kwekwe", "Midlands")).await;

    for location in ["Kwekwe", "midlands"] {
        let criteria = AlertCriteria {
            locations: vec![location.to_string()],
            ..Default::default()
        };
        let matches = JobRepo::find_matching(&pool, &criteria, None).await.unwrap();
        assert_eq!(matches.len(), 1, "location {location} should match");
    }

    let elsewhere = AlertCriteria {
        locations: vec!["Bulawayo".to_string()],
        ..Default::default()
    };
    let matches = JobRepo::find_matching(&pool, &elsewhere, None).await.unwrap();
    assert!(matches.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn dimensions_are_and_combined(pool: PgPool) {
    let pharmacy = seed_user(&pool, "greenfields", "pharmacy").await;
    seed_job(&pool, pharmacy, &job_input("Pharmacist", "Harare", "Harare")).await;

    // Position matches but employment type does not.
    let criteria = AlertCriteria {
        positions: vec!["Pharmacist".to_string()],
        employment_types: vec!["locum".to_string()],
        ..Default::default()
    };
    let matches = JobRepo::find_matching(&pool, &criteria, None).await.unwrap();
    assert!(matches.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn closed_and_expired_jobs_never_match(pool: PgPool) {
    let pharmacy = seed_user(&pool, "greenfields", "pharmacy").await;

    let mut expired = job_input("Pharmacist", "Harare", "Harare");
    expired.expires_at = Some(Utc::now() - Duration::days(1));
    seed_job(&pool, pharmacy, &expired).await;

    let closed = seed_job(&pool, pharmacy, &job_input("Pharmacist", "Harare", "Harare")).await;
    sqlx::query("UPDATE jobs SET status = 'closed' WHERE id = $1")
        .bind(closed)
        .execute(&pool)
        .await
        .unwrap();

    let matches = JobRepo::find_matching(&pool, &AlertCriteria::default(), None)
        .await
        .unwrap();
    assert!(matches.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn empty_criteria_match_every_open_job(pool: PgPool) {
    let pharmacy = seed_user(&pool, "greenfields", "pharmacy").await;
    seed_job(&pool, pharmacy, &job_input("Pharmacist", "Harare", "Harare")).await;
    seed_job(&pool, pharmacy, &job_input("Pharmacy Technician", "Gweru", "Midlands")).await;

    let matches = JobRepo::find_matching(&pool, &AlertCriteria::default(), None)
        .await
        .unwrap();
    assert_eq!(matches.len(), 2);
}

// ---------------------------------------------------------------------------
// Reverse matching: job → alerts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn reverse_match_mirrors_forward_semantics(pool: PgPool) {
    let owner = seed_user(&pool, "tariro", "professional").await;
    let pharmacy = seed_user(&pool, "greenfields", "pharmacy").await;

    let mut matching = alert_input("pharmacist in harare");
    matching.positions = vec!["pharmacist".to_string()];
    matching.locations = vec!["harare".to_string()];
    let matching_id = seed_alert(&pool, owner, &matching).await;

    let mut wrong_position = alert_input("locum techs");
    wrong_position.positions = vec!["Pharmacy Technician".to_string()];
    seed_alert(&pool, owner, &wrong_position).await;

    let mut salary_capped = alert_input("low budget");
    salary_capped.salary_max = Some(400);
    seed_alert(&pool, owner, &salary_capped).await;

    let mut input = job_input("Pharmacist", "Harare", "Harare");
    input.salary_min = Some(500);
    input.salary_max = Some(1000);
    let job_id = seed_job(&pool, pharmacy, &input).await;
    let job = JobRepo::find_by_id(&pool, job_id).await.unwrap().unwrap();

    let alerts = JobAlertRepo::find_matching_alerts(&pool, &job).await.unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].id, matching_id);
}

#[sqlx::test(migrations = "./migrations")]
async fn inactive_alerts_are_skipped_by_reverse_match(pool: PgPool) {
    let owner = seed_user(&pool, "tariro", "professional").await;
    let pharmacy = seed_user(&pool, "greenfields", "pharmacy").await;

    let mut paused = alert_input("paused");
    paused.is_active = Some(false);
    seed_alert(&pool, owner, &paused).await;

    let job_id = seed_job(&pool, pharmacy, &job_input("Pharmacist", "Harare", "Harare")).await;
    let job = JobRepo::find_by_id(&pool, job_id).await.unwrap().unwrap();

    let alerts = JobAlertRepo::find_matching_alerts(&pool, &job).await.unwrap();
    assert!(alerts.is_empty());
}

// ---------------------------------------------------------------------------
// Pending-match queue
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn enqueue_is_deduplicated_and_drain_empties_the_queue(pool: PgPool) {
    let owner = seed_user(&pool, "tariro", "professional").await;
    let pharmacy = seed_user(&pool, "greenfields", "pharmacy").await;
    let alert_id = seed_alert(&pool, owner, &alert_input("everything")).await;
    let job_id = seed_job(&pool, pharmacy, &job_input("Pharmacist", "Harare", "Harare")).await;

    assert!(JobAlertRepo::enqueue_match(&pool, alert_id, job_id).await.unwrap());
    // Re-matching the same job is a no-op.
    assert!(!JobAlertRepo::enqueue_match(&pool, alert_id, job_id).await.unwrap());

    let pending = JobAlertRepo::pending_jobs(&pool, alert_id).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, job_id);

    let drained = JobAlertRepo::drain_queue(&pool, alert_id).await.unwrap();
    assert_eq!(drained, 1);
    assert!(JobAlertRepo::pending_jobs(&pool, alert_id).await.unwrap().is_empty());

    // Draining again is a no-op.
    assert_eq!(JobAlertRepo::drain_queue(&pool, alert_id).await.unwrap(), 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn counters_increase_monotonically(pool: PgPool) {
    let owner = seed_user(&pool, "tariro", "professional").await;
    let alert_id = seed_alert(&pool, owner, &alert_input("everything")).await;

    JobAlertRepo::record_matches(&pool, alert_id, 3).await.unwrap();
    JobAlertRepo::record_notification_sent(&pool, alert_id).await.unwrap();
    JobAlertRepo::record_matches(&pool, alert_id, 2).await.unwrap();

    let alert = JobAlertRepo::find_for_owner(&pool, alert_id, owner)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(alert.total_matches, 5);
    assert_eq!(alert.total_notifications_sent, 1);
    assert!(alert.last_job_matched_at.is_some());
}

// ---------------------------------------------------------------------------
// Digest claim (duplicate-send protection)
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn digest_claim_wins_once_per_window(pool: PgPool) {
    let owner = seed_user(&pool, "tariro", "professional").await;
    let alert_id = seed_alert(&pool, owner, &alert_input("daily digest")).await;

    let window_start = Utc::now() - Duration::hours(1);

    // First claim for this window wins; the second loses.
    assert!(JobAlertRepo::claim_digest(&pool, alert_id, window_start).await.unwrap());
    assert!(!JobAlertRepo::claim_digest(&pool, alert_id, window_start).await.unwrap());

    // A later window can be claimed again.
    let next_window = Utc::now() + Duration::hours(23);
    assert!(JobAlertRepo::claim_digest(&pool, alert_id, next_window).await.unwrap());
}

// ---------------------------------------------------------------------------
// Alert CRUD basics
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn alerts_are_owner_scoped(pool: PgPool) {
    let owner = seed_user(&pool, "tariro", "professional").await;
    let other = seed_user(&pool, "rudo", "professional").await;
    let alert_id = seed_alert(&pool, owner, &alert_input("mine")).await;

    assert!(JobAlertRepo::find_for_owner(&pool, alert_id, other)
        .await
        .unwrap()
        .is_none());
    assert!(!JobAlertRepo::delete(&pool, alert_id, other).await.unwrap());
    assert!(JobAlertRepo::delete(&pool, alert_id, owner).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn deleted_alert_disappears_from_listing(pool: PgPool) {
    let owner = seed_user(&pool, "tariro", "professional").await;
    let alert_id = seed_alert(&pool, owner, &alert_input("short lived")).await;

    assert_eq!(JobAlertRepo::list_for_owner(&pool, owner).await.unwrap().len(), 1);

    JobAlertRepo::delete(&pool, alert_id, owner).await.unwrap();

    assert!(JobAlertRepo::list_for_owner(&pool, owner).await.unwrap().is_empty());
}
