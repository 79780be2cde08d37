//! HTTP-level integration tests for the job-alert flow: CRUD,
//! check-matches, and send-test.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, delete_auth, get_auth, post_auth, post_json_auth, put_json_auth, register,
};
use sqlx::PgPool;

/// Post a job as the given pharmacy and return its id.
async fn post_job(pool: &PgPool, token: &str, position: &str, salary: (i64, i64)) -> i64 {
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/jobs",
        token,
        serde_json::json!({
            "title": format!("{position} wanted"),
            "position": position,
            "location_city": "Harare",
            "location_province": "Harare",
            "employment_type": "full_time",
            "salary_min": salary.0,
            "salary_max": salary.1,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn create_and_list_alerts(pool: PgPool) {
    let (_, token) = register(&pool, "tariro", "professional").await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/job-alerts",
        &token,
        serde_json::json!({
            "name": "Harare pharmacist roles",
            "positions": ["Pharmacist"],
            "locations": ["Harare"],
            "frequency": "daily",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["data"]["name"], "Harare pharmacist roles");
    assert_eq!(created["data"]["total_matches"], 0);

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/job-alerts", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn deleted_alert_disappears_from_listing(pool: PgPool) {
    let (_, token) = register(&pool, "tariro", "professional").await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/job-alerts",
        &token,
        serde_json::json!({ "name": "short lived" }),
    )
    .await;
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/v1/job-alerts/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/job-alerts", &token).await;
    let json = body_json(response).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn update_rejects_bad_settings(pool: PgPool) {
    let (_, token) = register(&pool, "tariro", "professional").await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/job-alerts",
        &token,
        serde_json::json!({ "name": "my alert" }),
    )
    .await;
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();

    for body in [
        serde_json::json!({ "frequency": "hourly" }),
        serde_json::json!({ "notification_method": "pigeon" }),
        serde_json::json!({ "digest_time": "8am" }),
        serde_json::json!({ "salary_min": 900, "salary_max": 100 }),
    ] {
        let app = common::build_test_app(pool.clone());
        let response = put_json_auth(app, &format!("/api/v1/job-alerts/{id}"), &token, body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn alerts_are_invisible_to_other_users(pool: PgPool) {
    let (_, owner_token) = register(&pool, "tariro", "professional").await;
    let (_, other_token) = register(&pool, "rudo", "professional").await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/job-alerts",
        &owner_token,
        serde_json::json!({ "name": "mine" }),
    )
    .await;
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/v1/job-alerts/{id}"), &other_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = common::build_test_app(pool);
    let response = delete_auth(app, &format!("/api/v1/job-alerts/{id}"), &other_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// check-matches
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn check_matches_returns_matching_jobs_and_counts_new_ones(pool: PgPool) {
    let (_, pharmacy_token) = register(&pool, "greenfields", "pharmacy").await;
    let (_, token) = register(&pool, "tariro", "professional").await;

    let matching_job = post_job(&pool, &pharmacy_token, "Pharmacist", (500, 1000)).await;
    post_job(&pool, &pharmacy_token, "Dispensary Assistant", (300, 400)).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/job-alerts",
        &token,
        serde_json::json!({
            "name": "pharmacists 600-900",
            "positions": ["Pharmacist"],
            "salary_min": 600,
            "salary_max": 900,
        }),
    )
    .await;
    let alert_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = post_auth(
        app,
        &format!("/api/v1/job-alerts/{alert_id}/check-matches"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    let jobs = json["data"]["jobs"].as_array().unwrap();
    assert_eq!(jobs.len(), 1, "only the overlapping pharmacist job matches");
    assert_eq!(jobs[0]["id"].as_i64().unwrap(), matching_job);
    assert_eq!(json["data"]["new_matches"], 1);

    // Re-running finds the same job but enqueues nothing new.
    let app = common::build_test_app(pool.clone());
    let response = post_auth(
        app,
        &format!("/api/v1/job-alerts/{alert_id}/check-matches"),
        &token,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["jobs"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"]["new_matches"], 0);

    // The counter reflects the single queued match.
    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/v1/job-alerts/{alert_id}"), &token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["total_matches"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn check_matches_with_no_matching_jobs_is_empty_not_an_error(pool: PgPool) {
    let (_, token) = register(&pool, "tariro", "professional").await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/job-alerts",
        &token,
        serde_json::json!({ "name": "nothing yet", "positions": ["Pharmacist"] }),
    )
    .await;
    let alert_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let response = post_auth(
        app,
        &format!("/api/v1/job-alerts/{alert_id}/check-matches"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["jobs"].as_array().unwrap().is_empty());
    assert_eq!(json["data"]["new_matches"], 0);
}

// ---------------------------------------------------------------------------
// send-test
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn send_test_without_smtp_configured_returns_409(pool: PgPool) {
    let (_, token) = register(&pool, "tariro", "professional").await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/job-alerts",
        &token,
        serde_json::json!({ "name": "instant alert", "frequency": "instant" }),
    )
    .await;
    let alert_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    // The test app has no SMTP configuration, so the endpoint refuses
    // rather than pretending to have sent something.
    let app = common::build_test_app(pool);
    let response = post_auth(
        app,
        &format!("/api/v1/job-alerts/{alert_id}/send-test"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
