//! Integration tests for the notification repository.

mod common;

use common::seed_user;
use pharmhub_db::models::notification::CreateNotification;
use pharmhub_db::repositories::NotificationRepo;
use sqlx::PgPool;

async fn seed_notification(pool: &PgPool, user_id: i64, title: &str) -> i64 {
    NotificationRepo::create(
        pool,
        &CreateNotification {
            user_id,
            notification_type: "job_match".to_string(),
            title: title.to_string(),
            content: "details".to_string(),
            action_url: None,
        },
    )
    .await
    .expect("seed notification")
    .id
}

#[sqlx::test(migrations = "./migrations")]
async fn mark_read_is_idempotent(pool: PgPool) {
    let user = seed_user(&pool, "tariro", "professional").await;
    let id = seed_notification(&pool, user, "New job match").await;

    // First read marks the row.
    assert!(NotificationRepo::mark_read(&pool, id, user).await.unwrap());

    let rows = NotificationRepo::list_for_user(&pool, user, false, 50, 0)
        .await
        .unwrap();
    let first_read_at = rows[0].read_at.expect("read_at set");
    assert!(rows[0].is_read);

    // Second read succeeds and does not disturb the original timestamp.
    assert!(NotificationRepo::mark_read(&pool, id, user).await.unwrap());

    let rows = NotificationRepo::list_for_user(&pool, user, false, 50, 0)
        .await
        .unwrap();
    assert!(rows[0].is_read);
    assert_eq!(rows[0].read_at, Some(first_read_at));
}

#[sqlx::test(migrations = "./migrations")]
async fn mark_read_is_owner_scoped(pool: PgPool) {
    let owner = seed_user(&pool, "tariro", "professional").await;
    let other = seed_user(&pool, "rudo", "professional").await;
    let id = seed_notification(&pool, owner, "Private").await;

    assert!(!NotificationRepo::mark_read(&pool, id, other).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn unread_count_and_mark_all_read(pool: PgPool) {
    let user = seed_user(&pool, "tariro", "professional").await;
    seed_notification(&pool, user, "one").await;
    seed_notification(&pool, user, "two").await;
    seed_notification(&pool, user, "three").await;

    assert_eq!(NotificationRepo::unread_count(&pool, user).await.unwrap(), 3);

    let marked = NotificationRepo::mark_all_read(&pool, user).await.unwrap();
    assert_eq!(marked, 3);
    assert_eq!(NotificationRepo::unread_count(&pool, user).await.unwrap(), 0);

    // Nothing left to mark.
    assert_eq!(NotificationRepo::mark_all_read(&pool, user).await.unwrap(), 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn unread_only_listing_filters_read_rows(pool: PgPool) {
    let user = seed_user(&pool, "tariro", "professional").await;
    let read_id = seed_notification(&pool, user, "seen").await;
    seed_notification(&pool, user, "fresh").await;

    NotificationRepo::mark_read(&pool, read_id, user).await.unwrap();

    let unread = NotificationRepo::list_for_user(&pool, user, true, 50, 0)
        .await
        .unwrap();
    assert_eq!(unread.len(), 1);
    assert_eq!(unread[0].title, "fresh");

    let all = NotificationRepo::list_for_user(&pool, user, false, 50, 0)
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
}
