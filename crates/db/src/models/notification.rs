//! Notification entity models.

use pharmhub_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    pub notification_type: String,
    pub title: String,
    pub content: String,
    pub action_url: Option<String>,
    pub is_read: bool,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// Parameters for inserting a notification. Only server-side event
/// routing creates notifications; there is no client-facing create DTO.
#[derive(Debug, Clone)]
pub struct CreateNotification {
    pub user_id: DbId,
    pub notification_type: String,
    pub title: String,
    pub content: String,
    pub action_url: Option<String>,
}
