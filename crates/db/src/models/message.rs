//! Chat message models and DTOs.

use pharmhub_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `messages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Message {
    pub id: DbId,
    pub sender_id: DbId,
    pub recipient_id: DbId,
    pub content: String,
    pub created_at: Timestamp,
}

/// DTO for `POST /api/v1/realtime/chat/send`.
#[derive(Debug, Deserialize, Validate)]
pub struct SendMessage {
    pub recipient_id: DbId,
    #[validate(length(min = 1, max = 2000))]
    pub content: String,
}
