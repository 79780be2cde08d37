//! Repository for the `messages` table (direct chat).

use pharmhub_core::types::DbId;
use sqlx::PgPool;

use crate::models::message::Message;

/// Column list for `messages` queries.
const COLUMNS: &str = "id, sender_id, recipient_id, content, created_at";

/// Provides operations for direct messages between two users.
pub struct MessageRepo;

impl MessageRepo {
    /// Insert a message, returning the created row.
    pub async fn create(
        pool: &PgPool,
        sender_id: DbId,
        recipient_id: DbId,
        content: &str,
    ) -> Result<Message, sqlx::Error> {
        let query = format!(
            "INSERT INTO messages (sender_id, recipient_id, content) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(sender_id)
            .bind(recipient_id)
            .bind(content)
            .fetch_one(pool)
            .await
    }

    /// The conversation between two users in both directions, newest first.
    pub async fn conversation(
        pool: &PgPool,
        user_id: DbId,
        other_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Message>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM messages \
             WHERE (sender_id = $1 AND recipient_id = $2) \
                OR (sender_id = $2 AND recipient_id = $1) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(user_id)
            .bind(other_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
