//! Message Repository Implementation
//!
//! PostgreSQL implementation of the room message log with keyset pagination
//! over `(timestamp, id)`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Message, MessagePage, MessageRepository, MessageType};
use crate::shared::error::AppError;

/// PostgreSQL message repository implementation.
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    /// Creates a new PgMessageRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Internal row type for message queries.
#[derive(Debug, sqlx::FromRow)]
struct MessageRow {
    id: i64,
    chat_room_id: i64,
    sender_id: i64,
    content: Option<String>,
    file_url: Option<String>,
    file_type: Option<String>,
    message_type: String,
    timestamp: DateTime<Utc>,
}

impl MessageRow {
    /// Converts database row to domain Message entity.
    fn into_message(self) -> Message {
        Message {
            id: self.id,
            chat_room_id: self.chat_room_id,
            sender_id: self.sender_id,
            content: self.content,
            file_url: self.file_url,
            file_type: self.file_type,
            message_type: MessageType::parse(&self.message_type).unwrap_or_default(),
            timestamp: self.timestamp,
        }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    async fn create(&self, message: &Message) -> Result<Message, AppError> {
        let row = sqlx::query_as::<_, MessageRow>(
            r#"
            INSERT INTO messages (id, chat_room_id, sender_id, content, file_url,
                                  file_type, message_type, timestamp)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, chat_room_id, sender_id, content, file_url,
                      file_type, message_type, timestamp
            "#,
        )
        .bind(message.id)
        .bind(message.chat_room_id)
        .bind(message.sender_id)
        .bind(&message.content)
        .bind(&message.file_url)
        .bind(&message.file_type)
        .bind(message.message_type.as_str())
        .bind(message.timestamp)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                AppError::NotFound(format!("Room with id {} not found", message.chat_room_id))
            }
            _ => AppError::Database(e),
        })?;

        Ok(row.into_message())
    }

    /// Messages of a room in ascending `(timestamp, id)` order.
    ///
    /// `after` is an exclusive message id cursor; an unknown cursor yields an
    /// empty page. Without a limit the whole remaining log is returned.
    async fn find_by_room(&self, room_id: i64, page: MessagePage) -> Result<Vec<Message>, AppError> {
        let page = page.normalized();

        let rows = match page.after {
            Some(after_id) => {
                sqlx::query_as::<_, MessageRow>(
                    r#"
                    SELECT m.id, m.chat_room_id, m.sender_id, m.content, m.file_url,
                           m.file_type, m.message_type, m.timestamp
                    FROM messages m
                    JOIN messages c ON c.id = $2 AND c.chat_room_id = $1
                    WHERE m.chat_room_id = $1
                      AND (m.timestamp, m.id) > (c.timestamp, c.id)
                    ORDER BY m.timestamp ASC, m.id ASC
                    LIMIT $3
                    "#,
                )
                .bind(room_id)
                .bind(after_id)
                .bind(page.limit)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, MessageRow>(
                    r#"
                    SELECT id, chat_room_id, sender_id, content, file_url,
                           file_type, message_type, timestamp
                    FROM messages
                    WHERE chat_room_id = $1
                    ORDER BY timestamp ASC, id ASC
                    LIMIT $2
                    "#,
                )
                .bind(room_id)
                .bind(page.limit)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.into_iter().map(|r| r.into_message()).collect())
    }

    async fn latest_timestamp(&self, room_id: i64) -> Result<Option<DateTime<Utc>>, AppError> {
        let latest = sqlx::query_scalar::<_, Option<DateTime<Utc>>>(
            "SELECT MAX(timestamp) FROM messages WHERE chat_room_id = $1",
        )
        .bind(room_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(latest)
    }
}
