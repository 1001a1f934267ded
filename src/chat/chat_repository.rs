use crate::{
    chat::{
        attachment::Attachment,
        chat_dto::ChatSummary,
        chat_models::{Chat, Message},
    },
    error::Result,
};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct ChatRepository {
    pool: PgPool,
}

impl ChatRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Chat>> {
        let chat = sqlx::query_as::<_, Chat>("SELECT * FROM chats WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(chat)
    }

    /// Membership is symmetric; the pair is matched in either column order.
    pub async fn find_by_pair(&self, a: Uuid, b: Uuid) -> Result<Option<Chat>> {
        let chat = sqlx::query_as::<_, Chat>(
            "SELECT * FROM chats
             WHERE (user1_id = $1 AND user2_id = $2)
                OR (user1_id = $2 AND user2_id = $1)",
        )
        .bind(a)
        .bind(b)
        .fetch_optional(&self.pool)
        .await?;
        Ok(chat)
    }

    pub async fn create(&self, user1_id: Uuid, user2_id: Uuid) -> Result<Chat> {
        let chat = sqlx::query_as::<_, Chat>(
            "INSERT INTO chats (user1_id, user2_id)
             VALUES ($1, $2)
             RETURNING *",
        )
        .bind(user1_id)
        .bind(user2_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(chat)
    }

    /// One aggregate query instead of a per-chat fan-out: counterparty,
    /// latest message and unread count for every chat the user is in.
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<ChatSummary>> {
        let summaries = sqlx::query_as::<_, ChatSummary>(
            "SELECT
                c.id AS chat_id,
                CASE WHEN c.user1_id = $1 THEN c.user2_id ELSE c.user1_id END AS other_user_id,
                u.username,
                u.avatar_url,
                lm.content AS last_message,
                lm.created_at AS last_message_time,
                COALESCE(uc.unread_count, 0) AS unread_count
             FROM chats c
             JOIN users u
               ON u.id = CASE WHEN c.user1_id = $1 THEN c.user2_id ELSE c.user1_id END
             LEFT JOIN LATERAL (
                 SELECT content, created_at FROM messages m
                 WHERE m.chat_id = c.id
                 ORDER BY created_at DESC
                 LIMIT 1
             ) lm ON true
             LEFT JOIN LATERAL (
                 SELECT COUNT(*) AS unread_count FROM messages m
                 WHERE m.chat_id = c.id AND m.receiver_id = $1 AND m.is_read = false
             ) uc ON true
             WHERE c.user1_id = $1 OR c.user2_id = $1
             ORDER BY lm.created_at DESC NULLS LAST",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(summaries)
    }

    /// Inserts a message, writing the attachment in both encodings so either
    /// can be treated as authoritative on read.
    pub async fn create_message(
        &self,
        chat_id: Uuid,
        sender_id: Uuid,
        receiver_id: Uuid,
        content: &str,
        client_ref: Option<Uuid>,
        attachment: Option<&Attachment>,
    ) -> Result<Message> {
        let attachment_json = attachment
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| crate::error::AppError::Validation(e.to_string()))?;

        let message = sqlx::query_as::<_, Message>(
            "INSERT INTO messages
                (chat_id, sender_id, receiver_id, content, client_ref,
                 attachment, attachment_name, attachment_type, attachment_url, attachment_size)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING *",
        )
        .bind(chat_id)
        .bind(sender_id)
        .bind(receiver_id)
        .bind(content)
        .bind(client_ref)
        .bind(attachment_json)
        .bind(attachment.map(|a| a.name.as_str()))
        .bind(attachment.map(|a| a.mime_type.as_str()))
        .bind(attachment.map(|a| a.url.as_str()))
        .bind(attachment.map(|a| a.size))
        .fetch_one(&self.pool)
        .await?;

        Ok(message)
    }

    pub async fn list_messages(
        &self,
        chat_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Message>> {
        let messages = sqlx::query_as::<_, Message>(
            "SELECT * FROM messages
             WHERE chat_id = $1
             ORDER BY created_at ASC
             LIMIT $2 OFFSET $3",
        )
        .bind(chat_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    /// Batch read-flip for everything the reader has not yet seen.
    pub async fn mark_chat_read(&self, chat_id: Uuid, reader_id: Uuid) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE messages
             SET is_read = true
             WHERE chat_id = $1 AND receiver_id = $2 AND is_read = false",
        )
        .bind(chat_id)
        .bind(reader_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
