use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::attachment::Attachment;

#[derive(Debug, Deserialize, ToSchema)]
pub struct OpenChatRequest {
    pub other_user_id: Uuid,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SendMessageRequest {
    /// May be empty when an attachment is present.
    #[validate(length(max = 4000))]
    pub content: String,
    /// Correlation id minted by the sending client; echoed back on the row
    /// and the realtime feed.
    pub client_ref: Option<Uuid>,
    /// Descriptor returned by the attachment upload endpoint.
    pub attachment: Option<Attachment>,
}

/// One row of the chat list: counterparty, last message, unread count.
#[derive(Debug, Serialize, ToSchema, sqlx::FromRow)]
pub struct ChatSummary {
    pub chat_id: Uuid,
    pub other_user_id: Uuid,
    pub username: String,
    pub avatar_url: Option<String>,
    pub last_message: Option<String>,
    pub last_message_time: Option<DateTime<Utc>>,
    pub unread_count: i64,
}
