use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::attachment::{normalize_attachment, Attachment};

/// An unordered pair of participants.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Chat {
    pub id: Uuid,
    pub user1_id: Uuid,
    pub user2_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Chat {
    pub fn includes(&self, user_id: Uuid) -> bool {
        self.user1_id == user_id || self.user2_id == user_id
    }

    pub fn other_participant(&self, user_id: Uuid) -> Option<Uuid> {
        if self.user1_id == user_id {
            Some(self.user2_id)
        } else if self.user2_id == user_id {
            Some(self.user1_id)
        } else {
            None
        }
    }
}

/// A message row. The attachment is stored twice: as a JSON text column and
/// as denormalized columns; the two must agree on write.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Message {
    pub id: Uuid,
    pub chat_id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub content: String,
    pub is_read: bool,
    /// Correlation id assigned by the sender and echoed back, so optimistic
    /// entries can be matched without comparing by content.
    pub client_ref: Option<Uuid>,
    pub attachment: Option<String>,
    pub attachment_name: Option<String>,
    pub attachment_type: Option<String>,
    pub attachment_url: Option<String>,
    pub attachment_size: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Resolves the dual attachment encoding into one typed value.
    pub fn normalized_attachment(&self) -> Option<Attachment> {
        normalize_attachment(
            self.attachment.as_deref(),
            self.attachment_name.as_deref(),
            self.attachment_type.as_deref(),
            self.attachment_url.as_deref(),
            self.attachment_size,
            &self.id.to_string(),
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub id: Uuid,
    pub chat_id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub content: String,
    pub attachment: Option<Attachment>,
    pub is_read: bool,
    pub client_ref: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<Message> for MessageResponse {
    fn from(message: Message) -> Self {
        let attachment = message.normalized_attachment();
        Self {
            id: message.id,
            chat_id: message.chat_id,
            sender_id: message.sender_id,
            receiver_id: message.receiver_id,
            content: message.content,
            attachment,
            is_read: message.is_read,
            client_ref: message.client_ref,
            created_at: message.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message_row() -> Message {
        Message {
            id: Uuid::new_v4(),
            chat_id: Uuid::new_v4(),
            sender_id: Uuid::new_v4(),
            receiver_id: Uuid::new_v4(),
            content: "here it is".to_string(),
            is_read: false,
            client_ref: None,
            attachment: None,
            attachment_name: None,
            attachment_type: None,
            attachment_url: None,
            attachment_size: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_round_trip_equality_across_encodings() {
        let descriptor = Attachment {
            id: "att-9".to_string(),
            name: "map.png".to_string(),
            mime_type: "image/png".to_string(),
            url: "https://cdn.example/map.png".to_string(),
            size: 512,
        };

        // Structured encoding only.
        let mut structured = message_row();
        structured.attachment = Some(serde_json::to_string(&descriptor).unwrap());
        assert_eq!(structured.normalized_attachment(), Some(descriptor.clone()));

        // Denormalized columns only; id differs (columns store none), the
        // remaining fields must survive.
        let mut columns = message_row();
        columns.attachment_name = Some(descriptor.name.clone());
        columns.attachment_type = Some(descriptor.mime_type.clone());
        columns.attachment_url = Some(descriptor.url.clone());
        columns.attachment_size = Some(descriptor.size);
        let normalized = columns.normalized_attachment().unwrap();
        assert_eq!(normalized.name, descriptor.name);
        assert_eq!(normalized.mime_type, descriptor.mime_type);
        assert_eq!(normalized.url, descriptor.url);
        assert_eq!(normalized.size, descriptor.size);
    }

    #[test]
    fn test_other_participant() {
        let chat = Chat {
            id: Uuid::new_v4(),
            user1_id: Uuid::new_v4(),
            user2_id: Uuid::new_v4(),
            created_at: Utc::now(),
        };
        assert_eq!(chat.other_participant(chat.user1_id), Some(chat.user2_id));
        assert_eq!(chat.other_participant(chat.user2_id), Some(chat.user1_id));
        assert_eq!(chat.other_participant(Uuid::new_v4()), None);
        assert!(chat.includes(chat.user2_id));
    }
}
