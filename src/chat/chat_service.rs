use crate::chat::chat_dto::{ChatSummary, SendMessageRequest};
use crate::chat::chat_models::{Chat, MessageResponse};
use crate::chat::chat_repository::ChatRepository;
use crate::chat::sync::{ChatEvent, ChatProjection};
use crate::error::{AppError, Result};
use crate::user::user_repository::UserRepository;
use uuid::Uuid;

#[derive(Clone)]
pub struct ChatService {
    repo: ChatRepository,
    users: UserRepository,
}

impl ChatService {
    pub fn new(repo: ChatRepository, users: UserRepository) -> Self {
        Self { repo, users }
    }

    /// Get-or-create the chat for a pair of users.
    pub async fn open_chat(&self, caller: Uuid, other_user_id: Uuid) -> Result<Chat> {
        if caller == other_user_id {
            return Err(AppError::Validation(
                "Cannot open a chat with yourself".into(),
            ));
        }

        self.users
            .find_by_id(other_user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;

        if let Some(chat) = self.repo.find_by_pair(caller, other_user_id).await? {
            return Ok(chat);
        }

        self.repo.create(caller, other_user_id).await
    }

    pub async fn list_chats(&self, caller: Uuid) -> Result<Vec<ChatSummary>> {
        self.repo.list_for_user(caller).await
    }

    async fn member_chat(&self, chat_id: Uuid, caller: Uuid) -> Result<Chat> {
        let chat = self
            .repo
            .find_by_id(chat_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Chat not found".into()))?;

        if !chat.includes(caller) {
            return Err(AppError::Forbidden(
                "You are not a participant of this chat".into(),
            ));
        }

        Ok(chat)
    }

    pub async fn send_message(
        &self,
        chat_id: Uuid,
        sender_id: Uuid,
        payload: SendMessageRequest,
    ) -> Result<MessageResponse> {
        if payload.content.is_empty() && payload.attachment.is_none() {
            return Err(AppError::Validation(
                "Message needs content or an attachment".into(),
            ));
        }

        let chat = self.member_chat(chat_id, sender_id).await?;
        let receiver_id = chat
            .other_participant(sender_id)
            .ok_or_else(|| AppError::Forbidden("You are not a participant of this chat".into()))?;

        let message = self
            .repo
            .create_message(
                chat_id,
                sender_id,
                receiver_id,
                &payload.content,
                payload.client_ref,
                payload.attachment.as_ref(),
            )
            .await?;

        Ok(message.into())
    }

    /// Fetches the message page and flips the caller's unread rows, the
    /// batch read-mark the viewer performs whenever the list changes.
    pub async fn get_messages(
        &self,
        chat_id: Uuid,
        caller: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<MessageResponse>> {
        self.member_chat(chat_id, caller).await?;

        let mut messages: Vec<MessageResponse> = self
            .repo
            .list_messages(chat_id, limit, offset)
            .await?
            .into_iter()
            .map(MessageResponse::from)
            .collect();

        // Fold the page through the viewer projection to decide whether a
        // batch read-flip is due. Once the flip lands, the page handed back
        // must already reflect it.
        let mut projection = ChatProjection::new(caller);
        projection.apply(ChatEvent::Loaded(messages.clone()));
        let unread = projection.unread_ids();
        if !unread.is_empty() {
            match self.repo.mark_chat_read(chat_id, caller).await {
                Ok(_) => flip_read(&mut messages, &unread),
                Err(e) => tracing::warn!("Failed to mark chat {} read: {:?}", chat_id, e),
            }
        }

        Ok(messages)
    }

    pub async fn mark_read(&self, chat_id: Uuid, caller: Uuid) -> Result<u64> {
        self.member_chat(chat_id, caller).await?;
        self.repo.mark_chat_read(chat_id, caller).await
    }
}

fn flip_read(messages: &mut [MessageResponse], ids: &[Uuid]) {
    for message in messages.iter_mut() {
        if ids.contains(&message.id) {
            message.is_read = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn message(sender: Uuid, receiver: Uuid, is_read: bool) -> MessageResponse {
        MessageResponse {
            id: Uuid::new_v4(),
            chat_id: Uuid::new_v4(),
            sender_id: sender,
            receiver_id: receiver,
            content: "see you at noon".to_string(),
            attachment: None,
            is_read,
            client_ref: None,
            created_at: Utc::now(),
        }
    }

    // The rows in the returned page must agree with the read-flip the
    // fetch just performed, not with their pre-flip database state.
    #[test]
    fn test_returned_page_reflects_read_flip() {
        let me = Uuid::new_v4();
        let them = Uuid::new_v4();
        let mut messages = vec![
            message(them, me, false),
            message(me, them, false),
            message(them, me, true),
        ];

        let mut projection = ChatProjection::new(me);
        projection.apply(ChatEvent::Loaded(messages.clone()));
        let unread = projection.unread_ids();
        assert_eq!(unread, vec![messages[0].id]);

        flip_read(&mut messages, &unread);
        assert!(messages[0].is_read);
        // The viewer's own message keeps its flag for the counterparty.
        assert!(!messages[1].is_read);
        assert!(messages[2].is_read);
    }
}
