use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive},
        IntoResponse, Sse,
    },
    Json,
};
use futures::stream::Stream;
use serde::Deserialize;
use std::convert::Infallible;
use tokio_stream::{wrappers::BroadcastStream, StreamExt};
use uuid::Uuid;
use validator::Validate;

use super::{
    chat_dto::{ChatSummary, OpenChatRequest, SendMessageRequest},
    chat_models::{Chat, MessageResponse},
};
use crate::{
    error::{AppError, Result},
    middleware::AuthUser,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    page: Option<u32>,
    limit: Option<u32>,
}

/// Widens before multiplying; query params are caller-controlled and
/// `(page - 1) * limit` must not wrap in u32.
fn page_offset(page: u32, limit: u32) -> i64 {
    (i64::from(page) - 1) * i64::from(limit)
}

/// Open (or fetch) the chat with another user
pub async fn open_chat(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<OpenChatRequest>,
) -> Result<impl IntoResponse> {
    let chat = state
        .chat_service
        .open_chat(user_id, payload.other_user_id)
        .await?;

    Ok((StatusCode::CREATED, Json(chat)))
}

pub async fn get_chats(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<ChatSummary>>> {
    let chats = state.chat_service.list_chats(user_id).await?;
    Ok(Json(chats))
}

/// Send a message into a chat
#[utoipa::path(
    post,
    path = "/api/chats/{id}/messages",
    params(("id" = Uuid, Path, description = "Chat id")),
    request_body = SendMessageRequest,
    responses(
        (status = 201, description = "Message sent", body = MessageResponse),
        (status = 403, description = "Not a participant"),
        (status = 404, description = "Chat not found")
    ),
    tag = "chats",
    security(("bearer_auth" = []))
)]
pub async fn send_message(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(chat_id): Path<Uuid>,
    Json(payload): Json<SendMessageRequest>,
) -> Result<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let message = state
        .chat_service
        .send_message(chat_id, user_id, payload)
        .await?;

    // Push onto the realtime feed; subscribers deduplicate against their
    // own optimistic copies.
    let _ = state.message_tx.send(message.clone());

    Ok((StatusCode::CREATED, Json(message)))
}

pub async fn get_messages(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(chat_id): Path<Uuid>,
    Query(query): Query<MessageQuery>,
) -> Result<Json<Vec<MessageResponse>>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(50).min(200);
    let offset = page_offset(page, limit);

    let messages = state
        .chat_service
        .get_messages(chat_id, user_id, limit as i64, offset)
        .await?;

    Ok(Json(messages))
}

pub async fn mark_chat_read(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(chat_id): Path<Uuid>,
) -> Result<StatusCode> {
    state.chat_service.mark_read(chat_id, user_id).await?;
    Ok(StatusCode::OK)
}

/// Realtime message feed (SSE). Delivers every insert the caller is a party
/// to; at-least-once, no ordering guarantee relative to the caller's own
/// writes.
pub async fn chat_stream(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    let rx = state.message_tx.subscribe();
    let stream = BroadcastStream::new(rx).filter_map(move |result| match result {
        Ok(message) if message.receiver_id == user_id || message.sender_id == user_id => {
            let json = serde_json::to_string(&message).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        _ => None,
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_offset_basics() {
        assert_eq!(page_offset(1, 50), 0);
        assert_eq!(page_offset(3, 50), 100);
    }

    #[test]
    fn test_page_offset_does_not_wrap_at_u32_max() {
        let offset = page_offset(u32::MAX, 200);
        assert_eq!(offset, (i64::from(u32::MAX) - 1) * 200);
        assert!(offset > 0);
    }
}
