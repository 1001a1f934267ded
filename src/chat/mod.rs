pub mod attachment;
pub mod chat_dto;
pub mod chat_handlers;
pub mod chat_models;
pub mod chat_repository;
pub mod chat_service;
pub mod sync;

pub use attachment::{normalize_attachment, parse_attachment_json, Attachment};
pub use chat_dto::{ChatSummary, OpenChatRequest, SendMessageRequest};
pub use chat_handlers::{
    chat_stream, get_chats, get_messages, mark_chat_read, open_chat, send_message,
};
pub use chat_models::{Chat, Message, MessageResponse};
pub use chat_repository::ChatRepository;
pub use chat_service::ChatService;
pub use sync::{ChatEntry, ChatEvent, ChatProjection, OutgoingMessage};
