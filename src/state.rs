use crate::application::application_service::ApplicationService;
use crate::chat::chat_service::ChatService;
use crate::chat::MessageResponse;
use crate::db::DbPool;
use crate::rating::rating_service::RatingService;
use crate::storage::StorageClient;
use crate::task::task_service::TaskService;
use crate::user::user_repository::UserRepository;
use crate::user::user_service::UserService;
use crate::verification::verification_service::VerificationService;
use std::sync::Arc;
use tokio::sync::broadcast;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Arc<Config>,
    /// Realtime message fan-out; subscribers filter to chats they are in.
    pub message_tx: broadcast::Sender<MessageResponse>,
    pub storage: StorageClient,
    pub user_repository: UserRepository,
    pub user_service: UserService,
    pub task_service: TaskService,
    pub application_service: ApplicationService,
    pub verification_service: VerificationService,
    pub rating_service: RatingService,
    pub chat_service: ChatService,
}

#[derive(Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub storage_base_url: String,
    pub storage_bucket: String,
    pub storage_api_key: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            jwt_expiration_hours: std::env::var("JWT_EXPIRATION_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .expect("JWT_EXPIRATION_HOURS must be a number"),
            storage_base_url: std::env::var("STORAGE_BASE_URL")
                .expect("STORAGE_BASE_URL must be set"),
            storage_bucket: std::env::var("STORAGE_BUCKET")
                .unwrap_or_else(|_| "chat_attachments".to_string()),
            storage_api_key: std::env::var("STORAGE_API_KEY")
                .expect("STORAGE_API_KEY must be set"),
        }
    }
}
