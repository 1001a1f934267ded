mod application;
mod auth;
mod chat;
mod db;
mod error;
mod middleware;
mod rating;
mod routes;
mod state;
mod storage;
mod task;
mod user;
mod verification;

use db::{create_pool, run_migrations};
use routes::create_router;
use state::{AppState, Config};
use std::sync::Arc;
use storage::StorageClient;
use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,task_market=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Arc::new(Config::from_env());

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    tracing::info!("Connecting to database...");
    let db = create_pool(&database_url).await?;

    tracing::info!("Running migrations...");
    run_migrations(&db).await?;

    // Realtime message fan-out
    let (message_tx, _) = broadcast::channel(100);

    // Repositories
    let user_repository = user::UserRepository::new(db.clone());
    let task_repository = task::TaskRepository::new(db.clone());
    let application_repository = application::ApplicationRepository::new(db.clone());
    let rating_repository = rating::RatingRepository::new(db.clone());
    let chat_repository = chat::ChatRepository::new(db.clone());

    // Services
    let user_service = user::UserService::new(user_repository.clone());
    let task_service = task::TaskService::new(task_repository.clone());
    let application_service =
        application::ApplicationService::new(application_repository, task_repository.clone());
    let verification_service = verification::VerificationService::new(task_repository.clone());
    let rating_service = rating::RatingService::new(rating_repository, task_repository);
    let chat_service = chat::ChatService::new(chat_repository, user_repository.clone());

    let storage = StorageClient::from_config(&config);

    // Application state
    let state = AppState {
        db: db.clone(),
        config: config.clone(),
        message_tx,
        storage,
        user_repository,
        user_service,
        task_service,
        application_service,
        verification_service,
        rating_service,
        chat_service,
    };

    // Create router
    let app = create_router(state);

    // Start server
    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("{}:{}", host, port);

    tracing::info!("Server starting on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
