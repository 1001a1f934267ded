use crate::{
    application, auth, chat, middleware::auth_middleware, rating, state::AppState, storage, task,
    user, verification,
};
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::auth_handlers::register,
        auth::auth_handlers::login,
        task::task_handlers::get_tasks,
        task::task_handlers::create_task,
        task::task_handlers::cancel_task,
        application::application_handlers::apply,
        application::application_handlers::approve,
        verification::verification_handlers::verify_task,
        rating::rating_handlers::rate_task,
        chat::chat_handlers::send_message,
        storage::storage_handlers::upload_attachment,
    ),
    components(
        schemas(
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::AuthResponse,
            user::UserResponse,
            user::PublicProfile,
            task::CreateTaskRequest,
            task::UpdateTaskRequest,
            task::Task,
            task::TaskStatus,
            task::TaskType,
            task::MyTasksResponse,
            application::ApplyRequest,
            application::TaskApplication,
            application::ApplicationStatus,
            application::ApprovalResponse,
            verification::VerifyRequest,
            verification::VerifyResponse,
            verification::VerificationState,
            rating::SubmitRatingRequest,
            chat::OpenChatRequest,
            chat::SendMessageRequest,
            chat::ChatSummary,
            chat::Chat,
            chat::MessageResponse,
            chat::Attachment,
        )
    ),
    tags(
        (name = "auth", description = "Authentication endpoints"),
        (name = "tasks", description = "Task marketplace endpoints"),
        (name = "applications", description = "Task application endpoints"),
        (name = "verification", description = "In-person verification endpoints"),
        (name = "ratings", description = "Post-verification rating endpoints"),
        (name = "chats", description = "Direct message endpoints"),
        (name = "attachments", description = "Attachment upload endpoints")
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::Http::new(
                        utoipa::openapi::security::HttpAuthScheme::Bearer,
                    ),
                ),
            )
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    // Protected routes (auth required)
    let user_routes = Router::new()
        .route("/me", get(user::get_me).put(user::update_me))
        .route("/:id", get(user::get_profile))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let task_routes = Router::new()
        .route("/", get(task::get_tasks).post(task::create_task))
        .route("/mine", get(task::get_my_tasks))
        .route("/:id", get(task::get_task).put(task::update_task))
        .route("/:id/cancel", post(task::cancel_task))
        .route("/:id/apply", post(application::apply))
        .route("/:id/applications", get(application::get_task_applications))
        .route("/:id/verify", post(verification::verify_task))
        .route("/:id/rate", post(rating::rate_task))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let application_routes = Router::new()
        .route("/mine", get(application::get_my_applications))
        .route("/:id/approve", post(application::approve))
        .route("/:id/reject", post(application::reject))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let chat_routes = Router::new()
        .route("/", get(chat::get_chats).post(chat::open_chat))
        .route("/stream", get(chat::chat_stream))
        .route(
            "/:id/messages",
            get(chat::get_messages).post(chat::send_message),
        )
        .route("/:id/read", post(chat::mark_chat_read))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let attachment_routes = Router::new()
        .route("/", post(storage::upload_attachment))
        .layer(DefaultBodyLimit::max(storage::upload_body_limit()))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine all routes
    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/users", user_routes)
        .nest("/tasks", task_routes)
        .nest("/applications", application_routes)
        .nest("/chats", chat_routes)
        .nest("/attachments", attachment_routes);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
