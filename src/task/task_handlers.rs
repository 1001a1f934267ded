use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::{
    task_dto::{CreateTaskRequest, UpdateTaskRequest},
    task_models::Task,
};
use crate::{
    error::{AppError, Result},
    middleware::AuthUser,
    state::AppState,
};

#[derive(Deserialize)]
pub struct TaskQuery {
    status: Option<String>,
    task_type: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MyTasksResponse {
    pub created: Vec<Task>,
    pub assigned: Vec<Task>,
}

/// Browse the open task feed
#[utoipa::path(
    get,
    path = "/api/tasks",
    params(
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("task_type" = Option<String>, Query, description = "Filter by task type")
    ),
    responses(
        (status = 200, description = "List of tasks", body = Vec<Task>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "tasks",
    security(("bearer_auth" = []))
)]
pub async fn get_tasks(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Query(query): Query<TaskQuery>,
) -> Result<Json<Vec<Task>>> {
    let filters = crate::task::task_repository::TaskFilters {
        status: query.status,
        task_type: query.task_type,
    };

    let tasks = state.task_service.list_tasks(filters).await?;
    Ok(Json(tasks))
}

/// Tasks the caller created or was approved to perform
pub async fn get_my_tasks(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<MyTasksResponse>> {
    let created = state.task_service.list_created(user_id).await?;
    let assigned = state.task_service.list_assigned(user_id).await?;

    Ok(Json(MyTasksResponse { created, assigned }))
}

pub async fn get_task(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(task_id): Path<Uuid>,
) -> Result<Json<Task>> {
    let task = state.task_service.get_task(task_id).await?;
    Ok(Json(task))
}

/// Post a new task
#[utoipa::path(
    post,
    path = "/api/tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = Task),
        (status = 409, description = "Active task limit reached"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "tasks",
    security(("bearer_auth" = []))
)]
pub async fn create_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let task = state.task_service.create_task(user_id, payload).await?;

    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(task_id): Path<Uuid>,
    Json(payload): Json<UpdateTaskRequest>,
) -> Result<Json<Task>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let task = state
        .task_service
        .update_task(user_id, task_id, payload)
        .await?;

    Ok(Json(task))
}

/// Cancel a task
#[utoipa::path(
    post,
    path = "/api/tasks/{id}/cancel",
    params(("id" = Uuid, Path, description = "Task id")),
    responses(
        (status = 200, description = "Task cancelled", body = Task),
        (status = 400, description = "Task already completed"),
        (status = 404, description = "Task not found")
    ),
    tag = "tasks",
    security(("bearer_auth" = []))
)]
pub async fn cancel_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(task_id): Path<Uuid>,
) -> Result<Json<Task>> {
    let task = state.task_service.cancel_task(user_id, task_id).await?;
    Ok(Json(task))
}
