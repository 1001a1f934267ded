use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::{application_dto::ApplyRequest, application_models::TaskApplication};
use crate::{
    error::{AppError, Result},
    middleware::AuthUser,
    state::AppState,
    task::task_models::Task,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct ApprovalResponse {
    pub task: Task,
    pub application: TaskApplication,
}

/// Apply to perform a task
#[utoipa::path(
    post,
    path = "/api/tasks/{id}/apply",
    params(("id" = Uuid, Path, description = "Task id")),
    request_body = ApplyRequest,
    responses(
        (status = 201, description = "Application submitted", body = TaskApplication),
        (status = 409, description = "Already applied"),
        (status = 404, description = "Task not found")
    ),
    tag = "applications",
    security(("bearer_auth" = []))
)]
pub async fn apply(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(task_id): Path<Uuid>,
    Json(payload): Json<ApplyRequest>,
) -> Result<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let application = state
        .application_service
        .apply(task_id, user_id, payload.message.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(application)))
}

/// Approve an application, assigning the doer and issuing verification codes
#[utoipa::path(
    post,
    path = "/api/applications/{id}/approve",
    params(("id" = Uuid, Path, description = "Application id")),
    responses(
        (status = 200, description = "Application approved", body = ApprovalResponse),
        (status = 403, description = "Not the task creator"),
        (status = 404, description = "Application not found")
    ),
    tag = "applications",
    security(("bearer_auth" = []))
)]
pub async fn approve(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(application_id): Path<Uuid>,
) -> Result<Json<ApprovalResponse>> {
    let (task, application) = state
        .application_service
        .approve(application_id, user_id)
        .await?;

    Ok(Json(ApprovalResponse { task, application }))
}

pub async fn reject(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(application_id): Path<Uuid>,
) -> Result<Json<TaskApplication>> {
    let application = state
        .application_service
        .reject(application_id, user_id)
        .await?;

    Ok(Json(application))
}

pub async fn get_task_applications(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(task_id): Path<Uuid>,
) -> Result<Json<Vec<TaskApplication>>> {
    let applications = state
        .application_service
        .list_for_task(task_id, user_id)
        .await?;

    Ok(Json(applications))
}

pub async fn get_my_applications(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<TaskApplication>>> {
    let applications = state
        .application_service
        .list_for_applicant(user_id)
        .await?;

    Ok(Json(applications))
}
