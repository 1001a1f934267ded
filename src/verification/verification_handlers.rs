use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::verification_service::VerifyResponse;
use crate::{error::Result, middleware::AuthUser, state::AppState};

#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyRequest {
    pub code: String,
}

/// Present the counterparty's verification code
#[utoipa::path(
    post,
    path = "/api/tasks/{id}/verify",
    params(("id" = Uuid, Path, description = "Task id")),
    request_body = VerifyRequest,
    responses(
        (status = 200, description = "Verification outcome", body = VerifyResponse),
        (status = 403, description = "Caller is neither party"),
        (status = 404, description = "Task not found")
    ),
    tag = "verification",
    security(("bearer_auth" = []))
)]
pub async fn verify_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(task_id): Path<Uuid>,
    Json(payload): Json<VerifyRequest>,
) -> Result<Json<VerifyResponse>> {
    let response = state
        .verification_service
        .verify(task_id, user_id, &payload.code)
        .await?;

    Ok(Json(response))
}
