use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{error::Result, middleware::AuthUser, state::AppState, task::task_models::Task};

#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitRatingRequest {
    pub rating: i16,
}

/// Rate the counterparty after mutual verification
#[utoipa::path(
    post,
    path = "/api/tasks/{id}/rate",
    params(("id" = Uuid, Path, description = "Task id")),
    request_body = SubmitRatingRequest,
    responses(
        (status = 200, description = "Rating recorded; task completes once both parties rated", body = Task),
        (status = 400, description = "Verification incomplete or rating out of range"),
        (status = 403, description = "Caller is neither party")
    ),
    tag = "ratings",
    security(("bearer_auth" = []))
)]
pub async fn rate_task(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(task_id): Path<Uuid>,
    Json(payload): Json<SubmitRatingRequest>,
) -> Result<Json<Task>> {
    let task = state
        .rating_service
        .submit_rating(task_id, user_id, payload.rating)
        .await?;

    Ok(Json(task))
}
