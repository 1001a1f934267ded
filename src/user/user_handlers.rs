use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use super::{
    user_dto::UpdateProfileRequest,
    user_models::{PublicProfile, UserResponse},
};
use crate::{
    error::{AppError, Result},
    middleware::AuthUser,
    state::AppState,
};

pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<UserResponse>> {
    let user = state.user_service.get_current_user(user_id).await?;
    Ok(Json(user))
}

pub async fn update_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = state
        .user_service
        .update_current_user(user_id, payload)
        .await?;

    Ok(Json(user))
}

/// Public profile, including the rating aggregates
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<PublicProfile>> {
    let profile = state.user_service.get_profile(user_id).await?;
    Ok(Json(profile))
}
