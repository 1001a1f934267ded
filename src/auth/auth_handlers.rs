use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use super::{
    auth_dto::{AuthResponse, LoginRequest, RegisterRequest},
    jwt::create_jwt,
    password::{hash_password, verify_password},
};
use crate::{
    error::{AppError, Result},
    state::AppState,
};

/// Register a new account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid input or email taken")
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    if state
        .user_repository
        .find_by_email(&payload.email)
        .await?
        .is_some()
    {
        return Err(AppError::Validation("Email already registered".into()));
    }

    let password_hash = hash_password(&payload.password)?;
    let user = state
        .user_repository
        .create(&payload.username, &payload.email, &password_hash)
        .await?;

    let token = create_jwt(
        user.id,
        &user.email,
        &state.config.jwt_secret,
        state.config.jwt_expiration_hours,
    )?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.into(),
        }),
    ))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = state
        .user_repository
        .find_by_email(&payload.email)
        .await?
        .ok_or_else(|| AppError::Authentication("Invalid credentials".to_string()))?;

    if !verify_password(&payload.password, &user.password_hash)? {
        return Err(AppError::Authentication("Invalid credentials".to_string()));
    }

    let token = create_jwt(
        user.id,
        &user.email,
        &state.config.jwt_secret,
        state.config.jwt_expiration_hours,
    )?;

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}
