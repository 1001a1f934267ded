use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::{error::Result, middleware::AuthUser, state::AppState};

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    filename: String,
}

/// Upload a chat attachment
#[utoipa::path(
    post,
    path = "/api/attachments",
    params(("filename" = String, Query, description = "Original file name")),
    responses(
        (status = 201, description = "Attachment stored", body = crate::chat::Attachment),
        (status = 400, description = "File too large or type not allowed"),
        (status = 502, description = "Object store failure")
    ),
    tag = "attachments",
    security(("bearer_auth" = []))
)]
pub async fn upload_attachment(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<UploadQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse> {
    let mime_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream");

    let attachment = state
        .storage
        .upload(user_id, &query.filename, mime_type, body.to_vec())
        .await?;

    Ok((StatusCode::CREATED, Json(attachment)))
}
