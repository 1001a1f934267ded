use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    #[validate(range(min = 0))]
    pub reward: i64,
    pub deadline: Option<DateTime<Utc>>,
    /// "normal" or "joint"; defaults to "normal".
    pub task_type: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    #[validate(range(min = 0))]
    pub reward: Option<i64>,
    pub deadline: Option<DateTime<Utc>>,
}
