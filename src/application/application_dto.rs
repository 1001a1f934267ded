use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ApplyRequest {
    #[validate(length(max = 1000))]
    pub message: Option<String>,
}
