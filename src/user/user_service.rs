use crate::{
    error::{AppError, Result},
    user::{
        user_dto::UpdateProfileRequest,
        user_models::{PublicProfile, UserResponse},
        user_repository::UserRepository,
    },
};
use uuid::Uuid;

#[derive(Clone)]
pub struct UserService {
    repo: UserRepository,
}

impl UserService {
    pub fn new(repo: UserRepository) -> Self {
        Self { repo }
    }

    pub async fn get_current_user(&self, user_id: Uuid) -> Result<UserResponse> {
        let user = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(user.into())
    }

    pub async fn get_profile(&self, user_id: Uuid) -> Result<PublicProfile> {
        let user = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(user.into())
    }

    pub async fn update_current_user(
        &self,
        user_id: Uuid,
        payload: UpdateProfileRequest,
    ) -> Result<UserResponse> {
        let user = self
            .repo
            .update_profile(
                user_id,
                payload.username.as_deref(),
                payload.avatar_url.as_deref(),
            )
            .await?;

        Ok(user.into())
    }
}
