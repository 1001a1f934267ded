use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub avatar_url: Option<String>,
    /// Last rating received from a requestor (last-write-wins aggregate).
    pub requestor_rating: Option<i16>,
    /// Last rating received from a doer.
    pub doer_rating: Option<i16>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub requestor_rating: Option<i16>,
    pub doer_rating: Option<i16>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            avatar_url: user.avatar_url,
            requestor_rating: user.requestor_rating,
            doer_rating: user.doer_rating,
            created_at: user.created_at,
        }
    }
}

/// What other users see of a profile.
#[derive(Debug, Serialize, ToSchema)]
pub struct PublicProfile {
    pub id: Uuid,
    pub username: String,
    pub avatar_url: Option<String>,
    pub requestor_rating: Option<i16>,
    pub doer_rating: Option<i16>,
}

impl From<User> for PublicProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            avatar_url: user.avatar_url,
            requestor_rating: user.requestor_rating,
            doer_rating: user.doer_rating,
        }
    }
}
