use crate::error::{AppError, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id
    pub email: String,
    pub exp: i64,
}

pub fn create_jwt(user_id: Uuid, email: &str, secret: &str, expiration_hours: i64) -> Result<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(expiration_hours))
        .ok_or(AppError::InternalError)?
        .timestamp();

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| AppError::Authentication("Failed to create token".to_string()))
}

/// Verify JWT token and extract claims
pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized("Invalid token".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_round_trip() {
        let user_id = Uuid::new_v4();
        let token = create_jwt(user_id, "a@b.com", "test-secret", 1).unwrap();
        let claims = verify_jwt(&token, "test-secret").unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.email, "a@b.com");
    }

    #[test]
    fn test_jwt_rejects_wrong_secret() {
        let token = create_jwt(Uuid::new_v4(), "a@b.com", "test-secret", 1).unwrap();
        assert!(verify_jwt(&token, "other-secret").is_err());
    }
}
