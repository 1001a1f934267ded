pub mod auth_dto;
pub mod auth_handlers;
pub mod jwt;
pub mod password;

pub use auth_dto::{AuthResponse, LoginRequest, RegisterRequest};
pub use auth_handlers::{login, register};
pub use jwt::{create_jwt, verify_jwt, Claims};
pub use password::{hash_password, verify_password};
