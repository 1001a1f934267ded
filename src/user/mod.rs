pub mod user_dto;
pub mod user_handlers;
pub mod user_models;
pub mod user_repository;
pub mod user_service;

pub use user_dto::UpdateProfileRequest;
pub use user_handlers::{get_me, get_profile, update_me};
pub use user_models::{PublicProfile, User, UserResponse};
pub use user_repository::UserRepository;
pub use user_service::UserService;
