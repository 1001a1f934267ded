pub mod rating_handlers;
pub mod rating_repository;
pub mod rating_service;

pub use rating_handlers::{rate_task, SubmitRatingRequest};
pub use rating_repository::RatingRepository;
pub use rating_service::{rating_target, RatingService};
