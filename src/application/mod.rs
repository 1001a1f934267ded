pub mod application_dto;
pub mod application_handlers;
pub mod application_models;
pub mod application_repository;
pub mod application_service;

pub use application_dto::ApplyRequest;
pub use application_handlers::{
    apply, approve, get_my_applications, get_task_applications, reject, ApprovalResponse,
};
pub use application_models::{ApplicationStatus, TaskApplication};
pub use application_repository::ApplicationRepository;
pub use application_service::ApplicationService;
