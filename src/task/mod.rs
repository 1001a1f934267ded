pub mod task_dto;
pub mod task_handlers;
pub mod task_models;
pub mod task_repository;
pub mod task_service;

pub use task_dto::{CreateTaskRequest, UpdateTaskRequest};
pub use task_handlers::{
    cancel_task, create_task, get_my_tasks, get_task, get_tasks, update_task, MyTasksResponse,
};
pub use task_models::{Task, TaskStatus, TaskType};
pub use task_repository::{TaskFilters, TaskRepository};
pub use task_service::TaskService;
