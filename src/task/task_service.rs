use crate::error::{AppError, Result};
use crate::task::task_dto::{CreateTaskRequest, UpdateTaskRequest};
use crate::task::task_models::{Task, TaskType};
use crate::task::task_repository::{TaskFilters, TaskRepository};
use uuid::Uuid;

/// A creator may have at most this many active tasks at once.
pub const MAX_ACTIVE_TASKS_PER_CREATOR: i64 = 3;

/// The cap is inclusive: a third active task blocks the fourth.
pub fn at_task_limit(active: i64) -> bool {
    active >= MAX_ACTIVE_TASKS_PER_CREATOR
}

/// Service layer for task listing and lifecycle logic.
#[derive(Clone)]
pub struct TaskService {
    repo: TaskRepository,
}

impl TaskService {
    pub fn new(repo: TaskRepository) -> Self {
        Self { repo }
    }

    pub async fn list_tasks(&self, filters: TaskFilters) -> Result<Vec<Task>> {
        self.repo.find_all(filters).await
    }

    pub async fn list_created(&self, user_id: Uuid) -> Result<Vec<Task>> {
        self.repo.find_by_creator(user_id).await
    }

    pub async fn list_assigned(&self, user_id: Uuid) -> Result<Vec<Task>> {
        self.repo.find_by_doer(user_id).await
    }

    pub async fn get_task(&self, task_id: Uuid) -> Result<Task> {
        self.repo
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Task not found".into()))
    }

    pub async fn create_task(&self, creator_id: Uuid, payload: CreateTaskRequest) -> Result<Task> {
        let active = self.repo.count_active_by_creator(creator_id).await?;
        if at_task_limit(active) {
            return Err(AppError::LimitExceeded(format!(
                "You already have {} active tasks",
                active
            )));
        }

        let task_type = match payload.task_type.as_deref() {
            None => TaskType::Normal,
            Some(raw) => TaskType::parse(raw)
                .ok_or_else(|| AppError::Validation(format!("Unknown task type: {}", raw)))?,
        };

        self.repo
            .create(
                creator_id,
                &payload.title,
                payload.description.as_deref(),
                payload.location.as_deref(),
                payload.reward,
                payload.deadline,
                task_type.as_str(),
            )
            .await
    }

    pub async fn update_task(
        &self,
        creator_id: Uuid,
        task_id: Uuid,
        payload: UpdateTaskRequest,
    ) -> Result<Task> {
        self.repo
            .update_fields(
                task_id,
                creator_id,
                payload.title.as_deref(),
                payload.description.as_deref(),
                payload.location.as_deref(),
                payload.reward,
                payload.deadline,
            )
            .await?
            .ok_or_else(|| AppError::NotFound("Task not found".into()))
    }

    /// Cancellation is a terminal state distinct from rating-driven
    /// completion. Repeat cancels are a no-op.
    pub async fn cancel_task(&self, creator_id: Uuid, task_id: Uuid) -> Result<Task> {
        if let Some(task) = self.repo.cancel(task_id, creator_id).await? {
            return Ok(task);
        }

        // Either the task is missing, owned by someone else, or completed.
        match self.repo.find_by_id(task_id).await? {
            Some(task) if task.creator_id == creator_id && task.is_completed() => Err(
                AppError::Validation("Completed task cannot be cancelled".into()),
            ),
            Some(task) if task.creator_id != creator_id => {
                Err(AppError::Forbidden("Only the creator may cancel a task".into()))
            }
            _ => Err(AppError::NotFound("Task not found".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_task_cap_boundary() {
        assert!(!at_task_limit(0));
        assert!(!at_task_limit(MAX_ACTIVE_TASKS_PER_CREATOR - 1));
        assert!(at_task_limit(MAX_ACTIVE_TASKS_PER_CREATOR));
        assert!(at_task_limit(MAX_ACTIVE_TASKS_PER_CREATOR + 1));
    }
}
