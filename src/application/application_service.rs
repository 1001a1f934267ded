use crate::application::application_models::TaskApplication;
use crate::application::application_repository::ApplicationRepository;
use crate::error::{AppError, Result};
use crate::task::task_models::Task;
use crate::task::task_repository::TaskRepository;
use crate::verification::codes::generate_code_pair;
use uuid::Uuid;

#[derive(Clone)]
pub struct ApplicationService {
    repo: ApplicationRepository,
    tasks: TaskRepository,
}

impl ApplicationService {
    pub fn new(repo: ApplicationRepository, tasks: TaskRepository) -> Self {
        Self { repo, tasks }
    }

    pub async fn apply(
        &self,
        task_id: Uuid,
        applicant_id: Uuid,
        message: Option<&str>,
    ) -> Result<TaskApplication> {
        let task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

        if task.creator_id == applicant_id {
            return Err(AppError::Validation(
                "You cannot apply to your own task".into(),
            ));
        }
        if !task.is_active() || task.doer_id.is_some() {
            return Err(AppError::Validation(
                "Task is no longer accepting applications".into(),
            ));
        }
        if self.repo.exists(task_id, applicant_id).await? {
            return Err(AppError::AlreadyApplied);
        }

        self.repo.create(task_id, applicant_id, message).await
    }

    pub async fn approve(
        &self,
        application_id: Uuid,
        creator_id: Uuid,
    ) -> Result<(Task, TaskApplication)> {
        let (requestor_code, doer_code) = generate_code_pair();

        if let Some(approved) = self
            .repo
            .approve(application_id, creator_id, &requestor_code, &doer_code)
            .await?
        {
            return Ok(approved);
        }

        // Work out which precondition failed for the error report.
        let application = self
            .repo
            .find_by_id(application_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Application not found".into()))?;

        if application.status != "pending" {
            return Err(AppError::Validation(
                "Application has already been decided".into(),
            ));
        }

        let task = self
            .tasks
            .find_by_id(application.task_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

        if task.creator_id != creator_id {
            return Err(AppError::Forbidden(
                "Only the task creator may approve applications".into(),
            ));
        }

        Err(AppError::Validation(
            "Task is not open for approval".into(),
        ))
    }

    pub async fn reject(
        &self,
        application_id: Uuid,
        creator_id: Uuid,
    ) -> Result<TaskApplication> {
        let application = self
            .repo
            .find_by_id(application_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Application not found".into()))?;

        let task = self
            .tasks
            .find_by_id(application.task_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

        if task.creator_id != creator_id {
            return Err(AppError::Forbidden(
                "Only the task creator may reject applications".into(),
            ));
        }

        self.repo
            .reject(application_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Application not found".into()))
    }

    pub async fn list_for_task(&self, task_id: Uuid, caller: Uuid) -> Result<Vec<TaskApplication>> {
        let task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

        if task.creator_id != caller {
            return Err(AppError::Forbidden(
                "Only the task creator may list applications".into(),
            ));
        }

        self.repo.find_by_task(task_id).await
    }

    pub async fn list_for_applicant(&self, applicant_id: Uuid) -> Result<Vec<TaskApplication>> {
        self.repo.find_by_applicant(applicant_id).await
    }
}
