use crate::error::{AppError, Result};
use crate::task::task_models::Task;
use crate::task::task_repository::TaskRepository;
use crate::verification::state::{
    expected_code, role_of, verification_state, Role, VerificationState,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct VerifyResponse {
    /// Whether the presented code matched. A mismatch is not an error.
    pub verified: bool,
    pub is_requestor_verified: bool,
    pub is_doer_verified: bool,
    pub state: VerificationState,
}

impl VerifyResponse {
    fn from_task(task: &Task, verified: bool) -> Self {
        Self {
            verified,
            is_requestor_verified: task.is_requestor_verified,
            is_doer_verified: task.is_doer_verified,
            state: verification_state(task),
        }
    }
}

#[derive(Clone)]
pub struct VerificationService {
    tasks: TaskRepository,
}

impl VerificationService {
    pub fn new(tasks: TaskRepository) -> Self {
        Self { tasks }
    }

    /// Advances the two-party verification by one step. The caller presents
    /// the counterparty's code; on a match the caller's own flag flips and
    /// the combined status is re-read. On a mismatch nothing is mutated.
    pub async fn verify(&self, task_id: Uuid, caller: Uuid, code: &str) -> Result<VerifyResponse> {
        let task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

        let role = role_of(&task, caller).ok_or_else(|| {
            AppError::Forbidden("Only the requestor or the doer may verify".into())
        })?;

        if verification_state(&task) == VerificationState::Unassigned {
            return Err(AppError::Validation(
                "Task has no approved doer to verify against".into(),
            ));
        }

        match expected_code(&task, role) {
            Some(expected) if expected == code => {}
            _ => return Ok(VerifyResponse::from_task(&task, false)),
        }

        let updated = self
            .tasks
            .set_verified(task_id, role == Role::Requestor)
            .await?;

        Ok(VerifyResponse::from_task(&updated, true))
    }
}
