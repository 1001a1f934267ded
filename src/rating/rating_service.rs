use crate::error::{AppError, Result};
use crate::rating::rating_repository::RatingRepository;
use crate::task::task_models::Task;
use crate::task::task_repository::TaskRepository;
use crate::verification::state::{role_of, verification_state, Role, VerificationState};
use uuid::Uuid;

/// Decides where a rating lands: the counterparty's user id. Requires the
/// task to be assigned.
pub fn rating_target(task: &Task, role: Role) -> Option<Uuid> {
    match role {
        Role::Requestor => task.doer_id,
        Role::Doer => Some(task.creator_id),
    }
}

#[derive(Clone)]
pub struct RatingService {
    repo: RatingRepository,
    tasks: TaskRepository,
}

impl RatingService {
    pub fn new(repo: RatingRepository, tasks: TaskRepository) -> Self {
        Self { repo, tasks }
    }

    /// Accepts one rating per party after both sides have verified. A
    /// repeat call overwrites the stored value without error; completion
    /// happens exactly when both rated flags are set.
    pub async fn submit_rating(&self, task_id: Uuid, caller: Uuid, rating: i16) -> Result<Task> {
        if !(1..=5).contains(&rating) {
            return Err(AppError::Validation("Rating must be between 1 and 5".into()));
        }

        let task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

        let role = role_of(&task, caller)
            .ok_or_else(|| AppError::Forbidden("Only the requestor or the doer may rate".into()))?;

        if verification_state(&task) != VerificationState::BothVerified {
            return Err(AppError::Validation(
                "Both parties must verify before rating".into(),
            ));
        }

        let counterparty = rating_target(&task, role)
            .ok_or_else(|| AppError::Validation("Task has no doer".into()))?;

        self.repo
            .record(task_id, role == Role::Requestor, counterparty, rating)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn assigned_task(creator: Uuid, doer: Uuid) -> Task {
        Task {
            id: Uuid::new_v4(),
            creator_id: creator,
            doer_id: Some(doer),
            title: "Assemble a bookshelf".to_string(),
            description: None,
            location: None,
            reward: 150,
            deadline: None,
            task_type: "normal".to_string(),
            status: "active".to_string(),
            requestor_verification_code: Some("111111".to_string()),
            doer_verification_code: Some("222222".to_string()),
            is_requestor_verified: true,
            is_doer_verified: true,
            is_requestor_rated: false,
            is_doer_rated: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_rating_lands_on_counterparty() {
        let creator = Uuid::new_v4();
        let doer = Uuid::new_v4();
        let task = assigned_task(creator, doer);

        assert_eq!(rating_target(&task, Role::Requestor), Some(doer));
        assert_eq!(rating_target(&task, Role::Doer), Some(creator));
    }

    // Full happy path: approval state, cross-wise verification, then both
    // ratings landing on the right profiles.
    #[test]
    fn test_two_party_flow() {
        use crate::verification::state::{
            expected_code, role_of, verification_state, VerificationState,
        };

        let creator = Uuid::new_v4();
        let doer = Uuid::new_v4();
        let mut task = assigned_task(creator, doer);
        task.is_requestor_verified = false;
        task.is_doer_verified = false;
        assert_eq!(verification_state(&task), VerificationState::Assigned);

        // Doer presents the requestor's code.
        let doer_role = role_of(&task, doer).unwrap();
        assert_eq!(expected_code(&task, doer_role), Some("111111"));
        task.is_doer_verified = true;
        assert_eq!(verification_state(&task), VerificationState::OneVerified);
        assert!(!task.is_requestor_verified);

        // Requestor presents the doer's code.
        let requestor_role = role_of(&task, creator).unwrap();
        assert_eq!(expected_code(&task, requestor_role), Some("222222"));
        task.is_requestor_verified = true;
        assert_eq!(verification_state(&task), VerificationState::BothVerified);

        // Creator's rating lands on the doer, the doer's on the creator.
        assert_eq!(rating_target(&task, requestor_role), Some(doer));
        assert_eq!(rating_target(&task, doer_role), Some(creator));

        // Completion requires both rated flags.
        task.is_requestor_rated = true;
        assert!(!(task.is_requestor_rated && task.is_doer_rated));
        task.is_doer_rated = true;
        assert!(task.is_requestor_rated && task.is_doer_rated);
    }

    #[test]
    fn test_rating_target_requires_doer() {
        let creator = Uuid::new_v4();
        let mut task = assigned_task(creator, Uuid::new_v4());
        task.doer_id = None;

        assert_eq!(rating_target(&task, Role::Requestor), None);
        assert_eq!(rating_target(&task, Role::Doer), Some(creator));
    }
}
