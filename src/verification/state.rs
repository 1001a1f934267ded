use crate::task::task_models::Task;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Which side of a task the caller is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Requestor,
    Doer,
}

/// Verification progress derived from the task row. There is no stored
/// "verified" status; completion is driven by the rating gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VerificationState {
    Unassigned,
    Assigned,
    OneVerified,
    BothVerified,
}

pub fn role_of(task: &Task, caller: Uuid) -> Option<Role> {
    if task.creator_id == caller {
        Some(Role::Requestor)
    } else if task.doer_id == Some(caller) {
        Some(Role::Doer)
    } else {
        None
    }
}

pub fn verification_state(task: &Task) -> VerificationState {
    if task.doer_id.is_none() {
        return VerificationState::Unassigned;
    }
    match (task.is_requestor_verified, task.is_doer_verified) {
        (false, false) => VerificationState::Assigned,
        (true, true) => VerificationState::BothVerified,
        _ => VerificationState::OneVerified,
    }
}

/// The code a caller in `role` must present: each party verifies with the
/// counterparty's code, never its own.
pub fn expected_code(task: &Task, role: Role) -> Option<&str> {
    match role {
        Role::Requestor => task.doer_verification_code.as_deref(),
        Role::Doer => task.requestor_verification_code.as_deref(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn task() -> Task {
        Task {
            id: Uuid::new_v4(),
            creator_id: Uuid::new_v4(),
            doer_id: None,
            title: "Walk my dog".to_string(),
            description: None,
            location: None,
            reward: 200,
            deadline: None,
            task_type: "normal".to_string(),
            status: "active".to_string(),
            requestor_verification_code: None,
            doer_verification_code: None,
            is_requestor_verified: false,
            is_doer_verified: false,
            is_requestor_rated: false,
            is_doer_rated: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn assigned_task() -> Task {
        let mut t = task();
        t.doer_id = Some(Uuid::new_v4());
        t.requestor_verification_code = Some("111111".to_string());
        t.doer_verification_code = Some("222222".to_string());
        t
    }

    #[test]
    fn test_state_unassigned() {
        assert_eq!(verification_state(&task()), VerificationState::Unassigned);
    }

    #[test]
    fn test_state_progression() {
        let mut t = assigned_task();
        assert_eq!(verification_state(&t), VerificationState::Assigned);

        t.is_doer_verified = true;
        assert_eq!(verification_state(&t), VerificationState::OneVerified);

        t.is_requestor_verified = true;
        assert_eq!(verification_state(&t), VerificationState::BothVerified);
    }

    #[test]
    fn test_role_of() {
        let t = assigned_task();
        assert_eq!(role_of(&t, t.creator_id), Some(Role::Requestor));
        assert_eq!(role_of(&t, t.doer_id.unwrap()), Some(Role::Doer));
        assert_eq!(role_of(&t, Uuid::new_v4()), None);
    }

    #[test]
    fn test_expected_code_is_cross_wise() {
        let t = assigned_task();
        assert_eq!(expected_code(&t, Role::Requestor), Some("222222"));
        assert_eq!(expected_code(&t, Role::Doer), Some("111111"));
    }

    #[test]
    fn test_expected_code_missing_before_approval() {
        let t = task();
        assert_eq!(expected_code(&t, Role::Requestor), None);
    }
}
