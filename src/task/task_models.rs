use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Active,
    Completed,
    Cancelled,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Active => "active",
            TaskStatus::Completed => "completed",
            TaskStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    Normal,
    Joint,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Normal => "normal",
            TaskType::Joint => "joint",
        }
    }

    pub fn parse(s: &str) -> Option<TaskType> {
        match s {
            "normal" => Some(TaskType::Normal),
            "joint" => Some(TaskType::Joint),
            _ => None,
        }
    }
}

impl std::fmt::Display for TaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A marketplace task row. Status and task_type are stored as text columns.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Task {
    pub id: Uuid,
    pub creator_id: Uuid,
    pub doer_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub reward: i64,
    pub deadline: Option<DateTime<Utc>>,
    pub task_type: String,
    pub status: String,
    pub requestor_verification_code: Option<String>,
    pub doer_verification_code: Option<String>,
    pub is_requestor_verified: bool,
    pub is_doer_verified: bool,
    pub is_requestor_rated: bool,
    pub is_doer_rated: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn is_active(&self) -> bool {
        self.status == TaskStatus::Active.as_str()
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed.as_str()
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == TaskStatus::Cancelled.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_status_display() {
        assert_eq!(TaskStatus::Active.to_string(), "active");
        assert_eq!(TaskStatus::Completed.to_string(), "completed");
        assert_eq!(TaskStatus::Cancelled.to_string(), "cancelled");
    }

    #[test]
    fn test_task_type_parse() {
        assert_eq!(TaskType::parse("normal"), Some(TaskType::Normal));
        assert_eq!(TaskType::parse("joint"), Some(TaskType::Joint));
        assert_eq!(TaskType::parse("weekly"), None);
    }
}
