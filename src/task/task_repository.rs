use crate::{error::Result, task::task_models::Task};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct TaskRepository {
    pool: PgPool,
}

pub struct TaskFilters {
    pub status: Option<String>,
    pub task_type: Option<String>,
}

impl TaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self, filters: TaskFilters) -> Result<Vec<Task>> {
        let mut query = "SELECT * FROM tasks WHERE 1 = 1".to_string();
        let mut params_count = 0;

        if filters.status.is_some() {
            params_count += 1;
            query.push_str(&format!(" AND status = ${}", params_count));
        }

        if filters.task_type.is_some() {
            params_count += 1;
            query.push_str(&format!(" AND task_type = ${}", params_count));
        }

        query.push_str(" ORDER BY created_at DESC");

        let mut db_query = sqlx::query_as::<_, Task>(&query);

        if let Some(status) = filters.status {
            db_query = db_query.bind(status);
        }

        if let Some(task_type) = filters.task_type {
            db_query = db_query.bind(task_type);
        }

        let tasks = db_query.fetch_all(&self.pool).await?;
        Ok(tasks)
    }

    pub async fn find_by_creator(&self, creator_id: Uuid) -> Result<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(
            "SELECT * FROM tasks WHERE creator_id = $1 ORDER BY created_at DESC",
        )
        .bind(creator_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(tasks)
    }

    pub async fn find_by_doer(&self, doer_id: Uuid) -> Result<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(
            "SELECT * FROM tasks WHERE doer_id = $1 ORDER BY created_at DESC",
        )
        .bind(doer_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(tasks)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    pub async fn count_active_by_creator(&self, creator_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM tasks WHERE creator_id = $1 AND status = 'active'",
        )
        .bind(creator_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    pub async fn create(
        &self,
        creator_id: Uuid,
        title: &str,
        description: Option<&str>,
        location: Option<&str>,
        reward: i64,
        deadline: Option<DateTime<Utc>>,
        task_type: &str,
    ) -> Result<Task> {
        let task = sqlx::query_as::<_, Task>(
            "INSERT INTO tasks (creator_id, title, description, location, reward, deadline, task_type)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *",
        )
        .bind(creator_id)
        .bind(title)
        .bind(description)
        .bind(location)
        .bind(reward)
        .bind(deadline)
        .bind(task_type)
        .fetch_one(&self.pool)
        .await?;

        Ok(task)
    }

    /// Overwrites listing fields only. Lifecycle columns (status, doer,
    /// codes, flags) are never touched here.
    pub async fn update_fields(
        &self,
        id: Uuid,
        creator_id: Uuid,
        title: Option<&str>,
        description: Option<&str>,
        location: Option<&str>,
        reward: Option<i64>,
        deadline: Option<DateTime<Utc>>,
    ) -> Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(
            "UPDATE tasks SET
                title = COALESCE($1, title),
                description = COALESCE($2, description),
                location = COALESCE($3, location),
                reward = COALESCE($4, reward),
                deadline = COALESCE($5, deadline),
                updated_at = NOW()
             WHERE id = $6 AND creator_id = $7
             RETURNING *",
        )
        .bind(title)
        .bind(description)
        .bind(location)
        .bind(reward)
        .bind(deadline)
        .bind(id)
        .bind(creator_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    /// Moves an active (or already cancelled) task to cancelled. Completed
    /// tasks are left untouched; the caller decides how to report that.
    pub async fn cancel(&self, id: Uuid, creator_id: Uuid) -> Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(
            "UPDATE tasks SET status = 'cancelled', updated_at = NOW()
             WHERE id = $1 AND creator_id = $2 AND status <> 'completed'
             RETURNING *",
        )
        .bind(id)
        .bind(creator_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    /// Flips one party's verified flag. `requestor` selects which flag.
    pub async fn set_verified(&self, id: Uuid, requestor: bool) -> Result<Task> {
        let query = if requestor {
            "UPDATE tasks SET is_requestor_verified = true, updated_at = NOW()
             WHERE id = $1 RETURNING *"
        } else {
            "UPDATE tasks SET is_doer_verified = true, updated_at = NOW()
             WHERE id = $1 RETURNING *"
        };

        let task = sqlx::query_as::<_, Task>(query)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(task)
    }
}
