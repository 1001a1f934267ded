use crate::{
    application::application_models::TaskApplication,
    error::{AppError, Result},
    task::task_models::Task,
};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct ApplicationRepository {
    pool: PgPool,
}

impl ApplicationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<TaskApplication>> {
        let application =
            sqlx::query_as::<_, TaskApplication>("SELECT * FROM task_applications WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(application)
    }

    pub async fn find_by_task(&self, task_id: Uuid) -> Result<Vec<TaskApplication>> {
        let applications = sqlx::query_as::<_, TaskApplication>(
            "SELECT * FROM task_applications WHERE task_id = $1 ORDER BY created_at ASC",
        )
        .bind(task_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(applications)
    }

    pub async fn find_by_applicant(&self, applicant_id: Uuid) -> Result<Vec<TaskApplication>> {
        let applications = sqlx::query_as::<_, TaskApplication>(
            "SELECT * FROM task_applications WHERE applicant_id = $1 ORDER BY created_at DESC",
        )
        .bind(applicant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(applications)
    }

    pub async fn exists(&self, task_id: Uuid, applicant_id: Uuid) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM task_applications WHERE task_id = $1 AND applicant_id = $2",
        )
        .bind(task_id)
        .bind(applicant_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }

    /// Inserts a pending application. The (task_id, applicant_id) unique
    /// constraint backstops the caller's pre-insert existence check, so a
    /// concurrent duplicate surfaces as `AlreadyApplied` instead of a row.
    pub async fn create(
        &self,
        task_id: Uuid,
        applicant_id: Uuid,
        message: Option<&str>,
    ) -> Result<TaskApplication> {
        let result = sqlx::query_as::<_, TaskApplication>(
            "INSERT INTO task_applications (task_id, applicant_id, message)
             VALUES ($1, $2, $3)
             RETURNING *",
        )
        .bind(task_id)
        .bind(applicant_id)
        .bind(message)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(application) => Ok(application),
            Err(sqlx::Error::Database(e)) if e.code().as_deref() == Some("23505") => {
                Err(AppError::AlreadyApplied)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Approves one application in a single transaction: assigns the doer
    /// and fresh verification codes on the task, marks the chosen
    /// application approved and every sibling rejected. Returns `None` when
    /// the application is not pending, the caller is not the creator, or
    /// the task is not an unassigned active task.
    pub async fn approve(
        &self,
        application_id: Uuid,
        creator_id: Uuid,
        requestor_code: &str,
        doer_code: &str,
    ) -> Result<Option<(Task, TaskApplication)>> {
        let mut tx = self.pool.begin().await?;

        let application = sqlx::query_as::<_, TaskApplication>(
            "SELECT * FROM task_applications WHERE id = $1 FOR UPDATE",
        )
        .bind(application_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(application) = application else {
            return Ok(None);
        };
        if application.status != "pending" {
            return Ok(None);
        }

        let task = sqlx::query_as::<_, Task>(
            "UPDATE tasks SET
                doer_id = $1,
                requestor_verification_code = $2,
                doer_verification_code = $3,
                is_requestor_verified = false,
                is_doer_verified = false,
                is_requestor_rated = false,
                is_doer_rated = false,
                updated_at = NOW()
             WHERE id = $4 AND creator_id = $5 AND status = 'active' AND doer_id IS NULL
             RETURNING *",
        )
        .bind(application.applicant_id)
        .bind(requestor_code)
        .bind(doer_code)
        .bind(application.task_id)
        .bind(creator_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(task) = task else {
            return Ok(None);
        };

        let approved = sqlx::query_as::<_, TaskApplication>(
            "UPDATE task_applications SET status = 'approved' WHERE id = $1 RETURNING *",
        )
        .bind(application_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE task_applications SET status = 'rejected'
             WHERE task_id = $1 AND id <> $2",
        )
        .bind(application.task_id)
        .bind(application_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some((task, approved)))
    }

    pub async fn reject(&self, application_id: Uuid) -> Result<Option<TaskApplication>> {
        let application = sqlx::query_as::<_, TaskApplication>(
            "UPDATE task_applications SET status = 'rejected'
             WHERE id = $1
             RETURNING *",
        )
        .bind(application_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(application)
    }
}
