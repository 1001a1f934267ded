use crate::{error::Result, task::task_models::Task};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct RatingRepository {
    pool: PgPool,
}

impl RatingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Records one party's rating in a single transaction: flips the
    /// caller's rated flag, writes the value onto the counterparty's profile
    /// aggregate (last-write-wins), and completes the task once both flags
    /// are set.
    pub async fn record(
        &self,
        task_id: Uuid,
        as_requestor: bool,
        counterparty_id: Uuid,
        rating: i16,
    ) -> Result<Task> {
        let mut tx = self.pool.begin().await?;

        let flag_query = if as_requestor {
            "UPDATE tasks SET is_requestor_rated = true, updated_at = NOW()
             WHERE id = $1 RETURNING *"
        } else {
            "UPDATE tasks SET is_doer_rated = true, updated_at = NOW()
             WHERE id = $1 RETURNING *"
        };

        let task = sqlx::query_as::<_, Task>(flag_query)
            .bind(task_id)
            .fetch_one(&mut *tx)
            .await?;

        // The aggregate column is named after the giver's role.
        let aggregate_query = if as_requestor {
            "UPDATE users SET requestor_rating = $1 WHERE id = $2"
        } else {
            "UPDATE users SET doer_rating = $1 WHERE id = $2"
        };

        sqlx::query(aggregate_query)
            .bind(rating)
            .bind(counterparty_id)
            .execute(&mut *tx)
            .await?;

        let completed = sqlx::query_as::<_, Task>(
            "UPDATE tasks SET status = 'completed', updated_at = NOW()
             WHERE id = $1 AND is_requestor_rated AND is_doer_rated AND status = 'active'
             RETURNING *",
        )
        .bind(task_id)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(completed.unwrap_or(task))
    }
}
