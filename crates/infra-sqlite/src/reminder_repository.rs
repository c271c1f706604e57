// SQLite ReminderRepository Implementation

use crate::error::map_sqlx_error;
use async_trait::async_trait;
use sqlx::SqlitePool;
use tickler_core::domain::{FireTime, Reminder, TaskId};
use tickler_core::error::{AppError, Result};
use tickler_core::port::{DecrementOutcome, ReminderRepository, ReminderWithTask};

pub struct SqliteReminderRepository {
    pool: SqlitePool,
}

impl SqliteReminderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ReminderRow {
    owner: String,
    task_id: String,
    fire_time: String,
    days_remaining: i64,
}

impl TryFrom<ReminderRow> for Reminder {
    type Error = AppError;

    fn try_from(row: ReminderRow) -> Result<Self> {
        let fire_time: FireTime = row
            .fire_time
            .parse()
            .map_err(|_| AppError::Database(format!("malformed fire_time: {}", row.fire_time)))?;
        Ok(Reminder {
            owner: row.owner,
            task_id: row.task_id,
            fire_time,
            days_remaining: row.days_remaining,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ReminderJoinRow {
    owner: String,
    task_id: String,
    fire_time: String,
    days_remaining: i64,
    task_text: Option<String>,
}

#[async_trait]
impl ReminderRepository for SqliteReminderRepository {
    async fn insert(&self, reminder: &Reminder) -> Result<()> {
        sqlx::query(
            "INSERT INTO reminders (owner, task_id, fire_time, days_remaining) VALUES (?, ?, ?, ?)",
        )
        .bind(&reminder.owner)
        .bind(&reminder.task_id)
        .bind(reminder.fire_time.to_string())
        .bind(reminder.days_remaining)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn list(&self, owner: &str) -> Result<Vec<Reminder>> {
        let rows = sqlx::query_as::<_, ReminderRow>(
            "SELECT owner, task_id, fire_time, days_remaining FROM reminders \
             WHERE owner = ? ORDER BY id",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(Reminder::try_from).collect()
    }

    async fn list_all(&self) -> Result<Vec<ReminderWithTask>> {
        // LEFT JOIN so stale rows (task gone) surface with task_text NULL
        // instead of disappearing from reconciliation.
        let rows = sqlx::query_as::<_, ReminderJoinRow>(
            "SELECT r.owner, r.task_id, r.fire_time, r.days_remaining, t.text AS task_text \
             FROM reminders r LEFT JOIN tasks t ON r.task_id = t.id \
             ORDER BY r.id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter()
            .map(|row| {
                let task_text = row.task_text.clone();
                let reminder = Reminder::try_from(ReminderRow {
                    owner: row.owner,
                    task_id: row.task_id,
                    fire_time: row.fire_time,
                    days_remaining: row.days_remaining,
                })?;
                Ok(ReminderWithTask {
                    reminder,
                    task_text,
                })
            })
            .collect()
    }

    async fn find(
        &self,
        owner: &str,
        task_id: &TaskId,
        fire_time: FireTime,
    ) -> Result<Option<Reminder>> {
        let row = sqlx::query_as::<_, ReminderRow>(
            "SELECT owner, task_id, fire_time, days_remaining FROM reminders \
             WHERE owner = ? AND task_id = ? AND fire_time = ?",
        )
        .bind(owner)
        .bind(task_id)
        .bind(fire_time.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(Reminder::try_from).transpose()
    }

    async fn decrement_or_delete(
        &self,
        owner: &str,
        task_id: &TaskId,
        fire_time: FireTime,
    ) -> Result<DecrementOutcome> {
        // Transaction so the decrement and the exhaustion delete are one
        // atomic step against concurrent fires and removals.
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let updated = sqlx::query(
            "UPDATE reminders SET days_remaining = days_remaining - 1 \
             WHERE owner = ? AND task_id = ? AND fire_time = ?",
        )
        .bind(owner)
        .bind(task_id)
        .bind(fire_time.to_string())
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        if updated.rows_affected() == 0 {
            tx.rollback().await.map_err(map_sqlx_error)?;
            return Ok(DecrementOutcome::NotFound);
        }

        let remaining: i64 = sqlx::query_scalar(
            "SELECT days_remaining FROM reminders \
             WHERE owner = ? AND task_id = ? AND fire_time = ?",
        )
        .bind(owner)
        .bind(task_id)
        .bind(fire_time.to_string())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        if remaining <= 0 {
            sqlx::query(
                "DELETE FROM reminders WHERE owner = ? AND task_id = ? AND fire_time = ?",
            )
            .bind(owner)
            .bind(task_id)
            .bind(fire_time.to_string())
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

            tx.commit().await.map_err(map_sqlx_error)?;
            Ok(DecrementOutcome::Exhausted)
        } else {
            tx.commit().await.map_err(map_sqlx_error)?;
            Ok(DecrementOutcome::Remaining(remaining))
        }
    }

    async fn delete(&self, owner: &str, task_id: &TaskId, fire_time: FireTime) -> Result<bool> {
        let result = sqlx::query(
            "DELETE FROM reminders WHERE owner = ? AND task_id = ? AND fire_time = ?",
        )
        .bind(owner)
        .bind(task_id)
        .bind(fire_time.to_string())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_for_task(&self, owner: &str, task_id: &TaskId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM reminders WHERE owner = ? AND task_id = ?")
            .bind(owner)
            .bind(task_id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }

    async fn clear(&self, owner: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM reminders WHERE owner = ?")
            .bind(owner)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }
}
