// SQLite TaskRepository Implementation

use crate::error::map_sqlx_error;
use async_trait::async_trait;
use sqlx::SqlitePool;
use tickler_core::domain::{Task, TaskId};
use tickler_core::error::Result;
use tickler_core::port::{StoreStats, TaskRepository};

pub struct SqliteTaskRepository {
    pool: SqlitePool,
}

impl SqliteTaskRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct TaskRow {
    id: String,
    owner: String,
    text: String,
    done: i64,
    created_at: i64,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Task {
            id: row.id,
            owner: row.owner,
            text: row.text,
            done: row.done != 0,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    async fn insert(&self, task: &Task) -> Result<()> {
        sqlx::query(
            "INSERT INTO tasks (id, owner, text, done, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&task.id)
        .bind(&task.owner)
        .bind(&task.text)
        .bind(if task.done { 1 } else { 0 })
        .bind(task.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn find(&self, owner: &str, id: &TaskId) -> Result<Option<Task>> {
        let row = sqlx::query_as::<_, TaskRow>("SELECT * FROM tasks WHERE owner = ? AND id = ?")
            .bind(owner)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(Task::from))
    }

    async fn list(&self, owner: &str) -> Result<Vec<Task>> {
        let rows = sqlx::query_as::<_, TaskRow>(
            "SELECT * FROM tasks WHERE owner = ? ORDER BY created_at, id",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Task::from).collect())
    }

    async fn set_done(&self, owner: &str, id: &TaskId, done: bool) -> Result<bool> {
        let result = sqlx::query("UPDATE tasks SET done = ? WHERE owner = ? AND id = ?")
            .bind(if done { 1 } else { 0 })
            .bind(owner)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_text(&self, owner: &str, id: &TaskId, text: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE tasks SET text = ? WHERE owner = ? AND id = ?")
            .bind(text)
            .bind(owner)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, owner: &str, id: &TaskId) -> Result<bool> {
        // ON DELETE CASCADE removes dependent reminder rows
        let result = sqlx::query("DELETE FROM tasks WHERE owner = ? AND id = ?")
            .bind(owner)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn clear(&self, owner: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM tasks WHERE owner = ?")
            .bind(owner)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }

    async fn stats(&self) -> Result<StoreStats> {
        let owners: i64 = sqlx::query_scalar("SELECT COUNT(DISTINCT owner) FROM tasks")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        let tasks: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tasks")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        let reminders: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reminders")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(StoreStats {
            owners,
            tasks,
            reminders,
        })
    }
}
