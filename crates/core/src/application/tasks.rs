//! TaskService - Task CRUD plus the reminder cascade
//!
//! No temporal logic here; deleting or clearing tasks cancels the
//! matching timers and removes dependent reminder rows so a later fire
//! hits nothing.

use crate::application::scheduler::ReminderScheduler;
use crate::domain::{Task, TaskId};
use crate::error::{AppError, Result};
use crate::port::{IdProvider, ReminderRepository, TaskRepository, TimeProvider};
use std::sync::Arc;
use tracing::info;

pub struct TaskService {
    tasks: Arc<dyn TaskRepository>,
    reminders: Arc<dyn ReminderRepository>,
    scheduler: Arc<ReminderScheduler>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
}

impl TaskService {
    pub fn new(
        tasks: Arc<dyn TaskRepository>,
        reminders: Arc<dyn ReminderRepository>,
        scheduler: Arc<ReminderScheduler>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            tasks,
            reminders,
            scheduler,
            id_provider,
            time_provider,
        }
    }

    /// Create a task with a fresh collision-free id
    pub async fn create(&self, owner: &str, text: &str) -> Result<Task> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::Validation("task text must not be empty".into()));
        }

        let task = Task::new(
            self.id_provider.generate_id(),
            owner,
            text,
            self.time_provider.now_millis(),
        );
        self.tasks.insert(&task).await?;

        info!(owner = %owner, task_id = %task.id, "Task created");
        Ok(task)
    }

    /// List tasks in stable insertion order
    pub async fn list(&self, owner: &str) -> Result<Vec<Task>> {
        self.tasks.list(owner).await
    }

    /// Resolve a user-facing 1-based index to a task.
    ///
    /// Index validation happens here so malformed input is rejected
    /// before any mutation.
    pub async fn get_by_index(&self, owner: &str, index: usize) -> Result<Task> {
        if index == 0 {
            return Err(AppError::Validation("task numbers start at 1".into()));
        }
        let tasks = self.tasks.list(owner).await?;
        tasks
            .get(index - 1)
            .cloned()
            .ok_or_else(|| AppError::Validation(format!("invalid task number: {index}")))
    }

    /// Set or clear the done flag
    pub async fn set_done(&self, owner: &str, id: &TaskId, done: bool) -> Result<()> {
        if !self.tasks.set_done(owner, id, done).await? {
            return Err(AppError::NotFound(format!("task {id}")));
        }
        Ok(())
    }

    /// Replace the task text
    pub async fn set_text(&self, owner: &str, id: &TaskId, text: &str) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::Validation("task text must not be empty".into()));
        }
        if !self.tasks.set_text(owner, id, text).await? {
            return Err(AppError::NotFound(format!("task {id}")));
        }
        Ok(())
    }

    /// Delete a task, cancelling its timers and removing its reminders
    pub async fn delete(&self, owner: &str, id: &TaskId) -> Result<Task> {
        let task = self
            .tasks
            .find(owner, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("task {id}")))?;

        // Cancel before removing rows so a timer cannot fire mid-delete;
        // a fire that slips through hits a missing row and no-ops.
        self.scheduler.cancel_for_task(owner, id).await;
        self.reminders.delete_for_task(owner, id).await?;
        self.tasks.delete(owner, id).await?;

        info!(owner = %owner, task_id = %id, "Task deleted");
        Ok(task)
    }

    /// Delete all of an owner's tasks and reminders; returns tasks removed
    pub async fn clear(&self, owner: &str) -> Result<u64> {
        self.scheduler.cancel_for_owner(owner).await;
        self.reminders.clear(owner).await?;
        let removed = self.tasks.clear(owner).await?;

        info!(owner = %owner, removed, "Tasks cleared");
        Ok(removed)
    }
}
