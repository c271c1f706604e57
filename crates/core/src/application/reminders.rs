//! ReminderService - Attach daily reminders to tasks
//!
//! Validates input, persists the reminder, then arms the scheduler. The
//! row is written before the timer exists so a crash between the two is
//! repaired by startup reconciliation, never the other way around.

use crate::application::scheduler::ReminderScheduler;
use crate::domain::{FireTime, Reminder, ReminderKey, TaskId};
use crate::error::{AppError, Result};
use crate::port::{ReminderRepository, TaskRepository};
use std::sync::Arc;
use tracing::info;

pub struct ReminderService {
    tasks: Arc<dyn TaskRepository>,
    reminders: Arc<dyn ReminderRepository>,
    scheduler: Arc<ReminderScheduler>,
}

impl ReminderService {
    pub fn new(
        tasks: Arc<dyn TaskRepository>,
        reminders: Arc<dyn ReminderRepository>,
        scheduler: Arc<ReminderScheduler>,
    ) -> Self {
        Self {
            tasks,
            reminders,
            scheduler,
        }
    }

    /// Create and arm a daily reminder for an existing task.
    ///
    /// A duplicate (owner, task, fire_time) key is rejected with a
    /// Conflict so every armed timer is unambiguously cancellable.
    pub async fn create(
        &self,
        owner: &str,
        task_id: &TaskId,
        time_str: &str,
        days: i64,
    ) -> Result<Reminder> {
        let fire_time: FireTime = time_str.parse()?;
        if days < 1 {
            return Err(crate::domain::DomainError::InvalidDayCount(days).into());
        }

        self.tasks
            .find(owner, task_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("task {task_id}")))?;

        if self
            .reminders
            .find(owner, task_id, fire_time)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "a reminder for this task at {fire_time} already exists"
            )));
        }

        let reminder = Reminder::new(owner, task_id.clone(), fire_time, days);
        // Persist first; arming an unpersisted reminder could not survive
        // a restart.
        self.reminders.insert(&reminder).await?;
        self.scheduler.arm(&reminder).await;

        info!(key = %reminder.key(), days, "Reminder created");
        Ok(reminder)
    }

    /// List an owner's reminders
    pub async fn list(&self, owner: &str) -> Result<Vec<Reminder>> {
        self.reminders.list(owner).await
    }

    /// Remove a single reminder and cancel its timer
    pub async fn remove(&self, owner: &str, task_id: &TaskId, time_str: &str) -> Result<()> {
        let fire_time: FireTime = time_str.parse()?;
        let key = ReminderKey {
            owner: owner.to_string(),
            task_id: task_id.clone(),
            fire_time,
        };

        self.scheduler.cancel(&key).await;
        if !self.reminders.delete(owner, task_id, fire_time).await? {
            return Err(AppError::NotFound(format!("reminder {key}")));
        }

        info!(key = %key, "Reminder removed");
        Ok(())
    }

    /// Remove all of an owner's reminders and cancel their timers
    pub async fn clear(&self, owner: &str) -> Result<u64> {
        self.scheduler.cancel_for_owner(owner).await;
        let removed = self.reminders.clear(owner).await?;

        info!(owner = %owner, removed, "Reminders cleared");
        Ok(removed)
    }
}
