//! ReconciliationJob - Rebuild timers from persisted state at startup
//!
//! A fresh process has no in-memory timers, so every persisted reminder
//! must be re-armed before any command is accepted or it is silently
//! lost. Runs exactly once: `run` consumes the job.

use crate::application::scheduler::ReminderScheduler;
use crate::error::Result;
use crate::port::ReminderRepository;
use std::sync::Arc;
use tracing::{info, warn};

pub struct ReconciliationJob {
    reminders: Arc<dyn ReminderRepository>,
    scheduler: Arc<ReminderScheduler>,
}

impl ReconciliationJob {
    pub fn new(reminders: Arc<dyn ReminderRepository>, scheduler: Arc<ReminderScheduler>) -> Self {
        Self {
            reminders,
            scheduler,
        }
    }

    /// Re-arm all persisted reminders.
    ///
    /// Rows whose task no longer resolves are stale: they are skipped and
    /// garbage-collected rather than re-armed.
    ///
    /// # Returns
    /// Number of reminders armed
    pub async fn run(self) -> Result<usize> {
        let rows = self.reminders.list_all().await?;
        let total = rows.len();
        let mut armed = 0;

        for row in rows {
            let reminder = row.reminder;
            if row.task_text.is_none() {
                warn!(
                    key = %reminder.key(),
                    "Skipping stale reminder, task no longer exists"
                );
                if let Err(e) = self
                    .reminders
                    .delete(&reminder.owner, &reminder.task_id, reminder.fire_time)
                    .await
                {
                    warn!(
                        key = %reminder.key(),
                        error = %e,
                        "Failed to garbage-collect stale reminder"
                    );
                }
                continue;
            }

            self.scheduler.arm(&reminder).await;
            armed += 1;
        }

        info!(armed, total, "Reminder reconciliation complete");
        Ok(armed)
    }
}
