// Reminder Repository Port (Interface)

use crate::domain::{FireTime, Reminder, TaskId};
use crate::error::Result;
use async_trait::async_trait;

/// Result of an atomic decrement on a reminder row.
///
/// Tells the scheduler whether to re-arm. `NotFound` is a benign outcome:
/// a timer that lost a race against removal hits it and stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecrementOutcome {
    /// No row matched the key; safe no-op
    NotFound,
    /// Decremented; this many daily occurrences are still due
    Remaining(i64),
    /// Decremented to zero; the row was deleted
    Exhausted,
}

/// Reminder joined with its task's current text (reconciliation only).
///
/// `task_text` is `None` when the referenced task no longer exists; such
/// rows are stale and must not be re-armed.
#[derive(Debug, Clone)]
pub struct ReminderWithTask {
    pub reminder: Reminder,
    pub task_text: Option<String>,
}

/// Repository interface for Reminder persistence
#[async_trait]
pub trait ReminderRepository: Send + Sync {
    /// Insert a new reminder; rejects a duplicate (owner, task, fire_time) key
    async fn insert(&self, reminder: &Reminder) -> Result<()>;

    /// List all reminders for an owner
    async fn list(&self, owner: &str) -> Result<Vec<Reminder>>;

    /// List all reminders across all owners with resolved task text
    /// (used only by startup reconciliation)
    async fn list_all(&self) -> Result<Vec<ReminderWithTask>>;

    /// Find a reminder by its scheduling key
    async fn find(
        &self,
        owner: &str,
        task_id: &TaskId,
        fire_time: FireTime,
    ) -> Result<Option<Reminder>>;

    /// Atomically reduce days_remaining by 1, deleting the row when it
    /// reaches zero. A missing row is a safe no-op (`NotFound`).
    async fn decrement_or_delete(
        &self,
        owner: &str,
        task_id: &TaskId,
        fire_time: FireTime,
    ) -> Result<DecrementOutcome>;

    /// Delete a single reminder; returns false if no row matched
    async fn delete(&self, owner: &str, task_id: &TaskId, fire_time: FireTime) -> Result<bool>;

    /// Delete every reminder referencing a task; returns rows removed
    async fn delete_for_task(&self, owner: &str, task_id: &TaskId) -> Result<u64>;

    /// Delete every reminder for an owner; returns rows removed
    async fn clear(&self, owner: &str) -> Result<u64>;
}
