// Task Repository Port (Interface)

use crate::domain::{Task, TaskId};
use crate::error::Result;
use async_trait::async_trait;

/// Aggregate counts for startup logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    pub owners: i64,
    pub tasks: i64,
    pub reminders: i64,
}

/// Repository interface for Task persistence
///
/// Every write is atomic with respect to the persisted representation;
/// a concurrent read observes either the pre- or post-state, never a
/// partial write.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Insert a new task
    async fn insert(&self, task: &Task) -> Result<()>;

    /// Find task by ID
    async fn find(&self, owner: &str, id: &TaskId) -> Result<Option<Task>>;

    /// List all tasks for an owner in stable insertion order
    async fn list(&self, owner: &str) -> Result<Vec<Task>>;

    /// Set the done flag; returns false if no such task
    async fn set_done(&self, owner: &str, id: &TaskId, done: bool) -> Result<bool>;

    /// Replace the task text; returns false if no such task
    async fn set_text(&self, owner: &str, id: &TaskId, text: &str) -> Result<bool>;

    /// Delete a task (cascades to its reminders); returns false if no such task
    async fn delete(&self, owner: &str, id: &TaskId) -> Result<bool>;

    /// Delete all tasks for an owner (cascades to their reminders);
    /// returns the number of tasks removed
    async fn clear(&self, owner: &str) -> Result<u64>;

    /// Aggregate counts across all owners (startup logging)
    async fn stats(&self) -> Result<StoreStats>;
}
