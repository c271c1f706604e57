// Task Domain Model

use serde::{Deserialize, Serialize};

/// Task ID (UUID v4, injected via IdProvider)
pub type TaskId = String;

/// Owner identifier - namespaces all tasks and reminders
pub type Owner = String;

/// Task entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub owner: Owner,
    pub text: String,
    pub done: bool,
    pub created_at: i64, // epoch ms
}

impl Task {
    /// Create a new task
    ///
    /// # Arguments
    ///
    /// * `id` - Unique task ID (injected, not generated)
    /// * `owner` - Owner identifier
    /// * `text` - Task description
    /// * `created_at` - Creation timestamp in epoch ms (injected, not system time)
    pub fn new(
        id: impl Into<TaskId>,
        owner: impl Into<Owner>,
        text: impl Into<String>,
        created_at: i64,
    ) -> Self {
        Self {
            id: id.into(),
            owner: owner.into(),
            text: text.into(),
            done: false,
            created_at,
        }
    }
}
