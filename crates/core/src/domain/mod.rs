// Domain Layer - Pure business logic and entities

pub mod error;
pub mod reminder;
pub mod task;

// Re-exports
pub use error::DomainError;
pub use reminder::{FireTime, Reminder, ReminderKey};
pub use task::{Owner, Task, TaskId};
