// Port Layer - Interfaces for external dependencies

pub mod id_provider; // For deterministic testing
pub mod notifier;
pub mod reminder_repository;
pub mod task_repository;
pub mod time_provider;

// Re-exports
pub use id_provider::IdProvider;
pub use notifier::Notifier;
pub use reminder_repository::{DecrementOutcome, ReminderRepository, ReminderWithTask};
pub use task_repository::{StoreStats, TaskRepository};
pub use time_provider::TimeProvider;
