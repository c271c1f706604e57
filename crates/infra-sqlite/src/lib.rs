// Tickler Infrastructure - SQLite Adapter
// Implements: TaskRepository, ReminderRepository

mod connection;
mod error;
mod migration;
mod reminder_repository;
mod task_repository;

pub use connection::create_pool;
pub use migration::run_migrations;
pub use reminder_repository::SqliteReminderRepository;
pub use task_repository::SqliteTaskRepository;

// Note: sqlx::Error conversion lives in error.rs because Rust's orphan
// rules forbid implementing From<sqlx::Error> for AppError here.
