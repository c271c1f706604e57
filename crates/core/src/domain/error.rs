// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid fire time '{0}', expected HH:MM")]
    InvalidFireTime(String),

    #[error("Invalid day count: {0} (must be at least 1)")]
    InvalidDayCount(i64),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
