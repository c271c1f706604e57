// Application Layer - Use Cases and Services

pub mod reconcile;
pub mod reminders;
pub mod scheduler;
pub mod tasks;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports
pub use reconcile::ReconciliationJob;
pub use reminders::ReminderService;
pub use scheduler::ReminderScheduler;
pub use tasks::TaskService;
