//! Tickler Reminder Engine - Main Entry Point
//!
//! Composition root: wires the SQLite repositories, the scheduler and the
//! notifier together, runs startup reconciliation, then idles until
//! shutdown while armed reminders fire. The chat front end that drives
//! the service layer is an external collaborator.

mod notifier;

use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use notifier::LogNotifier;
use tickler_core::application::{ReconciliationJob, ReminderScheduler};
use tickler_core::port::time_provider::SystemTimeProvider;
use tickler_core::port::TaskRepository;
use tickler_infra_sqlite::{
    create_pool, run_migrations, SqliteReminderRepository, SqliteTaskRepository,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_DB_PATH: &str = "~/.tickler/tasks.db";

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize logging
    let log_format = std::env::var("TICKLER_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("tickler=info"))
        .expect("Failed to create env filter");

    match log_format.as_str() {
        "json" => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        _ => {
            // Development: Pretty formatting with colors
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }

    info!("Tickler Reminder Engine v{} starting...", VERSION);

    // 2. Load configuration
    let db_path = std::env::var("TICKLER_DB_PATH")
        .unwrap_or_else(|_| shellexpand::tilde(DEFAULT_DB_PATH).into_owned());

    info!(db_path = %db_path, "Initializing database...");

    // 3. Initialize database (the only fatal startup failure)
    let pool = create_pool(&db_path)
        .await
        .map_err(|e| anyhow::anyhow!("DB pool creation failed: {}", e))?;
    run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;

    // 4. Setup dependencies (DI wiring)
    let time_provider = Arc::new(SystemTimeProvider);
    let task_repo = Arc::new(SqliteTaskRepository::new(pool.clone()));
    let reminder_repo = Arc::new(SqliteReminderRepository::new(pool.clone()));
    let notifier = Arc::new(LogNotifier);

    let scheduler = Arc::new(ReminderScheduler::new(
        task_repo.clone(),
        reminder_repo.clone(),
        notifier,
        time_provider,
    ));

    let stats = task_repo
        .stats()
        .await
        .map_err(|e| anyhow::anyhow!("Stats query failed: {}", e))?;
    info!(
        owners = stats.owners,
        tasks = stats.tasks,
        reminders = stats.reminders,
        "Store loaded"
    );

    // 5. Startup reconciliation: re-arm every persisted reminder before
    // any command can reach the services.
    info!("Running reminder reconciliation...");
    let reconciliation = ReconciliationJob::new(reminder_repo.clone(), scheduler.clone());
    let armed = reconciliation
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("Reconciliation failed: {}", e))?;
    info!(armed, "Reconciliation completed");

    info!("System ready. Waiting for reminders to fire...");
    info!("Press Ctrl+C to shutdown");

    // 6. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    // 7. Graceful shutdown: drop all armed timers
    scheduler.shutdown().await;
    pool.close().await;

    info!("Shutdown complete.");

    Ok(())
}
