// Shared wiring for integration tests: real SQLite repositories behind
// the core services, with a collecting notifier and a fixed clock.
// Not every test binary uses every helper.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use std::sync::{Arc, Mutex};
use tickler_core::application::{ReminderScheduler, ReminderService, TaskService};
use tickler_core::error::Result;
use tickler_core::port::id_provider::UuidProvider;
use tickler_core::port::{Notifier, TimeProvider};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use std::str::FromStr;
use tickler_infra_sqlite::{run_migrations, SqliteReminderRepository, SqliteTaskRepository};

#[derive(Default)]
pub struct CollectingNotifier {
    delivered: Mutex<Vec<(String, String)>>,
}

impl CollectingNotifier {
    pub fn delivered(&self) -> Vec<(String, String)> {
        self.delivered.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for CollectingNotifier {
    async fn deliver(&self, owner: &str, message: &str) -> Result<()> {
        self.delivered
            .lock()
            .unwrap()
            .push((owner.to_string(), message.to_string()));
        Ok(())
    }
}

/// Fixed local clock for deterministic scheduling; `now_millis` ticks
/// 1ms per call so sequential inserts get distinct, ordered timestamps
/// (the repositories rely on a monotonic clock for insertion order).
pub struct FixedTime {
    base: NaiveDateTime,
    ticks: std::sync::atomic::AtomicI64,
}

impl FixedTime {
    pub fn new(base: NaiveDateTime) -> Self {
        Self {
            base,
            ticks: std::sync::atomic::AtomicI64::new(0),
        }
    }
}

impl TimeProvider for FixedTime {
    fn now_millis(&self) -> i64 {
        self.base.and_utc().timestamp_millis()
            + self.ticks.fetch_add(1, std::sync::atomic::Ordering::SeqCst)
    }

    fn now_local(&self) -> NaiveDateTime {
        self.base
    }
}

pub fn morning() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(6, 0, 0)
        .unwrap()
}

pub struct Harness {
    pub pool: sqlx::SqlitePool,
    pub task_repo: Arc<SqliteTaskRepository>,
    pub reminder_repo: Arc<SqliteReminderRepository>,
    pub scheduler: Arc<ReminderScheduler>,
    pub tasks: TaskService,
    pub reminders: ReminderService,
    pub notifier: Arc<CollectingNotifier>,
}

pub async fn harness(db_url: &str, now: NaiveDateTime) -> Harness {
    // Pool setup does real I/O on sqlx's worker threads. Tests run with a
    // paused tokio clock, and auto-advance would hit the pool's acquire
    // timeout before the handshake finishes — so build the pool on a side
    // runtime whose clock runs normally. The runtime is process-wide and
    // never dropped, so sqlx's background tasks (e.g. returning the
    // connection to the pool) run to completion.
    fn side_runtime() -> &'static tokio::runtime::Runtime {
        static RT: std::sync::OnceLock<tokio::runtime::Runtime> = std::sync::OnceLock::new();
        RT.get_or_init(|| {
            tokio::runtime::Builder::new_multi_thread()
                .worker_threads(1)
                .enable_all()
                .build()
                .unwrap()
        })
    }

    let pool = {
        let url = db_url.to_string();
        side_runtime()
            .spawn(async move {
                    // Mirrors infra's create_pool connect options, tuned
                    // for the paused clock: a single long-lived connection
                    // and no before-acquire ping, so acquiring never waits
                    // on a (virtual) timeout.
                    let options = SqliteConnectOptions::from_str(&url)
                        .unwrap()
                        .journal_mode(SqliteJournalMode::Wal)
                        .busy_timeout(std::time::Duration::from_secs(5))
                        .foreign_keys(true)
                        .create_if_missing(true);
                    let pool = SqlitePoolOptions::new()
                        .max_connections(1)
                        .test_before_acquire(false)
                        .idle_timeout(None)
                        .max_lifetime(None)
                        .connect_with(options)
                        .await
                        .unwrap();
                    run_migrations(&pool).await.unwrap();
                    // Wait until the background task has returned the
                    // setup connection to the idle queue; an acquire on
                    // the paused runtime cannot wait for it.
                    while pool.num_idle() == 0 {
                        tokio::time::sleep(std::time::Duration::from_millis(1)).await;
                    }
                    pool
                })
            .await
            .unwrap()
    };

    let task_repo = Arc::new(SqliteTaskRepository::new(pool.clone()));
    let reminder_repo = Arc::new(SqliteReminderRepository::new(pool.clone()));
    let notifier = Arc::new(CollectingNotifier::default());
    let time = Arc::new(FixedTime::new(now));

    let scheduler = Arc::new(ReminderScheduler::new(
        task_repo.clone(),
        reminder_repo.clone(),
        notifier.clone(),
        time.clone(),
    ));

    let tasks = TaskService::new(
        task_repo.clone(),
        reminder_repo.clone(),
        scheduler.clone(),
        Arc::new(UuidProvider),
        time,
    );
    let reminders = ReminderService::new(
        task_repo.clone(),
        reminder_repo.clone(),
        scheduler.clone(),
    );

    Harness {
        pool,
        task_repo,
        reminder_repo,
        scheduler,
        tasks,
        reminders,
        notifier,
    }
}

/// Let virtual time run until `n` deliveries have been observed.
pub async fn wait_for_deliveries(notifier: &CollectingNotifier, n: usize) {
    for _ in 0..200 {
        if notifier.delivered().len() >= n {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
    }
    panic!("expected {} deliveries, got {:?}", n, notifier.delivered());
}
