//! ReminderScheduler - One-shot timers for daily reminders
//!
//! Owns the registry of armed timers, keyed by (owner, task, fire time).
//! Each armed reminder walks ARMED -> FIRED -> (REARMED | EXHAUSTED |
//! CANCELLED). The recurrence is elapsed-day arithmetic: after a fire the
//! next shot is scheduled for now + 1 day combined with the original
//! time-of-day, not the next calendar occurrence.

use crate::domain::{FireTime, Reminder, ReminderKey, TaskId};
use crate::port::{DecrementOutcome, Notifier, ReminderRepository, TaskRepository, TimeProvider};
use chrono::{Duration as TimeDelta, NaiveDateTime};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Delay until the next occurrence of `fire_time`.
///
/// Today's date combined with `fire_time`; if that instant is strictly
/// before `now`, tomorrow's date instead. Never negative.
pub fn next_fire_delay(fire_time: FireTime, now: NaiveDateTime) -> Duration {
    let mut target = now.date().and_time(fire_time.as_time());
    if target < now {
        target = target + TimeDelta::days(1);
    }
    (target - now).to_std().unwrap_or(Duration::ZERO)
}

/// Delay from a fire to the next one: now + 1 day, same time-of-day.
pub fn rearm_delay(fire_time: FireTime, now: NaiveDateTime) -> Duration {
    let target = (now + TimeDelta::days(1))
        .date()
        .and_time(fire_time.as_time());
    (target - now).to_std().unwrap_or(Duration::ZERO)
}

/// Scheduler owning all armed reminder timers.
///
/// Injected into services rather than accessed as ambient global state;
/// its lifecycle is tied to process start/stop.
pub struct ReminderScheduler {
    tasks: Arc<dyn TaskRepository>,
    reminders: Arc<dyn ReminderRepository>,
    notifier: Arc<dyn Notifier>,
    time_provider: Arc<dyn TimeProvider>,
    timers: Mutex<HashMap<ReminderKey, JoinHandle<()>>>,
}

impl ReminderScheduler {
    pub fn new(
        tasks: Arc<dyn TaskRepository>,
        reminders: Arc<dyn ReminderRepository>,
        notifier: Arc<dyn Notifier>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            tasks,
            reminders,
            notifier,
            time_provider,
            timers: Mutex::new(HashMap::new()),
        }
    }

    /// Arm a one-shot timer for the next occurrence of the reminder's
    /// fire time. Used on explicit creation and on startup reconciliation.
    pub async fn arm(self: &Arc<Self>, reminder: &Reminder) {
        let now = self.time_provider.now_local();
        let delay = next_fire_delay(reminder.fire_time, now);

        debug!(
            key = %reminder.key(),
            delay_secs = delay.as_secs(),
            days_remaining = reminder.days_remaining,
            "Arming reminder"
        );

        self.arm_after(reminder.key(), reminder.days_remaining, delay)
            .await;
    }

    /// Cancel the timer for a single reminder key. Idempotent: cancelling
    /// an already-fired or already-cancelled timer is a no-op.
    pub async fn cancel(&self, key: &ReminderKey) -> bool {
        match self.timers.lock().await.remove(key) {
            Some(handle) => {
                handle.abort();
                debug!(key = %key, "Cancelled reminder timer");
                true
            }
            None => false,
        }
    }

    /// Cancel every timer referencing a task (task removal cascade).
    pub async fn cancel_for_task(&self, owner: &str, task_id: &TaskId) {
        let mut timers = self.timers.lock().await;
        timers.retain(|key, handle| {
            if key.owner == owner && &key.task_id == task_id {
                handle.abort();
                false
            } else {
                true
            }
        });
    }

    /// Cancel every timer belonging to an owner (clear cascade).
    pub async fn cancel_for_owner(&self, owner: &str) {
        let mut timers = self.timers.lock().await;
        timers.retain(|key, handle| {
            if key.owner == owner {
                handle.abort();
                false
            } else {
                true
            }
        });
    }

    /// Number of currently armed timers
    pub async fn armed_count(&self) -> usize {
        self.timers.lock().await.len()
    }

    /// Abort all armed timers (process shutdown)
    pub async fn shutdown(&self) {
        let mut timers = self.timers.lock().await;
        for (_, handle) in timers.drain() {
            handle.abort();
        }
        info!("Reminder scheduler shut down");
    }

    /// Spawn a one-shot timer task and register it, replacing (and
    /// aborting) any previous timer under the same key.
    async fn arm_after(self: &Arc<Self>, key: ReminderKey, days_remaining: i64, delay: Duration) {
        let scheduler = Arc::clone(self);
        let fire_key = key.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            scheduler.fire(fire_key, days_remaining).await;
        });

        if let Some(old) = self.timers.lock().await.insert(key, handle) {
            old.abort();
        }
    }

    /// Fire rule: deliver, decrement, then re-arm or stop.
    ///
    /// `days_remaining` is the count as of arming; the delivered message
    /// carries it, and the store decrement happens after delivery.
    // Returns a boxed future: fire -> arm_after -> fire is recursive, and
    // type erasure is what lets the compiler resolve the `Send` bound.
    fn fire(
        self: Arc<Self>,
        key: ReminderKey,
        days_remaining: i64,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = ()> + Send>> {
        Box::pin(async move {
        // This timer has elapsed; drop it from the registry before any
        // await so a re-arm inserts a fresh handle instead of aborting us.
        self.timers.lock().await.remove(&key);

        match self.tasks.find(&key.owner, &key.task_id).await {
            Ok(Some(task)) => {
                let message = format!(
                    "Reminder: {}\n({} day(s) remaining)",
                    task.text, days_remaining
                );
                // At-least-once: a failed delivery never rolls back the
                // decrement below.
                if let Err(e) = self.notifier.deliver(&key.owner, &message).await {
                    warn!(key = %key, error = %e, "Reminder delivery failed");
                }
            }
            Ok(None) => {
                // Stale reference: the task vanished between arming and
                // firing. Garbage-collect the row and stop.
                warn!(key = %key, "Task gone at fire time, dropping reminder");
                if let Err(e) = self
                    .reminders
                    .delete(&key.owner, &key.task_id, key.fire_time)
                    .await
                {
                    warn!(key = %key, error = %e, "Failed to garbage-collect stale reminder");
                }
                return;
            }
            Err(e) => {
                // Store read failure: skip delivery this round but still
                // run the decrement so the countdown cannot stall forever.
                warn!(key = %key, error = %e, "Task lookup failed at fire time");
            }
        }

        match self
            .reminders
            .decrement_or_delete(&key.owner, &key.task_id, key.fire_time)
            .await
        {
            Ok(DecrementOutcome::Remaining(left)) => {
                let now = self.time_provider.now_local();
                let delay = rearm_delay(key.fire_time, now);
                debug!(
                    key = %key,
                    days_remaining = left,
                    delay_secs = delay.as_secs(),
                    "Re-arming reminder"
                );
                self.arm_after(key, left, delay).await;
            }
            Ok(DecrementOutcome::Exhausted) => {
                info!(key = %key, "Reminder exhausted");
            }
            Ok(DecrementOutcome::NotFound) => {
                // Lost a race against removal; nothing to do.
                debug!(key = %key, "Reminder already removed at fire time");
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Reminder decrement failed, not re-arming");
            }
        }
        })
    }
}
