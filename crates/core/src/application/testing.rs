// In-memory ports shared by the application-layer unit tests.

use crate::domain::{FireTime, Reminder, Task, TaskId};
use crate::error::Result;
use crate::port::{
    DecrementOutcome, Notifier, ReminderRepository, ReminderWithTask, StoreStats, TaskRepository,
    TimeProvider,
};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::collections::HashSet;
use std::sync::Mutex;

#[derive(Default)]
pub struct MemoryTaskRepo {
    tasks: Mutex<Vec<Task>>,
}

#[async_trait]
impl TaskRepository for MemoryTaskRepo {
    async fn insert(&self, task: &Task) -> Result<()> {
        self.tasks.lock().unwrap().push(task.clone());
        Ok(())
    }

    async fn find(&self, owner: &str, id: &TaskId) -> Result<Option<Task>> {
        Ok(self
            .tasks
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.owner == owner && &t.id == id)
            .cloned())
    }

    async fn list(&self, owner: &str) -> Result<Vec<Task>> {
        Ok(self
            .tasks
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.owner == owner)
            .cloned()
            .collect())
    }

    async fn set_done(&self, owner: &str, id: &TaskId, done: bool) -> Result<bool> {
        let mut tasks = self.tasks.lock().unwrap();
        match tasks.iter_mut().find(|t| t.owner == owner && &t.id == id) {
            Some(t) => {
                t.done = done;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_text(&self, owner: &str, id: &TaskId, text: &str) -> Result<bool> {
        let mut tasks = self.tasks.lock().unwrap();
        match tasks.iter_mut().find(|t| t.owner == owner && &t.id == id) {
            Some(t) => {
                t.text = text.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, owner: &str, id: &TaskId) -> Result<bool> {
        let mut tasks = self.tasks.lock().unwrap();
        let before = tasks.len();
        tasks.retain(|t| !(t.owner == owner && &t.id == id));
        Ok(tasks.len() < before)
    }

    async fn clear(&self, owner: &str) -> Result<u64> {
        let mut tasks = self.tasks.lock().unwrap();
        let before = tasks.len();
        tasks.retain(|t| t.owner != owner);
        Ok((before - tasks.len()) as u64)
    }

    async fn stats(&self) -> Result<StoreStats> {
        let tasks = self.tasks.lock().unwrap();
        let owners: HashSet<&str> = tasks.iter().map(|t| t.owner.as_str()).collect();
        Ok(StoreStats {
            owners: owners.len() as i64,
            tasks: tasks.len() as i64,
            reminders: 0,
        })
    }
}

/// Reminder store over the task repo-less memory model. `list_all`
/// resolves task text against an optional companion task list.
#[derive(Default)]
pub struct MemoryReminderRepo {
    reminders: Mutex<Vec<Reminder>>,
    pub task_texts: Mutex<Vec<(TaskId, String)>>,
}

#[async_trait]
impl ReminderRepository for MemoryReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> Result<()> {
        self.reminders.lock().unwrap().push(reminder.clone());
        Ok(())
    }

    async fn list(&self, owner: &str) -> Result<Vec<Reminder>> {
        Ok(self
            .reminders
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.owner == owner)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<ReminderWithTask>> {
        let texts = self.task_texts.lock().unwrap();
        Ok(self
            .reminders
            .lock()
            .unwrap()
            .iter()
            .map(|r| ReminderWithTask {
                reminder: r.clone(),
                task_text: texts
                    .iter()
                    .find(|(id, _)| id == &r.task_id)
                    .map(|(_, text)| text.clone()),
            })
            .collect())
    }

    async fn find(
        &self,
        owner: &str,
        task_id: &TaskId,
        fire_time: FireTime,
    ) -> Result<Option<Reminder>> {
        Ok(self
            .reminders
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.owner == owner && &r.task_id == task_id && r.fire_time == fire_time)
            .cloned())
    }

    async fn decrement_or_delete(
        &self,
        owner: &str,
        task_id: &TaskId,
        fire_time: FireTime,
    ) -> Result<DecrementOutcome> {
        let mut reminders = self.reminders.lock().unwrap();
        let pos = reminders
            .iter()
            .position(|r| r.owner == owner && &r.task_id == task_id && r.fire_time == fire_time);
        match pos {
            None => Ok(DecrementOutcome::NotFound),
            Some(i) => {
                reminders[i].days_remaining -= 1;
                if reminders[i].days_remaining <= 0 {
                    reminders.remove(i);
                    Ok(DecrementOutcome::Exhausted)
                } else {
                    Ok(DecrementOutcome::Remaining(reminders[i].days_remaining))
                }
            }
        }
    }

    async fn delete(&self, owner: &str, task_id: &TaskId, fire_time: FireTime) -> Result<bool> {
        let mut reminders = self.reminders.lock().unwrap();
        let before = reminders.len();
        reminders
            .retain(|r| !(r.owner == owner && &r.task_id == task_id && r.fire_time == fire_time));
        Ok(reminders.len() < before)
    }

    async fn delete_for_task(&self, owner: &str, task_id: &TaskId) -> Result<u64> {
        let mut reminders = self.reminders.lock().unwrap();
        let before = reminders.len();
        reminders.retain(|r| !(r.owner == owner && &r.task_id == task_id));
        Ok((before - reminders.len()) as u64)
    }

    async fn clear(&self, owner: &str) -> Result<u64> {
        let mut reminders = self.reminders.lock().unwrap();
        let before = reminders.len();
        reminders.retain(|r| r.owner != owner);
        Ok((before - reminders.len()) as u64)
    }
}

#[derive(Default)]
pub struct MemoryNotifier {
    delivered: Mutex<Vec<(String, String)>>,
}

impl MemoryNotifier {
    pub fn delivered(&self) -> Vec<(String, String)> {
        self.delivered.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for MemoryNotifier {
    async fn deliver(&self, owner: &str, message: &str) -> Result<()> {
        self.delivered
            .lock()
            .unwrap()
            .push((owner.to_string(), message.to_string()));
        Ok(())
    }
}

pub struct MockTimeProvider {
    now: Mutex<NaiveDateTime>,
}

impl MockTimeProvider {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock().unwrap() = now;
    }
}

impl TimeProvider for MockTimeProvider {
    fn now_millis(&self) -> i64 {
        self.now.lock().unwrap().and_utc().timestamp_millis()
    }

    fn now_local(&self) -> NaiveDateTime {
        *self.now.lock().unwrap()
    }
}

pub fn memory_reminder(owner: &str, task_id: &str, time: &str, days: i64) -> Reminder {
    Reminder::new(
        owner,
        task_id,
        time.parse().expect("valid fire time literal"),
        days,
    )
}
