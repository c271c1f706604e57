// Reminder Domain Model

use crate::domain::error::DomainError;
use crate::domain::task::{Owner, TaskId};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Time-of-day a reminder is due (hour:minute, no date, no timezone).
///
/// Interpreted in local process time. Parsed from and rendered as "HH:MM".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FireTime(NaiveTime);

impl FireTime {
    pub fn new(time: NaiveTime) -> Self {
        Self(time)
    }

    pub fn as_time(&self) -> NaiveTime {
        self.0
    }
}

impl FromStr for FireTime {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s, "%H:%M")
            .map(Self)
            .map_err(|_| DomainError::InvalidFireTime(s.to_string()))
    }
}

impl fmt::Display for FireTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl TryFrom<String> for FireTime {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<FireTime> for String {
    fn from(t: FireTime) -> Self {
        t.to_string()
    }
}

/// Scheduling identity of a reminder.
///
/// At most one active reminder exists per key; creation rejects duplicates
/// so cancellation and re-arming always target exactly one timer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReminderKey {
    pub owner: Owner,
    pub task_id: TaskId,
    pub fire_time: FireTime,
}

impl fmt::Display for ReminderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.owner, self.task_id, self.fire_time)
    }
}

/// Reminder entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub owner: Owner,
    pub task_id: TaskId,
    pub fire_time: FireTime,
    /// Countdown of daily occurrences left; the record is deleted at 0.
    pub days_remaining: i64,
}

impl Reminder {
    pub fn new(
        owner: impl Into<Owner>,
        task_id: impl Into<TaskId>,
        fire_time: FireTime,
        days_remaining: i64,
    ) -> Self {
        Self {
            owner: owner.into(),
            task_id: task_id.into(),
            fire_time,
            days_remaining,
        }
    }

    pub fn key(&self) -> ReminderKey {
        ReminderKey {
            owner: self.owner.clone(),
            task_id: self.task_id.clone(),
            fire_time: self.fire_time,
        }
    }
}
