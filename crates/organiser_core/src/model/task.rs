//! Task (reminder) record.

use super::timestamp::{self, Timestamp};
use super::{Record, RecordId};
use crate::store::keys;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

/// Recurrence of a reminder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RepeatFrequency {
    #[default]
    #[serde(rename = "None")]
    Never,
    Daily,
    WorkDays,
    Weekends,
    Weekly,
    Monthly,
}

/// A titled, time-scheduled to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: RecordId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "datetime", with = "timestamp::required")]
    pub scheduled_at: Timestamp,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub repeat: RepeatFrequency,
    #[serde(rename = "isImportant", default)]
    pub important: bool,
}

impl Task {
    /// Creates an unsaved, pending task with default priority and no repeat.
    ///
    /// The id stays blank until the collection assigns one.
    pub fn new(title: impl Into<String>, scheduled_at: Timestamp) -> Self {
        Self {
            id: RecordId::new(),
            title: title.into(),
            description: None,
            scheduled_at,
            completed: false,
            priority: Priority::default(),
            repeat: RepeatFrequency::default(),
            important: false,
        }
    }

    pub fn is_pending(&self) -> bool {
        !self.completed
    }
}

impl Record for Task {
    const KEY: &'static str = keys::TASKS;

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }
}
