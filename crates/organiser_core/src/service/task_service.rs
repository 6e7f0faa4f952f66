//! Task (reminder) use-cases.

use crate::model::task::{Priority, RepeatFrequency, Task};
use crate::model::timestamp::Timestamp;
use crate::model::validation::ValidationError;
use crate::model::RecordId;
use crate::repo::collection::RecordCollection;
use crate::repo::views::{pending_tasks, visible_tasks, TaskQuery};
use crate::store::KeyValueStore;

/// Add/edit form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    /// `Some` when editing an existing task.
    pub id: Option<RecordId>,
    pub title: String,
    pub description: String,
    pub scheduled_at: Timestamp,
    pub priority: Priority,
    pub repeat: RepeatFrequency,
    pub important: bool,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>, scheduled_at: Timestamp) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: String::new(),
            scheduled_at,
            priority: Priority::default(),
            repeat: RepeatFrequency::default(),
            important: false,
        }
    }
}

pub struct TaskService<'s> {
    tasks: RecordCollection<'s, Task>,
}

impl<'s> TaskService<'s> {
    pub fn new(store: &'s dyn KeyValueStore) -> Self {
        Self {
            tasks: RecordCollection::new(store),
        }
    }

    /// Creates or edits a task from form input.
    ///
    /// # Contract
    /// - Blank titles are rejected before any write.
    /// - The saved task is pending; editing a completed task reopens it.
    /// - Editing an unknown id is a no-op and returns `Ok(None)`.
    pub fn save(&self, draft: TaskDraft) -> Result<Option<Task>, ValidationError> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        let description = Some(draft.description.trim().to_string()).filter(|d| !d.is_empty());

        let task = Task {
            id: draft.id.clone().unwrap_or_default(),
            title: title.to_string(),
            description,
            scheduled_at: draft.scheduled_at,
            completed: false,
            priority: draft.priority,
            repeat: draft.repeat,
            important: draft.important,
        };

        Ok(match draft.id {
            Some(id) => self.tasks.replace(&id, task),
            None => Some(self.tasks.create(task)),
        })
    }

    pub fn set_completed(&self, id: &str, completed: bool) -> Option<Task> {
        self.tasks.update(id, |task| task.completed = completed)
    }

    pub fn toggle_completed(&self, id: &str) -> Option<Task> {
        self.tasks.update(id, |task| task.completed = !task.completed)
    }

    pub fn delete(&self, id: &str) -> bool {
        self.tasks.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<Task> {
        self.tasks.get(id)
    }

    pub fn all(&self) -> Vec<Task> {
        self.tasks.all()
    }

    /// Incomplete tasks, earliest first.
    pub fn pending(&self, limit: Option<usize>) -> Vec<Task> {
        pending_tasks(&self.tasks, limit)
    }

    pub fn visible(&self, query: &TaskQuery) -> Vec<Task> {
        visible_tasks(&self.tasks, query)
    }
}
