//! Derived list views for tasks and journeys.
//!
//! Views are presentation-time projections: filter, then stable sort.

use crate::model::journey::{Journey, JourneyStatus};
use crate::model::task::Task;
use crate::repo::collection::RecordCollection;

/// Number of pending tasks shown on the home screen.
pub const HOME_PENDING_LIMIT: usize = 5;

/// Task list screen filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    /// Case-insensitive title substring. Blank matches everything.
    pub search: String,
    pub show_completed: bool,
}

/// Journey status tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JourneyFilter {
    #[default]
    All,
    Upcoming,
    Completed,
}

impl JourneyFilter {
    fn admits(self, status: JourneyStatus) -> bool {
        match self {
            Self::All => true,
            Self::Upcoming => status == JourneyStatus::Upcoming,
            Self::Completed => status == JourneyStatus::Completed,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JourneyQuery {
    pub filter: JourneyFilter,
    pub search: String,
}

/// Incomplete tasks, earliest first, optionally capped.
pub fn pending_tasks(tasks: &RecordCollection<'_, Task>, limit: Option<usize>) -> Vec<Task> {
    let mut pending = tasks.list_sorted(Task::is_pending, |a, b| {
        a.scheduled_at.cmp(&b.scheduled_at)
    });
    if let Some(limit) = limit {
        pending.truncate(limit);
    }
    pending
}

/// Task list screen: search + completed toggle, earliest first.
pub fn visible_tasks(tasks: &RecordCollection<'_, Task>, query: &TaskQuery) -> Vec<Task> {
    let needle = query.search.trim().to_lowercase();
    tasks.list_sorted(
        |task| (query.show_completed || task.is_pending()) && title_matches(&task.title, &needle),
        |a, b| a.scheduled_at.cmp(&b.scheduled_at),
    )
}

/// Journey list screen: status tab + search, most recent start first.
pub fn visible_journeys(
    journeys: &RecordCollection<'_, Journey>,
    query: &JourneyQuery,
) -> Vec<Journey> {
    let needle = query.search.trim().to_lowercase();
    journeys.list_sorted(
        |journey| query.filter.admits(journey.status) && title_matches(&journey.title, &needle),
        |a, b| b.start_time.cmp(&a.start_time),
    )
}

fn title_matches(title: &str, lowercase_needle: &str) -> bool {
    lowercase_needle.is_empty() || title.to_lowercase().contains(lowercase_needle)
}
