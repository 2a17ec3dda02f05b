use chrono::NaiveDate;
use serde::Serialize;

use super::{TaskId, TaskListError};
use crate::ports::IdGenerator;

/// A single to-do item.
///
/// Only `completed` ever changes after creation, and only through
/// [`Task::toggled`], which returns a new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    id: TaskId,
    title: String,
    completed: bool,
    date: Option<NaiveDate>,
}

impl Task {
    /// Build a fresh, incomplete task.
    ///
    /// The title is trimmed; a title that is empty after trimming is rejected
    /// and no id is consumed.
    pub fn create(
        ids: &dyn IdGenerator,
        title: &str,
        date: Option<NaiveDate>,
    ) -> Result<Self, TaskListError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TaskListError::EmptyTitle);
        }
        Ok(Self {
            id: ids.generate_task_id(),
            title: title.to_string(),
            completed: false,
            date,
        })
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    /// Same task with `completed` flipped.
    pub fn toggled(&self) -> Self {
        Self {
            completed: !self.completed,
            ..self.clone()
        }
    }

    /// Date as the list shows it, e.g. `Mar 4, 2026`.
    pub fn display_date(&self) -> Option<String> {
        self.date.map(|d| d.format("%b %-d, %Y").to_string())
    }
}
