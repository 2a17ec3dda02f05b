//! Ordered task store.
//!
//! Design:
//! - The sequence order *is* the render order.
//! - Every operation returns a new `TaskList`; the old value is never touched,
//!   so a snapshot handed to the renderer can't observe a half-applied change.
//! - Lookups that miss (unknown id, out-of-range index) return an unchanged
//!   copy instead of an error. Deferred removals rely on this.

use std::sync::Arc;

use serde::{Serialize, Serializer};
use tracing::debug;

use crate::domain::{Task, TaskId};

/// Immutable ordered sequence of tasks.
///
/// Cloning is cheap (shared slice).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskList {
    tasks: Arc<[Task]>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    pub fn find(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id() == id)
    }

    pub fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id() == id)
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.position(id).is_some()
    }

    pub fn ids(&self) -> Vec<TaskId> {
        self.tasks.iter().map(Task::id).collect()
    }

    /// Ids of completed tasks, in sequence order.
    pub fn completed_ids(&self) -> Vec<TaskId> {
        self.tasks
            .iter()
            .filter(|t| t.is_completed())
            .map(Task::id)
            .collect()
    }

    /// Append at the end.
    pub fn add(&self, task: Task) -> Self {
        debug_assert!(
            !self.contains(task.id()),
            "duplicate task id {}",
            task.id()
        );
        let mut tasks = self.tasks.to_vec();
        tasks.push(task);
        Self::from(tasks)
    }

    /// Flip `completed` on the matching task. Unknown id: unchanged.
    pub fn toggle_completed(&self, id: TaskId) -> Self {
        let Some(index) = self.position(id) else {
            debug!(task_id = %id, "toggle target not found");
            return self.clone();
        };
        let mut tasks = self.tasks.to_vec();
        tasks[index] = tasks[index].toggled();
        Self::from(tasks)
    }

    /// Stable sort, completed tasks first.
    pub fn sort_completed_first(&self) -> Self {
        let mut tasks = self.tasks.to_vec();
        // false < true, and sort_by_key is stable
        tasks.sort_by_key(|t| !t.is_completed());
        Self::from(tasks)
    }

    /// Stable sort, completed tasks last.
    pub fn sort_completed_last(&self) -> Self {
        let mut tasks = self.tasks.to_vec();
        tasks.sort_by_key(Task::is_completed);
        Self::from(tasks)
    }

    /// Drop the matching task. Unknown id: unchanged.
    pub fn remove(&self, id: TaskId) -> Self {
        self.remove_all(|t| t.id() == id)
    }

    /// Drop every task matching `predicate`; survivors keep their order.
    pub fn remove_all<P>(&self, mut predicate: P) -> Self
    where
        P: FnMut(&Task) -> bool,
    {
        let tasks: Vec<Task> = self.tasks.iter().filter(|t| !predicate(*t)).cloned().collect();
        if tasks.len() == self.len() {
            return self.clone();
        }
        Self::from(tasks)
    }

    /// Move the task at `from` so that it ends up at index `to`.
    ///
    /// `to` is an index into the list *after* the task has been taken out
    /// (splice semantics). Either index outside `[0, len)`: unchanged.
    pub fn reorder(&self, from: usize, to: usize) -> Self {
        let len = self.len();
        if from >= len || to >= len {
            debug!(from, to, len, "reorder index out of range");
            return self.clone();
        }
        let mut tasks = self.tasks.to_vec();
        let moved = tasks.remove(from);
        tasks.insert(to, moved);
        Self::from(tasks)
    }
}

impl From<Vec<Task>> for TaskList {
    fn from(tasks: Vec<Task>) -> Self {
        Self {
            tasks: tasks.into(),
        }
    }
}

impl Serialize for TaskList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'a> IntoIterator for &'a TaskList {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
