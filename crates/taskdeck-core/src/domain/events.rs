//! Events - リストで発生したイベント
//!
//! The presentation layer listens to these through an `EventSink` to drive
//! transitions. `RemovalMarked` is the visual trigger; `TasksRemoved` is the
//! moment data actually leaves the store.

use serde::Serialize;

use super::TaskId;

/// Order applied by one of the completion sorts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    CompletedFirst,
    CompletedLast,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ListEvent {
    TaskAdded { id: TaskId },
    TaskToggled { id: TaskId, completed: bool },
    /// Start of a removal transition. The task is still in the store.
    RemovalMarked { id: TaskId },
    /// Tasks that left the store. Empty when the target was already gone.
    TasksRemoved { ids: Vec<TaskId> },
    /// Marked tasks that a clear left in place because they were no longer
    /// completed when it fired. Their transition should be undone.
    RemovalCancelled { ids: Vec<TaskId> },
    Reordered { from: usize, to: usize },
    Sorted { order: SortOrder },
}
