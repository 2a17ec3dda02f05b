//! TaskListController - リストの状態と削除タイミングを管理
//!
//! # フロー
//! 1. presentation が操作を呼ぶ（add / toggle / delete / clear / sort / reorder）
//! 2. TaskList が新しい列を返し、controller が丸ごと差し替える
//! 3. delete / clear は RemovalScheduler に積まれ、時間が進むと適用される
//! 4. presentation は snapshot() を取り直して再描画する
//!
//! 時間は `advance` / `advance_to` / `settle` でだけ進みます。
//! 実時間で動かす場合は `ControllerHandle` を使います。

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::domain::{ListEvent, SortOrder, Task, TaskId, TaskListError};
use crate::drag::{DragEnd, ReorderTarget, apply_drag};
use crate::observability::ListCounts;
use crate::ports::{EventSink, IdGenerator};
use crate::scheduler::{RemovalAction, RemovalScheduler, RemovalTiming};
use crate::store::TaskList;

pub struct TaskListController {
    tasks: TaskList,
    removals: RemovalScheduler,
    ids: Arc<dyn IdGenerator>,
    events: Arc<dyn EventSink>,
}

impl TaskListController {
    pub fn new(
        timing: RemovalTiming,
        ids: Arc<dyn IdGenerator>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            tasks: TaskList::new(),
            removals: RemovalScheduler::new(timing),
            ids,
            events,
        }
    }

    /// Read-only view of the current sequence.
    pub fn snapshot(&self) -> TaskList {
        self.tasks.clone()
    }

    pub fn timing(&self) -> RemovalTiming {
        self.removals.timing()
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.removals.now()
    }

    /// When the next pending removal action fires, if any.
    pub fn next_due(&self) -> Option<Duration> {
        self.removals.next_due()
    }

    pub fn counts(&self) -> ListCounts {
        ListCounts::from_list(&self.tasks, self.removals.pending())
    }

    pub fn add_task(&mut self, title: &str, date: Option<NaiveDate>) -> Result<Task, TaskListError> {
        let task = Task::create(self.ids.as_ref(), title, date)?;
        self.tasks = self.tasks.add(task.clone());
        debug!(task_id = %task.id(), "task added");
        self.events.emit(ListEvent::TaskAdded { id: task.id() });
        Ok(task)
    }

    pub fn toggle_task(&mut self, id: TaskId) {
        self.tasks = self.tasks.toggle_completed(id);
        if let Some(task) = self.tasks.find(id) {
            self.events.emit(ListEvent::TaskToggled {
                id,
                completed: task.is_completed(),
            });
        }
    }

    /// Start the removal transition now; the task leaves the store after
    /// `delete_delay`.
    pub fn delete_task(&mut self, id: TaskId) {
        if !self.tasks.contains(id) {
            debug!(task_id = %id, "delete target not found");
            return;
        }
        self.removals.schedule_delete(id);
        self.run_due();
    }

    /// Stagger removal transitions over every task completed right now, then
    /// drop completed tasks once all transitions have had time to finish.
    ///
    /// Returns how many tasks were enumerated.
    pub fn clear_completed(&mut self) -> usize {
        let completed = self.tasks.completed_ids();
        self.removals.schedule_clear(&completed);
        self.run_due();
        completed.len()
    }

    pub fn sort_completed_first(&mut self) {
        self.tasks = self.tasks.sort_completed_first();
        self.events.emit(ListEvent::Sorted {
            order: SortOrder::CompletedFirst,
        });
    }

    pub fn sort_completed_last(&mut self) {
        self.tasks = self.tasks.sort_completed_last();
        self.events.emit(ListEvent::Sorted {
            order: SortOrder::CompletedLast,
        });
    }

    pub fn reorder_task(&mut self, from: usize, to: usize) {
        let reordered = self.tasks.reorder(from, to);
        // out of range, or dropped where it started
        if reordered == self.tasks {
            return;
        }
        self.tasks = reordered;
        self.events.emit(ListEvent::Reordered { from, to });
    }

    /// Finish a drag gesture. `None` destination: dropped outside, no change.
    pub fn drop_task(&mut self, source: usize, destination: Option<usize>) {
        apply_drag(self, DragEnd::new(source, destination));
    }

    /// Move time forward by `delta`, firing everything that comes due.
    pub fn advance(&mut self, delta: Duration) {
        let to = self.now().saturating_add(delta);
        self.advance_to(to);
    }

    /// Move time forward to `to`, firing everything due at or before it in
    /// due order. Earlier times are ignored.
    pub fn advance_to(&mut self, to: Duration) {
        while let Some(fired) = self.removals.pop_due(to) {
            self.apply(fired.payload);
        }
        self.removals.advance_to(to);
    }

    /// Fire every pending action.
    pub fn settle(&mut self) {
        while let Some(due) = self.removals.next_due() {
            self.advance_to(due);
        }
    }

    fn run_due(&mut self) {
        let now = self.now();
        self.advance_to(now);
    }

    fn apply(&mut self, action: RemovalAction) {
        match action {
            RemovalAction::Mark(id) => {
                if self.tasks.contains(id) {
                    self.events.emit(ListEvent::RemovalMarked { id });
                } else {
                    debug!(task_id = %id, "mark target already gone");
                }
            }
            RemovalAction::MarkIfCompleted(id) => match self.tasks.find(id) {
                Some(task) if task.is_completed() => {
                    self.events.emit(ListEvent::RemovalMarked { id });
                }
                Some(_) => debug!(task_id = %id, "mark skipped, task no longer completed"),
                None => debug!(task_id = %id, "mark target already gone"),
            },
            RemovalAction::Remove(id) => {
                if !self.tasks.contains(id) {
                    debug!(task_id = %id, "remove target already gone");
                    return;
                }
                self.tasks = self.tasks.remove(id);
                info!(task_id = %id, "task removed");
                self.events.emit(ListEvent::TasksRemoved { ids: vec![id] });
            }
            RemovalAction::RemoveCompleted { enumerated } => {
                let ids = self.tasks.completed_ids();
                if ids.is_empty() {
                    debug!("no completed tasks left to clear");
                } else {
                    self.tasks = self.tasks.remove_all(Task::is_completed);
                    info!(count = ids.len(), "completed tasks cleared");
                    self.events.emit(ListEvent::TasksRemoved { ids });
                }

                // still here and not about to go through a single delete
                let survivors: Vec<TaskId> = enumerated
                    .into_iter()
                    .filter(|id| self.tasks.contains(*id))
                    .filter(|id| !self.removals.has_pending_remove(*id))
                    .collect();
                if !survivors.is_empty() {
                    debug!(count = survivors.len(), "clear left un-completed tasks");
                    self.events.emit(ListEvent::RemovalCancelled { ids: survivors });
                }
            }
        }
    }
}

impl ReorderTarget for TaskListController {
    fn reorder_task(&mut self, from: usize, to: usize) {
        TaskListController::reorder_task(self, from, to);
    }
}
