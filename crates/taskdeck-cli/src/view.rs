//! Text rendering of the list.
//!
//! `ListView` tracks which tasks are mid-removal: they stay on screen with a
//! marker between `RemovalMarked` and `TasksRemoved`, or until a clear
//! reports them as `RemovalCancelled`.

use std::collections::HashSet;
use std::fmt::Write as _;

use taskdeck_core::observability::ListCounts;
use taskdeck_core::{ListEvent, TaskId, TaskList};

#[derive(Debug, Default)]
pub struct ListView {
    pending: HashSet<TaskId>,
}

impl ListView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: &ListEvent) {
        match event {
            ListEvent::RemovalMarked { id } => {
                self.pending.insert(*id);
            }
            ListEvent::TasksRemoved { ids } | ListEvent::RemovalCancelled { ids } => {
                for id in ids {
                    self.pending.remove(id);
                }
            }
            _ => {}
        }
    }

    pub fn is_pending(&self, id: TaskId) -> bool {
        self.pending.contains(&id)
    }

    pub fn render(&self, list: &TaskList, counts: ListCounts) -> String {
        let mut out = String::new();
        if list.is_empty() {
            out.push_str("  (no tasks)\n");
        }
        for (i, task) in list.iter().enumerate() {
            let check = if task.is_completed() { 'x' } else { ' ' };
            let _ = write!(out, "{:>3}. [{check}] {}", i + 1, task.title());
            if let Some(date) = task.display_date() {
                let _ = write!(out, "  ({date})");
            }
            if self.is_pending(task.id()) {
                out.push_str("  (removing)");
            }
            out.push('\n');
        }
        let _ = write!(out, "{} open, {} completed", counts.open, counts.completed);
        out
    }
}
