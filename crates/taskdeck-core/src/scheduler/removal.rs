//! Removal scheduler: turns delete/clear requests into timed actions.
//!
//! This only plans *when* things happen. Applying an action to the store is
//! the controller's job, and every action is written so that applying it to a
//! store that no longer holds the target is a no-op.

use std::time::Duration;

use tracing::debug;

use super::{Fired, RemovalTiming, TimerQueue};
use crate::domain::TaskId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalAction {
    /// Start the visual transition for one task.
    Mark(TaskId),
    /// Same, but only if the task is still completed when this fires.
    MarkIfCompleted(TaskId),
    /// Drop one task from the store.
    Remove(TaskId),
    /// Drop every task that is completed when this fires. `enumerated` is
    /// what the clear saw, so survivors can be reported.
    RemoveCompleted { enumerated: Vec<TaskId> },
}

#[derive(Debug)]
pub struct RemovalScheduler {
    timing: RemovalTiming,
    timers: TimerQueue<RemovalAction>,
}

impl RemovalScheduler {
    pub fn new(timing: RemovalTiming) -> Self {
        Self {
            timing,
            timers: TimerQueue::new(),
        }
    }

    pub fn timing(&self) -> RemovalTiming {
        self.timing
    }

    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    /// Mark now, remove after `delete_delay`.
    ///
    /// Independent of any other pending delete; nothing is coalesced.
    pub fn schedule_delete(&mut self, id: TaskId) -> Duration {
        self.timers.schedule(Duration::ZERO, RemovalAction::Mark(id));
        let due = self
            .timers
            .schedule(self.timing.delete_delay, RemovalAction::Remove(id));
        debug!(task_id = %id, due_ms = due.as_millis() as u64, "delete scheduled");
        due
    }

    /// Stagger marks over `completed` (in the given order), then one bulk
    /// removal after the last transition has had its full delay.
    ///
    /// Returns the removal's due time, or `None` when there is nothing to clear.
    pub fn schedule_clear(&mut self, completed: &[TaskId]) -> Option<Duration> {
        if completed.is_empty() {
            debug!("clear requested with no completed tasks");
            return None;
        }
        for (index, id) in completed.iter().enumerate() {
            self.timers
                .schedule(self.timing.mark_offset(index), RemovalAction::MarkIfCompleted(*id));
        }
        let due = self.timers.schedule(
            self.timing.clear_offset(completed.len()),
            RemovalAction::RemoveCompleted {
                enumerated: completed.to_vec(),
            },
        );
        debug!(
            count = completed.len(),
            due_ms = due.as_millis() as u64,
            "clear scheduled"
        );
        Some(due)
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.timers.next_due()
    }

    pub fn pop_due(&mut self, until: Duration) -> Option<Fired<RemovalAction>> {
        self.timers.pop_due(until)
    }

    pub fn advance_to(&mut self, to: Duration) {
        self.timers.advance_to(to);
    }

    /// Whether a single delete for `id` has yet to remove it.
    pub fn has_pending_remove(&self, id: TaskId) -> bool {
        self.timers
            .any_pending(|action| matches!(action, RemovalAction::Remove(target) if *target == id))
    }

    /// Number of actions still waiting to fire.
    pub fn pending(&self) -> usize {
        self.timers.len()
    }
}

impl Default for RemovalScheduler {
    fn default() -> Self {
        Self::new(RemovalTiming::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ulid::Ulid;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn id(n: u64) -> TaskId {
        TaskId::from_ulid(Ulid::from_parts(n, 0))
    }

    fn drain(scheduler: &mut RemovalScheduler, until: Duration) -> Vec<(Duration, RemovalAction)> {
        std::iter::from_fn(|| scheduler.pop_due(until).map(|f| (f.due, f.payload))).collect()
    }

    #[test]
    fn delete_marks_now_and_removes_after_delay() {
        let mut scheduler = RemovalScheduler::default();
        let due = scheduler.schedule_delete(id(1));

        assert_eq!(due, ms(400));
        assert_eq!(
            drain(&mut scheduler, ms(400)),
            vec![
                (ms(0), RemovalAction::Mark(id(1))),
                (ms(400), RemovalAction::Remove(id(1))),
            ]
        );
    }

    #[test]
    fn overlapping_deletes_keep_their_own_offsets() {
        let mut scheduler = RemovalScheduler::default();
        scheduler.schedule_delete(id(1));
        scheduler.advance_to(ms(150));
        scheduler.schedule_delete(id(2));

        let removals: Vec<_> = drain(&mut scheduler, ms(10_000))
            .into_iter()
            .filter(|(_, action)| matches!(action, RemovalAction::Remove(_)))
            .collect();
        assert_eq!(
            removals,
            vec![
                (ms(400), RemovalAction::Remove(id(1))),
                (ms(550), RemovalAction::Remove(id(2))),
            ]
        );
    }

    #[test]
    fn clear_staggers_marks_then_removes_once() {
        let mut scheduler = RemovalScheduler::default();
        let due = scheduler.schedule_clear(&[id(1), id(2), id(3)]);

        assert_eq!(due, Some(ms(1_300)));
        assert_eq!(
            drain(&mut scheduler, ms(10_000)),
            vec![
                (ms(0), RemovalAction::MarkIfCompleted(id(1))),
                (ms(300), RemovalAction::MarkIfCompleted(id(2))),
                (ms(600), RemovalAction::MarkIfCompleted(id(3))),
                (
                    ms(1_300),
                    RemovalAction::RemoveCompleted {
                        enumerated: vec![id(1), id(2), id(3)],
                    }
                ),
            ]
        );
    }

    #[test]
    fn clear_with_nothing_completed_schedules_nothing() {
        let mut scheduler = RemovalScheduler::default();

        assert_eq!(scheduler.schedule_clear(&[]), None);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn pending_remove_is_tracked_until_it_fires() {
        let mut scheduler = RemovalScheduler::default();
        scheduler.schedule_delete(id(1));
        scheduler.schedule_clear(&[id(2)]);

        assert!(scheduler.has_pending_remove(id(1)));
        assert!(!scheduler.has_pending_remove(id(2)));

        drain(&mut scheduler, ms(400));
        assert!(!scheduler.has_pending_remove(id(1)));
    }

    #[test]
    fn custom_timing_is_respected() {
        let mut scheduler = RemovalScheduler::new(RemovalTiming::new(ms(50), ms(10)));

        assert_eq!(scheduler.schedule_delete(id(1)), ms(50));
        assert_eq!(scheduler.schedule_clear(&[id(2), id(3)]), Some(ms(70)));
    }
}
