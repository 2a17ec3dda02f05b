//! ControllerHandle - 実時間で controller を動かす
//!
//! Virtual time of the controller is pinned to `tokio::time::Instant`
//! elapsed since the handle was created. Input handlers and the timer task
//! share one `tokio::sync::Mutex`, so they interleave but never overlap.
//!
//! Every call first catches the controller up to the current time, so a
//! late-waking timer task can't make an operation see stale state.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tokio::sync::{Mutex, Notify, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

use super::TaskListController;
use crate::domain::{Task, TaskId, TaskListError};
use crate::observability::ListCounts;
use crate::store::TaskList;

#[derive(Clone)]
pub struct ControllerHandle {
    inner: Arc<Mutex<TaskListController>>,
    origin: Instant,
    notify: Arc<Notify>,
}

impl ControllerHandle {
    pub fn new(controller: TaskListController) -> Self {
        let now = Instant::now();
        // keep virtual time continuous if the controller was advanced already
        let origin = now.checked_sub(controller.now()).unwrap_or(now);
        Self {
            inner: Arc::new(Mutex::new(controller)),
            origin,
            notify: Arc::new(Notify::new()),
        }
    }

    fn elapsed(&self) -> Duration {
        self.origin.elapsed()
    }

    /// Run `f` against the controller after firing everything due, then wake
    /// the timer task, since `f` may have changed the schedule.
    pub async fn with<R>(&self, f: impl FnOnce(&mut TaskListController) -> R) -> R {
        let result = {
            let mut controller = self.inner.lock().await;
            controller.advance_to(self.elapsed());
            f(&mut *controller)
        };
        self.notify.notify_one();
        result
    }

    /// Like [`with`](Self::with) for reads. Catching up only drains the
    /// schedule, so the timer task is left asleep.
    pub async fn read<R>(&self, f: impl FnOnce(&TaskListController) -> R) -> R {
        let mut controller = self.inner.lock().await;
        controller.advance_to(self.elapsed());
        f(&*controller)
    }

    pub async fn add_task(
        &self,
        title: &str,
        date: Option<NaiveDate>,
    ) -> Result<Task, TaskListError> {
        self.with(|c| c.add_task(title, date)).await
    }

    pub async fn toggle_task(&self, id: TaskId) {
        self.with(|c| c.toggle_task(id)).await
    }

    pub async fn delete_task(&self, id: TaskId) {
        self.with(|c| c.delete_task(id)).await
    }

    pub async fn clear_completed(&self) -> usize {
        self.with(|c| c.clear_completed()).await
    }

    pub async fn sort_completed_first(&self) {
        self.with(|c| c.sort_completed_first()).await
    }

    pub async fn sort_completed_last(&self) {
        self.with(|c| c.sort_completed_last()).await
    }

    pub async fn reorder_task(&self, from: usize, to: usize) {
        self.with(|c| c.reorder_task(from, to)).await
    }

    pub async fn drop_task(&self, source: usize, destination: Option<usize>) {
        self.with(|c| c.drop_task(source, destination)).await
    }

    pub async fn snapshot(&self) -> TaskList {
        self.read(|c| c.snapshot()).await
    }

    pub async fn counts(&self) -> ListCounts {
        self.read(|c| c.counts()).await
    }

    /// List and counts taken under one lock, so they always agree.
    pub async fn snapshot_with_counts(&self) -> (TaskList, ListCounts) {
        self.read(|c| (c.snapshot(), c.counts())).await
    }

    /// Fire every pending action right away, without waiting for its time.
    pub async fn settle(&self) {
        self.with(|c| c.settle()).await
    }

    /// Spawn the background task that fires removals on time.
    pub fn spawn_timers(&self) -> TimerTask {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = self.clone();
        let join = tokio::spawn(async move {
            timer_loop(handle, shutdown_rx).await;
        });
        TimerTask { shutdown_tx, join }
    }
}

/// Timer task handle.
/// - `request_shutdown()` でループを止める
/// - `shutdown_and_join()` で終了を待てる
pub struct TimerTask {
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl TimerTask {
    pub fn request_shutdown(&self) {
        // ignore send error: the loop may already be gone
        let _ = self.shutdown_tx.send(true);
    }

    pub async fn shutdown_and_join(self) {
        self.request_shutdown();
        let _ = self.join.await;
    }
}

async fn timer_loop(handle: ControllerHandle, mut shutdown_rx: watch::Receiver<bool>) {
    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        let next_due = {
            let mut controller = handle.inner.lock().await;
            controller.advance_to(handle.elapsed());
            controller.next_due()
        };

        // Notify keeps a permit, so a schedule change between unlock and
        // select still wakes us.
        match next_due {
            Some(due) => {
                tokio::select! {
                    _ = handle.notify.notified() => {}
                    _ = tokio::time::sleep_until(handle.origin + due) => {}
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                }
            }
            None => {
                tokio::select! {
                    _ = handle.notify.notified() => {}
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                }
            }
        }
    }
    debug!("timer task stopped");
}
