//! Virtual-time timer queue.
//!
//! Time is a `Duration` since the owner's epoch and only moves when the owner
//! says so. That keeps firing order deterministic in tests; the async driver
//! maps real `tokio::time` onto it.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Duration;

/// Scheduled entry for the priority queue.
///
/// We use reverse ordering so BinaryHeap acts as a min-heap (earliest first).
/// Ties on `due` fall back to `seq`, so equal delays fire in schedule order.
#[derive(Debug)]
struct Scheduled<T> {
    due: Duration,
    seq: u64,
    payload: T,
}

impl<T> PartialEq for Scheduled<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<T> Eq for Scheduled<T> {}

impl<T> PartialOrd for Scheduled<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Scheduled<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// A payload whose time has come.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired<T> {
    pub due: Duration,
    pub payload: T,
}

#[derive(Debug)]
pub struct TimerQueue<T> {
    heap: BinaryHeap<Scheduled<T>>,
    now: Duration,
    next_seq: u64,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            now: Duration::ZERO,
            next_seq: 0,
        }
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `payload` at `now + delay`. Returns the absolute due time.
    pub fn schedule(&mut self, delay: Duration, payload: T) -> Duration {
        let due = self.now.saturating_add(delay);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Scheduled { due, seq, payload });
        due
    }

    /// Due time of the earliest pending entry.
    pub fn next_due(&self) -> Option<Duration> {
        self.heap.peek().map(|entry| entry.due)
    }

    /// Pop the earliest entry if it is due at or before `until`.
    ///
    /// Virtual time moves forward to the entry's due time, so a caller that
    /// loops on this sees `now()` step through each firing.
    pub fn pop_due(&mut self, until: Duration) -> Option<Fired<T>> {
        if self.heap.peek()?.due > until {
            return None;
        }
        let entry = self.heap.pop()?;
        self.now = self.now.max(entry.due);
        Some(Fired {
            due: entry.due,
            payload: entry.payload,
        })
    }

    /// Move virtual time forward. Never moves backwards.
    pub fn advance_to(&mut self, to: Duration) {
        self.now = self.now.max(to);
    }

    /// Whether any pending payload matches `predicate`. Order is unspecified.
    pub fn any_pending(&self, mut predicate: impl FnMut(&T) -> bool) -> bool {
        self.heap.iter().any(|entry| predicate(&entry.payload))
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn drain(queue: &mut TimerQueue<&'static str>, until: Duration) -> Vec<&'static str> {
        std::iter::from_fn(|| queue.pop_due(until).map(|f| f.payload)).collect()
    }

    #[test]
    fn fires_in_due_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(ms(300), "c");
        queue.schedule(ms(100), "a");
        queue.schedule(ms(200), "b");

        assert_eq!(drain(&mut queue, ms(1_000)), vec!["a", "b", "c"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn equal_delays_fire_in_schedule_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(ms(400), "first");
        queue.schedule(ms(400), "second");
        queue.schedule(ms(400), "third");

        assert_eq!(drain(&mut queue, ms(400)), vec!["first", "second", "third"]);
    }

    #[test]
    fn nothing_fires_before_due() {
        let mut queue = TimerQueue::new();
        queue.schedule(ms(400), "late");

        assert_eq!(queue.pop_due(ms(399)), None);
        assert_eq!(queue.next_due(), Some(ms(400)));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn pop_moves_now_to_due_time() {
        let mut queue = TimerQueue::new();
        queue.schedule(ms(100), "a");
        queue.schedule(ms(250), "b");

        let fired = queue.pop_due(ms(1_000)).unwrap();
        assert_eq!(fired.due, ms(100));
        assert_eq!(queue.now(), ms(100));
    }

    #[test]
    fn delays_are_relative_to_now() {
        let mut queue = TimerQueue::new();
        queue.advance_to(ms(1_000));
        let due = queue.schedule(ms(400), "x");

        assert_eq!(due, ms(1_400));
    }

    #[test]
    fn time_never_goes_backwards() {
        let mut queue: TimerQueue<()> = TimerQueue::new();
        queue.advance_to(ms(500));
        queue.advance_to(ms(100));

        assert_eq!(queue.now(), ms(500));
    }

    #[test]
    fn zero_delay_is_immediately_due() {
        let mut queue = TimerQueue::new();
        queue.schedule(Duration::ZERO, "now");
        let now = queue.now();

        assert_eq!(drain(&mut queue, now), vec!["now"]);
    }

    #[test]
    fn any_pending_sees_only_unfired_entries() {
        let mut queue = TimerQueue::new();
        queue.schedule(ms(10), "a");
        queue.schedule(ms(20), "b");

        assert!(queue.any_pending(|p| *p == "a"));
        drain(&mut queue, ms(10));
        assert!(!queue.any_pending(|p| *p == "a"));
        assert!(queue.any_pending(|p| *p == "b"));
    }
}
