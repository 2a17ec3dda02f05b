//! Drag reorder adapter.
//!
//! The one place where a finished drag gesture becomes a store reorder.
//! Gesture detection and rendering stay outside; this only sees positions.

use tracing::debug;

/// Anything that can move a task from one position to another.
pub trait ReorderTarget {
    fn reorder_task(&mut self, from: usize, to: usize);
}

/// End of a drag gesture.
///
/// `destination` is `None` when the item was dropped outside any drop target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragEnd {
    pub source: usize,
    pub destination: Option<usize>,
}

impl DragEnd {
    pub fn new(source: usize, destination: Option<usize>) -> Self {
        Self {
            source,
            destination,
        }
    }
}

/// Apply a finished gesture: exactly one reorder, or nothing at all.
///
/// Returns whether a reorder was issued. Range checking is left to the
/// target, which treats bad indices as a no-op.
pub fn apply_drag<T: ReorderTarget + ?Sized>(target: &mut T, drag: DragEnd) -> bool {
    let Some(destination) = drag.destination else {
        debug!(source = drag.source, "dropped outside list");
        return false;
    };
    target.reorder_task(drag.source, destination);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CallLog {
        calls: Vec<(usize, usize)>,
    }

    impl ReorderTarget for CallLog {
        fn reorder_task(&mut self, from: usize, to: usize) {
            self.calls.push((from, to));
        }
    }

    #[test]
    fn drop_on_target_reorders_once() {
        let mut log = CallLog::default();

        assert!(apply_drag(&mut log, DragEnd::new(0, Some(2))));
        assert_eq!(log.calls, vec![(0, 2)]);
    }

    #[test]
    fn drop_outside_does_nothing() {
        let mut log = CallLog::default();

        assert!(!apply_drag(&mut log, DragEnd::new(1, None)));
        assert!(log.calls.is_empty());
    }

    #[test]
    fn out_of_range_indices_are_passed_through() {
        let mut log = CallLog::default();

        apply_drag(&mut log, DragEnd::new(9, Some(42)));
        assert_eq!(log.calls, vec![(9, 42)]);
    }
}
