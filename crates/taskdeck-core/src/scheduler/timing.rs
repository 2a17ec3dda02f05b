//! Removal timing: how long transitions get before data goes away.

use std::time::Duration;

/// Delays for the delete and clear-completed transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemovalTiming {
    /// Time one task's removal transition needs before the data is dropped.
    pub delete_delay: Duration,

    /// Gap between consecutive items starting their transition during a clear.
    pub stagger_step: Duration,
}

impl RemovalTiming {
    pub const fn new(delete_delay: Duration, stagger_step: Duration) -> Self {
        Self {
            delete_delay,
            stagger_step,
        }
    }

    /// Offset at which the `index`-th item of a clear starts its transition.
    ///
    /// `index * stagger_step`
    pub fn mark_offset(&self, index: usize) -> Duration {
        self.stagger_step.saturating_mul(saturating_u32(index))
    }

    /// Offset at which a clear of `count` items drops the data.
    ///
    /// `count * stagger_step + delete_delay`: the last item started at
    /// `(count - 1) * stagger_step`, so every item gets at least a full
    /// `delete_delay` of transition time.
    pub fn clear_offset(&self, count: usize) -> Duration {
        self.stagger_step
            .saturating_mul(saturating_u32(count))
            .saturating_add(self.delete_delay)
    }
}

impl Default for RemovalTiming {
    /// 400ms transition, 300ms stagger.
    fn default() -> Self {
        Self::new(Duration::from_millis(400), Duration::from_millis(300))
    }
}

fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn default_timing_has_expected_values() {
        let timing = RemovalTiming::default();
        assert_eq!(timing.delete_delay, Duration::from_millis(400));
        assert_eq!(timing.stagger_step, Duration::from_millis(300));
    }

    #[rstest]
    #[case(0, 0)]
    #[case(1, 300)]
    #[case(4, 1_200)]
    fn mark_offsets_step_by_stagger(#[case] index: usize, #[case] expected_ms: u64) {
        let timing = RemovalTiming::default();
        assert_eq!(timing.mark_offset(index), Duration::from_millis(expected_ms));
    }

    #[rstest]
    #[case(0, 400)]
    #[case(1, 700)]
    #[case(3, 1_300)]
    fn clear_offset_waits_for_last_transition(#[case] count: usize, #[case] expected_ms: u64) {
        let timing = RemovalTiming::default();
        assert_eq!(timing.clear_offset(count), Duration::from_millis(expected_ms));
    }

    #[test]
    fn clear_offset_is_after_every_mark() {
        let timing = RemovalTiming::default();
        let count = 5;
        let last_mark = timing.mark_offset(count - 1);
        assert!(timing.clear_offset(count) >= last_mark + timing.delete_delay);
    }
}
