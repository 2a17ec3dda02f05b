//! Scheduler module: virtual-time timers, removal timing, removal planning.

mod removal;
mod timer;
mod timing;

pub use removal::{RemovalAction, RemovalScheduler};
pub use timer::{Fired, TimerQueue};
pub use timing::RemovalTiming;
