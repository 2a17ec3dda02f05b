//! Domain model (ids, task record, errors, events).

pub mod errors;
pub mod events;
pub mod ids;
pub mod task;

pub use self::errors::TaskListError;
pub use self::events::{ListEvent, SortOrder};
pub use self::ids::TaskId;
pub use self::task::Task;
