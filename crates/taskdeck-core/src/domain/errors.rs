//! Errors - 呼び出し側に返すエラー
//!
//! Missing ids and out-of-range indices are not errors: those operations
//! resolve to no-ops. Only rejected input surfaces here.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskListError {
    #[error("task title must not be empty")]
    EmptyTitle,
}
