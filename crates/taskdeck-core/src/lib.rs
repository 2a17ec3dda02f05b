//! taskdeck-core
//!
//! In-memory task list with timed removal sequencing.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（TaskId, Task, errors, events）
//! - **ports**: 抽象化レイヤー（Clock, IdGenerator, EventSink）
//! - **store**: 順序付きタスク列（純粋な変換のみ）
//! - **scheduler**: 仮想時間タイマーと削除スケジューリング
//! - **drag**: ドラッグ操作から reorder への変換
//! - **app**: controller と async driver
//! - **observability**: 件数ビュー

pub mod app;
pub mod domain;
pub mod drag;
pub mod observability;
pub mod ports;
pub mod scheduler;
pub mod store;

pub use app::{ControllerBuilder, ControllerHandle, TaskListController};
pub use domain::{ListEvent, Task, TaskId, TaskListError};
pub use scheduler::RemovalTiming;
pub use store::TaskList;
