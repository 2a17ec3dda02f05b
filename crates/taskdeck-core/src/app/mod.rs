//! App - アプリケーション層
//!
//! store と scheduler を組み合わせて presentation に見せる操作を提供します。
//!
//! # 主要コンポーネント
//! - **ControllerBuilder**: port のワイヤリング
//! - **TaskListController**: 同期 API（仮想時間）
//! - **ControllerHandle**: tokio の実時間で動かす async API

pub mod builder;
pub mod controller;
pub mod driver;

// 主要な型を再エクスポート
pub use self::builder::ControllerBuilder;
pub use self::controller::TaskListController;
pub use self::driver::{ControllerHandle, TimerTask};
