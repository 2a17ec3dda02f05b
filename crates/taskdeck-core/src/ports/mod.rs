//! Ports - 抽象化レイヤー
//!
//! コントローラが外部に依存する部分（時刻、ID 生成、イベント通知）を
//! trait として定義し、テストで差し替えられるようにします。

pub mod clock;
pub mod event_sink;
pub mod id_generator;

// 主要な trait を再エクスポート
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::event_sink::{ChannelEventSink, EventSink, NoopEventSink, RecordingEventSink};
pub use self::id_generator::{IdGenerator, UlidGenerator};
