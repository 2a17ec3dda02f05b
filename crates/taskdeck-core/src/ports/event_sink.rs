//! EventSink port - イベント通知の抽象化
//!
//! # 実装
//! - **NoopEventSink**: 何もしない
//! - **RecordingEventSink**: 受け取ったイベントを保持（テスト用）
//! - **ChannelEventSink**: tokio mpsc へ送信（presentation 側で受信）

use std::sync::{Mutex, PoisonError};

use tokio::sync::mpsc;
use tracing::debug;

use crate::domain::ListEvent;

/// EventSink は ListEvent を外部へ通知
///
/// Called while the controller is mid-operation, so implementations must not
/// block and must not call back into the controller.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: ListEvent);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn emit(&self, _event: ListEvent) {}
}

#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<ListEvent>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything emitted so far.
    pub fn events(&self) -> Vec<ListEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drain everything emitted so far.
    pub fn take(&self) -> Vec<ListEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl EventSink for RecordingEventSink {
    fn emit(&self, event: ListEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

/// Forwards events to an unbounded tokio channel.
pub struct ChannelEventSink {
    tx: mpsc::UnboundedSender<ListEvent>,
}

impl ChannelEventSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ListEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: ListEvent) {
        // receiver may already be dropped on shutdown
        if self.tx.send(event).is_err() {
            debug!("event receiver dropped");
        }
    }
}
