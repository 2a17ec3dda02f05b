//! ControllerBuilder - コントローラの構築とワイヤリング
//!
//! 指定しなかった port はデフォルト実装で埋めます:
//! - IdGenerator: `UlidGenerator<SystemClock>`
//! - EventSink: `NoopEventSink`
//! - RemovalTiming: 400ms / 300ms

use std::sync::Arc;

use super::TaskListController;
use crate::ports::{EventSink, IdGenerator, NoopEventSink, SystemClock, UlidGenerator};
use crate::scheduler::RemovalTiming;

/// # 使用例
/// ```ignore
/// let (sink, events) = ChannelEventSink::new();
/// let controller = ControllerBuilder::new()
///     .timing(RemovalTiming::default())
///     .event_sink(Arc::new(sink))
///     .build();
/// ```
#[derive(Default)]
pub struct ControllerBuilder {
    timing: Option<RemovalTiming>,
    ids: Option<Arc<dyn IdGenerator>>,
    events: Option<Arc<dyn EventSink>>,
}

impl ControllerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timing(mut self, timing: RemovalTiming) -> Self {
        self.timing = Some(timing);
        self
    }

    pub fn id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    pub fn event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn build(self) -> TaskListController {
        TaskListController::new(
            self.timing.unwrap_or_default(),
            self.ids
                .unwrap_or_else(|| Arc::new(UlidGenerator::new(SystemClock))),
            self.events.unwrap_or_else(|| Arc::new(NoopEventSink)),
        )
    }
}
