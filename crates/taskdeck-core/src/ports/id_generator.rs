//! IdGenerator port - ID 生成の抽象化
//!
//! テスト容易性のために、trait として抽象化しています。
//!
//! # 実装
//! - **UlidGenerator**: ULID ベース、同一ミリ秒内でも単調増加

use std::sync::{Mutex, PoisonError};

use tracing::trace;
use ulid::Ulid;

use crate::domain::TaskId;
use crate::ports::Clock;

/// IdGenerator は一意な TaskId を生成
///
/// # Thread Safety
/// - `Send + Sync` を要求（async driver から使える）
pub trait IdGenerator: Send + Sync {
    /// Task ID を生成
    fn generate_task_id(&self) -> TaskId;
}

/// UlidGenerator は ULID ベースの ID 生成器
///
/// Clock の時刻を timestamp 部分に使います。前回の ID と同じか古い
/// timestamp になった場合（同一ミリ秒、時刻の巻き戻り）は前回の ID を
/// increment するので、プロセス内で ID が重複することはありません。
pub struct UlidGenerator<C> {
    clock: C,
    last: Mutex<Option<Ulid>>,
}

impl<C: Clock> UlidGenerator<C> {
    /// 新しい UlidGenerator を作成
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            last: Mutex::new(None),
        }
    }
}

impl<C: Clock> IdGenerator for UlidGenerator<C> {
    fn generate_task_id(&self) -> TaskId {
        let timestamp_ms = self.clock.now().timestamp_millis().max(0) as u64;
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);

        let next = match *last {
            Some(prev) if prev.timestamp_ms() >= timestamp_ms => {
                trace!(timestamp_ms, "same tick as previous id, incrementing");
                // random 部分が溢れたら次のミリ秒へ繰り上げる
                prev.increment()
                    .unwrap_or_else(|| Ulid::from_parts(prev.timestamp_ms() + 1, 0))
            }
            _ => Ulid::from_parts(timestamp_ms, rand::random()),
        };

        *last = Some(next);
        TaskId::from(next)
    }
}
