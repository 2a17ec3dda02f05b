use serde::{Deserialize, Serialize};

use crate::store::TaskList;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListCounts {
    pub total: usize,
    pub open: usize,
    pub completed: usize,
    /// Removal actions not fired yet.
    pub pending_timers: usize,
}

impl ListCounts {
    pub fn from_list(list: &TaskList, pending_timers: usize) -> Self {
        let completed = list.iter().filter(|t| t.is_completed()).count();
        Self {
            total: list.len(),
            open: list.len() - completed,
            completed,
            pending_timers,
        }
    }
}
