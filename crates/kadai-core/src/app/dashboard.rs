//! Dashboard aggregation: status counts and the recency view.
//!
//! 集計は副作用のない純関数です。同じタスクスナップショットと同じ `now` を
//! 与えれば常に同じ結果になります（再計算・リスタート安全）。

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::ids::OwnerId;
use crate::domain::{KadaiResult, Task};
use crate::ports::{Clock, RecordStore};

/// Number of tasks shown in the "recent tasks" panel.
pub const RECENT_LIMIT: usize = 5;

/// Status counts over one task snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub overdue: usize,
}

impl TaskStats {
    /// Summarize a snapshot. `overdue` counts pending tasks whose due date
    /// is strictly before `now`'s calendar date.
    pub fn summarize(tasks: &[Task], now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.is_completed).count();
        let overdue = tasks.iter().filter(|t| t.is_overdue(today)).count();
        Self {
            total,
            completed,
            pending: total - completed,
            overdue,
        }
    }
}

/// The `limit` most recently created tasks, newest first.
///
/// Stable sort: tasks sharing a created_at keep their snapshot (insertion)
/// order, so repeated calls over the same snapshot are identical.
pub fn recent(tasks: &[Task], limit: usize) -> Vec<Task> {
    let mut ranked: Vec<&Task> = tasks.iter().collect();
    ranked.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    ranked.into_iter().take(limit).cloned().collect()
}

/// Everything the dashboard page renders.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardData {
    pub stats: TaskStats,
    pub recent: Vec<Task>,
}

/// Read-only dashboard service: one task snapshot in, stats + recency out.
pub struct Dashboard {
    store: Arc<dyn RecordStore>,
    clock: Arc<dyn Clock>,
}

impl Dashboard {
    pub fn new(store: Arc<dyn RecordStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Fetch the owner's tasks once and derive both views from that single
    /// snapshot.
    pub async fn overview(&self, owner: OwnerId) -> KadaiResult<DashboardData> {
        let tasks = self.store.list_tasks(owner).await?;
        let stats = TaskStats::summarize(&tasks, self.clock.now());
        let recent = recent(&tasks, RECENT_LIMIT);
        Ok(DashboardData { stats, recent })
    }
}
