//! In-memory record store implementation (development / tests).
//!
//! Behaves like the remote store as seen through the port: every method is
//! one owner-scoped round trip, writes report matched-row counts, and there
//! is no cross-call transaction.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::ids::{CategoryId, OwnerId, TaskId};
use crate::domain::{Category, Task, TaskPatch};
use crate::ports::record_store::{RecordStore, StoreError};

/// Stored task row plus its insertion sequence number.
///
/// HashMap iteration order is arbitrary, so `list_tasks` sorts by `seq` to
/// hand back a deterministic insertion-ordered snapshot (recency views
/// break created_at ties by insertion order).
#[derive(Debug, Clone)]
struct TaskRow {
    seq: u64,
    task: Task,
}

/// In-memory store state (single source of truth for both collections).
#[derive(Debug, Default)]
struct StoreState {
    tasks: HashMap<TaskId, TaskRow>,
    categories: HashMap<CategoryId, Category>,
    next_seq: u64,
}

impl StoreState {
    fn allocate_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}

/// InMemoryRecordStore は開発・テスト用のレコードストア
///
/// # 実装詳細
/// - tokio::sync::Mutex で排他制御（await 越しにロックを跨がない）
/// - owner フィルタを全メソッドで適用。別 owner の行は「存在しない」
///   のと区別がつかない
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn insert_task(&self, task: Task) -> Result<Task, StoreError> {
        let mut state = self.state.lock().await;
        let seq = state.allocate_seq();
        state.tasks.insert(
            task.id,
            TaskRow {
                seq,
                task: task.clone(),
            },
        );
        Ok(task)
    }

    async fn find_task(&self, owner: OwnerId, id: TaskId) -> Result<Option<Task>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .tasks
            .get(&id)
            .filter(|row| row.task.owner == owner)
            .map(|row| row.task.clone()))
    }

    async fn list_tasks(&self, owner: OwnerId) -> Result<Vec<Task>, StoreError> {
        let state = self.state.lock().await;
        let mut rows: Vec<&TaskRow> = state
            .tasks
            .values()
            .filter(|row| row.task.owner == owner)
            .collect();
        rows.sort_by_key(|row| row.seq);
        Ok(rows.into_iter().map(|row| row.task.clone()).collect())
    }

    async fn update_task(
        &self,
        owner: OwnerId,
        id: TaskId,
        patch: TaskPatch,
    ) -> Result<u64, StoreError> {
        let mut state = self.state.lock().await;
        match state
            .tasks
            .get_mut(&id)
            .filter(|row| row.task.owner == owner)
        {
            Some(row) => {
                patch.apply(&mut row.task);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_task(&self, owner: OwnerId, id: TaskId) -> Result<u64, StoreError> {
        let mut state = self.state.lock().await;
        let matches = state
            .tasks
            .get(&id)
            .is_some_and(|row| row.task.owner == owner);
        if matches {
            state.tasks.remove(&id);
            Ok(1)
        } else {
            Ok(0)
        }
    }

    async fn relabel_tasks(
        &self,
        owner: OwnerId,
        from: &str,
        to: Option<&str>,
    ) -> Result<u64, StoreError> {
        let mut state = self.state.lock().await;
        let mut rewritten = 0;
        for row in state.tasks.values_mut() {
            if row.task.owner == owner && row.task.category.as_deref() == Some(from) {
                row.task.category = to.map(str::to_string);
                rewritten += 1;
            }
        }
        Ok(rewritten)
    }

    async fn insert_category(&self, category: Category) -> Result<Category, StoreError> {
        let mut state = self.state.lock().await;
        state.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn find_category(
        &self,
        owner: OwnerId,
        id: CategoryId,
    ) -> Result<Option<Category>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .categories
            .get(&id)
            .filter(|category| category.owner == owner)
            .cloned())
    }

    async fn list_categories(&self, owner: OwnerId) -> Result<Vec<Category>, StoreError> {
        let state = self.state.lock().await;
        let mut categories: Vec<Category> = state
            .categories
            .values()
            .filter(|category| category.owner == owner)
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn rename_category(
        &self,
        owner: OwnerId,
        id: CategoryId,
        name: &str,
    ) -> Result<u64, StoreError> {
        let mut state = self.state.lock().await;
        match state
            .categories
            .get_mut(&id)
            .filter(|category| category.owner == owner)
        {
            Some(category) => {
                category.name = name.to_string();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_category(&self, owner: OwnerId, id: CategoryId) -> Result<u64, StoreError> {
        let mut state = self.state.lock().await;
        let matches = state
            .categories
            .get(&id)
            .is_some_and(|category| category.owner == owner);
        if matches {
            state.categories.remove(&id);
            Ok(1)
        } else {
            Ok(0)
        }
    }
}
