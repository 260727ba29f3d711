//! RecordStore port - リモートレコードストアへの seam
//!
//! tasks / categories の 2 コレクションに対する owner スコープ付き CRUD。
//! 本番ではネットワーク越しのストアクライアントが実装し、開発・テストでは
//! `impls::inmem_store::InMemoryRecordStore` を使います。
//!
//! # 設計原則
//! - 全メソッドが `owner` を取る。owner 述語のないクエリはスタイルの
//!   問題ではなく正しさのバグ（サーバー側 row-level security は前提に
//!   しない。マルチテナント分離はここで成立する）
//! - 書き込み系は「マッチした行数」を返す。0 行マッチを誤りとするかは
//!   呼び出し側（catalog / repository）の契約
//! - トランザクションは提供しない。複数書き込みの順序付けと部分失敗の
//!   扱いは呼び出し側の責務

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::ids::{CategoryId, OwnerId, TaskId};
use crate::domain::{Category, Task, TaskPatch};

/// Failure of a single store round trip (network/server). Never retried
/// by this crate; timeouts are the underlying client's business.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store operation failed: {0}")]
    OperationFailed(String),
}

/// Owner-scoped record store over the `tasks` and `categories` collections.
///
/// Every call is one request/response round trip and therefore a suspension
/// point. Callers sequence dependent calls explicitly; there is no implicit
/// parallelism between cascade steps.
#[async_trait]
pub trait RecordStore: Send + Sync {
    // ---- tasks ----

    /// Insert a task row, returning it as stored.
    async fn insert_task(&self, task: Task) -> Result<Task, StoreError>;

    /// Select one task by owner + id.
    async fn find_task(&self, owner: OwnerId, id: TaskId) -> Result<Option<Task>, StoreError>;

    /// Select all tasks of an owner, in insertion order (a single
    /// consistent snapshot; callers apply their own ordering).
    async fn list_tasks(&self, owner: OwnerId) -> Result<Vec<Task>, StoreError>;

    /// Update-by-filter (owner + id). Returns the number of matched rows
    /// (0 or 1).
    async fn update_task(
        &self,
        owner: OwnerId,
        id: TaskId,
        patch: TaskPatch,
    ) -> Result<u64, StoreError>;

    /// Delete-by-filter (owner + id). Returns the number of matched rows.
    async fn delete_task(&self, owner: OwnerId, id: TaskId) -> Result<u64, StoreError>;

    /// Update-by-filter on category equality: every task of `owner` whose
    /// label equals `from` gets `to` (`None` detaches). Returns the number
    /// of rewritten rows. This is the task half of a catalog cascade.
    async fn relabel_tasks(
        &self,
        owner: OwnerId,
        from: &str,
        to: Option<&str>,
    ) -> Result<u64, StoreError>;

    // ---- categories ----

    /// Insert a category row, returning it as stored.
    async fn insert_category(&self, category: Category) -> Result<Category, StoreError>;

    /// Select one category by owner + id.
    async fn find_category(
        &self,
        owner: OwnerId,
        id: CategoryId,
    ) -> Result<Option<Category>, StoreError>;

    /// Select all categories of an owner, ordered by name ascending.
    async fn list_categories(&self, owner: OwnerId) -> Result<Vec<Category>, StoreError>;

    /// Rename-by-filter (owner + id). Returns the number of matched rows.
    async fn rename_category(
        &self,
        owner: OwnerId,
        id: CategoryId,
        name: &str,
    ) -> Result<u64, StoreError>;

    /// Delete-by-filter (owner + id). Returns the number of matched rows.
    async fn delete_category(&self, owner: OwnerId, id: CategoryId) -> Result<u64, StoreError>;
}
