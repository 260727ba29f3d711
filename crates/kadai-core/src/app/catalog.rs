//! Category catalog manager.
//!
//! create / rename / delete と、rename・delete 時のタスクラベル整合の維持
//! （カスケード）を担います。ストアはトランザクションを提供しないため、
//! カスケードは明示的な 2 フェーズ操作です:
//!
//! - **phase 1**: カタログ行の書き込み（rename or delete）
//! - **phase 2**: 依存するタスク行の一括書き換え（relabel / detach）
//!
//! phase 2 は phase 1 の成功証明（[`CatalogWritten`]）がないと実行でき
//! ません。phase 1 失敗時はタスクに一切触れず、phase 2 失敗時は
//! `PartialCascade` として区別して表面化します（自動リトライなし。残る
//! 不整合は有界で、ユーザーの再実行かタスク編集で回復します）。
//!
//! 削除はカタログ行を先に消します。途中で落ちた場合に残るのは「どこも
//! 指していないタスクラベル」で、「解放し損ねたタスクを抱えた幽霊
//! カテゴリ」は作られません。

use std::sync::Arc;

use tracing::{debug, warn};

use crate::app::usage::count_usage;
use crate::domain::ids::{CategoryId, OwnerId};
use crate::domain::{Category, CategoryUsage, KadaiError, KadaiResult};
use crate::ports::{Clock, IdGenerator, Notice, Notifier, RecordStore};

/// Phase-1 success proof. Constructed only after the catalog row mutation
/// committed, and consumed by the task sweep.
struct CatalogWritten {
    category: CategoryId,
    /// true for the delete form (labels are detached, not rewritten).
    detached: bool,
}

/// Category Catalog Manager.
pub struct CategoryCatalog {
    store: Arc<dyn RecordStore>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
}

impl CategoryCatalog {
    pub fn new(
        store: Arc<dyn RecordStore>,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            ids,
            clock,
            notifier,
        }
    }

    /// Create a category. No effect on existing tasks.
    pub async fn create(&self, owner: OwnerId, name: &str) -> KadaiResult<Category> {
        let result = self.insert(owner, name).await;
        self.report(&result, "Category added", "Failed to add category");
        result
    }

    /// Rename a category and rewrite every task still carrying the old name.
    pub async fn rename(
        &self,
        owner: OwnerId,
        id: CategoryId,
        new_name: &str,
    ) -> KadaiResult<Category> {
        let result = self.rename_inner(owner, id, new_name).await;
        self.report(&result, "Category updated", "Failed to update category");
        result
    }

    /// Delete a category and detach its label from every referencing task.
    ///
    /// `name` is the category's current name as known to the caller (the
    /// label the sweep matches on). Destructive confirmation is the UI's
    /// business; once called, the delete is unconditional.
    pub async fn delete(&self, owner: OwnerId, id: CategoryId, name: &str) -> KadaiResult<()> {
        let result = self.delete_inner(owner, id, name).await;
        self.report(&result, "Category deleted", "Failed to delete category");
        result
    }

    /// All categories of the owner, name ascending.
    pub async fn list(&self, owner: OwnerId) -> KadaiResult<Vec<Category>> {
        Ok(self.store.list_categories(owner).await?)
    }

    /// カテゴリ一覧を使用件数付きで返す（カテゴリ画面用）。
    ///
    /// 両コレクションを 1 スナップショットずつ読み、件数はタスク側を
    /// 1 パスでグルーピングして求めます。カテゴリごとに count クエリを
    /// 発行しないので、件数が別時点の混在になることはありません。
    pub async fn list_with_usage(&self, owner: OwnerId) -> KadaiResult<Vec<CategoryUsage>> {
        let categories = self.store.list_categories(owner).await?;
        let tasks = self.store.list_tasks(owner).await?;
        Ok(count_usage(categories, &tasks))
    }

    /// カテゴリ名が未登録ならその場で作る（Task Repository との協調用）。
    ///
    /// タスク書き込み側から呼ばれるので、ユーザー向け通知は出しません。
    /// タスク側の書き込みがこの後に失敗してもカテゴリは残ります
    /// （タスク 0 件の孤児カテゴリは許容、エラー状態ではない）。
    pub(crate) async fn ensure(&self, owner: OwnerId, name: &str) -> KadaiResult<Category> {
        let trimmed = validated_name(name)?;
        let existing = self.store.list_categories(owner).await?;
        if let Some(found) = existing.into_iter().find(|c| c.name == trimmed) {
            return Ok(found);
        }
        self.insert(owner, trimmed).await
    }

    async fn insert(&self, owner: OwnerId, name: &str) -> KadaiResult<Category> {
        let name = validated_name(name)?;
        let category = Category {
            id: self.ids.generate_category_id(),
            owner,
            name: name.to_string(),
            created_at: self.clock.now(),
        };
        debug!(%owner, category = %category.id, name, "creating category");
        Ok(self.store.insert_category(category).await?)
    }

    async fn rename_inner(
        &self,
        owner: OwnerId,
        id: CategoryId,
        new_name: &str,
    ) -> KadaiResult<Category> {
        let new_name = validated_name(new_name)?;

        // カスケードのマッチ条件になる旧名を、行を触る前に確定させる
        let current = self
            .store
            .find_category(owner, id)
            .await?
            .ok_or(KadaiError::NotFound("category"))?;
        let old_name = current.name.clone();

        // phase 1: カタログ行の rename
        let matched = self.store.rename_category(owner, id, new_name).await?;
        if matched == 0 {
            // lookup と rename の間に消えた。タスクには触れていない
            return Err(KadaiError::NotFound("category"));
        }
        let written = CatalogWritten {
            category: id,
            detached: false,
        };

        // phase 2: 旧名を持つタスクの書き換え（旧名 == 新名なら no-op）
        if old_name != new_name {
            self.sweep(written, owner, &old_name, Some(new_name)).await?;
        }

        Ok(Category {
            name: new_name.to_string(),
            ..current
        })
    }

    async fn delete_inner(&self, owner: OwnerId, id: CategoryId, name: &str) -> KadaiResult<()> {
        // phase 1: カタログ行の削除。0 行マッチならタスクに触れる前に返す
        let matched = self.store.delete_category(owner, id).await?;
        if matched == 0 {
            return Err(KadaiError::NotFound("category"));
        }
        let written = CatalogWritten {
            category: id,
            detached: true,
        };

        // phase 2: ラベルの切り離し
        self.sweep(written, owner, name, None).await?;
        Ok(())
    }

    /// Phase 2 of a cascade: rewrite (or detach) matching task labels.
    /// Requires phase-1 proof; a failure here is a `PartialCascade`, not a
    /// plain store error.
    async fn sweep(
        &self,
        written: CatalogWritten,
        owner: OwnerId,
        from: &str,
        to: Option<&str>,
    ) -> KadaiResult<u64> {
        match self.store.relabel_tasks(owner, from, to).await {
            Ok(rewritten) => {
                debug!(%owner, category = %written.category, rewritten, "task sweep done");
                Ok(rewritten)
            }
            Err(source) => {
                warn!(
                    %owner,
                    category = %written.category,
                    detached = written.detached,
                    error = %source,
                    "catalog row written but task sweep failed"
                );
                Err(KadaiError::PartialCascade {
                    category: written.category,
                    detached: written.detached,
                    source,
                })
            }
        }
    }

    fn report<T>(&self, result: &KadaiResult<T>, ok: &str, failed: &str) {
        let notice = match result {
            Ok(_) => Notice::success(ok),
            Err(err) => Notice::failure(format!("{failed}: {err}")),
        };
        self.notifier.notify(notice);
    }
}

/// Trim and reject empty/whitespace category names.
fn validated_name(name: &str) -> KadaiResult<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(KadaiError::Validation(
            "category name cannot be empty".to_string(),
        ));
    }
    Ok(trimmed)
}
