//! Task repository: owner-scoped CRUD plus category-creation-on-write.
//!
//! create / update で未登録カテゴリ名が渡された場合はカタログと協調して
//! 先にカテゴリを作ります（2 回の独立した書き込み。2 回目が失敗しても
//! タスク 0 件のカテゴリが残るだけで、エラー状態ではありません）。

use std::sync::Arc;

use tracing::debug;

use crate::app::catalog::CategoryCatalog;
use crate::domain::ids::{OwnerId, TaskId};
use crate::domain::{Field, KadaiError, KadaiResult, Task, TaskDraft, TaskPatch};
use crate::ports::{Clock, IdGenerator, Notice, Notifier, RecordStore};

/// How `list` orders its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOrder {
    /// Newest first (recency views). Ties keep snapshot order.
    CreatedDesc,
    /// Alphabetic by title.
    TitleAsc,
}

/// Task Repository.
pub struct TaskRepository {
    store: Arc<dyn RecordStore>,
    catalog: Arc<CategoryCatalog>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
}

impl TaskRepository {
    pub fn new(
        store: Arc<dyn RecordStore>,
        catalog: Arc<CategoryCatalog>,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            catalog,
            ids,
            clock,
            notifier,
        }
    }

    /// Create a task. The title is required (trimmed); a category name not
    /// yet in the caller's catalog is created first.
    pub async fn create(&self, owner: OwnerId, draft: TaskDraft) -> KadaiResult<Task> {
        let result = self.create_inner(owner, draft).await;
        self.report(&result, "Task created", "Failed to create task");
        result
    }

    /// Partial update. Zero-row match within the owner scope is `NotFound`.
    pub async fn update(&self, owner: OwnerId, id: TaskId, patch: TaskPatch) -> KadaiResult<()> {
        let result = self.update_inner(owner, id, patch).await;
        self.report(&result, "Task updated", "Failed to update task");
        result
    }

    /// Delete a task. Idempotent: a zero-row match is silent success.
    pub async fn delete(&self, owner: OwnerId, id: TaskId) -> KadaiResult<()> {
        let result = async {
            self.store.delete_task(owner, id).await?;
            Ok(())
        }
        .await;
        self.report(&result, "Task deleted", "Failed to delete task");
        result
    }

    /// Fetch one task by id within the owner scope.
    pub async fn get(&self, owner: OwnerId, id: TaskId) -> KadaiResult<Task> {
        self.store
            .find_task(owner, id)
            .await?
            .ok_or(KadaiError::NotFound("task"))
    }

    /// All tasks of the owner in the requested order.
    pub async fn list(&self, owner: OwnerId, order: TaskOrder) -> KadaiResult<Vec<Task>> {
        let mut tasks = self.store.list_tasks(owner).await?;
        match order {
            // 安定ソート: created_at が同じ行はスナップショット順を保つ
            TaskOrder::CreatedDesc => tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            TaskOrder::TitleAsc => tasks.sort_by(|a, b| a.title.cmp(&b.title)),
        }
        Ok(tasks)
    }

    /// Flip the completion flag: read the current value, write the
    /// opposite. Returns the task as it is after the flip.
    pub async fn toggle_completion(&self, owner: OwnerId, id: TaskId) -> KadaiResult<Task> {
        let result = self.toggle_inner(owner, id).await;
        match &result {
            Ok(task) if task.is_completed => {
                self.notifier.notify(Notice::success("Task marked as completed"));
            }
            Ok(_) => {
                self.notifier.notify(Notice::success("Task marked as pending"));
            }
            Err(err) => {
                self.notifier
                    .notify(Notice::failure(format!("Failed to update task status: {err}")));
            }
        }
        result
    }

    async fn create_inner(&self, owner: OwnerId, draft: TaskDraft) -> KadaiResult<Task> {
        let title = validated_title(&draft.title)?;
        let description = normalized(draft.description);
        let category = match normalized(draft.category) {
            // 先にカテゴリを確保してから、その名前をタスクに焼き込む
            Some(name) => Some(self.catalog.ensure(owner, &name).await?.name),
            None => None,
        };

        let task = Task {
            id: self.ids.generate_task_id(),
            owner,
            title: title.to_string(),
            description,
            is_completed: draft.is_completed,
            category,
            priority: draft.priority,
            due_date: draft.due_date,
            created_at: self.clock.now(),
        };
        debug!(%owner, task = %task.id, "creating task");
        Ok(self.store.insert_task(task).await?)
    }

    async fn update_inner(&self, owner: OwnerId, id: TaskId, patch: TaskPatch) -> KadaiResult<()> {
        let mut patch = patch;

        if let Field::Set(title) = &patch.title {
            patch.title = Field::Set(validated_title(title)?.to_string());
        }
        // create と同じ正規化: 空白のみのテキストは null に潰す
        patch.description = match patch.description {
            Field::Set(value) => Field::Set(normalized(value)),
            keep => keep,
        };
        patch.category = match patch.category {
            Field::Set(value) => match normalized(value) {
                // 未登録名なら作る（create と同じ協調）
                Some(name) => Field::Set(Some(self.catalog.ensure(owner, &name).await?.name)),
                None => Field::Set(None),
            },
            keep => keep,
        };

        let matched = self.store.update_task(owner, id, patch).await?;
        if matched == 0 {
            return Err(KadaiError::NotFound("task"));
        }
        Ok(())
    }

    async fn toggle_inner(&self, owner: OwnerId, id: TaskId) -> KadaiResult<Task> {
        let mut task = self.get(owner, id).await?;
        let flipped = !task.is_completed;

        let matched = self
            .store
            .update_task(owner, id, TaskPatch::completion(flipped))
            .await?;
        if matched == 0 {
            // get と update の間に消えた
            return Err(KadaiError::NotFound("task"));
        }

        task.is_completed = flipped;
        Ok(task)
    }

    fn report<T>(&self, result: &KadaiResult<T>, ok: &str, failed: &str) {
        let notice = match result {
            Ok(_) => Notice::success(ok),
            Err(err) => Notice::failure(format!("{failed}: {err}")),
        };
        self.notifier.notify(notice);
    }
}

/// Trim and reject empty/whitespace titles.
fn validated_title(title: &str) -> KadaiResult<&str> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(KadaiError::Validation("title is required".to_string()));
    }
    Ok(trimmed)
}

/// Trim an optional text field; empty/whitespace collapses to `None`.
fn normalized(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Priority;
    use crate::impls::{InMemoryRecordStore, NullNotifier};
    use crate::ports::{SystemClock, UlidGenerator};
    use chrono::NaiveDate;
    use rstest::rstest;
    use ulid::Ulid;

    fn owner() -> OwnerId {
        OwnerId::from_ulid(Ulid::new())
    }

    fn wire() -> (Arc<InMemoryRecordStore>, Arc<CategoryCatalog>, TaskRepository) {
        let store = Arc::new(InMemoryRecordStore::new());
        let ids = Arc::new(UlidGenerator::new(SystemClock));
        let clock = Arc::new(SystemClock);
        let notifier = Arc::new(NullNotifier);
        let catalog = Arc::new(CategoryCatalog::new(
            store.clone(),
            ids.clone(),
            clock.clone(),
            notifier.clone(),
        ));
        let repo = TaskRepository::new(
            store.clone(),
            catalog.clone(),
            ids,
            clock,
            notifier,
        );
        (store, catalog, repo)
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    #[tokio::test]
    async fn create_rejects_blank_titles(#[case] title: &str) {
        let (_, _, repo) = wire();
        let err = repo.create(owner(), TaskDraft::new(title)).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn create_trims_title_and_collapses_empty_description() {
        let (_, _, repo) = wire();
        let me = owner();

        let draft = TaskDraft {
            title: "  Buy milk  ".to_string(),
            description: Some("   ".to_string()),
            ..TaskDraft::default()
        };
        let task = repo.create(me, draft).await.unwrap();

        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.description, None);
        assert!(!task.is_completed);
    }

    #[tokio::test]
    async fn create_with_new_category_registers_it_first() {
        let (_, catalog, repo) = wire();
        let me = owner();

        let draft = TaskDraft {
            title: "File taxes".to_string(),
            category: Some("Paperwork".to_string()),
            priority: Some(Priority::High),
            due_date: NaiveDate::from_ymd_opt(2024, 4, 15),
            ..TaskDraft::default()
        };
        let task = repo.create(me, draft).await.unwrap();

        assert_eq!(task.category.as_deref(), Some("Paperwork"));
        let names: Vec<String> = catalog
            .list(me)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, ["Paperwork"]);
    }

    #[tokio::test]
    async fn create_with_existing_category_does_not_duplicate_it() {
        let (_, catalog, repo) = wire();
        let me = owner();
        catalog.create(me, "Work").await.unwrap();

        let draft = TaskDraft {
            title: "Standup".to_string(),
            category: Some("Work".to_string()),
            ..TaskDraft::default()
        };
        repo.create(me, draft).await.unwrap();

        assert_eq!(catalog.list(me).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_overwrites_provided_fields_only() {
        let (_, _, repo) = wire();
        let me = owner();
        let task = repo
            .create(
                me,
                TaskDraft {
                    title: "Draft".to_string(),
                    description: Some("v1".to_string()),
                    ..TaskDraft::default()
                },
            )
            .await
            .unwrap();

        let patch = TaskPatch {
            title: Field::Set("Final".to_string()),
            ..TaskPatch::default()
        };
        repo.update(me, task.id, patch).await.unwrap();

        let stored = repo.get(me, task.id).await.unwrap();
        assert_eq!(stored.title, "Final");
        assert_eq!(stored.description.as_deref(), Some("v1"));
    }

    #[tokio::test]
    async fn update_normalizes_description_like_create() {
        let (_, _, repo) = wire();
        let me = owner();
        let task = repo
            .create(
                me,
                TaskDraft {
                    title: "Draft".to_string(),
                    description: Some("v1".to_string()),
                    ..TaskDraft::default()
                },
            )
            .await
            .unwrap();

        // 空白のみの説明は null に潰れる
        let patch = TaskPatch {
            description: Field::Set(Some("   ".to_string())),
            ..TaskPatch::default()
        };
        repo.update(me, task.id, patch).await.unwrap();
        assert_eq!(repo.get(me, task.id).await.unwrap().description, None);

        // 前後の空白は落として保存する
        let patch = TaskPatch {
            description: Field::Set(Some("  v2  ".to_string())),
            ..TaskPatch::default()
        };
        repo.update(me, task.id, patch).await.unwrap();
        assert_eq!(
            repo.get(me, task.id).await.unwrap().description.as_deref(),
            Some("v2")
        );
    }

    #[tokio::test]
    async fn update_with_blank_category_clears_the_label() {
        let (_, catalog, repo) = wire();
        let me = owner();
        let task = repo
            .create(
                me,
                TaskDraft {
                    title: "Labeled".to_string(),
                    category: Some("Work".to_string()),
                    ..TaskDraft::default()
                },
            )
            .await
            .unwrap();

        let patch = TaskPatch {
            category: Field::Set(Some("   ".to_string())),
            ..TaskPatch::default()
        };
        repo.update(me, task.id, patch).await.unwrap();

        assert_eq!(repo.get(me, task.id).await.unwrap().category, None);
        // 空白名のカテゴリが新規登録されたりはしない
        assert_eq!(catalog.list(me).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_missing_task_is_not_found() {
        let (_, _, repo) = wire();
        let err = repo
            .update(owner(), TaskId::from_ulid(Ulid::new()), TaskPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, KadaiError::NotFound("task")));
    }

    #[tokio::test]
    async fn update_cannot_cross_owner_boundaries() {
        let (_, _, repo) = wire();
        let alice = owner();
        let bob = owner();
        let task = repo.create(alice, TaskDraft::new("mine")).await.unwrap();

        let patch = TaskPatch {
            title: Field::Set("stolen".to_string()),
            ..TaskPatch::default()
        };
        let err = repo.update(bob, task.id, patch).await.unwrap_err();
        assert!(matches!(err, KadaiError::NotFound("task")));

        assert_eq!(repo.get(alice, task.id).await.unwrap().title, "mine");
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let (_, _, repo) = wire();
        let me = owner();
        let task = repo.create(me, TaskDraft::new("gone soon")).await.unwrap();

        repo.delete(me, task.id).await.unwrap();
        // 二度目も成功扱い
        repo.delete(me, task.id).await.unwrap();

        assert!(matches!(
            repo.get(me, task.id).await.unwrap_err(),
            KadaiError::NotFound("task")
        ));
    }

    #[tokio::test]
    async fn toggle_flips_back_and_forth() {
        let (_, _, repo) = wire();
        let me = owner();
        let task = repo.create(me, TaskDraft::new("flip me")).await.unwrap();
        assert!(!task.is_completed);

        let toggled = repo.toggle_completion(me, task.id).await.unwrap();
        assert!(toggled.is_completed);

        let toggled = repo.toggle_completion(me, task.id).await.unwrap();
        assert!(!toggled.is_completed);

        assert!(!repo.get(me, task.id).await.unwrap().is_completed);
    }

    #[tokio::test]
    async fn list_orders_by_recency_or_title() {
        let (_, _, repo) = wire();
        let me = owner();
        for title in ["banana", "apple", "cherry"] {
            repo.create(me, TaskDraft::new(title)).await.unwrap();
        }

        let by_title = repo.list(me, TaskOrder::TitleAsc).await.unwrap();
        let titles: Vec<&str> = by_title.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["apple", "banana", "cherry"]);

        // created_at が全件同一ミリ秒でも挿入順が保たれる（安定ソート）
        let by_recency = repo.list(me, TaskOrder::CreatedDesc).await.unwrap();
        assert_eq!(by_recency.len(), 3);
        let again = repo.list(me, TaskOrder::CreatedDesc).await.unwrap();
        assert_eq!(by_recency, again);
    }

    #[tokio::test]
    async fn list_is_scoped_to_the_caller() {
        let (_, _, repo) = wire();
        let alice = owner();
        let bob = owner();
        repo.create(alice, TaskDraft::new("a1")).await.unwrap();
        repo.create(bob, TaskDraft::new("b1")).await.unwrap();

        let mine = repo.list(alice, TaskOrder::TitleAsc).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].title, "a1");
    }
}
