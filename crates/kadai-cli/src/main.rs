use std::sync::Arc;

use kadai_core::app::{CategoryCatalog, Dashboard, TaskOrder, TaskRepository};
use kadai_core::domain::ids::OwnerId;
use kadai_core::domain::{Priority, TaskDraft};
use kadai_core::impls::{InMemoryRecordStore, NullNotifier};
use kadai_core::ports::{SystemClock, UlidGenerator};
use ulid::Ulid;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // (A) ストアとサービスを配線（本番ではリモートストアクライアントが入る）
    let store: Arc<InMemoryRecordStore> = Arc::new(InMemoryRecordStore::new());
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
        clock.clone(),
        notifier,
    );
    let dashboard = Dashboard::new(store.clone(), clock);

    // identity provider の代わりに owner id をその場で生成（デモ用）
    let me = OwnerId::from_ulid(Ulid::new());

    // (B) カテゴリとタスクを作る（"Paperwork" はタスク作成時に自動登録）
    let work = catalog.create(me, "Work").await.expect("create category");
    repo.create(
        me,
        TaskDraft {
            title: "Standup notes".to_string(),
            category: Some("Work".to_string()),
            priority: Some(Priority::Medium),
            ..TaskDraft::default()
        },
    )
    .await
    .expect("create task");
    repo.create(
        me,
        TaskDraft {
            title: "File taxes".to_string(),
            category: Some("Paperwork".to_string()),
            priority: Some(Priority::High),
            due_date: chrono::NaiveDate::from_ymd_opt(2024, 4, 15),
            ..TaskDraft::default()
        },
    )
    .await
    .expect("create task");
    let done = repo
        .create(me, TaskDraft::new("Water plants"))
        .await
        .expect("create task");
    repo.toggle_completion(me, done.id).await.expect("toggle");

    // (C) rename のカスケード: "Work" を参照する全タスクが追従する
    catalog
        .rename(me, work.id, "Projects")
        .await
        .expect("rename category");

    // (D) ダッシュボードとカテゴリ別件数を表示
    let overview = dashboard.overview(me).await.expect("overview");
    println!(
        "stats: {}",
        serde_json::to_string_pretty(&overview.stats).expect("stats json")
    );
    for task in &overview.recent {
        println!(
            "recent: {} [{}] category={:?}",
            task.title,
            if task.is_completed { "done" } else { "open" },
            task.category
        );
    }

    for usage in catalog.list_with_usage(me).await.expect("list usage") {
        println!("category: {} ({} tasks)", usage.name(), usage.task_count);
    }

    // (E) delete のカスケード: "Projects" のタスクはラベルが外れる
    let projects = catalog
        .list(me)
        .await
        .expect("list categories")
        .into_iter()
        .find(|c| c.name == "Projects")
        .expect("Projects exists");
    catalog
        .delete(me, projects.id, "Projects")
        .await
        .expect("delete category");

    let after = repo.list(me, TaskOrder::TitleAsc).await.expect("list tasks");
    for task in &after {
        println!("after delete: {} category={:?}", task.title, task.category);
    }
}
