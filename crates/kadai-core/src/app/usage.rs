//! Category usage counter.
//!
//! カテゴリごとの「そのラベルを持つタスク数」を算出します。入力は同一
//! スナップショットの categories / tasks で、カテゴリごとに count クエリを
//! 発行する形ではなく、タスク側を 1 パスでグルーピングしてから引きます
//! （カテゴリ数に比例した再スキャンと、時点のずれた件数の混在を避ける）。

use std::collections::HashMap;

use crate::domain::{Category, CategoryUsage, Task};

/// Count, per category, the tasks currently labeled with it.
///
/// Pure function over one snapshot of both collections; tasks whose label
/// matches no category (stale labels after a skipped cascade) simply do not
/// contribute. Output is ordered by name ascending.
pub fn count_usage(categories: Vec<Category>, tasks: &[Task]) -> Vec<CategoryUsage> {
    let mut by_label: HashMap<&str, usize> = HashMap::new();
    for task in tasks {
        if let Some(label) = task.category.as_deref() {
            *by_label.entry(label).or_insert(0) += 1;
        }
    }

    let mut usage: Vec<CategoryUsage> = categories
        .into_iter()
        .map(|category| {
            let task_count = by_label.get(category.name.as_str()).copied().unwrap_or(0);
            CategoryUsage {
                category,
                task_count,
            }
        })
        .collect();
    usage.sort_by(|a, b| a.name().cmp(b.name()));
    usage
}
