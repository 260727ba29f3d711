//! Task row and its write-side carriers (draft / patch).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{OwnerId, TaskId};

/// Task priority (optional on a task).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!("unknown priority: {other}")),
        }
    }
}

/// One row in the tasks collection.
///
/// `category` is a denormalized copy of a category's *name* at assignment
/// time, not a foreign key. Rename/delete of a category rewrites this field
/// through the catalog cascade; a stale label is a reachable (tolerated)
/// state, never a crash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub owner: OwnerId,
    pub title: String,
    pub description: Option<String>,
    pub is_completed: bool,
    pub category: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// 未完了かつ期限切れか（`today` より前の due_date を持つ）
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.is_completed && self.due_date.is_some_and(|due| due < today)
    }
}

/// Creation input for a task. Only the title is required; the repository
/// validates and trims it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<NaiveDate>,
    pub is_completed: bool,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// 部分更新の 1 フィールド
///
/// Nullable なカラムでは「変更しない」と「null にする」を区別する必要が
/// あるため、`Option` ではなくこの型を使います（`Set(None)` = null 化）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Field<T> {
    /// Leave the stored value as it is.
    #[default]
    Keep,
    /// Overwrite the stored value.
    Set(T),
}

impl<T> Field<T> {
    /// Apply this field onto `slot`, overwriting only for `Set`.
    pub fn apply(self, slot: &mut T) {
        if let Field::Set(value) = self {
            *slot = value;
        }
    }

    pub fn is_set(&self) -> bool {
        matches!(self, Field::Set(_))
    }
}

/// Partial update for a task. Every field defaults to `Keep`.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Field<String>,
    pub description: Field<Option<String>>,
    pub is_completed: Field<bool>,
    pub category: Field<Option<String>>,
    pub priority: Field<Option<Priority>>,
    pub due_date: Field<Option<NaiveDate>>,
}

impl TaskPatch {
    /// Patch that only flips the completion flag (status toggle).
    pub fn completion(is_completed: bool) -> Self {
        Self {
            is_completed: Field::Set(is_completed),
            ..Self::default()
        }
    }

    /// Apply the patch onto a task row. Id / owner / created_at are
    /// immutable and deliberately not part of the patch.
    pub fn apply(self, task: &mut Task) {
        self.title.apply(&mut task.title);
        self.description.apply(&mut task.description);
        self.is_completed.apply(&mut task.is_completed);
        self.category.apply(&mut task.category);
        self.priority.apply(&mut task.priority);
        self.due_date.apply(&mut task.due_date);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ulid::Ulid;

    fn sample_task() -> Task {
        Task {
            id: TaskId::from_ulid(Ulid::new()),
            owner: OwnerId::from_ulid(Ulid::new()),
            title: "Buy milk".to_string(),
            description: Some("2 liters".to_string()),
            is_completed: false,
            category: Some("Errands".to_string()),
            priority: Some(Priority::Low),
            due_date: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn patch_defaults_keep_everything() {
        let mut task = sample_task();
        let before = task.clone();

        TaskPatch::default().apply(&mut task);

        assert_eq!(task, before);
    }

    #[test]
    fn set_none_clears_a_nullable_field() {
        let mut task = sample_task();

        let patch = TaskPatch {
            category: Field::Set(None),
            ..TaskPatch::default()
        };
        patch.apply(&mut task);

        assert_eq!(task.category, None);
        // 触っていないフィールドはそのまま
        assert_eq!(task.description.as_deref(), Some("2 liters"));
    }

    #[test]
    fn completion_patch_only_touches_the_flag() {
        let mut task = sample_task();

        TaskPatch::completion(true).apply(&mut task);

        assert!(task.is_completed);
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.category.as_deref(), Some("Errands"));
    }

    #[test]
    fn overdue_requires_pending_and_past_due_date() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let yesterday = NaiveDate::from_ymd_opt(2024, 6, 14).unwrap();
        let tomorrow = NaiveDate::from_ymd_opt(2024, 6, 16).unwrap();

        let mut task = sample_task();

        task.due_date = Some(yesterday);
        assert!(task.is_overdue(today));

        // 完了済みは期限切れ扱いしない
        task.is_completed = true;
        assert!(!task.is_overdue(today));

        task.is_completed = false;
        task.due_date = Some(tomorrow);
        assert!(!task.is_overdue(today));

        // due 当日はまだ overdue ではない
        task.due_date = Some(today);
        assert!(!task.is_overdue(today));

        task.due_date = None;
        assert!(!task.is_overdue(today));
    }

    #[test]
    fn priority_round_trips_through_serde_and_fromstr() {
        assert_eq!(
            serde_json::to_string(&Priority::High).unwrap(),
            "\"high\""
        );
        assert_eq!("medium".parse::<Priority>().unwrap(), Priority::Medium);
        assert!("urgent".parse::<Priority>().is_err());
    }
}
