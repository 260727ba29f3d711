//! Application services - カタログ・リポジトリ・集計
//!
//! UI 層（ここでは対象外）から呼ばれる操作の実装。カタログの rename /
//! delete はタスク側のカスケードを含み、dashboard / usage は読み取り専用の
//! 消費者です。

pub mod catalog;
pub mod dashboard;
pub mod repository;
pub mod usage;

pub use self::catalog::CategoryCatalog;
pub use self::dashboard::{Dashboard, DashboardData, TaskStats, recent, RECENT_LIMIT};
pub use self::repository::{TaskOrder, TaskRepository};
pub use self::usage::count_usage;
