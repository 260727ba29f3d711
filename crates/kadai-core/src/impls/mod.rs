//! Implementations - 開発・テスト用の具象
//!
//! - `inmem_store`: RecordStore の in-memory 実装
//! - `notify`: Notifier の null / 記録用実装

pub mod inmem_store;
pub mod notify;

pub use self::inmem_store::InMemoryRecordStore;
pub use self::notify::{MemoryNotifier, NullNotifier};
