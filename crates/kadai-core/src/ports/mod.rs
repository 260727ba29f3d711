//! Ports - 抽象化レイヤー
//!
//! このモジュールは Hexagonal Architecture の「ポート」を定義します。
//! 各 trait は外部コラボレーター（リモートレコードストア、時刻、ID 生成、
//! 通知シンク）へのインターフェースを提供し、実装の詳細を隠蔽します。
//!
//! # 設計原則
//! - レコードストアが source of truth（正本）。core はキャッシュを持たない
//! - すべてのストアアクセスは owner スコープ付き（マルチテナント分離）

pub mod clock;
pub mod id_generator;
pub mod notifier;
pub mod record_store;

// 主要な trait を再エクスポート
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::notifier::{Notice, Notifier, Outcome};
pub use self::record_store::{RecordStore, StoreError};
