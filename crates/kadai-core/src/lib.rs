//! kadai-core
//!
//! 個人タスクマネージャのコアライブラリ。タスクとカテゴリの整合性
//! （rename の伝搬、delete 時の切り離し、owner スコープの分離）と
//! ダッシュボード集計を担います。
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, task, category, errors）
//! - **ports**: 抽象化レイヤー（RecordStore, Clock, IdGenerator, Notifier）
//! - **app**: アプリケーションロジック（catalog, repository, dashboard, usage）
//! - **impls**: 実装（InMemoryRecordStore など開発用）
//!
//! # 設計上の前提
//! - リモートレコードストアが正本。トランザクションは期待しない
//! - カテゴリとタスクの関係は名前一致の denormalization。rename / delete は
//!   2 フェーズのカスケードで、部分失敗は `PartialCascade` として表面化する
//! - すべてのアクセスは owner スコープ付き（マルチテナント分離）

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;
