//! Errors - エラー型と分類
//!
//! # 分類
//! - Validation: 呼び出し側の入力不正（空タイトル・空カテゴリ名）。再入力で回復可能
//! - NotFound: owner スコープ内に対象が存在しない（他 owner の所有物も
//!   同じに見える。テナント間で存在を漏らさないため、意図的に区別しない）
//! - Store: 下層ストア呼び出しの失敗。リトライせずそのまま伝搬
//! - PartialCascade: カスケードの第 1 書き込み成功後に第 2 書き込みが
//!   失敗した状態。既知で有界な不整合なので、一般の Store 失敗とは
//!   別に表面化させる

use thiserror::Error;

use super::ids::CategoryId;
use crate::ports::record_store::StoreError;

/// Domain error for catalog / repository operations.
///
/// No variant is fatal to the process; every failure is scoped to the one
/// requested operation and reported to the caller for display.
#[derive(Debug, Error)]
pub enum KadaiError {
    /// Caller-supplied data violates a precondition.
    #[error("validation: {0}")]
    Validation(String),

    /// The referenced id does not exist within the caller's owner scope.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Underlying store call failed. Not retried by this crate.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A category rename/delete mutated the catalog row but the dependent
    /// task sweep failed. `detached == true` means the delete form (tasks
    /// still carry a name with no catalog entry); `false` means the rename
    /// form (tasks still carry the old name).
    #[error("partial cascade on {category}: catalog row written, task sweep failed: {source}")]
    PartialCascade {
        category: CategoryId,
        detached: bool,
        #[source]
        source: StoreError,
    },
}

impl KadaiError {
    /// 入力値エラーか（呼び出し側が再入力で回復できるか）
    pub fn is_validation(&self) -> bool {
        matches!(self, KadaiError::Validation(_))
    }
}

/// Result alias used across the application services.
pub type KadaiResult<T> = Result<T, KadaiError>;
