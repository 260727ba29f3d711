//! Notifier port - 通知サイドチャネル
//!
//! catalog / repository の各操作が完了・失敗したあとに fire-and-forget で
//! 呼ばれます。UI 層はこれをトースト表示などに使いますが、core 側は
//! 結果を待たず、通知の失敗も操作の結果に影響しません。

/// Outcome of one user-facing operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

/// One notification message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub outcome: Outcome,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Success,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Failure,
            message: message.into(),
        }
    }
}

/// Fire-and-forget sink for operation outcomes.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}
