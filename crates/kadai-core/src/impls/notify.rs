//! Notifier implementations.

use std::sync::Mutex;

use crate::ports::notifier::{Notice, Notifier};

/// Swallows every notice. Production wiring without a UI attached.
#[derive(Debug, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _notice: Notice) {}
}

/// Records every notice for later assertions (tests).
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything notified so far.
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().expect("notifier lock poisoned").clone()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notice: Notice) {
        self.notices
            .lock()
            .expect("notifier lock poisoned")
            .push(notice);
    }
}
