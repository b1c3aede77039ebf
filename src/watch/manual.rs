//! Caller-driven notifier, for embedding and tests.

use super::events::{ChangeHandler, FileChange};
use super::ChangeNotifier;
use crate::error::ApiError;
use parking_lot::Mutex;
use std::sync::Arc;

/// Notifier whose events come from [`ManualNotifier::emit`]. Clones share the
/// same registration, so a test can keep one handle and give the database
/// another.
#[derive(Clone, Default)]
pub struct ManualNotifier {
    handler: Arc<Mutex<Option<ChangeHandler>>>,
}

impl ManualNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `change` to the registered handler. Returns false when nothing
    /// is registered.
    pub fn emit(&self, change: FileChange) -> bool {
        let handler = self.handler.lock().clone();
        match handler {
            Some(handler) => {
                handler(change);
                true
            }
            None => false,
        }
    }

    pub fn is_registered(&self) -> bool {
        self.handler.lock().is_some()
    }
}

impl ChangeNotifier for ManualNotifier {
    fn register(&mut self, handler: ChangeHandler) -> Result<(), ApiError> {
        *self.handler.lock() = Some(handler);
        Ok(())
    }

    fn unregister(&mut self) {
        self.handler.lock().take();
    }
}
