//! Change notification: events, the notifier seam, and its implementations.

mod events;
mod manual;
mod os;

pub use events::{ChangeHandler, ChangeKind, FileChange};
pub use manual::ManualNotifier;
pub use os::NotifyWatcher;

use crate::error::ApiError;

/// Source of file change events
///
/// The database registers one handler at construction and unregisters it on
/// drop. Handlers may be called from any thread.
pub trait ChangeNotifier: Send {
    fn register(&mut self, handler: ChangeHandler) -> Result<(), ApiError>;

    fn unregister(&mut self);
}
