#[cfg(feature = "file-watcher")]
pub mod file_watcher;
pub mod types;

use std::path::Path;

use tokio::sync::mpsc;

pub use types::{ChangeKind, FolderChange, WatchError, WatchGuard};

/// Recursive change subscription for a board folder.
/// Implementations: NotifyWatcher (notify crate); tests drive a manual one.
pub trait FolderWatcher: Send + Sync {
    /// Deliver every create/modify/remove under `folder` to `sink` until the
    /// returned guard is dropped.
    fn watch(
        &self,
        folder: &Path,
        sink: mpsc::UnboundedSender<FolderChange>,
    ) -> Result<WatchGuard, WatchError>;
}
