/// Notification types emitted by folder watchers.
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Modified,
    Removed,
}

/// One filesystem notification somewhere under a watched board folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderChange {
    pub kind: ChangeKind,
    pub paths: Vec<PathBuf>,
}

impl FolderChange {
    pub fn new(kind: ChangeKind, paths: Vec<PathBuf>) -> Self {
        Self { kind, paths }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[cfg(feature = "file-watcher")]
    #[error("Watch error: {0}")]
    Notify(#[from] notify::Error),

    #[error("Watcher unavailable: {0}")]
    Unavailable(String),
}

/// Keeps a subscription alive; dropping it releases the watch.
pub struct WatchGuard {
    _inner: Box<dyn Send>,
}

impl WatchGuard {
    pub fn new<T: Send + 'static>(inner: T) -> Self {
        Self {
            _inner: Box::new(inner),
        }
    }
}

impl std::fmt::Debug for WatchGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("WatchGuard")
    }
}
