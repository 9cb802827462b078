/// Folder watcher using notify.
///
/// Watches a board folder recursively and forwards create/modify/remove
/// events as FolderChange. No debouncing: every event reaches the session,
/// which rebuilds on each one.
use std::path::Path;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use super::types::{ChangeKind, FolderChange, WatchError, WatchGuard};
use super::FolderWatcher;

#[derive(Debug, Clone, Copy, Default)]
pub struct NotifyWatcher;

impl NotifyWatcher {
    pub fn new() -> Self {
        Self
    }
}

/// Map a raw notify event to a board change. Access events are dropped
/// because rebuilding reads every card and would otherwise feed itself.
fn change_from_event(event: &Event) -> Option<FolderChange> {
    let kind = match event.kind {
        EventKind::Create(_) => ChangeKind::Created,
        EventKind::Remove(_) => ChangeKind::Removed,
        EventKind::Modify(_) | EventKind::Any => ChangeKind::Modified,
        EventKind::Access(_) | EventKind::Other => return None,
    };
    Some(FolderChange::new(kind, event.paths.clone()))
}

impl FolderWatcher for NotifyWatcher {
    fn watch(
        &self,
        folder: &Path,
        sink: mpsc::UnboundedSender<FolderChange>,
    ) -> Result<WatchGuard, WatchError> {
        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| match result {
                Ok(event) => {
                    if let Some(change) = change_from_event(&event) {
                        if sink.send(change).is_err() {
                            log::debug!("[dirboard.watcher.send] Session gone, dropping event");
                        }
                    }
                }
                Err(e) => log::error!("[dirboard.watcher.error] Watch error: {}", e),
            },
            notify::Config::default(),
        )?;
        watcher.watch(folder, RecursiveMode::Recursive)?;

        log::info!("[dirboard.watcher.board] Watching {:?}", folder);
        Ok(WatchGuard::new(watcher))
    }
}
