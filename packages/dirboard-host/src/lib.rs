/// dirboard host: config loading, board sessions, HTTP server.
pub mod api;
pub mod config;
pub mod editor;
mod log_bridge;
pub mod render;
mod server;
pub mod state;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use dirboard_core::config::BoardEntry;
use dirboard_core::locator::board_id;
use dirboard_core::render::MarkdownRenderer;
use dirboard_core::storage::local::LocalFs;
use dirboard_core::storage::BoardFs;
use dirboard_core::watcher::file_watcher::NotifyWatcher;
use dirboard_core::watcher::FolderWatcher;
use dirboard_core::{
    spawn_session, BoardSession, EditorOpener, SessionHandle, SessionServices, SyncError,
};

use crate::editor::SystemEditor;
use crate::render::CommonMarkRenderer;
use crate::state::{AppState, BoardRuntime, HostPresenter};

#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("Board anchor {path:?} is not accessible: {source}")]
    Anchor {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Board {id} is configured twice")]
    DuplicateBoard { id: String },

    #[error(transparent)]
    Session(#[from] SyncError),

    #[error("HTTP server failed: {0}")]
    Server(#[from] std::io::Error),
}

/// Collaborators shared by every board session.
struct SharedServices {
    fs: Arc<dyn BoardFs>,
    renderer: Arc<dyn MarkdownRenderer>,
    editor: Arc<dyn EditorOpener>,
}

async fn open_board(
    entry: &BoardEntry,
    shared: &SharedServices,
    watcher: &dyn FolderWatcher,
    boards: &BTreeMap<String, BoardRuntime>,
) -> Result<(BoardRuntime, SessionHandle), HostError> {
    let configured = entry.anchor_path();
    let anchor = tokio::fs::canonicalize(&configured)
        .await
        .map_err(|source| HostError::Anchor {
            path: configured,
            source,
        })?;
    let id = board_id(&anchor);
    if boards.contains_key(&id) {
        return Err(HostError::DuplicateBoard { id });
    }

    let presenter = Arc::new(HostPresenter::new());
    let services = SessionServices {
        fs: shared.fs.clone(),
        renderer: shared.renderer.clone(),
        presenter: presenter.clone(),
        editor: shared.editor.clone(),
    };
    let handle = spawn_session(BoardSession::new(anchor.clone(), services), watcher).await?;
    log::info!("Board {} ({}) opened at {:?}", id, entry.display_name(), anchor);

    let runtime = BoardRuntime {
        id,
        name: entry.display_name(),
        anchor,
        intents: handle.intent_sender(),
        presenter,
    };
    Ok((runtime, handle))
}

pub async fn run() -> Result<(), HostError> {
    if let Err(e) = log_bridge::init() {
        eprintln!("dirboard: logger not installed: {}", e);
    }

    let config_path = config::default_config_path();
    let config = config::load_config(&config_path);
    if config.boards.is_empty() {
        log::warn!("No boards configured in {}", config_path.display());
    }

    let shared = SharedServices {
        fs: Arc::new(LocalFs),
        renderer: Arc::new(CommonMarkRenderer),
        editor: Arc::new(SystemEditor::new(config.editor.clone())),
    };
    let watcher = NotifyWatcher::new();

    let mut boards = BTreeMap::new();
    let mut handles = Vec::new();
    for entry in &config.boards {
        match open_board(entry, &shared, &watcher, &boards).await {
            Ok((runtime, handle)) => {
                boards.insert(runtime.id.clone(), runtime);
                handles.push(handle);
            }
            Err(e) => log::error!("Skipping board {}: {}", entry.anchor, e),
        }
    }

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let state = AppState {
        boards: Arc::new(boards),
        port: config.port,
        bind_address: config.bind_address.clone(),
        shutdown: shutdown_rx,
    };
    let served = server::serve(state, shutdown_tx).await;

    for handle in handles {
        handle.close().await;
    }
    served.map_err(HostError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dirboard_core::BoardMessage;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    fn shared() -> SharedServices {
        SharedServices {
            fs: Arc::new(LocalFs),
            renderer: Arc::new(CommonMarkRenderer),
            editor: Arc::new(SystemEditor::new(None)),
        }
    }

    #[tokio::test]
    async fn test_open_board_builds_and_publishes() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".kanban"), "").unwrap();
        fs::create_dir(dir.path().join("Todo")).unwrap();
        fs::write(dir.path().join("Todo/a.md"), "# Alpha\n*hi*").unwrap();

        let entry = BoardEntry {
            anchor: dir.path().join(".kanban").display().to_string(),
            name: Some("Test".into()),
        };
        let (runtime, handle) = open_board(&entry, &shared(), &NotifyWatcher::new(), &BTreeMap::new())
            .await
            .unwrap();
        assert_eq!(runtime.name, "Test");
        assert_eq!(runtime.id.len(), 12);

        let message = tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                if let Some(message) = runtime.presenter.latest() {
                    return message;
                }
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
        })
        .await
        .unwrap();
        let BoardMessage::BoardData { board, .. } = message;
        assert_eq!(board.columns[0].cards[0].title, "Alpha");
        assert_eq!(board.columns[0].cards[0].body_html, "<p><em>hi</em></p>\n");

        drop(runtime);
        handle.close().await;
    }

    #[tokio::test]
    async fn test_missing_anchor_is_rejected() {
        let dir = TempDir::new().unwrap();
        let entry = BoardEntry {
            anchor: dir.path().join("missing/.kanban").display().to_string(),
            name: None,
        };
        let err = open_board(&entry, &shared(), &NotifyWatcher::new(), &BTreeMap::new())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, HostError::Anchor { .. }));
    }

    #[tokio::test]
    async fn test_duplicate_board_is_rejected() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".kanban"), "").unwrap();
        let entry = BoardEntry {
            anchor: dir.path().join(".kanban").display().to_string(),
            name: None,
        };
        let shared = shared();
        let watcher = NotifyWatcher::new();
        let (runtime, handle) = open_board(&entry, &shared, &watcher, &BTreeMap::new())
            .await
            .unwrap();
        let boards = BTreeMap::from([(runtime.id.clone(), runtime)]);

        let err = open_board(&entry, &shared, &watcher, &boards)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, HostError::DuplicateBoard { .. }));
        drop(boards);
        handle.close().await;
    }
}
