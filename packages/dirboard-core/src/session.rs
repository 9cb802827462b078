/// Board session: the live lifecycle of one open board.
///
/// States: Unwatched -> (open) -> Watching -> (dispose) -> Disposed.
///
/// While watching, every folder change and every `ready` intent triggers a
/// full rebuild-and-push. A `moveCard` intent runs the move executor and then
/// rebuilds whether or not the move succeeded. `openFile` goes to the editor
/// and does not rebuild. Errors are returned to the caller, never retried.
///
/// `spawn_session` runs a session on its own task: folder changes and intents
/// are consumed by one loop, so steps for one board never overlap. Separate
/// boards share nothing.
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::builder::{build_board, BuildError};
use crate::locator::{board_folder, path_from_locator};
use crate::mover::{move_card, MoveError, MoveOutcome};
use crate::render::MarkdownRenderer;
use crate::storage::BoardFs;
use crate::sync::{BoardMessage, EditorOpener, Intent, Presenter};
use crate::types::Board;
use crate::watcher::{FolderChange, FolderWatcher, WatchError, WatchGuard};

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Move(#[from] MoveError),

    #[error(transparent)]
    Watch(#[from] WatchError),

    #[error("Failed to open {path:?} in editor: {source}")]
    Open { path: PathBuf, source: io::Error },

    #[error("Board session is already open")]
    AlreadyOpen,

    #[error("Board session is closed")]
    Disposed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unwatched,
    Watching,
    Disposed,
}

/// External collaborators a session runs against.
#[derive(Clone)]
pub struct SessionServices {
    pub fs: Arc<dyn BoardFs>,
    pub renderer: Arc<dyn MarkdownRenderer>,
    pub presenter: Arc<dyn Presenter>,
    pub editor: Arc<dyn EditorOpener>,
}

pub struct BoardSession {
    anchor: PathBuf,
    folder: PathBuf,
    services: SessionServices,
    state: SessionState,
    /// Only ever written by `rebuild_and_push`.
    current: Option<Board>,
    subscription: Option<WatchGuard>,
    changes: Option<mpsc::UnboundedReceiver<FolderChange>>,
}

impl BoardSession {
    pub fn new(anchor: impl Into<PathBuf>, services: SessionServices) -> Self {
        let anchor = anchor.into();
        let folder = board_folder(&anchor);
        Self {
            anchor,
            folder,
            services,
            state: SessionState::Unwatched,
            current: None,
            subscription: None,
            changes: None,
        }
    }

    pub fn anchor(&self) -> &Path {
        &self.anchor
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The board from the most recent successful rebuild.
    pub fn current(&self) -> Option<&Board> {
        self.current.as_ref()
    }

    /// Subscribe to changes under the board folder and push the first board.
    ///
    /// When only the initial rebuild fails the session is still Watching and
    /// the build error is returned.
    pub async fn open(&mut self, watcher: &dyn FolderWatcher) -> Result<(), SyncError> {
        match self.state {
            SessionState::Unwatched => {}
            SessionState::Watching => return Err(SyncError::AlreadyOpen),
            SessionState::Disposed => return Err(SyncError::Disposed),
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let guard = watcher.watch(&self.folder, tx)?;
        self.subscription = Some(guard);
        self.changes = Some(rx);
        self.state = SessionState::Watching;
        log::info!("[dirboard.sync.open] Opened board at {:?}", self.folder);

        self.rebuild_and_push().await?;
        Ok(())
    }

    /// Rebuild the board from disk, replace the current board and push it.
    pub async fn rebuild_and_push(&mut self) -> Result<&Board, SyncError> {
        if self.state == SessionState::Disposed {
            return Err(SyncError::Disposed);
        }
        let board = build_board(
            self.services.fs.as_ref(),
            self.services.renderer.as_ref(),
            &self.anchor,
        )
        .await?;
        log::debug!(
            "[dirboard.sync.rebuild] {:?}: {} columns, {} cards",
            self.folder,
            board.columns.len(),
            board.card_count()
        );

        self.services.presenter.push(BoardMessage::board_data(&board));
        Ok(&*self.current.insert(board))
    }

    /// Wait for the next folder change. Pends forever when not watching.
    pub async fn next_change(&mut self) -> Option<FolderChange> {
        let Some(rx) = self.changes.as_mut() else {
            return std::future::pending().await;
        };
        match rx.recv().await {
            Some(change) => Some(change),
            None => {
                log::warn!(
                    "[dirboard.sync.watch] Watcher for {:?} stopped delivering changes",
                    self.folder
                );
                self.changes = None;
                None
            }
        }
    }

    pub async fn handle_change(&mut self, change: FolderChange) -> Result<(), SyncError> {
        if self.state != SessionState::Watching {
            return Err(SyncError::Disposed);
        }
        log::debug!(
            "[dirboard.sync.change] {:?} {:?}",
            change.kind,
            change.paths
        );
        self.rebuild_and_push().await?;
        Ok(())
    }

    pub async fn handle_intent(&mut self, intent: Intent) -> Result<(), SyncError> {
        if self.state == SessionState::Disposed {
            return Err(SyncError::Disposed);
        }
        match intent {
            Intent::Ready => {
                self.rebuild_and_push().await?;
                Ok(())
            }
            Intent::MoveCard {
                card_uri,
                target_column,
            } => {
                let moved = move_card(
                    self.services.fs.as_ref(),
                    &self.anchor,
                    card_uri.as_deref().unwrap_or_default(),
                    target_column.as_deref().unwrap_or_default(),
                )
                .await;
                if let Ok(MoveOutcome::Ignored) = moved {
                    log::debug!("[dirboard.sync.move] Ignoring move intent with missing fields");
                }
                let rebuilt = self.rebuild_and_push().await;
                moved?;
                rebuilt?;
                Ok(())
            }
            Intent::OpenFile { card_uri } => {
                let Some(path) = card_uri.as_deref().and_then(path_from_locator) else {
                    log::debug!("[dirboard.sync.open_file] Ignoring open intent without card");
                    return Ok(());
                };
                // Platform openers may block until the handler starts.
                let editor = self.services.editor.clone();
                let target = path.clone();
                tokio::task::spawn_blocking(move || editor.open(&target))
                    .await
                    .unwrap_or_else(|e| Err(io::Error::other(e)))
                    .map_err(|source| SyncError::Open { path, source })
            }
            Intent::Unknown => {
                log::debug!("[dirboard.sync.intent] Ignoring unknown intent");
                Ok(())
            }
        }
    }

    /// Release the watch subscription. Further changes are not processed.
    pub fn dispose(&mut self) {
        if self.state == SessionState::Disposed {
            return;
        }
        self.subscription = None;
        self.changes = None;
        self.current = None;
        self.state = SessionState::Disposed;
        log::info!("[dirboard.sync.dispose] Closed board at {:?}", self.folder);
    }
}

/// Handle to a session running on its own task.
pub struct SessionHandle {
    intents: mpsc::UnboundedSender<Intent>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    /// Queue an intent for the session.
    pub fn send(&self, intent: Intent) -> Result<(), SyncError> {
        self.intents.send(intent).map_err(|_| SyncError::Disposed)
    }

    pub fn intent_sender(&self) -> mpsc::UnboundedSender<Intent> {
        self.intents.clone()
    }

    /// Dispose the session once queued work is done and wait for its task.
    pub async fn close(self) {
        drop(self.intents);
        if let Err(e) = self.task.await {
            log::error!("[dirboard.sync.close] Session task failed: {}", e);
        }
    }
}

/// Open `session` and run it on a new task until every intent sender is
/// dropped. A failed initial rebuild is logged and the session keeps
/// watching; a failed subscription is returned.
pub async fn spawn_session(
    mut session: BoardSession,
    watcher: &dyn FolderWatcher,
) -> Result<SessionHandle, SyncError> {
    if let Err(e) = session.open(watcher).await {
        if session.state() != SessionState::Watching {
            return Err(e);
        }
        log::warn!(
            "[dirboard.sync.open] Initial rebuild of {:?} failed: {}",
            session.folder(),
            e
        );
    }

    let (intents, mut intents_rx) = mpsc::unbounded_channel::<Intent>();
    let task = tokio::spawn(async move {
        loop {
            tokio::select! {
                change = session.next_change() => {
                    let Some(change) = change else { continue };
                    if let Err(e) = session.handle_change(change).await {
                        log::warn!("[dirboard.sync.rebuild] Rebuild of {:?} failed: {}", session.folder(), e);
                    }
                }
                intent = intents_rx.recv() => {
                    let Some(intent) = intent else { break };
                    if let Err(e) = session.handle_intent(intent).await {
                        log::warn!("[dirboard.sync.intent] Intent on {:?} failed: {}", session.folder(), e);
                    }
                }
            }
        }
        session.dispose();
    });

    Ok(SessionHandle { intents, task })
}
