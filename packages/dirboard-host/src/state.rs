/// Shared application state passed to axum handlers.
use std::collections::BTreeMap;
use std::future::Future;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use dirboard_core::{BoardMessage, Intent, Presenter};
use serde::Serialize;
use tokio::sync::{broadcast, mpsc, watch};

/// Fans board snapshots out to SSE clients and keeps the latest one for
/// clients that connect later.
pub struct HostPresenter {
    events: broadcast::Sender<BoardMessage>,
    latest: RwLock<Option<BoardMessage>>,
}

impl HostPresenter {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            events,
            latest: RwLock::new(None),
        }
    }

    pub fn latest(&self) -> Option<BoardMessage> {
        self.latest.read().ok().and_then(|latest| latest.clone())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BoardMessage> {
        self.events.subscribe()
    }
}

impl Default for HostPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Presenter for HostPresenter {
    fn push(&self, message: BoardMessage) {
        if let Ok(mut latest) = self.latest.write() {
            *latest = Some(message.clone());
        }
        self.events.push(message);
    }
}

#[derive(Clone)]
pub struct BoardRuntime {
    pub id: String,
    pub name: String,
    pub anchor: PathBuf,
    pub intents: mpsc::UnboundedSender<Intent>,
    pub presenter: Arc<HostPresenter>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSummary {
    pub id: String,
    pub name: String,
    pub anchor: String,
    pub card_count: Option<usize>,
}

impl BoardRuntime {
    pub fn summary(&self) -> BoardSummary {
        let card_count = self.presenter.latest().map(|message| match message {
            BoardMessage::BoardData { board, .. } => board.card_count(),
        });
        BoardSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            anchor: self.anchor.display().to_string(),
            card_count,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub boards: Arc<BTreeMap<String, BoardRuntime>>,
    pub port: u16,
    pub bind_address: String,
    /// Flips to true once the server starts shutting down.
    pub shutdown: watch::Receiver<bool>,
}

impl AppState {
    /// Resolves once shutdown has been requested or the signal is gone.
    pub fn shutdown_requested(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut shutdown = self.shutdown.clone();
        async move {
            let _ = shutdown.wait_for(|stop| *stop).await;
        }
    }
}
