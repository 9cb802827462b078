/// Message types exchanged with the presentation layer.
///
/// Protocol:
///   Presentation sends Intent { ready | moveCard | openFile }.
///   Session replies BoardMessage::BoardData after every rebuild.
///
/// Unknown intent types deserialize to `Intent::Unknown` and are ignored.
use std::collections::BTreeMap;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::types::Board;

/// Intents sent from the presentation layer to a board session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Intent {
    Ready,
    MoveCard {
        #[serde(rename = "cardUri", default)]
        card_uri: Option<String>,
        #[serde(rename = "targetColumn", default)]
        target_column: Option<String>,
    },
    OpenFile {
        #[serde(rename = "cardUri", default)]
        card_uri: Option<String>,
    },
    #[serde(other)]
    Unknown,
}

/// Messages sent from a board session to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BoardMessage {
    BoardData {
        board: Board,
        #[serde(rename = "tagHues", default)]
        tag_hues: BTreeMap<String, u16>,
    },
}

impl BoardMessage {
    pub fn board_data(board: &Board) -> Self {
        BoardMessage::BoardData {
            board: board.clone(),
            tag_hues: board.tag_hues(),
        }
    }
}

/// Receives board snapshots. Pushing to a surface that is gone is a no-op.
pub trait Presenter: Send + Sync {
    fn push(&self, message: BoardMessage);
}

impl Presenter for broadcast::Sender<BoardMessage> {
    fn push(&self, message: BoardMessage) {
        if self.send(message).is_err() {
            log::debug!("[dirboard.sync.push] No presentation subscribers");
        }
    }
}

/// Opens a card file in the user's editor.
pub trait EditorOpener: Send + Sync {
    fn open(&self, path: &Path) -> io::Result<()>;
}
