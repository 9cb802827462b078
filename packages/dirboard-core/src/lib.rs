//! Directory-backed Kanban boards.
//!
//! An anchor file marks a board; its parent folder holds one directory per
//! column and one Markdown file per card. This crate derives the board model
//! from that tree, keeps it live as files change, and turns card moves back
//! into file renames.

pub mod builder;
pub mod collate;
pub mod config;
pub mod locator;
pub mod mover;
pub mod parser;
pub mod render;
pub mod session;
pub mod storage;
pub mod sync;
pub mod tags;
pub mod types;
pub mod watcher;

pub use builder::{build_board, BuildError};
pub use mover::{move_card, MoveError, MoveOutcome};
pub use parser::{parse_card, ParsedCard};
pub use session::{spawn_session, BoardSession, SessionHandle, SessionServices, SessionState, SyncError};
pub use sync::{BoardMessage, EditorOpener, Intent, Presenter};
pub use types::{Board, Card, Column};
