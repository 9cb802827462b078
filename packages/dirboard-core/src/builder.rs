/// Board builder: walks the board folder and assembles a fresh Board.
///
/// Layout: every immediate subdirectory of the board folder is a column,
/// every `*.md` file directly inside a column directory is a card. Files at
/// the board level and directories nested inside columns are ignored.
///
/// Any I/O failure aborts the whole build; no partial board is returned.
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::collate;
use crate::locator::{board_folder, file_uri};
use crate::parser::{is_card_file_name, parse_card};
use crate::render::MarkdownRenderer;
use crate::storage::{BoardFs, DirEntry, EntryKind};
use crate::types::{Board, Card, Column};

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to list {path:?}: {source}")]
    ListDir { path: PathBuf, source: io::Error },

    #[error("Failed to read card {path:?}: {source}")]
    ReadCard { path: PathBuf, source: io::Error },

    #[error("Failed to stat card {path:?}: {source}")]
    StatCard { path: PathBuf, source: io::Error },
}

/// Build the board anchored at `anchor` (the board folder is its parent).
pub async fn build_board(
    fs: &dyn BoardFs,
    renderer: &dyn MarkdownRenderer,
    anchor: &Path,
) -> Result<Board, BuildError> {
    let folder = board_folder(anchor);
    let entries = list(fs, &folder).await?;

    let mut columns = Vec::new();
    for entry in entries.into_iter().filter(|e| e.kind == EntryKind::Directory) {
        columns.push(build_column(fs, renderer, entry).await?);
    }
    columns.sort_by(|a, b| collate::compare(&a.name, &b.name));

    log::debug!(
        "[dirboard.builder] Built board at {:?}: {} columns",
        folder,
        columns.len()
    );
    Ok(Board { columns })
}

async fn list(fs: &dyn BoardFs, dir: &Path) -> Result<Vec<DirEntry>, BuildError> {
    fs.list_dir(dir).await.map_err(|source| BuildError::ListDir {
        path: dir.to_path_buf(),
        source,
    })
}

async fn build_column(
    fs: &dyn BoardFs,
    renderer: &dyn MarkdownRenderer,
    dir: DirEntry,
) -> Result<Column, BuildError> {
    let entries = list(fs, &dir.path).await?;

    let mut cards = Vec::new();
    for entry in entries
        .into_iter()
        .filter(|e| e.kind == EntryKind::File && is_card_file_name(&e.name))
    {
        cards.push(build_card(fs, renderer, entry).await?);
    }
    cards.sort_by(|a, b| {
        collate::compare(&a.title, &b.title).then_with(|| a.file_name.cmp(&b.file_name))
    });

    Ok(Column {
        name: dir.name,
        cards,
    })
}

async fn build_card(
    fs: &dyn BoardFs,
    renderer: &dyn MarkdownRenderer,
    file: DirEntry,
) -> Result<Card, BuildError> {
    let content = fs
        .read_text(&file.path)
        .await
        .map_err(|source| BuildError::ReadCard {
            path: file.path.clone(),
            source,
        })?;
    let created = fs
        .created_at(&file.path)
        .await
        .map_err(|source| BuildError::StatCard {
            path: file.path.clone(),
            source,
        })?;

    let parsed = parse_card(&content, &file.name);
    let body_html = renderer.render(&parsed.body);

    Ok(Card {
        uri: file_uri(&file.path),
        file_name: file.name,
        title: parsed.title,
        body: parsed.body,
        body_html,
        tags: parsed.tags,
        created_at: DateTime::<Utc>::from(created).timestamp_millis(),
    })
}
