/// Move executor: relocates a card file into another column directory.
///
/// Exactly one rename or none. The target column is not checked for
/// existence; a missing directory surfaces as the filesystem's own error.
use std::io;
use std::path::{Path, PathBuf};

use crate::locator::{board_folder, is_single_segment, leaf_name, path_from_locator};
use crate::storage::BoardFs;

#[derive(Debug, thiserror::Error)]
pub enum MoveError {
    #[error("A card named {destination:?} already exists in the target column")]
    Collision { destination: PathBuf },

    #[error("Card locator has no file name: {0}")]
    InvalidLocator(String),

    #[error("Invalid column name: {0}")]
    InvalidColumn(String),

    #[error("Failed to move {from:?} to {to:?}: {source}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved { from: PathBuf, to: PathBuf },
    /// Dropped onto the column it already lives in.
    Unchanged,
    /// Missing card locator or target column.
    Ignored,
}

/// Where a card would land when moved into `target_column`.
pub fn destination_for(anchor: &Path, card_path: &Path, target_column: &str) -> Option<PathBuf> {
    let leaf = leaf_name(card_path)?;
    Some(board_folder(anchor).join(target_column).join(leaf))
}

/// Move the card at `card_locator` into the column named `target_column`.
pub async fn move_card(
    fs: &dyn BoardFs,
    anchor: &Path,
    card_locator: &str,
    target_column: &str,
) -> Result<MoveOutcome, MoveError> {
    let Some(source) = path_from_locator(card_locator) else {
        return Ok(MoveOutcome::Ignored);
    };
    if target_column.is_empty() {
        return Ok(MoveOutcome::Ignored);
    }
    if !is_single_segment(target_column) {
        return Err(MoveError::InvalidColumn(target_column.to_string()));
    }

    let destination = destination_for(anchor, &source, target_column)
        .ok_or_else(|| MoveError::InvalidLocator(card_locator.to_string()))?;
    if destination == source {
        return Ok(MoveOutcome::Unchanged);
    }

    match fs.rename_no_clobber(&source, &destination).await {
        Ok(()) => {
            log::info!(
                "[dirboard.mover] Moved {:?} -> {:?}",
                source,
                destination
            );
            Ok(MoveOutcome::Moved {
                from: source,
                to: destination,
            })
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            Err(MoveError::Collision { destination })
        }
        Err(source_err) => Err(MoveError::Rename {
            from: source,
            to: destination,
            source: source_err,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::file_uri;
    use crate::storage::local::LocalFs;
    use std::fs;
    use tempfile::TempDir;

    fn board() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let anchor = dir.path().join(".kanban");
        fs::write(&anchor, "").unwrap();
        fs::create_dir(dir.path().join("Todo")).unwrap();
        fs::create_dir(dir.path().join("Done")).unwrap();
        fs::write(dir.path().join("Todo/a.md"), "# A").unwrap();
        (dir, anchor)
    }

    #[tokio::test]
    async fn test_move_to_other_column() {
        let (dir, anchor) = board();
        let uri = file_uri(&dir.path().join("Todo/a.md"));

        let outcome = move_card(&LocalFs, &anchor, &uri, "Done").await.unwrap();
        assert_eq!(
            outcome,
            MoveOutcome::Moved {
                from: dir.path().join("Todo/a.md"),
                to: dir.path().join("Done/a.md"),
            }
        );
        assert!(dir.path().join("Done/a.md").exists());
        assert!(!dir.path().join("Todo/a.md").exists());
    }

    #[tokio::test]
    async fn test_move_accepts_plain_path() {
        let (dir, anchor) = board();
        let path = dir.path().join("Todo/a.md");
        move_card(&LocalFs, &anchor, &path.to_string_lossy(), "Done")
            .await
            .unwrap();
        assert!(dir.path().join("Done/a.md").exists());
    }

    #[tokio::test]
    async fn test_move_to_same_column_is_noop() {
        let (dir, anchor) = board();
        let uri = file_uri(&dir.path().join("Todo/a.md"));
        let outcome = move_card(&LocalFs, &anchor, &uri, "Todo").await.unwrap();
        assert_eq!(outcome, MoveOutcome::Unchanged);
        assert!(dir.path().join("Todo/a.md").exists());
    }

    #[tokio::test]
    async fn test_missing_inputs_are_ignored() {
        let (dir, anchor) = board();
        let uri = file_uri(&dir.path().join("Todo/a.md"));
        assert_eq!(move_card(&LocalFs, &anchor, "", "Done").await.unwrap(), MoveOutcome::Ignored);
        assert_eq!(move_card(&LocalFs, &anchor, &uri, "").await.unwrap(), MoveOutcome::Ignored);
        assert!(dir.path().join("Todo/a.md").exists());
    }

    #[tokio::test]
    async fn test_collision_fails_without_overwrite() {
        let (dir, anchor) = board();
        fs::write(dir.path().join("Done/a.md"), "# Other A").unwrap();
        let uri = file_uri(&dir.path().join("Todo/a.md"));

        let err = move_card(&LocalFs, &anchor, &uri, "Done").await.unwrap_err();
        match err {
            MoveError::Collision { destination } => {
                assert_eq!(destination, dir.path().join("Done/a.md"))
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(fs::read_to_string(dir.path().join("Todo/a.md")).unwrap(), "# A");
        assert_eq!(
            fs::read_to_string(dir.path().join("Done/a.md")).unwrap(),
            "# Other A"
        );
    }

    #[tokio::test]
    async fn test_missing_column_propagates() {
        let (dir, anchor) = board();
        let uri = file_uri(&dir.path().join("Todo/a.md"));
        let err = move_card(&LocalFs, &anchor, &uri, "Archive").await.unwrap_err();
        match err {
            MoveError::Rename { source, .. } => assert_eq!(source.kind(), io::ErrorKind::NotFound),
            other => panic!("unexpected error: {other}"),
        }
        assert!(dir.path().join("Todo/a.md").exists());
    }

    #[tokio::test]
    async fn test_traversal_column_rejected() {
        let (dir, anchor) = board();
        let uri = file_uri(&dir.path().join("Todo/a.md"));
        for bad in ["..", "../x", "Done/sub", ".", "/tmp"] {
            let err = move_card(&LocalFs, &anchor, &uri, bad).await.unwrap_err();
            assert!(matches!(err, MoveError::InvalidColumn(_)), "{bad}");
        }
        assert!(dir.path().join("Todo/a.md").exists());
    }

    #[tokio::test]
    async fn test_move_into_dotted_column() {
        let (dir, anchor) = board();
        for column in ["Q1..Q2", "...", "a%2Fb"] {
            fs::create_dir(dir.path().join(column)).unwrap();
        }
        let mut current = dir.path().join("Todo/a.md");
        for column in ["Q1..Q2", "...", "a%2Fb"] {
            let uri = file_uri(&current);
            move_card(&LocalFs, &anchor, &uri, column).await.unwrap();
            current = dir.path().join(column).join("a.md");
            assert!(current.exists(), "{column}");
        }
        assert!(!dir.path().join("Todo/a.md").exists());
    }

    #[test]
    fn test_destination_for() {
        assert_eq!(
            destination_for(Path::new("/b/.kanban"), Path::new("/b/Todo/a.md"), "Done"),
            Some(PathBuf::from("/b/Done/a.md"))
        );
        assert_eq!(destination_for(Path::new("/b/.kanban"), Path::new("/"), "Done"), None);
    }
}
