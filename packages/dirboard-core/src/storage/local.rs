/// Local filesystem implementation of the board primitives on top of tokio::fs.
///
/// Rename refuses to overwrite: the destination is created as a hard link
/// (which fails atomically when the name is taken) and the source is then
/// unlinked. Filesystems without hard links fall back to check-then-rename.
use std::io;
use std::path::Path;
use std::time::SystemTime;

use async_trait::async_trait;

use super::{BoardFs, DirEntry, EntryKind};

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }
}

fn links_unsupported(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::Unsupported | io::ErrorKind::PermissionDenied
    )
}

fn destination_taken(to: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("destination already exists: {}", to.display()),
    )
}

#[async_trait]
impl BoardFs for LocalFs {
    async fn list_dir(&self, dir: &Path) -> io::Result<Vec<DirEntry>> {
        let mut reader = tokio::fs::read_dir(dir).await?;
        let mut entries = Vec::new();
        while let Some(entry) = reader.next_entry().await? {
            let file_type = entry.file_type().await?;
            let kind = if file_type.is_dir() {
                EntryKind::Directory
            } else if file_type.is_file() {
                EntryKind::File
            } else {
                EntryKind::Other
            };
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    log::warn!(
                        "[dirboard.storage.list] Skipping non-UTF-8 entry {:?} in {:?}",
                        raw,
                        dir
                    );
                    continue;
                }
            };
            entries.push(DirEntry {
                name,
                path: entry.path(),
                kind,
            });
        }
        Ok(entries)
    }

    async fn read_text(&self, path: &Path) -> io::Result<String> {
        tokio::fs::read_to_string(path).await
    }

    async fn created_at(&self, path: &Path) -> io::Result<SystemTime> {
        let metadata = tokio::fs::metadata(path).await?;
        match metadata.created() {
            Ok(created) => Ok(created),
            // No birth time on this platform/filesystem.
            Err(e) if e.kind() == io::ErrorKind::Unsupported => metadata.modified(),
            Err(e) => Err(e),
        }
    }

    async fn rename_no_clobber(&self, from: &Path, to: &Path) -> io::Result<()> {
        match tokio::fs::hard_link(from, to).await {
            Ok(()) => {
                if let Err(e) = tokio::fs::remove_file(from).await {
                    let _ = tokio::fs::remove_file(to).await;
                    return Err(e);
                }
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Err(destination_taken(to)),
            Err(e) if links_unsupported(&e) => {
                log::debug!(
                    "[dirboard.storage.rename] Hard link unavailable ({}), falling back to rename",
                    e
                );
                if tokio::fs::try_exists(to).await? {
                    return Err(destination_taken(to));
                }
                tokio::fs::rename(from, to).await
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_list_dir_reports_kinds() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("Todo")).unwrap();
        fs::write(dir.path().join("readme.md"), "x").unwrap();

        let mut entries = LocalFs.list_dir(dir.path()).await.unwrap();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "Todo");
        assert_eq!(entries[0].kind, EntryKind::Directory);
        assert_eq!(entries[1].name, "readme.md");
        assert_eq!(entries[1].kind, EntryKind::File);
        assert_eq!(entries[1].path, dir.path().join("readme.md"));
    }

    #[tokio::test]
    async fn test_list_missing_dir_fails() {
        let dir = TempDir::new().unwrap();
        let err = LocalFs.list_dir(&dir.path().join("nope")).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_created_at_is_available() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.md");
        fs::write(&path, "x").unwrap();
        let created = LocalFs.created_at(&path).await.unwrap();
        assert!(created <= SystemTime::now());
    }

    #[tokio::test]
    async fn test_rename_moves_file() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("Todo")).unwrap();
        fs::create_dir(dir.path().join("Done")).unwrap();
        let from = dir.path().join("Todo/a.md");
        let to = dir.path().join("Done/a.md");
        fs::write(&from, "card").unwrap();

        LocalFs.rename_no_clobber(&from, &to).await.unwrap();
        assert!(!from.exists());
        assert_eq!(fs::read_to_string(&to).unwrap(), "card");
    }

    #[tokio::test]
    async fn test_rename_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("a.md");
        let to = dir.path().join("b.md");
        fs::write(&from, "source").unwrap();
        fs::write(&to, "existing").unwrap();

        let err = LocalFs.rename_no_clobber(&from, &to).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read_to_string(&from).unwrap(), "source");
        assert_eq!(fs::read_to_string(&to).unwrap(), "existing");
    }

    #[tokio::test]
    async fn test_rename_into_missing_dir_fails() {
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("a.md");
        fs::write(&from, "source").unwrap();

        let err = LocalFs
            .rename_no_clobber(&from, &dir.path().join("Nope/a.md"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(from.exists());
    }
}
