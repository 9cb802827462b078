pub mod local;

use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use async_trait::async_trait;

/// What a directory entry is, without following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub path: PathBuf,
    pub kind: EntryKind,
}

/// Filesystem primitives the board engine runs on.
/// Implementations: LocalFs (tokio::fs); tests wrap it for failure injection.
#[async_trait]
pub trait BoardFs: Send + Sync {
    /// List the immediate entries of a directory.
    async fn list_dir(&self, dir: &Path) -> io::Result<Vec<DirEntry>>;

    /// Read a whole file as UTF-8 text.
    async fn read_text(&self, path: &Path) -> io::Result<String>;

    /// Creation time of a file.
    async fn created_at(&self, path: &Path) -> io::Result<SystemTime>;

    /// Rename `from` to `to`, failing with `AlreadyExists` instead of
    /// replacing an existing file at `to`.
    async fn rename_no_clobber(&self, from: &Path, to: &Path) -> io::Result<()>;
}
