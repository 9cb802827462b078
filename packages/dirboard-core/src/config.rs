/// Shared configuration types.
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A board entry in the config file: the anchor file that marks the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardEntry {
    pub anchor: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl BoardEntry {
    pub fn anchor_path(&self) -> PathBuf {
        PathBuf::from(&self.anchor)
    }

    /// Display name: the configured one, else the board folder's name.
    pub fn display_name(&self) -> String {
        if let Some(name) = self.name.as_deref().filter(|n| !n.trim().is_empty()) {
            return name.to_string();
        }
        let folder = crate::locator::board_folder(&self.anchor_path());
        folder
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.anchor.clone())
    }
}
