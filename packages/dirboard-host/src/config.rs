/// Configuration for the dirboard host.
/// Reads config.json from ~/.config/dirboard/config.json (or platform equivalent),
/// or from the path in DIRBOARD_CONFIG.
use dirboard_core::config::BoardEntry;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "DIRBOARD_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default)]
    pub boards: Vec<BoardEntry>,
    /// Command used to open card files; the platform opener when absent.
    #[serde(default)]
    pub editor: Option<String>,
}

fn default_port() -> u16 {
    8088
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind_address: default_bind_address(),
            boards: Vec::new(),
            editor: None,
        }
    }
}

/// Config path: $DIRBOARD_CONFIG, else ~/.config/dirboard/config.json
pub fn default_config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dirboard")
        .join("config.json")
}

/// Load config from path. Returns default if file doesn't exist or is invalid.
pub fn load_config(path: &Path) -> HostConfig {
    match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!(
                target: "dirboard.config",
                "Failed to parse config {}: {}",
                path.display(),
                e
            );
            HostConfig::default()
        }),
        Err(_) => {
            log::info!(
                target: "dirboard.config",
                "No config at {}, using defaults",
                path.display()
            );
            HostConfig::default()
        }
    }
}
