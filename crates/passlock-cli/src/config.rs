use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI defaults (loaded from config.toml)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Log level (default: warn)
    pub log_level: String,
    /// Log format: "json" or "text"
    pub log_format: String,
    /// Read and write base64 instead of raw blobs (default: false)
    pub armor: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".into(),
            log_format: "text".into(),
            armor: false,
        }
    }
}

/// Default config location: `~/.config/passlock/config.toml`
pub fn default_path() -> PathBuf {
    expand_tilde(Path::new("~/.config/passlock/config.toml"))
}

/// Load the config file, falling back to defaults when it does not exist.
pub fn load(path: &Path) -> Result<CliConfig> {
    let path = expand_tilde(path);
    if !path.exists() {
        return Ok(CliConfig::default());
    }
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("reading config: {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("parsing config: {}", path.display()))
}

/// Expand `~` in path to the user's home directory
fn expand_tilde(path: &Path) -> PathBuf {
    let s = path.to_string_lossy();
    match s.strip_prefix("~/") {
        Some(rest) => {
            let home = std::env::var("HOME").unwrap_or_default();
            PathBuf::from(home).join(rest)
        }
        None => path.to_path_buf(),
    }
}
