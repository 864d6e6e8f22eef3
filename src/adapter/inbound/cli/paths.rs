//! Path utilities for clusterator.
//!
//! User configuration lives under `~/.clusterator/`:
//! - `~/.clusterator/config.toml` - main configuration

use std::path::PathBuf;

/// Returns the clusterator home directory (`~/.clusterator/`).
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".clusterator")
}

/// Returns the default config file path (`~/.clusterator/config.toml`).
pub fn default_config() -> PathBuf {
    home_dir().join("config.toml")
}
