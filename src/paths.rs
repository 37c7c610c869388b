//! XDG-style path utilities for the configuration directory.
//!
//! Prefers the XDG Base Directory convention over OS-specific locations so
//! the config file lives in the same place on Linux and macOS.

use std::path::PathBuf;

use crate::error::{Error, Result};

const APP_DIR: &str = "stream-cli";

/// Returns the configuration directory for stream-cli.
///
/// Resolution order:
/// 1. `$XDG_CONFIG_HOME/stream-cli` if `XDG_CONFIG_HOME` is set
/// 2. `~/.config/stream-cli` otherwise
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME")
        && !xdg.is_empty()
    {
        return Ok(PathBuf::from(xdg).join(APP_DIR));
    }

    let home = dirs::home_dir()
        .ok_or_else(|| Error::Auth("Failed to determine home directory".to_string()))?;
    Ok(home.join(".config").join(APP_DIR))
}

/// Returns the path of `config.json` inside [`config_dir`].
pub fn config_file() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}
