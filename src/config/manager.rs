use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::fs::atomic_write;
use crate::paths;

/// Base URL of the hosted chat API.
pub const DEFAULT_BASE_URL: &str = "https://chat.stream-io-api.com";

/// Timeout applied to every remote call unless overridden.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_API_KEY: &str = "STREAM_API_KEY";
pub const ENV_API_SECRET: &str = "STREAM_API_SECRET";
pub const ENV_BASE_URL: &str = "STREAM_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "STREAM_TIMEOUT_SECS";

/// The complete configuration file structure.
///
/// Corresponds to `~/.config/stream-cli/config.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    /// Display name of the person running the CLI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Contact email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Application API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Application API secret used to sign server tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_secret: Option<String>,
    /// Override of the API base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Per-request timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Everything the chat client needs to authenticate.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn non_blank(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty()).cloned()
}

/// Merges environment overrides over the config file.
///
/// Environment variables take precedence. A missing key or secret is an
/// authentication error.
pub fn resolve_credentials(config: Option<&ConfigFile>) -> Result<Credentials> {
    let api_key = env_value(ENV_API_KEY)
        .or_else(|| non_blank(config.and_then(|c| c.api_key.as_ref())))
        .ok_or_else(|| {
            Error::Auth(format!(
                "Missing API key\n\n\
                 Please provide it via:\n  \
                 - Command: stream config:set --key <key>\n  \
                 - Environment: {ENV_API_KEY}"
            ))
        })?;

    let api_secret = env_value(ENV_API_SECRET)
        .or_else(|| non_blank(config.and_then(|c| c.api_secret.as_ref())))
        .ok_or_else(|| {
            Error::Auth(format!(
                "Missing API secret\n\n\
                 Please provide it via:\n  \
                 - Command: stream config:set --secret <secret>\n  \
                 - Environment: {ENV_API_SECRET}"
            ))
        })?;

    let base_url = env_value(ENV_BASE_URL)
        .or_else(|| non_blank(config.and_then(|c| c.base_url.as_ref())))
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    let timeout_secs = match env_value(ENV_TIMEOUT_SECS) {
        Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
            Error::validation(format!("{ENV_TIMEOUT_SECS} must be a whole number of seconds"))
        })?,
        None => config
            .and_then(|c| c.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS),
    };

    Ok(Credentials {
        api_key,
        api_secret,
        base_url: base_url.trim_end_matches('/').to_string(),
        timeout: Duration::from_secs(timeout_secs.max(1)),
    })
}

/// Manages loading and saving the configuration file.
///
/// The default location is resolved on first use, so commands that never
/// touch the config do not depend on a home directory.
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Creates a manager for `$XDG_CONFIG_HOME/stream-cli/config.json`
    /// (or `~/.config/stream-cli/config.json`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a manager for an explicit file path.
    pub fn at(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: Some(config_path.into()),
        }
    }

    pub fn config_path(&self) -> Result<PathBuf> {
        match &self.config_path {
            Some(path) => Ok(path.clone()),
            None => paths::config_file(),
        }
    }

    /// Loads the config file. A missing file yields `Ok(None)`.
    pub fn load(&self) -> Result<Option<ConfigFile>> {
        let path = self.config_path()?;
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(Error::Auth(format!(
                    "Failed to read config file {}: {e}",
                    path.display()
                )));
            }
        };

        let config = serde_json::from_str(&contents).map_err(|e| {
            Error::Auth(format!(
                "Failed to parse config file {}: {e}",
                path.display()
            ))
        })?;

        Ok(Some(config))
    }

    pub fn save(&self, config: &ConfigFile) -> Result<()> {
        let path = self.config_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(config).map_err(|source| Error::Parse {
            field: "config file",
            source,
        })?;

        atomic_write(&path, &contents)
    }

    /// Removes the config file. Returns `false` if there was nothing to remove.
    pub fn destroy(&self) -> Result<bool> {
        match fs::remove_file(self.config_path()?) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Loads the file and resolves credentials from it plus the environment.
    pub fn credentials(&self) -> Result<Credentials> {
        let config = self.load()?;
        resolve_credentials(config.as_ref())
    }
}
