mod manager;

pub use manager::{
    ConfigFile, ConfigManager, Credentials, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, ENV_API_KEY,
    ENV_API_SECRET, ENV_BASE_URL, ENV_TIMEOUT_SECS, resolve_credentials,
};
