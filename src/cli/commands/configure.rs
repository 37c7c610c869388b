//! `config:set`, `config:get` and `config:destroy`.

use inquire::{Password, PasswordDisplayMode, Text};
use reqwest::Url;
use serde_json::json;
use std::io::IsTerminal;
use std::path::Path;

use crate::cli::{Outcome, ParsedFlags};
use crate::config::{ConfigFile, ConfigManager, DEFAULT_BASE_URL};
use crate::error::{Error, Result};
use crate::ui::{Style, handle_prompt_cancellation};

/// Stores the supplied settings, prompting for a missing key or secret.
///
/// Values not given on the command line keep what the file already holds. An
/// unreadable file is an error rather than something to overwrite.
pub fn run_set(flags: &ParsedFlags, manager: &ConfigManager) -> Result<Outcome> {
    let mut config = manager
        .load()
        .map_err(|e| {
            Error::Auth(format!(
                "{e}\n\nFix the file or run 'stream config:destroy' to start over."
            ))
        })?
        .unwrap_or_default();

    if let Some(url) = flags.text("url") {
        Url::parse(url).map_err(|e| Error::validation(format!("Invalid --url '{url}': {e}")))?;
        config.base_url = Some(url.trim_end_matches('/').to_string());
    }
    if let Some(name) = flags.text("name") {
        config.name = Some(name.to_string());
    }
    if let Some(email) = flags.text("email") {
        config.email = Some(email.to_string());
    }
    if let Some(key) = flags.text("key") {
        config.api_key = Some(key.trim().to_string());
    }
    if let Some(secret) = flags.text("secret") {
        config.api_secret = Some(secret.trim().to_string());
    }

    let missing_key = is_blank(config.api_key.as_deref());
    let missing_secret = is_blank(config.api_secret.as_deref());

    if missing_key || missing_secret {
        if !std::io::stdin().is_terminal() {
            return Err(Error::validation(
                "API key and secret are required: pass --key and --secret",
            ));
        }

        crate::status!("{}", Style::hint("Enter the credentials from your application dashboard."));
        let prompted = handle_prompt_cancellation(|| {
            let key = if missing_key {
                Some(prompt_key()?)
            } else {
                None
            };
            let secret = if missing_secret {
                Some(prompt_secret()?)
            } else {
                None
            };
            Ok((key, secret))
        })?;

        let Some((key, secret)) = prompted else {
            return Ok(Outcome::Info("Configuration unchanged.".to_string()));
        };
        if key.is_some() {
            config.api_key = key;
        }
        if secret.is_some() {
            config.api_secret = secret;
        }
    }

    manager.save(&config)?;

    Ok(Outcome::Success(format!(
        "Configuration saved to {}",
        manager.config_path()?.display()
    )))
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

fn prompt_key() -> Result<String> {
    let key = Text::new("API key:")
        .with_help_message("Found on the application dashboard")
        .prompt()?;

    if key.trim().is_empty() {
        return Err(Error::validation("API key cannot be empty"));
    }
    Ok(key.trim().to_string())
}

fn prompt_secret() -> Result<String> {
    let secret = Password::new("API secret:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?;

    if secret.trim().is_empty() {
        return Err(Error::validation("API secret cannot be empty"));
    }
    Ok(secret.trim().to_string())
}

/// Shows the stored configuration with the secret masked.
pub fn run_get(flags: &ParsedFlags, manager: &ConfigManager) -> Result<Outcome> {
    let path = manager.config_path()?;
    let config = manager.load()?.ok_or_else(|| {
        Error::Auth(format!(
            "No configuration found at {}\n\n\
             Run 'stream config:set' to store your API credentials.",
            path.display()
        ))
    })?;

    if flags.switch("json") {
        return Ok(Outcome::Json(json!({
            "name": config.name,
            "email": config.email,
            "apiKey": config.api_key,
            "apiSecret": config.api_secret.as_deref().map(mask),
            "baseUrl": config.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL),
            "timeoutSecs": config.timeout_secs,
        })));
    }

    Ok(Outcome::Info(describe(&config, &path)))
}

fn describe(config: &ConfigFile, path: &Path) -> String {
    let row = |label: &str, value: Option<String>| {
        format!(
            "  {}  {}",
            Style::label(format!("{label:<9}")),
            value.map_or_else(|| Style::secondary("(not set)"), Style::value)
        )
    };

    [
        Style::header("Configuration"),
        row("name", config.name.clone()),
        row("email", config.email.clone()),
        row("apiKey", config.api_key.clone()),
        row("apiSecret", config.api_secret.as_deref().map(mask)),
        row(
            "baseUrl",
            Some(
                config
                    .base_url
                    .clone()
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            ),
        ),
        String::new(),
        Style::hint(format!("Stored in {}", path.display())),
    ]
    .join("\n")
}

/// Keeps the last four characters of a secret visible.
pub fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{visible}", "*".repeat(chars.len() - 4))
}

pub fn run_destroy(manager: &ConfigManager) -> Result<Outcome> {
    if manager.destroy()? {
        Ok(Outcome::Success(format!(
            "Configuration removed from {}",
            manager.config_path()?.display()
        )))
    } else {
        Ok(Outcome::Info("No configuration to remove.".to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cli::registry::parse_from;
    use crate::ids::FixedIds;
    use tempfile::TempDir;

    fn flags(args: &[&str]) -> ParsedFlags {
        let inv = parse_from(std::iter::once("stream").chain(args.iter().copied())).unwrap();
        ParsedFlags::resolve(inv.command, &inv.matches, &FixedIds::default())
    }

    fn manager(dir: &TempDir) -> ConfigManager {
        ConfigManager::at(dir.path().join("config.json"))
    }

    #[test]
    fn test_mask() {
        assert_eq!(mask("abcdefgh"), "****efgh");
        assert_eq!(mask("abc"), "***");
        assert_eq!(mask(""), "");
    }

    #[test]
    fn test_set_keeps_existing_values() {
        let dir = TempDir::new().unwrap();
        let manager = manager(&dir);

        run_set(
            &flags(&["config:set", "-n", "Ada", "-k", "key", "-s", "secret"]),
            &manager,
        )
        .unwrap();
        run_set(
            &flags(&["config:set", "-u", "http://localhost:3030/"]),
            &manager,
        )
        .unwrap();

        let config = manager.load().unwrap().unwrap();
        assert_eq!(config.name.as_deref(), Some("Ada"));
        assert_eq!(config.api_key.as_deref(), Some("key"));
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:3030"));
    }

    #[test]
    fn test_set_leaves_unparseable_config_untouched() {
        let dir = TempDir::new().unwrap();
        let manager = manager(&dir);
        std::fs::write(manager.config_path().unwrap(), "{\"apiKey\": \"old\",").unwrap();

        let err = run_set(&flags(&["config:set", "-k", "new", "-s", "secret"]), &manager)
            .unwrap_err();

        assert_eq!(err.kind(), "AuthError");
        assert!(err.to_string().contains("config:destroy"));
        assert_eq!(
            std::fs::read_to_string(manager.config_path().unwrap()).unwrap(),
            "{\"apiKey\": \"old\","
        );
    }

    #[test]
    fn test_set_rejects_invalid_url() {
        let dir = TempDir::new().unwrap();
        let err = run_set(
            &flags(&["config:set", "-k", "k", "-s", "s", "-u", "nope"]),
            &manager(&dir),
        )
        .unwrap_err();

        assert_eq!(err.kind(), "ValidationError");
    }

    #[test]
    fn test_get_without_config_is_auth_error() {
        let dir = TempDir::new().unwrap();
        let err = run_get(&flags(&["config:get"]), &manager(&dir)).unwrap_err();

        assert_eq!(err.kind(), "AuthError");
        assert!(err.to_string().contains("config:set"));
    }

    #[test]
    fn test_get_json_masks_secret() {
        let dir = TempDir::new().unwrap();
        let manager = manager(&dir);
        manager
            .save(&ConfigFile {
                api_key: Some("key123".to_string()),
                api_secret: Some("supersecret".to_string()),
                ..ConfigFile::default()
            })
            .unwrap();

        let Outcome::Json(value) = run_get(&flags(&["config:get", "--json"]), &manager).unwrap()
        else {
            panic!("expected JSON output");
        };

        assert_eq!(value["apiKey"], "key123");
        assert_eq!(value["apiSecret"], "*******cret");
        assert_eq!(value["baseUrl"], DEFAULT_BASE_URL);
    }

    #[test]
    fn test_destroy_without_config() {
        let dir = TempDir::new().unwrap();
        let outcome = run_destroy(&manager(&dir)).unwrap();

        assert_eq!(outcome, Outcome::Info("No configuration to remove.".to_string()));
    }
}
