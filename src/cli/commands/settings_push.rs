//! `chat:settings:push`: enable or disable a push provider.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Url;
use serde::Serialize;
use serde_json::{Value, json};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

use crate::cli::{Outcome, ParsedFlags};
use crate::client::ChatService;
use crate::error::{Error, Result};
use crate::fs::{read_bytes, read_text};
use crate::payload::{self, Payload};
use crate::ui::Spinner;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Apn,
    Firebase,
    Webhook,
}

impl Provider {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Apn => "apn",
            Self::Firebase => "firebase",
            Self::Webhook => "webhook",
        }
    }

    const fn enabled_message(self) -> &'static str {
        match self {
            Self::Apn => "Push notifications have been enabled with APN.",
            Self::Firebase => "Push notifications have been enabled for Firebase.",
            Self::Webhook => "Push notifications have been enabled for Webhooks.",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "apn" => Ok(Self::Apn),
            "firebase" => Ok(Self::Firebase),
            "webhook" => Ok(Self::Webhook),
            other => Err(Error::validation(format!(
                "Unknown push type '{other}' (expected apn, firebase or webhook)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Enable,
    Disable,
}

#[derive(Debug, Default, Serialize)]
struct ApnConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    p12_cert: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pem_cert: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    auth_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    key_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    team_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notification_template: Option<String>,
}

#[derive(Debug, Serialize)]
struct FirebaseConfig {
    api_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    notification_template: Option<String>,
}

/// A settings patch ready to send.
#[derive(Debug, Clone, PartialEq)]
pub struct PushUpdate {
    pub provider: Provider,
    pub action: Action,
    pub patch: Payload,
}

/// What the command will do, decided from the flags alone.
#[derive(Debug, Clone, PartialEq)]
pub enum PushPlan {
    /// Nothing to send; print the hint and exit successfully.
    Skip(String),
    Update(PushUpdate),
}

/// Validates the flags, reads certificate files and builds the patch.
///
/// Everything that can fail locally fails here, before a client exists.
pub fn plan(flags: &ParsedFlags) -> Result<PushPlan> {
    let Some(raw_type) = flags.text("type") else {
        return Ok(PushPlan::Skip(
            "Please specify a push notification type of apn, firebase or webhook".to_string(),
        ));
    };
    let provider: Provider = raw_type.parse()?;

    let action = if flags.switch("enable") {
        Action::Enable
    } else if flags.switch("disable") {
        Action::Disable
    } else {
        return Ok(PushPlan::Skip(format!(
            "Please specify --enable or --disable for push via {provider}"
        )));
    };

    let patch = match action {
        Action::Enable => enable_patch(provider, flags)?,
        Action::Disable => disable_patch(provider),
    };

    Ok(PushPlan::Update(PushUpdate {
        provider,
        action,
        patch,
    }))
}

fn enable_patch(provider: Provider, flags: &ParsedFlags) -> Result<Payload> {
    let template = flags.text("notification_template");
    if let Some(raw) = template {
        payload::validate_json("--notification_template", raw)?;
    }

    match provider {
        Provider::Apn => {
            let config = ApnConfig {
                p12_cert: flags
                    .text("p12_cert")
                    .map(|path| read_bytes(Path::new(path)).map(|bytes| STANDARD.encode(bytes)))
                    .transpose()?,
                pem_cert: flags
                    .text("pem_cert")
                    .map(|path| read_text(Path::new(path)))
                    .transpose()?,
                auth_key: flags.text("auth_key").map(str::to_string),
                key_id: flags.text("key_id").map(str::to_string),
                team_id: flags.text("team_id").map(str::to_string),
                notification_template: template.map(str::to_string),
            };

            if config.p12_cert.is_none() && config.pem_cert.is_none() && config.auth_key.is_none()
            {
                return Err(Error::validation(
                    "APN needs credentials: pass --p12_cert, --pem_cert or --auth_key",
                ));
            }

            section("apn_config", &config)
        }
        Provider::Firebase => {
            let config = FirebaseConfig {
                api_key: flags
                    .require_text("api_key")
                    .map_err(|_| Error::validation("Firebase requires --api_key"))?
                    .to_string(),
                notification_template: template.map(str::to_string),
            };
            section("firebase_config", &config)
        }
        Provider::Webhook => {
            let url = flags
                .require_text("webhook_url")
                .map_err(|_| Error::validation("Webhooks require --webhook_url"))?;
            let parsed = Url::parse(url)
                .map_err(|e| Error::validation(format!("Invalid --webhook_url '{url}': {e}")))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(Error::validation(format!(
                    "Invalid --webhook_url '{url}': expected an http(s) URL"
                )));
            }
            section("webhook_url", &url)
        }
    }
}

/// The patch that switches a provider off.
pub fn disable_patch(provider: Provider) -> Payload {
    let mut patch = Payload::new();
    match provider {
        Provider::Apn => patch.insert("apn_config".to_string(), json!({ "disabled": true })),
        Provider::Firebase => {
            patch.insert("firebase_config".to_string(), json!({ "disabled": true }))
        }
        Provider::Webhook => patch.insert("webhook_url".to_string(), Value::from("")),
    };
    patch
}

fn section(key: &str, value: &impl Serialize) -> Result<Payload> {
    let value = serde_json::to_value(value).map_err(|source| Error::Parse {
        field: "push settings",
        source,
    })?;
    let mut patch = Payload::new();
    patch.insert(key.to_string(), value);
    Ok(patch)
}

fn progress(json: bool) -> Spinner {
    if json {
        Spinner::hidden()
    } else {
        Spinner::new("Updating app settings...")
    }
}

pub async fn run(update: PushUpdate, service: &dyn ChatService, json: bool) -> Result<Outcome> {
    let spinner = progress(json);
    let response = service.update_app_settings(update.patch).await?;
    spinner.stop();
    debug!(provider = %update.provider, action = ?update.action, "app settings updated");

    if json {
        return Ok(Outcome::Json(response));
    }

    Ok(Outcome::Success(match update.action {
        Action::Enable => update.provider.enabled_message().to_string(),
        Action::Disable => format!("Push via {} has been disabled.", update.provider),
    }))
}
