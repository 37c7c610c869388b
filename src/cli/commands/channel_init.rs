//! `chat:channel:init`: create a channel.

use serde_json::{Value, json};
use tracing::debug;

use crate::cli::{Outcome, ParsedFlags};
use crate::client::ChatService;
use crate::error::{Error, Result};
use crate::ids::IdGenerator;
use crate::payload::{self, Payload};
use crate::ui::Spinner;

/// Name recorded as the creator of channels made from the command line.
pub const CREATOR_NAME: &str = "CLI";

/// A validated channel-creation request, ready to send.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelInit {
    pub channel_type: String,
    pub id: String,
    pub name: String,
    pub payload: Payload,
}

impl ChannelInit {
    pub fn from_flags(flags: &ParsedFlags, ids: &dyn IdGenerator) -> Result<Self> {
        let name = flags.require_text("name")?;
        let payload = build_payload(
            name,
            &ids.generate(),
            flags.text("image"),
            flags.text("members"),
            flags.text("data"),
        )?;

        let id = flags.require_text("id")?;
        validate_id(id)?;

        Ok(Self {
            channel_type: flags.require_text("type")?.to_string(),
            id: id.to_string(),
            name: name.to_string(),
            payload,
        })
    }
}

/// Channel ids may only contain letters, digits, `!`, `-` and `_`.
pub fn validate_id(id: &str) -> Result<()> {
    let valid = id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '!' | '-' | '_'));
    if valid {
        Ok(())
    } else {
        Err(Error::validation(format!(
            "Invalid --id '{id}': use only letters, digits, '!', '-' and '_'"
        )))
    }
}

/// Builds the channel payload.
///
/// `image` and `members` appear only when supplied. `data` is merged last,
/// so its keys override anything computed from the other flags.
pub fn build_payload(
    name: &str,
    creator_id: &str,
    image: Option<&str>,
    members: Option<&str>,
    data: Option<&str>,
) -> Result<Payload> {
    let mut payload = Payload::new();
    payload.insert("name".to_string(), Value::from(name));
    payload.insert(
        "created_by".to_string(),
        json!({ "id": creator_id, "name": CREATOR_NAME }),
    );

    if let Some(image) = image {
        payload.insert("image".to_string(), Value::from(image));
    }
    if let Some(members) = members {
        payload.insert(
            "members".to_string(),
            Value::from(payload::split_list(members)),
        );
    }

    if let Some(raw) = data {
        let extra = payload::parse_object("--data", raw)?;
        payload::merge(&mut payload, extra);
    }

    Ok(payload)
}

pub async fn run(request: ChannelInit, service: &dyn ChatService) -> Result<Outcome> {
    let spinner = Spinner::new("Creating channel...");
    let channel = service
        .create_channel(&request.channel_type, &request.id, request.payload)
        .await?;
    spinner.stop();

    debug!(cid = %channel.cid, "channel created");
    Ok(Outcome::Success(format!(
        "The channel {} has been initialized!",
        request.name
    )))
}
