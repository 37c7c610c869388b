//! Client for the hosted chat REST API.

mod stream;
mod token;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::payload::Payload;

pub use stream::StreamClient;
pub use token::server_token;

/// A channel as returned by the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    #[serde(default)]
    pub id: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub cid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// The remote operations commands depend on.
#[async_trait]
pub trait ChatService: Send + Sync {
    /// Creates (or fetches, if it exists) the channel `(channel_type, id)`.
    async fn create_channel(
        &self,
        channel_type: &str,
        id: &str,
        data: Payload,
    ) -> Result<Channel>;

    /// Applies a partial update to the application settings.
    async fn update_app_settings(&self, patch: Payload) -> Result<Value>;
}
