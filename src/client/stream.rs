use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, Method, StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, info, trace};

use super::token::server_token;
use super::{Channel, ChatService};
use crate::config::Credentials;
use crate::error::{Error, Result};
use crate::payload::Payload;

const USER_AGENT: &str = concat!("stream-cli-rust-", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Serialize)]
struct ChannelQueryRequest {
    data: Payload,
    state: bool,
    watch: bool,
    presence: bool,
}

#[derive(Debug, Deserialize)]
struct ChannelQueryResponse {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
}

/// Authenticated HTTP client for the chat REST API.
pub struct StreamClient {
    client: Client,
    base_url: String,
    api_key: String,
    timeout_secs: u64,
}

impl StreamClient {
    pub fn new(credentials: &Credentials) -> Result<Self> {
        let token = server_token(&credentials.api_secret);

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&token)
            .map_err(|e| Error::Auth(format!("Invalid server token: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert("stream-auth-type", HeaderValue::from_static("jwt"));

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(credentials.timeout)
            .build()
            .map_err(|e| Error::Remote(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: credentials.base_url.clone(),
            api_key: credentials.api_key.clone(),
            timeout_secs: credentials.timeout.as_secs(),
        })
    }

    /// Joins `segments` onto the base URL, percent-encoding each one, and
    /// appends the `api_key` query parameter.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| Error::validation(format!("Invalid API URL {}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|()| Error::validation(format!("Invalid API URL {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        url.query_pairs_mut().append_pair("api_key", &self.api_key);
        Ok(url)
    }

    async fn send<B, R>(&self, method: Method, segments: &[&str], body: &B) -> Result<R>
    where
        B: Serialize + Sync,
        R: for<'de> Deserialize<'de>,
    {
        let url = self.url(segments)?;
        info!(target: "stream::client", "→ {} {}", method, url.path());
        debug!(target: "stream::client", "Authorization: [REDACTED]");
        if tracing::enabled!(tracing::Level::TRACE) {
            let logged = serde_json::to_value(body).map(redact_fields).unwrap_or_default();
            trace!(target: "stream::client", "Request body: {logged}");
        }

        let started = Instant::now();
        let response = self
            .client
            .request(method, url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        let status = response.status();
        info!(
            target: "stream::client",
            "← {} ({} ms)",
            status,
            started.elapsed().as_millis()
        );

        let text = response.text().await.map_err(|e| self.transport_error(&e))?;
        if tracing::enabled!(tracing::Level::TRACE) {
            match serde_json::from_str::<Value>(&text) {
                Ok(value) => {
                    trace!(target: "stream::client", "Response body: {}", redact_fields(value));
                }
                Err(_) => trace!(target: "stream::client", "Response body: {text}"),
            }
        }

        if !status.is_success() {
            return Err(status_error(status, &text));
        }

        serde_json::from_str(&text)
            .map_err(|e| Error::Remote(format!("Unexpected response from the chat service: {e}")))
    }

    fn transport_error(&self, err: &reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout(self.timeout_secs)
        } else {
            Error::Remote(err.to_string())
        }
    }
}

/// Checks if a payload field carries a credential.
fn should_redact_field(name: &str) -> bool {
    matches!(
        name.to_lowercase().as_str(),
        "api_key" | "api_secret" | "auth_key" | "pem_cert" | "p12_cert" | "secret" | "password"
    )
}

/// Replaces credential fields anywhere in `value` with `[REDACTED]`.
fn redact_fields(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| {
                    let value = if should_redact_field(&key) && !value.is_null() {
                        Value::from("[REDACTED]")
                    } else {
                        redact_fields(value)
                    };
                    (key, value)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(redact_fields).collect()),
        other => other,
    }
}

fn status_error(status: StatusCode, body: &str) -> Error {
    let detail = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| match (b.code, b.message) {
            (Some(code), Some(msg)) => Some(format!("{msg} (code {code})")),
            (None, Some(msg)) => Some(msg),
            _ => None,
        })
        .unwrap_or_else(|| body.trim().to_string());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Error::Auth(format!("the service rejected the credentials ({status}): {detail}"))
        }
        _ => Error::Remote(format!("status {status}: {detail}")),
    }
}

#[async_trait]
impl ChatService for StreamClient {
    async fn create_channel(
        &self,
        channel_type: &str,
        id: &str,
        data: Payload,
    ) -> Result<Channel> {
        let request = ChannelQueryRequest {
            data,
            state: false,
            watch: false,
            presence: false,
        };
        let response: ChannelQueryResponse = self
            .send(Method::POST, &["channels", channel_type, id, "query"], &request)
            .await?;
        Ok(response.channel)
    }

    async fn update_app_settings(&self, patch: Payload) -> Result<Value> {
        self.send(Method::PATCH, &["app"], &patch).await
    }
}
