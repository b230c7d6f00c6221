//! Outbound client for the shortening endpoint of a running instance.
//!
//! Chat bots and the `admin` tool use it to request short links. The HTTP
//! agent is injected, so callers decide timeouts and share connection pools.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};
use ureq::Agent;

/// Default timeout for a whole shorten request.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors returned by [`ShortenClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] ureq::Error),

    #[error("shortener returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("invalid response body: {0}")]
    Decode(String),

    #[error("response contains no short URL")]
    MissingShortUrl,

    #[error("client task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Debug, Serialize)]
struct ShortenBody<'a> {
    url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    custom_code: Option<&'a str>,
}

/// Client for `POST /shorten`.
#[derive(Clone)]
pub struct ShortenClient {
    agent: Agent,
    endpoint: String,
}

impl ShortenClient {
    /// Creates a client with its own agent and a 10 second timeout.
    pub fn new(endpoint: impl Into<String>) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(DEFAULT_TIMEOUT))
            .http_status_as_error(false)
            .build()
            .into();

        Self::with_agent(agent, endpoint)
    }

    /// Creates a client on a caller-provided agent.
    ///
    /// The agent must be built with `http_status_as_error(false)` for
    /// [`ClientError::Api`] to carry the response body.
    pub fn with_agent(agent: Agent, endpoint: impl Into<String>) -> Self {
        Self {
            agent,
            endpoint: endpoint.into(),
        }
    }

    /// Requests a short link for `url`, optionally under `custom_code`.
    ///
    /// The blocking HTTP call runs on the blocking thread pool.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Transport`] if the request could not be sent or read
    /// - [`ClientError::Api`] for any status other than 200
    /// - [`ClientError::Decode`] if the body is not JSON
    /// - [`ClientError::MissingShortUrl`] if the body carries no short URL
    pub async fn shorten(
        &self,
        url: &str,
        custom_code: Option<&str>,
    ) -> Result<String, ClientError> {
        let client = self.clone();
        let url = url.to_string();
        let custom_code = custom_code.map(str::to_string);

        tokio::task::spawn_blocking(move || client.shorten_blocking(&url, custom_code.as_deref()))
            .await?
    }

    /// Blocking variant of [`ShortenClient::shorten`].
    pub fn shorten_blocking(
        &self,
        url: &str,
        custom_code: Option<&str>,
    ) -> Result<String, ClientError> {
        let body = ShortenBody { url, custom_code };

        let response = self.agent.post(&self.endpoint).send_json(&body)?;
        let status = response.status().as_u16();
        let text = response.into_body().read_to_string()?;

        if status != 200 {
            warn!(status, endpoint = %self.endpoint, "Shorten request rejected");
            return Err(ClientError::Api { status, body: text });
        }

        let json: Value =
            serde_json::from_str(&text).map_err(|e| ClientError::Decode(e.to_string()))?;

        let short_url = extract_short_url(&json).ok_or(ClientError::MissingShortUrl)?;
        debug!(%short_url, "Short link received");

        Ok(short_url)
    }
}

/// Reads the short URL from a response body, accepting `short_url` or `shortUrl`.
pub fn extract_short_url(json: &Value) -> Option<String> {
    json["short_url"]
        .as_str()
        .or_else(|| json["shortUrl"].as_str())
        .filter(|s| !s.is_empty())
        .map(String::from)
}
