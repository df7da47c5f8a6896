//! Client side of the hosted dialogue-management service.
//!
//! A conversation turn is a single `interact` round trip: the user's text is
//! posted to a per-session resource and the service answers with an ordered
//! list of traces. [`HttpDialogueService`] speaks the wire protocol;
//! [`MockDialogueService`] stands in when no credential has been configured.

use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use crate::api::{InteractRequest, Trace};
use crate::core::config::Config;
use crate::core::settings::Settings;
use crate::utils::url::construct_api_url;

/// Shown when the service answered successfully but produced no text.
pub const EMPTY_REPLY_NOTICE: &str = "The assistant did not return a text response.";

/// Appended to echo replies produced without a credential.
pub const MOCK_MODE_NOTICE: &str =
    "(Mock mode: no API key configured. Add one with /key to reach the live assistant.)";

#[derive(Debug)]
pub enum DialogueError {
    /// The request never produced a response (DNS, TLS, connection reset, ...).
    Transport(reqwest::Error),
    /// The service answered with a non-success status.
    Status { status: StatusCode, body: String },
    /// The response body was not a trace list.
    Decode(serde_json::Error),
    /// The task performing the request ended without a result.
    Aborted(String),
}

impl fmt::Display for DialogueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DialogueError::Transport(err) => write!(f, "request failed: {err}"),
            DialogueError::Status { status, body } => {
                let body = body.trim();
                if body.is_empty() {
                    write!(f, "dialogue service returned {}", status.as_u16())
                } else {
                    write!(f, "dialogue service returned {}: {body}", status.as_u16())
                }
            }
            DialogueError::Decode(err) => write!(f, "unreadable response: {err}"),
            DialogueError::Aborted(reason) => write!(f, "request aborted: {reason}"),
        }
    }
}

impl Error for DialogueError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DialogueError::Transport(err) => Some(err),
            DialogueError::Decode(err) => Some(err),
            DialogueError::Status { .. } | DialogueError::Aborted(_) => None,
        }
    }
}

impl From<reqwest::Error> for DialogueError {
    fn from(err: reqwest::Error) -> Self {
        DialogueError::Transport(err)
    }
}

#[async_trait]
pub trait DialogueService: Send + Sync {
    /// Send one user utterance and return the assistant's reply text.
    async fn interact(&self, session_key: &str, text: &str) -> Result<String, DialogueError>;

    /// True when replies come from the live service rather than the local echo.
    fn is_live(&self) -> bool;
}

/// Concatenate the text of every `text`/`speak` trace, one per line.
pub fn extract_reply(traces: &[Trace]) -> String {
    let reply = traces
        .iter()
        .filter(|trace| trace.is_message())
        .filter_map(Trace::message)
        .collect::<Vec<_>>()
        .join("\n");
    let reply = reply.trim();
    if reply.is_empty() {
        EMPTY_REPLY_NOTICE.to_string()
    } else {
        reply.to_string()
    }
}

pub struct HttpDialogueService {
    client: Client,
    base_url: String,
    api_key: String,
    version_id: String,
}

impl HttpDialogueService {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        version_id: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            version_id: version_id.into(),
        }
    }

    pub fn interact_url(&self, session_key: &str) -> String {
        construct_api_url(
            &self.base_url,
            &format!("state/user/{session_key}/interact"),
        )
    }
}

#[async_trait]
impl DialogueService for HttpDialogueService {
    async fn interact(&self, session_key: &str, text: &str) -> Result<String, DialogueError> {
        let url = self.interact_url(session_key);
        debug!(%url, version = %self.version_id, "sending interact request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", &self.api_key)
            .header("versionID", &self.version_id)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .json(&InteractRequest::text(text))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            warn!(status = status.as_u16(), "interact request rejected");
            return Err(DialogueError::Status { status, body });
        }

        let bytes = response.bytes().await?;
        let traces: Vec<Trace> = serde_json::from_slice(&bytes).map_err(DialogueError::Decode)?;
        debug!(traces = traces.len(), "interact response received");
        Ok(extract_reply(&traces))
    }

    fn is_live(&self) -> bool {
        true
    }
}

/// Local echo used for demos and when no credential is configured.
pub struct MockDialogueService {
    delay: Duration,
}

impl MockDialogueService {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn reply_for(text: &str) -> String {
        format!("You said: \"{text}\"\n\n{MOCK_MODE_NOTICE}")
    }
}

#[async_trait]
impl DialogueService for MockDialogueService {
    async fn interact(&self, _session_key: &str, text: &str) -> Result<String, DialogueError> {
        tokio::time::sleep(self.delay).await;
        Ok(Self::reply_for(text))
    }

    fn is_live(&self) -> bool {
        false
    }
}

/// Pick the adapter for the current settings: live when a credential is set.
pub fn service_for(
    settings: &Settings,
    config: &Config,
    client: &Client,
) -> Arc<dyn DialogueService> {
    match &settings.api_key {
        Some(api_key) => Arc::new(HttpDialogueService::new(
            client.clone(),
            config.base_url(),
            api_key.clone(),
            settings.version_id.clone(),
        )),
        None => Arc::new(MockDialogueService::new(config.mock_delay())),
    }
}
