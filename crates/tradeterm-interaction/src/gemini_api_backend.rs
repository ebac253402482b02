//! GeminiChatBackend - multi-turn chat over the Gemini REST API.
//!
//! Each call posts the full conversation (history plus the new prompt) to
//! `generateContent`; the API itself is stateless.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tradeterm_core::chat::{ChatBackend, ChatError, Reply};
use tradeterm_core::config::DEFAULT_API_BASE_URL;
use tradeterm_core::persona::{ChatTurn, TurnRole};

/// Chat backend that talks to the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiChatBackend {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiChatBackend {
    /// Creates a backend with the provided API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }

    /// Overrides the endpoint base (`.../v1beta/models`).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Applies a transport-level timeout to every request.
    ///
    /// If the client cannot be rebuilt the previous one is kept and the
    /// timeout is not applied.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        match Client::builder().timeout(timeout).build() {
            Ok(client) => self.client = client,
            Err(e) => {
                tracing::warn!(
                    "Failed to apply {}s request timeout, continuing without it: {}",
                    timeout.as_secs(),
                    e
                );
            }
        }
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", self.base_url, self.model)
    }

    async fn send_request(&self, body: &GenerateContentRequest) -> Result<Reply, ChatError> {
        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(|err| {
                let retryable = err.is_connect() || err.is_timeout();
                // without_url keeps the key out of the message
                ChatError::Transport {
                    message: format!("Gemini API request failed: {}", err.without_url()),
                    retryable,
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, &body_text));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|err| {
                ChatError::Decode(format!(
                    "Failed to parse Gemini response: {}",
                    err.without_url()
                ))
            })?;

        Ok(extract_reply(parsed))
    }
}

#[async_trait]
impl ChatBackend for GeminiChatBackend {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, history: &[ChatTurn], prompt: &str) -> Result<Reply, ChatError> {
        let request = GenerateContentRequest::new(history, prompt);
        tracing::debug!(
            "Sending {} turns to Gemini model {}",
            request.contents.len(),
            self.model
        );
        self.send_request(&request).await
    }
}

#[derive(Serialize, Debug)]
pub(crate) struct GenerateContentRequest {
    contents: Vec<Content>,
}

impl GenerateContentRequest {
    pub(crate) fn new(history: &[ChatTurn], prompt: &str) -> Self {
        let mut contents: Vec<Content> = history.iter().map(Content::from).collect();
        contents.push(Content::from(&ChatTurn::user(prompt)));
        Self { contents }
    }
}

#[derive(Serialize, Debug)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

impl From<&ChatTurn> for Content {
    fn from(turn: &ChatTurn) -> Self {
        let role = match turn.role {
            TurnRole::User => "user",
            TurnRole::Model => "model",
        };
        Self {
            role,
            parts: vec![Part {
                text: turn.content.clone(),
            }],
        }
    }
}

#[derive(Serialize, Debug)]
struct Part {
    text: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    candidates: Option<Vec<Candidate>>,
    #[serde(default)]
    prompt_feedback: Option<serde_json::Value>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<ContentResponse>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize, Debug)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

/// Text of the first candidate, or a blocked reply carrying whatever
/// feedback the API returned.
pub(crate) fn extract_reply(response: GenerateContentResponse) -> Reply {
    let first = response
        .candidates
        .and_then(|candidates| candidates.into_iter().next());

    let finish_reason = first.as_ref().and_then(|c| c.finish_reason.clone());
    let text = first
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .filter(|text| !text.trim().is_empty());

    if text.is_some() {
        return Reply {
            text,
            feedback: None,
        };
    }

    let mut feedback = Vec::new();
    if let Some(prompt_feedback) = response.prompt_feedback {
        feedback.push(prompt_feedback.to_string());
    }
    if let Some(reason) = finish_reason {
        feedback.push(format!("finishReason: {reason}"));
    }
    Reply::blocked((!feedback.is_empty()).then(|| feedback.join("; ")))
}

pub(crate) fn map_http_error(status: StatusCode, body: &str) -> ChatError {
    let message = serde_json::from_str::<ErrorWrapper>(body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.to_string());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.to_string());

    let retryable = matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    );

    ChatError::Http {
        status: status.as_u16(),
        message,
        retryable,
    }
}
