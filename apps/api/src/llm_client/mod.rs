/// LLM Client: the single point of entry for chat-completion calls.
///
/// No other module may talk to the completion API directly.
/// Requests are never retried; the user re-triggers the action instead.
use std::time::Duration;

use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use self::sse::StreamAccumulator;

pub mod catalog;
pub mod prompts;
pub mod sse;
#[cfg(test)]
pub(crate) mod test_server;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const API_KEY_PREFIX: &str = "sk-or-";
const MIN_API_KEY_LEN: usize = 20;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API Error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Could not decode API response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("The API returned an empty response")]
    EmptyContent,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// A fully composed request, ready to send.
#[derive(Clone)]
pub struct CompletionRequest {
    pub api_key: String,
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

impl std::fmt::Debug for CompletionRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionRequest")
            .field("model", &self.model)
            .field("messages", &self.messages.len())
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

/// Incremental output pushed to the caller while a stream is running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamUpdate {
    /// Text so far, with the display cursor appended.
    Partial(String),
    /// Complete text, cursor removed.
    Final(String),
}

#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_url: String,
}

impl LlmClient {
    /// `timeout` bounds the whole exchange, including reading a streamed body.
    pub fn new(api_url: String, timeout: Duration) -> Result<Self, LlmError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(timeout)
            .build()?;
        Ok(Self { client, api_url })
    }

    /// Posts the request. Any non-success status is a definitive failure.
    async fn send(
        &self,
        request: &CompletionRequest,
        stream: bool,
    ) -> Result<reqwest::Response, LlmError> {
        let body = ChatCompletionBody {
            model: &request.model,
            messages: &request.messages,
            temperature: request.temperature,
            top_p: request.top_p,
            max_tokens: request.max_tokens,
            stream,
        };

        debug!(?request, stream, "sending completion request");

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&request.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!("Completion API returned {}: {}", status, message);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    /// Non-streaming call. Returns the trimmed text of the first choice.
    pub async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let response = self.send(request, false).await?;
        let bytes = response.bytes().await?;
        let completion: ChatCompletion = serde_json::from_slice(&bytes)?;

        let text = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(LlmError::EmptyContent)?;

        debug!(chars = text.len(), "completion succeeded");
        Ok(text)
    }

    /// Streaming call. Each decoded fragment is pushed to `updates` as a
    /// `Partial`, and the finished text as a `Final`. A dropped receiver does
    /// not stop the stream. A transport failure mid-stream discards the partial text.
    pub async fn stream(
        &self,
        request: &CompletionRequest,
        updates: Option<&mpsc::Sender<StreamUpdate>>,
    ) -> Result<String, LlmError> {
        let response = self.send(request, true).await?;

        let mut body = response.bytes_stream();
        let mut acc = StreamAccumulator::new();

        while let Some(chunk) = body.next().await {
            for display in acc.push_bytes(&chunk?) {
                publish(updates, StreamUpdate::Partial(display)).await;
            }
            if acc.is_finished() {
                break;
            }
        }

        if let Some(display) = acc.finish() {
            publish(updates, StreamUpdate::Partial(display)).await;
        }

        let text = acc.into_text();
        if text.trim().is_empty() {
            return Err(LlmError::EmptyContent);
        }

        debug!(chars = text.len(), "stream completed");
        publish(updates, StreamUpdate::Final(text.clone())).await;
        Ok(text)
    }
}

/// Syntactic pre-flight check on an OpenRouter key. Advisory only.
pub fn is_plausible_api_key(key: &str) -> bool {
    key.starts_with(API_KEY_PREFIX)
        && key.len() >= MIN_API_KEY_LEN
        && !key.chars().any(char::is_whitespace)
}

async fn publish(updates: Option<&mpsc::Sender<StreamUpdate>>, update: StreamUpdate) {
    if let Some(tx) = updates {
        if tx.send(update).await.is_err() {
            debug!("stream receiver dropped; continuing without display updates");
        }
    }
}
