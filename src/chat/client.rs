//! Streaming completion client.
//!
//! The backend accepts an ordered `{role, content}` message list and yields
//! a finite sequence of text fragments as newline-delimited JSON chunks.
//! `stream_chat` hands each fragment to the caller as it arrives and
//! returns the accumulated text once the stream closes.

use std::io::BufRead;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::models::MessageRole;

/// One message on the completion wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: MessageRole,
    pub content: String,
}

/// Errors from the completion backend.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("Cannot reach completion backend at {0}")]
    Connection(String),
    #[error("HTTP client error: {0}")]
    HttpClient(String),
    #[error("Completion backend returned {status}: {body}")]
    Backend { status: u16, body: String },
    #[error("Malformed stream chunk: {0}")]
    Malformed(String),
}

/// Streaming chat completion backend.
pub trait CompletionClient: Send + Sync {
    /// Stream a reply for `messages`, invoking `on_token` per text fragment
    /// in arrival order. Returns the full accumulated reply. The stream is
    /// finite and not restartable; a failure mid-stream discards the
    /// attempt (no retry).
    fn stream_chat(
        &self,
        messages: &[WireMessage],
        on_token: &mut dyn FnMut(&str),
    ) -> Result<String, CompletionError>;
}

// ═══════════════════════════════════════════════════════════
// HttpCompletionClient
// ═══════════════════════════════════════════════════════════

/// Blocking HTTP client speaking newline-delimited JSON chunks.
pub struct HttpCompletionClient {
    base_url: String,
    model: String,
    client: reqwest::blocking::Client,
}

/// Request body for POST /api/chat
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [WireMessage],
    stream: bool,
}

/// One streamed chunk from /api/chat
#[derive(Deserialize)]
struct ChatChunk {
    #[serde(default)]
    message: Option<ChunkMessage>,
    #[serde(default)]
    done: bool,
}

#[derive(Deserialize)]
struct ChunkMessage {
    content: String,
}

impl HttpCompletionClient {
    /// Create a client against an explicit backend.
    pub fn new(base_url: &str, model: &str, connect_timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(connect_timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client,
        }
    }

    /// Client against the configured backend endpoint.
    pub fn from_env() -> Self {
        Self::new(&crate::config::completion_base_url(), "default", 10)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl CompletionClient for HttpCompletionClient {
    fn stream_chat(
        &self,
        messages: &[WireMessage],
        on_token: &mut dyn FnMut(&str),
    ) -> Result<String, CompletionError> {
        let url = format!("{}/api/chat", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            messages,
            stream: true,
        };

        let response = self.client.post(&url).json(&body).send().map_err(|e| {
            if e.is_connect() {
                CompletionError::Connection(self.base_url.clone())
            } else {
                CompletionError::HttpClient(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(CompletionError::Backend {
                status: status.as_u16(),
                body,
            });
        }

        let mut full = String::new();
        let reader = std::io::BufReader::new(response);
        for line in reader.lines() {
            let line = line.map_err(|e| CompletionError::HttpClient(e.to_string()))?;
            if line.trim().is_empty() {
                continue;
            }
            let chunk: ChatChunk =
                serde_json::from_str(&line).map_err(|e| CompletionError::Malformed(e.to_string()))?;
            if let Some(message) = chunk.message {
                if !message.content.is_empty() {
                    full.push_str(&message.content);
                    on_token(&message.content);
                }
            }
            if chunk.done {
                break;
            }
        }

        tracing::debug!(chars = full.len(), "Completion stream finished");
        Ok(full)
    }
}

// ═══════════════════════════════════════════════════════════
// MockCompletionClient — test double
// ═══════════════════════════════════════════════════════════

/// Scripted completion backend for tests.
///
/// Emits its fragments in order, optionally failing after a given number
/// of them. Records every request so tests can inspect the wire history.
pub struct MockCompletionClient {
    fragments: Vec<String>,
    fail_after: Option<usize>,
    requests: Arc<Mutex<Vec<Vec<WireMessage>>>>,
}

impl MockCompletionClient {
    /// Succeeds, streaming the given fragments.
    pub fn replying(fragments: &[&str]) -> Self {
        Self {
            fragments: fragments.iter().map(|s| s.to_string()).collect(),
            fail_after: None,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fails before emitting anything.
    pub fn failing() -> Self {
        Self::replying(&[]).failing_after(0)
    }

    /// Fails after emitting `n` fragments.
    pub fn failing_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }

    /// Handle onto the recorded requests, cloneable before boxing.
    pub fn requests(&self) -> Arc<Mutex<Vec<Vec<WireMessage>>>> {
        Arc::clone(&self.requests)
    }
}

impl CompletionClient for MockCompletionClient {
    fn stream_chat(
        &self,
        messages: &[WireMessage],
        on_token: &mut dyn FnMut(&str),
    ) -> Result<String, CompletionError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(messages.to_vec());
        }

        let mut full = String::new();
        for (i, fragment) in self.fragments.iter().enumerate() {
            if self.fail_after == Some(i) {
                return Err(CompletionError::HttpClient("connection reset".into()));
            }
            full.push_str(fragment);
            on_token(fragment);
        }
        if self.fail_after == Some(self.fragments.len()) {
            return Err(CompletionError::HttpClient("connection reset".into()));
        }
        Ok(full)
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
