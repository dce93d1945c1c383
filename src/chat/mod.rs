//! AI health chat — session state and stream accumulation.
//!
//! Builds on top of:
//! - `models::{ChatMessage, MessageRole}` (data structs)
//! - `chat::client::CompletionClient` (streaming completion backend)
//!
//! This module adds:
//! - The in-memory `ChatSession` message list
//! - The fixed system instruction and failure fallback text
//! - `ChatService` (see `service`) enforcing one active stream at a time

pub mod client;
pub mod service;

pub use client::{
    CompletionClient, CompletionError, HttpCompletionClient, MockCompletionClient, WireMessage,
};
pub use service::{ChatService, SendOutcome, StreamSlot};

use crate::models::{ChatMessage, MessageRole};

/// Fixed system instruction prepended to every completion request.
pub const SYSTEM_PROMPT: &str = "\
You are a helpful AI health assistant for the AI Health Analyzer app. Provide informative, supportive responses about health topics while following these guidelines:

1. Always remind users to consult healthcare professionals for medical advice
2. Provide general health information, not specific medical diagnoses
3. Be supportive and understanding about health concerns
4. Respond in the language the user uses (English, Hindi, or Hinglish)
5. Keep responses concise but informative
6. Focus on prevention, lifestyle, and general wellness

Sample responses:
- For \"I have headache\" → Suggest rest, hydration, and consulting a doctor if persistent
- For \"मुझे बुखार है\" → Recommend rest, fluids, and medical consultation if fever persists
- For \"Diabetes symptoms\" → List common symptoms and emphasize professional diagnosis

Remember: You're an assistant, not a replacement for medical professionals.";

/// Committed as the assistant's reply when the stream fails.
pub const FALLBACK_REPLY: &str = "I apologize, but I'm having trouble responding right now. \
Please try again later or consult a healthcare professional for urgent concerns.";

// ═══════════════════════════════════════════════════════════
// ChatSession
// ═══════════════════════════════════════════════════════════

/// Ordered in-memory message history for one page view.
///
/// Nothing here persists: the session lives and dies with the view that
/// created it.
#[derive(Debug, Default)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Append a message and return it.
    pub fn push(&mut self, role: MessageRole, content: impl Into<String>) -> &ChatMessage {
        self.messages.push(ChatMessage::new(role, content));
        self.messages.last().expect("message just pushed")
    }

    /// Full wire history for the completion backend: the fixed system
    /// instruction followed by every session message in order.
    pub fn wire_messages(&self) -> Vec<WireMessage> {
        let mut wire = Vec::with_capacity(self.messages.len() + 1);
        wire.push(WireMessage {
            role: MessageRole::System,
            content: SYSTEM_PROMPT.to_string(),
        });
        wire.extend(self.messages.iter().map(|m| WireMessage {
            role: m.role,
            content: m.content.clone(),
        }));
        wire
    }

    /// Discard all messages.
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
