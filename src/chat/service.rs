//! Chat service — the stream accumulator and its single-slot guard.
//!
//! **Why the slot exists**: only one completion stream may be active at a
//! time. New submissions while streaming are a no-op, enforced here with an
//! explicit lock rather than by the submit button's disabled state.

use std::sync::{Mutex, MutexGuard};

use crate::models::MessageRole;

use super::client::CompletionClient;
use super::{ChatSession, FALLBACK_REPLY};

// ═══════════════════════════════════════════════════════════
// StreamSlot — single active stream
// ═══════════════════════════════════════════════════════════

/// Single-slot guard for the active completion stream.
pub struct StreamSlot {
    lock: Mutex<()>,
}

impl StreamSlot {
    pub fn new() -> Self {
        Self { lock: Mutex::new(()) }
    }

    /// Claim the slot without blocking. `None` while a stream is active.
    pub fn try_acquire(&self) -> Option<StreamGuard<'_>> {
        let guard = self.lock.try_lock().ok()?;
        Some(StreamGuard { _guard: guard })
    }

    /// Is a stream currently active?
    pub fn is_busy(&self) -> bool {
        self.lock.try_lock().is_err()
    }
}

impl Default for StreamSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII token for the active stream; dropping it frees the slot.
pub struct StreamGuard<'a> {
    _guard: MutexGuard<'a, ()>,
}

// ═══════════════════════════════════════════════════════════
// ChatService
// ═══════════════════════════════════════════════════════════

/// What happened to a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Streamed reply committed to the session.
    Completed,
    /// Stream failed; the fallback reply was committed instead.
    Failed,
    /// A stream is already active — the submission was ignored.
    Busy,
    /// Empty or whitespace-only text — the submission was ignored.
    EmptyInput,
}

/// Chat session plus streaming orchestration.
///
/// `send` appends the user message, streams the assistant reply while
/// publishing the growing buffer through `on_delta`, and commits the final
/// text (or the fallback apology) as one assistant message. Attempt-once:
/// no retry, no cancellation, no timeout.
pub struct ChatService {
    session: Mutex<ChatSession>,
    slot: StreamSlot,
    live: Mutex<Option<String>>,
    client: Box<dyn CompletionClient>,
}

impl ChatService {
    pub fn new(client: Box<dyn CompletionClient>) -> Self {
        Self {
            session: Mutex::new(ChatSession::new()),
            slot: StreamSlot::new(),
            live: Mutex::new(None),
            client,
        }
    }

    /// Submit user text and stream the reply.
    ///
    /// `on_delta` receives the full accumulated buffer after every
    /// fragment, ready for live display.
    pub fn send(&self, text: &str, mut on_delta: impl FnMut(&str)) -> SendOutcome {
        if text.trim().is_empty() {
            return SendOutcome::EmptyInput;
        }
        let Some(_guard) = self.slot.try_acquire() else {
            tracing::debug!("Submission ignored: stream already active");
            return SendOutcome::Busy;
        };

        // Append the user message immediately and snapshot the wire history.
        let wire = {
            let Ok(mut session) = self.session.lock() else {
                tracing::error!("Chat session lock poisoned");
                return SendOutcome::Failed;
            };
            session.push(MessageRole::User, text);
            session.wire_messages()
        };

        self.set_live(Some(String::new()));
        let result = self.client.stream_chat(&wire, &mut |token| {
            if let Ok(mut live) = self.live.lock() {
                let buffer = live.get_or_insert_with(String::new);
                buffer.push_str(token);
                on_delta(buffer);
            }
        });
        self.set_live(None);

        let Ok(mut session) = self.session.lock() else {
            tracing::error!("Chat session lock poisoned");
            return SendOutcome::Failed;
        };
        match result {
            Ok(reply) => {
                session.push(MessageRole::Assistant, reply);
                SendOutcome::Completed
            }
            Err(e) => {
                tracing::warn!(error = %e, "Completion stream failed, committing fallback");
                session.push(MessageRole::Assistant, FALLBACK_REPLY);
                SendOutcome::Failed
            }
        }
    }

    /// The single-slot stream guard.
    pub fn slot(&self) -> &StreamSlot {
        &self.slot
    }

    /// Is a stream currently active?
    pub fn is_streaming(&self) -> bool {
        self.slot.is_busy()
    }

    /// Snapshot of the transient buffer, present only mid-stream.
    pub fn streaming_text(&self) -> Option<String> {
        self.live.lock().ok()?.clone()
    }

    /// Snapshot of the session history.
    pub fn messages(&self) -> Vec<crate::models::ChatMessage> {
        self.session
            .lock()
            .map(|s| s.messages().to_vec())
            .unwrap_or_default()
    }

    pub fn message_count(&self) -> usize {
        self.session.lock().map(|s| s.len()).unwrap_or(0)
    }

    /// Discard the session history and any buffered text.
    pub fn clear(&self) {
        if let Ok(mut session) = self.session.lock() {
            session.clear();
        }
        self.set_live(None);
    }

    fn set_live(&self, value: Option<String>) {
        if let Ok(mut live) = self.live.lock() {
            *live = value;
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::client::MockCompletionClient;
    use crate::chat::SYSTEM_PROMPT;

    #[test]
    fn slot_allows_one_stream_at_a_time() {
        let slot = StreamSlot::new();
        assert!(!slot.is_busy());

        let guard = slot.try_acquire().expect("slot free");
        assert!(slot.is_busy());
        assert!(slot.try_acquire().is_none());

        drop(guard);
        assert!(!slot.is_busy());
        assert!(slot.try_acquire().is_some());
    }

    #[test]
    fn send_commits_user_and_assistant_messages() {
        let service = ChatService::new(Box::new(MockCompletionClient::replying(&[
            "Stay ", "hydrated.",
        ])));

        let outcome = service.send("Any tips for a mild headache?", |_| {});
        assert_eq!(outcome, SendOutcome::Completed);

        let messages = service.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::User);
        assert_eq!(messages[0].content, "Any tips for a mild headache?");
        assert_eq!(messages[1].role, MessageRole::Assistant);
        assert_eq!(messages[1].content, "Stay hydrated.");
    }

    #[test]
    fn on_delta_sees_the_growing_buffer() {
        let service =
            ChatService::new(Box::new(MockCompletionClient::replying(&["a", "b", "c"])));

        let mut snapshots = Vec::new();
        service.send("hi", |buffer| snapshots.push(buffer.to_string()));
        assert_eq!(snapshots, vec!["a", "ab", "abc"]);
    }

    #[test]
    fn failed_stream_commits_fallback_reply() {
        let service = ChatService::new(Box::new(
            MockCompletionClient::replying(&["partial "]).failing_after(1),
        ));

        let outcome = service.send("hello?", |_| {});
        assert_eq!(outcome, SendOutcome::Failed);

        let messages = service.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].content, FALLBACK_REPLY);
        assert!(service.streaming_text().is_none(), "Buffer cleared after failure");
    }

    #[test]
    fn whitespace_only_submission_is_a_no_op() {
        let service = ChatService::new(Box::new(MockCompletionClient::replying(&["ok"])));

        assert_eq!(service.send("", |_| {}), SendOutcome::EmptyInput);
        assert_eq!(service.send("   \n\t", |_| {}), SendOutcome::EmptyInput);
        assert_eq!(service.message_count(), 0);
    }

    #[test]
    fn submission_while_streaming_is_a_no_op() {
        let service = ChatService::new(Box::new(MockCompletionClient::replying(&["ok"])));

        let _active = service.slot().try_acquire().expect("claim the stream slot");
        assert!(service.is_streaming());

        let outcome = service.send("second message", |_| {});
        assert_eq!(outcome, SendOutcome::Busy);
        assert_eq!(service.message_count(), 0, "Message count unchanged");
    }

    #[test]
    fn request_carries_system_prompt_and_full_history() {
        let mock = MockCompletionClient::replying(&["fine"]);
        let requests = mock.requests();
        let service = ChatService::new(Box::new(mock));

        service.send("first", |_| {});
        service.send("second", |_| {});

        let recorded = requests.lock().unwrap();
        assert_eq!(recorded.len(), 2);

        // Second request: system + user/assistant/user
        let wire = &recorded[1];
        assert_eq!(wire.len(), 4);
        assert_eq!(wire[0].role, MessageRole::System);
        assert_eq!(wire[0].content, SYSTEM_PROMPT);
        assert_eq!(wire[1].content, "first");
        assert_eq!(wire[2].content, "fine");
        assert_eq!(wire[3].content, "second");
    }

    #[test]
    fn slot_frees_after_send_completes() {
        let service = ChatService::new(Box::new(MockCompletionClient::replying(&["ok"])));
        service.send("one", |_| {});
        assert!(!service.is_streaming());
        assert_eq!(service.send("two", |_| {}), SendOutcome::Completed);
        assert_eq!(service.message_count(), 4);
    }

    #[test]
    fn clear_discards_history() {
        let service = ChatService::new(Box::new(MockCompletionClient::replying(&["ok"])));
        service.send("one", |_| {});
        service.clear();
        assert_eq!(service.message_count(), 0);
        assert!(service.streaming_text().is_none());
    }
}
