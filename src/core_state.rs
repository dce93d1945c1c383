//! Shared application state.
//!
//! `CoreState` is the single container the presentation layer talks to:
//! the auth session cache and the chat service, constructed explicitly
//! from their backends instead of living as ambient singletons. Wrapped
//! in `Arc` at startup so every view shares the same instance.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::auth::{AuthBackend, AuthStore, HttpAuthBackend};
use crate::chat::{ChatService, CompletionClient, HttpCompletionClient};
use crate::storage::{FileStore, LocalStore, StorageError};

/// Application state shared across the UI session.
pub struct CoreState {
    /// Auth session cache. `Mutex` because login/logout mutate it.
    auth: Mutex<AuthStore>,
    /// Chat service — internally synchronized, one stream at a time.
    chat: ChatService,
}

impl CoreState {
    /// Build state against the configured HTTP backends and the default
    /// on-disk store.
    pub fn new() -> Result<Self, StorageError> {
        let store = Arc::new(FileStore::open_default()?);
        Ok(Self::with_backends(
            Box::new(HttpAuthBackend::from_env()),
            Box::new(HttpCompletionClient::from_env()),
            store,
        ))
    }

    /// Build state from explicit collaborators. Tests use this with mocks.
    pub fn with_backends(
        auth_backend: Box<dyn AuthBackend>,
        completion: Box<dyn CompletionClient>,
        store: Arc<dyn LocalStore>,
    ) -> Self {
        Self {
            auth: Mutex::new(AuthStore::new(auth_backend, store)),
            chat: ChatService::new(completion),
        }
    }

    /// Acquire the auth store. Recovers the inner state if a previous
    /// holder panicked.
    pub fn auth(&self) -> MutexGuard<'_, AuthStore> {
        match self.auth.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::error!("Auth store lock poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    /// The chat service.
    pub fn chat(&self) -> &ChatService {
        &self.chat
    }

    /// Tear down the UI session: drop chat history. The persisted auth
    /// cache intentionally survives (it is what outlives a reload).
    pub fn end_session(&self) {
        self.chat.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MockAuthBackend;
    use crate::chat::{MockCompletionClient, SendOutcome};
    use crate::storage::MemoryStore;

    fn test_state() -> CoreState {
        CoreState::with_backends(
            Box::new(MockAuthBackend::accepting("123456")),
            Box::new(MockCompletionClient::replying(&["Hi there."])),
            Arc::new(MemoryStore::new()),
        )
    }

    #[test]
    fn auth_and_chat_are_reachable() {
        let state = test_state();
        assert!(!state.auth().is_authenticated());
        assert_eq!(state.chat().message_count(), 0);
    }

    #[test]
    fn login_then_chat_flow() {
        let state = test_state();
        state.auth().login("asha@example.com", "123456").unwrap();
        assert!(state.auth().check_auth_status());

        let outcome = state.chat().send("hello", |_| {});
        assert_eq!(outcome, SendOutcome::Completed);
        assert_eq!(state.chat().message_count(), 2);
    }

    #[test]
    fn end_session_clears_chat_but_keeps_auth_cache() {
        let state = test_state();
        state.auth().login("asha@example.com", "123456").unwrap();
        state.chat().send("hello", |_| {});

        state.end_session();
        assert_eq!(state.chat().message_count(), 0);
        assert!(state.auth().is_authenticated());
    }
}
