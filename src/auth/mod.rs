//! Auth session cache.
//!
//! Mirrors the remote auth backend's session state for UI gating. The
//! backend is the source of truth; locally we keep only an opaque session
//! marker and the cached `{user, is_authenticated}` pair, persisted across
//! reloads under named storage keys.
//!
//! Key properties:
//! - `login` caches the profile and marker only after the backend accepts
//!   the code
//! - `logout` clears local state unconditionally, even if the remote call
//!   fails — the "sign in" affordance must never go stale
//! - `check_auth_status` is a local presence heuristic; it does not
//!   re-validate the session against the backend, so a remotely revoked
//!   session reads as authenticated until the next failed request

pub mod backend;

pub use backend::{AuthBackend, AuthError, HttpAuthBackend, MockAuthBackend, VerifiedSession};

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::models::UserProfile;
use crate::storage::LocalStore;

/// Storage key for the persisted `{user, is_authenticated}` pair.
pub const AUTH_STATE_KEY: &str = "auth-storage";
/// Storage key for the opaque backend session marker.
pub const SESSION_ID_KEY: &str = "session_id";

/// The persisted slice of auth state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthState {
    pub user: Option<UserProfile>,
    pub is_authenticated: bool,
}

// ═══════════════════════════════════════════════════════════
// AuthStore
// ═══════════════════════════════════════════════════════════

/// Local cache of the remote auth session.
pub struct AuthStore {
    backend: Box<dyn AuthBackend>,
    store: Arc<dyn LocalStore>,
    state: AuthState,
}

impl AuthStore {
    /// Create a store, rehydrating any state persisted by a previous run.
    pub fn new(backend: Box<dyn AuthBackend>, store: Arc<dyn LocalStore>) -> Self {
        let state = store
            .get(AUTH_STATE_KEY)
            .and_then(|raw| match serde_json::from_str(&raw) {
                Ok(state) => Some(state),
                Err(e) => {
                    tracing::warn!(error = %e, "Discarding unreadable persisted auth state");
                    None
                }
            })
            .unwrap_or_default();

        Self {
            backend,
            store,
            state,
        }
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.state.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated
    }

    /// Ask the backend to email a one-time code. Failures surface to the
    /// caller; nothing changes locally.
    pub fn send_otp(&self, email: &str) -> Result<(), AuthError> {
        self.backend.send_otp(email)
    }

    /// Exchange an emailed code for a session. On success the session
    /// marker and profile are cached and persisted.
    pub fn login(&mut self, email: &str, code: &str) -> Result<(), AuthError> {
        let verified = self.backend.verify_otp(email, code)?;

        self.store.set(SESSION_ID_KEY, &verified.session_id)?;
        self.state = AuthState {
            user: Some(verified.user),
            is_authenticated: true,
        };
        self.persist()?;
        tracing::info!("Login verified, session cached");
        Ok(())
    }

    /// End the session. Local state is cleared even when the remote call
    /// fails.
    pub fn logout(&mut self) {
        if let Err(e) = self.backend.logout() {
            tracing::warn!(error = %e, "Remote logout failed, clearing local session anyway");
        }
        self.state = AuthState::default();
        if let Err(e) = self.store.remove(SESSION_ID_KEY) {
            tracing::warn!(error = %e, "Failed to remove session marker");
        }
        if let Err(e) = self.store.remove(AUTH_STATE_KEY) {
            tracing::warn!(error = %e, "Failed to remove persisted auth state");
        }
    }

    /// Local heuristic: authenticated only while both the session marker
    /// and a cached profile are present. Never calls the backend.
    pub fn check_auth_status(&mut self) -> bool {
        let has_marker = self.store.get(SESSION_ID_KEY).is_some();

        if has_marker && self.state.user.is_some() {
            if !self.state.is_authenticated {
                self.state.is_authenticated = true;
                self.persist_best_effort();
            }
            true
        } else {
            if self.state != AuthState::default() {
                self.state = AuthState::default();
                self.persist_best_effort();
            }
            false
        }
    }

    fn persist(&self) -> Result<(), AuthError> {
        let raw = serde_json::to_string(&self.state)
            .map_err(|e| AuthError::ResponseParsing(e.to_string()))?;
        self.store.set(AUTH_STATE_KEY, &raw)?;
        Ok(())
    }

    fn persist_best_effort(&self) {
        if let Err(e) = self.persist() {
            tracing::warn!(error = %e, "Failed to persist auth state");
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn store() -> Arc<MemoryStore> {
        Arc::new(MemoryStore::new())
    }

    #[test]
    fn fresh_store_is_signed_out() {
        let auth = AuthStore::new(Box::new(MockAuthBackend::accepting("1")), store());
        assert!(!auth.is_authenticated());
        assert!(auth.user().is_none());
    }

    #[test]
    fn login_caches_user_and_marker() {
        let store = store();
        let mut auth = AuthStore::new(
            Box::new(MockAuthBackend::accepting("424242")),
            store.clone(),
        );

        auth.login("asha@example.com", "424242").unwrap();

        assert!(auth.is_authenticated());
        assert_eq!(auth.user().unwrap().email, "asha@example.com");
        assert!(store.get(SESSION_ID_KEY).is_some());
        assert!(store.get(AUTH_STATE_KEY).is_some());
    }

    #[test]
    fn wrong_code_leaves_state_untouched() {
        let store = store();
        let mut auth = AuthStore::new(
            Box::new(MockAuthBackend::accepting("424242")),
            store.clone(),
        );

        let err = auth.login("asha@example.com", "999999").unwrap_err();
        assert!(matches!(err, AuthError::Backend { status: 401, .. }));
        assert!(!auth.is_authenticated());
        assert!(auth.user().is_none());
        assert!(store.get(SESSION_ID_KEY).is_none());
    }

    #[test]
    fn send_otp_surfaces_backend_failure() {
        let auth = AuthStore::new(
            Box::new(MockAuthBackend::accepting("1").refusing_send()),
            store(),
        );
        assert!(auth.send_otp("bad").is_err());
    }

    #[test]
    fn logout_clears_local_state_even_when_remote_fails() {
        let store = store();
        let mut auth = AuthStore::new(
            Box::new(MockAuthBackend::accepting("1").failing_logout()),
            store.clone(),
        );

        auth.login("asha@example.com", "1").unwrap();
        assert!(auth.is_authenticated());

        auth.logout();
        assert!(!auth.is_authenticated());
        assert!(auth.user().is_none());
        assert!(store.get(SESSION_ID_KEY).is_none());
        assert!(store.get(AUTH_STATE_KEY).is_none());
    }

    #[test]
    fn check_auth_status_requires_marker_and_user() {
        let store = store();
        let mut auth = AuthStore::new(Box::new(MockAuthBackend::accepting("1")), store.clone());

        auth.login("asha@example.com", "1").unwrap();
        assert!(auth.check_auth_status());

        // Marker vanishes (e.g. cleared by another tab): cached user alone
        // must not read as authenticated.
        store.remove(SESSION_ID_KEY).unwrap();
        assert!(!auth.check_auth_status());
        assert!(auth.user().is_none(), "Stale profile cleared");
        assert!(!auth.is_authenticated());
    }

    #[test]
    fn check_auth_status_without_user_is_false() {
        let store = store();
        store.set(SESSION_ID_KEY, "sid-orphan").unwrap();
        let mut auth = AuthStore::new(Box::new(MockAuthBackend::accepting("1")), store);
        assert!(!auth.check_auth_status());
    }

    #[test]
    fn state_rehydrates_across_store_instances() {
        let store = store();
        {
            let mut auth = AuthStore::new(
                Box::new(MockAuthBackend::accepting("1")),
                store.clone(),
            );
            auth.login("asha@example.com", "1").unwrap();
        }

        // A fresh store over the same persistence sees the session.
        let mut auth = AuthStore::new(Box::new(MockAuthBackend::accepting("1")), store);
        assert!(auth.is_authenticated());
        assert_eq!(auth.user().unwrap().email, "asha@example.com");
        assert!(auth.check_auth_status());
    }

    #[test]
    fn corrupt_persisted_state_reads_as_signed_out() {
        let store = store();
        store.set(AUTH_STATE_KEY, "{not json").unwrap();
        let auth = AuthStore::new(Box::new(MockAuthBackend::accepting("1")), store);
        assert!(!auth.is_authenticated());
        assert!(auth.user().is_none());
    }
}
