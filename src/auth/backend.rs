//! OTP auth backend client.
//!
//! The backend owns all credential handling: it emails a one-time code,
//! verifies it, and returns the user profile plus an opaque session
//! identifier. This side never inspects the session id — presence is the
//! only thing the local cache cares about.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::models::UserProfile;

/// Successful OTP verification: the opaque session marker plus the profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedSession {
    pub session_id: String,
    pub user: UserProfile,
}

/// Errors from the auth backend or the local cache beneath it.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Cannot reach auth backend at {0}")]
    Connection(String),
    #[error("HTTP client error: {0}")]
    HttpClient(String),
    #[error("Auth backend returned {status}: {body}")]
    Backend { status: u16, body: String },
    #[error("Malformed auth response: {0}")]
    ResponseParsing(String),
    #[error("Local storage error: {0}")]
    Storage(#[from] crate::storage::StorageError),
}

/// Remote OTP authentication service.
pub trait AuthBackend: Send + Sync {
    /// Email a one-time code to `email`.
    fn send_otp(&self, email: &str) -> Result<(), AuthError>;
    /// Exchange an emailed code for a session.
    fn verify_otp(&self, email: &str, code: &str) -> Result<VerifiedSession, AuthError>;
    /// Invalidate the remote session.
    fn logout(&self) -> Result<(), AuthError>;
}

// ═══════════════════════════════════════════════════════════
// HttpAuthBackend
// ═══════════════════════════════════════════════════════════

/// Blocking JSON client for the OTP endpoints.
pub struct HttpAuthBackend {
    base_url: String,
    client: reqwest::blocking::Client,
}

#[derive(Serialize)]
struct SendOtpRequest<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct VerifyOtpRequest<'a> {
    email: &'a str,
    code: &'a str,
}

impl HttpAuthBackend {
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Client against the configured backend endpoint.
    pub fn from_env() -> Self {
        Self::new(&crate::config::auth_base_url(), 30)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn post<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::blocking::Response, AuthError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.post(&url).json(body).send().map_err(|e| {
            if e.is_connect() {
                AuthError::Connection(self.base_url.clone())
            } else {
                AuthError::HttpClient(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(AuthError::Backend {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

impl AuthBackend for HttpAuthBackend {
    fn send_otp(&self, email: &str) -> Result<(), AuthError> {
        self.post("/otp/send", &SendOtpRequest { email })?;
        tracing::info!("OTP requested");
        Ok(())
    }

    fn verify_otp(&self, email: &str, code: &str) -> Result<VerifiedSession, AuthError> {
        let response = self.post("/otp/verify", &VerifyOtpRequest { email, code })?;
        response
            .json()
            .map_err(|e| AuthError::ResponseParsing(e.to_string()))
    }

    fn logout(&self) -> Result<(), AuthError> {
        self.post("/logout", &serde_json::json!({}))?;
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════
// MockAuthBackend — test double
// ═══════════════════════════════════════════════════════════

/// Scripted auth backend: accepts one fixed code for any email.
pub struct MockAuthBackend {
    accepted_code: String,
    fail_send: bool,
    fail_logout: bool,
    sent_to: Arc<Mutex<Vec<String>>>,
}

impl MockAuthBackend {
    pub fn accepting(code: &str) -> Self {
        Self {
            accepted_code: code.to_string(),
            fail_send: false,
            fail_logout: false,
            sent_to: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Make `send_otp` fail with a backend error.
    pub fn refusing_send(mut self) -> Self {
        self.fail_send = true;
        self
    }

    /// Make `logout` fail with a connection error.
    pub fn failing_logout(mut self) -> Self {
        self.fail_logout = true;
        self
    }

    /// Emails that received a code, cloneable before boxing.
    pub fn sent_to(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.sent_to)
    }
}

impl AuthBackend for MockAuthBackend {
    fn send_otp(&self, email: &str) -> Result<(), AuthError> {
        if self.fail_send {
            return Err(AuthError::Backend {
                status: 400,
                body: "invalid email".into(),
            });
        }
        if let Ok(mut sent) = self.sent_to.lock() {
            sent.push(email.to_string());
        }
        Ok(())
    }

    fn verify_otp(&self, email: &str, code: &str) -> Result<VerifiedSession, AuthError> {
        if code != self.accepted_code {
            return Err(AuthError::Backend {
                status: 401,
                body: "invalid or expired code".into(),
            });
        }
        Ok(VerifiedSession {
            session_id: format!("sid-{email}"),
            user: UserProfile {
                uid: "u-mock".into(),
                name: "Mock User".into(),
                email: email.to_string(),
                created_time: 1_700_000_000_000,
                last_login_time: 1_700_000_100_000,
            },
        })
    }

    fn logout(&self) -> Result<(), AuthError> {
        if self.fail_logout {
            return Err(AuthError::Connection("mock".into()));
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
