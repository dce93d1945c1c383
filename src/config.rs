use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Vitalscan";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> String {
    format!("info,{}=debug", env!("CARGO_PKG_NAME"))
}

/// Get the application data directory
/// ~/Vitalscan/ on all platforms (user-visible, per design requirement)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join(APP_NAME)
}

/// Get the local key/value storage directory
pub fn storage_dir() -> PathBuf {
    app_data_dir().join("storage")
}

/// Base URL of the OTP auth backend.
/// Override with VITALSCAN_AUTH_URL.
pub fn auth_base_url() -> String {
    std::env::var("VITALSCAN_AUTH_URL")
        .unwrap_or_else(|_| "https://api.vitalscan.app/auth".to_string())
}

/// Base URL of the chat completion backend.
/// Override with VITALSCAN_COMPLETION_URL.
pub fn completion_base_url() -> String {
    std::env::var("VITALSCAN_COMPLETION_URL")
        .unwrap_or_else(|_| "http://localhost:11434".to_string())
}
