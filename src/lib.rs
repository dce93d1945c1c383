pub mod auth; // OTP login + local session cache
pub mod chat; // Streaming AI health chat
pub mod config;
pub mod core_state;
pub mod models;
pub mod scoring; // Risk scoring engine (seven disease domains)
pub mod storage;

use tracing_subscriber::EnvFilter;

/// Initialize tracing for the embedding application.
///
/// Honors `RUST_LOG` when set, otherwise falls back to the crate default.
/// Call once at startup.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
}
