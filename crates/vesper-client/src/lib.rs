//! # vesper-client
//!
//! Session-level commands for the Vesper messenger: registration, friend
//! requests, encrypted messaging and notifications, all operating on one
//! explicitly owned [`state::AppState`].

pub mod commands;
pub mod config;
pub mod error;
pub mod session;
pub mod state;

use tracing_subscriber::{fmt, EnvFilter};

pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use session::Session;
pub use state::{AppState, SharedState};

/// Install the global tracing subscriber. `RUST_LOG` wins over the configured
/// filter. Calling this twice is harmless.
pub fn init_tracing(config: &ClientConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    let installed = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();

    if installed.is_ok() {
        tracing::debug!(filter = %config.log_filter, "Tracing initialised");
    }
}
