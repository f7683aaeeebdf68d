//! Client command handlers.
//!
//! Each sub-module groups related commands by domain. Commands take the
//! [`crate::state::SharedState`] and, where an identity is needed, the caller's
//! [`crate::session::Session`], and report failures as [`crate::ClientError`]
//! so the presentation layer decides how to surface them.

pub mod friends;
pub mod identity;
pub mod messaging;
pub mod notifications;

use vesper_shared::CryptoError;

use crate::error::{ClientError, Result};

/// Run a CPU-bound crypto operation off the async executor.
async fn run_crypto<T, F>(operation: &'static str, f: F) -> Result<T>
where
    F: FnOnce() -> std::result::Result<T, CryptoError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ClientError::CryptoTask(format!("{operation}: {e}")))?
        .map_err(ClientError::from)
}
