//! Application state shared across all client commands.
//!
//! [`AppState`] is the single owner of the directory, relationships, message
//! log and notifications. It is wrapped in `Arc<Mutex<>>` and handed to every
//! command, so all mutations go through one lock. Commands never hold the
//! lock across an `.await`.

use std::sync::{Arc, Mutex, MutexGuard};

use vesper_store::{Directory, MessageLog, NotificationQueue, Relationships, RequestPolicy};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};

pub type SharedState = Arc<Mutex<AppState>>;

/// Central application state.
///
/// Private keys are not kept here; they live in each [`crate::session::Session`].
#[derive(Debug, Default)]
pub struct AppState {
    /// Published public keys by username.
    pub directory: Directory,

    /// Friend-request records; gates who may message whom.
    pub relationships: Relationships,

    /// Append-only history of sent messages.
    pub messages: MessageLog,

    /// Pending notices for every local user.
    pub notifications: NotificationQueue,
}

impl AppState {
    /// Create empty state with the given request policy.
    pub fn new(policy: RequestPolicy) -> Self {
        Self {
            relationships: Relationships::new(policy),
            ..Self::default()
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.request_policy)
    }

    /// Wrap in the shared handle commands expect.
    pub fn into_shared(self) -> SharedState {
        Arc::new(Mutex::new(self))
    }
}

pub(crate) fn lock(state: &SharedState) -> Result<MutexGuard<'_, AppState>> {
    state.lock().map_err(|_| ClientError::LockPoisoned)
}
