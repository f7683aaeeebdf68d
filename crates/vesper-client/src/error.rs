use thiserror::Error;
use vesper_shared::{CryptoError, ProtocolError, Username};
use vesper_store::StoreError;

/// Errors returned by client commands.
///
/// Everything except [`ClientError::is_fatal`] cases rejects only the one
/// operation; the session stays usable.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Invalid username: {0:?}")]
    InvalidUsername(String),

    #[error("Message is empty")]
    EmptyMessage,

    #[error("Envelope for {recipient} cannot be opened by {session}")]
    MisdirectedEnvelope {
        recipient: Username,
        session: Username,
    },

    /// A blocking crypto task panicked or was cancelled.
    #[error("Crypto task failed: {0}")]
    CryptoTask(String),

    #[error("State lock poisoned")]
    LockPoisoned,
}

impl ClientError {
    /// Whether the session can no longer be used.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Crypto(CryptoError::CryptoUnavailable(_)) | Self::LockPoisoned
        )
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
