use thiserror::Error;
use vesper_shared::Username;

use crate::models::{NotificationId, RequestStatus};

/// Errors produced by the store layer.
///
/// All of these are policy rejections or lookup misses: recoverable, and
/// deterministic for the same inputs, so callers should surface them rather
/// than retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No directory entry for this username.
    #[error("User not found: {0}")]
    NotFound(Username),

    /// A pending or accepted request already links the two users.
    #[error("A friend request between {from} and {to} is already {status}")]
    AlreadyRequested {
        from: Username,
        to: Username,
        status: RequestStatus,
    },

    /// The (from, to) request does not exist or is no longer pending.
    #[error("No pending friend request from {from} to {to}")]
    NoSuchRequest { from: Username, to: Username },

    /// Messaging requires an accepted request in either direction.
    #[error("{sender} and {recipient} are not friends")]
    NotFriends {
        sender: Username,
        recipient: Username,
    },

    #[error("{0} cannot send a friend request to themselves")]
    SelfRequest(Username),

    /// Re-requesting after rejection is disabled by policy.
    #[error("{to} already rejected a friend request from {from}")]
    PreviouslyRejected { from: Username, to: Username },

    #[error("Notification {id} not found for {recipient}")]
    NotificationNotFound {
        id: NotificationId,
        recipient: Username,
    },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
