//! Domain model structs held by the in-memory store.
//!
//! Every struct derives `Serialize` and `Deserialize` so it can be handed
//! directly to a presentation or persistence layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vesper_shared::{MessageId, Username};

// ---------------------------------------------------------------------------
// Directory entry
// ---------------------------------------------------------------------------

/// A published identity: a username bound to an exported public key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub username: Username,
    /// Base64 SPKI public key, as produced by `PublicKey::export`.
    pub public_key: String,
    pub published_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Friend request
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

impl RequestStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        })
    }
}

/// The recipient's answer to a pending request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Accepted,
    Rejected,
}

impl From<Decision> for RequestStatus {
    fn from(d: Decision) -> Self {
        match d {
            Decision::Accepted => Self::Accepted,
            Decision::Rejected => Self::Rejected,
        }
    }
}

/// A directed friend request. At most one exists per (from, to) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FriendRequest {
    pub from: Username,
    pub to: Username,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    /// Set when the recipient accepts or rejects.
    pub responded_at: Option<DateTime<Utc>>,
}

impl FriendRequest {
    pub(crate) fn pending(from: Username, to: Username) -> Self {
        Self {
            from,
            to,
            status: RequestStatus::Pending,
            created_at: Utc::now(),
            responded_at: None,
        }
    }

    /// Whether this request links `a` and `b`, in either direction.
    pub fn links(&self, a: &Username, b: &Username) -> bool {
        (&self.from == a && &self.to == b) || (&self.from == b && &self.to == a)
    }
}

/// How another user relates to the viewer, for contact lists.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ContactStatus {
    Friend,
    RequestSent,
    RequestReceived,
    Rejected,
    None,
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// A chat message at rest. Content is plaintext, kept for local display;
/// the ciphertext only exists in the wire envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub sender: Username,
    pub recipient: Username,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(sender: Username, recipient: Username, content: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            sender,
            recipient,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    /// Whether this message belongs to the conversation between `a` and `b`.
    pub fn is_between(&self, a: &Username, b: &Username) -> bool {
        (&self.sender == a && &self.recipient == b) || (&self.sender == b && &self.recipient == a)
    }
}

// ---------------------------------------------------------------------------
// Notification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct NotificationId(pub u64);

impl std::fmt::Display for NotificationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A dismissible notice raised by a friend-request transition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub recipient: Username,
    pub text: String,
    pub created_at: DateTime<Utc>,
}
