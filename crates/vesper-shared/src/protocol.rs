use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::ENVELOPE_VERSION;
use crate::error::ProtocolError;
use crate::types::{MessageId, Username};

/// An encrypted chat message as it travels between processes.
///
/// Only the ciphertext is confidential; sender, recipient and timestamp are
/// visible to whatever transport carries the envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Envelope {
    /// Format version, checked on decode
    pub version: u8,
    /// Message UUID for deduplication
    pub message_id: MessageId,
    pub sender: Username,
    pub recipient: Username,
    /// RSA-OAEP ciphertext, base64
    pub ciphertext: String,
    pub sent_at: DateTime<Utc>,
}

impl Envelope {
    pub fn new(
        message_id: MessageId,
        sender: Username,
        recipient: Username,
        ciphertext: String,
        sent_at: DateTime<Utc>,
    ) -> Self {
        Self {
            version: ENVELOPE_VERSION,
            message_id,
            sender,
            recipient,
            ciphertext,
            sent_at,
        }
    }

    /// Serialize to binary (bincode)
    pub fn to_bytes(&self) -> Result<Vec<u8>, ProtocolError> {
        Ok(bincode::serialize(self)?)
    }

    /// Deserialize from binary
    pub fn from_bytes(data: &[u8]) -> Result<Self, ProtocolError> {
        let envelope: Self = bincode::deserialize(data)?;
        envelope.check_version()
    }

    pub fn to_json(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(data: &str) -> Result<Self, ProtocolError> {
        let envelope: Self = serde_json::from_str(data)?;
        envelope.check_version()
    }

    fn check_version(self) -> Result<Self, ProtocolError> {
        if self.version != ENVELOPE_VERSION {
            return Err(ProtocolError::UnsupportedVersion(self.version));
        }
        Ok(self)
    }
}
