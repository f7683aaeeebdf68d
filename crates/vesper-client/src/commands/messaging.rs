use serde::Serialize;
use tracing::{info, warn};

use vesper_shared::{cipher, CryptoError, Envelope, PublicKey, Username};
use vesper_store::{Message, StoreError};

use crate::commands::run_crypto;
use crate::error::{ClientError, Result};
use crate::session::Session;
use crate::state::{lock, AppState, SharedState};

/// Outcome of a successful send: the logged message and the envelope the
/// transport must deliver.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentMessage {
    pub message: Message,
    pub envelope: Envelope,
}

/// Encrypt `content` to `recipient` and record it in the message log.
///
/// The two must be friends. The recipient's key is fetched from the directory
/// at send time.
pub async fn send_message(
    state: &SharedState,
    session: &Session,
    recipient: &str,
    content: &str,
) -> Result<SentMessage> {
    let recipient = Username::parse(recipient)
        .ok_or_else(|| ClientError::InvalidUsername(recipient.to_string()))?;
    if content.trim().is_empty() {
        return Err(ClientError::EmptyMessage);
    }
    let sender = session.username().clone();

    // Check eligibility before spending any crypto work.
    let recipient_key = {
        let guard = lock(state)?;
        if !guard.relationships.is_accepted(&sender, &recipient) {
            return Err(StoreError::NotFriends {
                sender,
                recipient,
            }
            .into());
        }
        guard.directory.lookup(&recipient)?.to_string()
    };

    let plaintext = content.to_string();
    let ciphertext = run_crypto("encrypt", move || {
        let key = PublicKey::import(&recipient_key)?;
        cipher::encrypt(&plaintext, &key)
    })
    .await?;

    let stored = {
        let mut guard = lock(state)?;
        let AppState {
            messages,
            relationships,
            ..
        } = &mut *guard;
        messages
            .append(relationships, Message::new(sender.clone(), recipient.clone(), content))?
            .clone()
    };

    info!(
        msg_id = %stored.id,
        sender = %sender,
        recipient = %recipient,
        ciphertext_len = ciphertext.len(),
        "Message sent"
    );

    let envelope = Envelope::new(stored.id, sender, recipient, ciphertext, stored.created_at);
    Ok(SentMessage {
        message: stored,
        envelope,
    })
}

/// Open an envelope addressed to this session with its private key.
///
/// Envelopes from anyone who is not an accepted friend are refused unread.
pub async fn receive_message(
    state: &SharedState,
    session: &Session,
    envelope: &Envelope,
) -> Result<String> {
    if &envelope.recipient != session.username() {
        return Err(ClientError::MisdirectedEnvelope {
            recipient: envelope.recipient.clone(),
            session: session.username().clone(),
        });
    }

    {
        let guard = lock(state)?;
        if !guard.relationships.is_accepted(&envelope.sender, session.username()) {
            warn!(msg_id = %envelope.message_id, sender = %envelope.sender, "Dropped message from non-friend");
            return Err(StoreError::NotFriends {
                sender: envelope.sender.clone(),
                recipient: session.username().clone(),
            }
            .into());
        }
    }

    let key_pair = session.key_pair();
    let ciphertext = envelope.ciphertext.clone();
    let result = run_crypto("decrypt", move || {
        cipher::decrypt(&ciphertext, key_pair.private_key())
    })
    .await;

    match &result {
        Ok(_) => info!(msg_id = %envelope.message_id, sender = %envelope.sender, "Message received"),
        Err(ClientError::Crypto(CryptoError::DecryptionFailed)) => {
            warn!(msg_id = %envelope.message_id, sender = %envelope.sender, "Could not decrypt message")
        }
        Err(_) => {}
    }
    result
}

/// The conversation between this session and `other`, in send order.
pub fn get_conversation(state: &SharedState, session: &Session, other: &str) -> Result<Vec<Message>> {
    let other =
        Username::parse(other).ok_or_else(|| ClientError::InvalidUsername(other.to_string()))?;
    let guard = lock(state)?;
    Ok(guard
        .messages
        .conversation(session.username(), &other)
        .cloned()
        .collect())
}
