use tracing::{debug, info};

use vesper_shared::{KeyPair, Username};

use crate::commands::run_crypto;
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::session::Session;
use crate::state::{lock, SharedState};

/// Create a session for `username`: generate a key pair and publish its
/// public half. An existing directory entry under the same name is replaced.
pub async fn register(
    state: &SharedState,
    config: &ClientConfig,
    username: &str,
) -> Result<Session> {
    let username =
        Username::parse(username).ok_or_else(|| ClientError::InvalidUsername(username.into()))?;

    let bits = config.rsa_bits;
    let key_pair = run_crypto("key generation", move || KeyPair::generate_with_bits(bits)).await?;
    let exported = key_pair.public_key().export()?;
    let fingerprint = key_pair.public_key().fingerprint()?;

    {
        let mut guard = lock(state)?;
        guard.directory.publish(username.clone(), exported.clone());
    }

    info!(username = %username, fingerprint = %fingerprint, bits, "Registered identity");
    Ok(Session::new(username, key_pair, exported))
}

/// End the session and withdraw its directory entry.
///
/// If someone has since published under the same name, their entry is left
/// alone. Friend requests and message history are kept.
pub fn logout(state: &SharedState, session: Session) -> Result<()> {
    let mut guard = lock(state)?;
    let ours = guard
        .directory
        .entry(session.username())
        .is_ok_and(|entry| entry.public_key == session.exported_public_key());

    if ours {
        guard.directory.revoke(session.username())?;
    } else {
        debug!(username = %session.username(), "Directory entry already replaced or removed");
    }

    info!(username = %session.username(), "Logged out");
    Ok(())
}

/// The session's public key as published, base64 SPKI.
pub fn export_pubkey(session: &Session) -> String {
    session.exported_public_key().to_string()
}
