use std::sync::Arc;

use vesper_shared::{KeyPair, PublicKey, Username};

/// One logged-in user: their name and the key pair generated at
/// registration. The private key is owned here and nowhere else.
#[derive(Debug)]
pub struct Session {
    username: Username,
    key_pair: Arc<KeyPair>,
    exported_public_key: String,
}

impl Session {
    pub(crate) fn new(username: Username, key_pair: KeyPair, exported_public_key: String) -> Self {
        Self {
            username,
            key_pair: Arc::new(key_pair),
            exported_public_key,
        }
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn public_key(&self) -> &PublicKey {
        self.key_pair.public_key()
    }

    /// The public key exactly as published to the directory.
    pub fn exported_public_key(&self) -> &str {
        &self.exported_public_key
    }

    // Shared handle for moving into blocking crypto tasks.
    pub(crate) fn key_pair(&self) -> Arc<KeyPair> {
        Arc::clone(&self.key_pair)
    }
}
