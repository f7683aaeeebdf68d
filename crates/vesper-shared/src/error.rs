use thiserror::Error;

#[derive(Error, Debug)]
pub enum CryptoError {
    /// No secure random source or the algorithm is not usable. Fatal to the session.
    #[error("Crypto unavailable: {0}")]
    CryptoUnavailable(String),

    #[error("Malformed public key: {0}")]
    MalformedKey(String),

    #[error("Message too large: {size} bytes (max {max} for this key)")]
    MessageTooLarge { size: usize, max: usize },

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    // Wrong key, tampering and bad encoding all collapse into this variant.
    #[error("Decryption failed: invalid ciphertext or wrong key")]
    DecryptionFailed,
}

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Unsupported envelope version: {0}")]
    UnsupportedVersion(u8),

    #[error("Binary encoding error: {0}")]
    Binary(#[from] bincode::Error),

    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),
}
