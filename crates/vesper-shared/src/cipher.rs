use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::rngs::OsRng;
use rsa::Oaep;
use sha2::Sha256;

use crate::error::CryptoError;
use crate::keys::{PrivateKey, PublicKey};

// RSA-OAEP with SHA-256 for both the label hash and MGF1, matching WebCrypto's
// "RSA-OAEP"/"SHA-256" parameters.
fn padding() -> Oaep {
    Oaep::new::<Sha256>()
}

/// Encrypt a UTF-8 message to `recipient`, returning base64 ciphertext.
///
/// OAEP padding is randomized, so equal plaintexts never produce equal
/// ciphertexts. Messages larger than one OAEP block are rejected; there is no
/// chunking.
pub fn encrypt(plaintext: &str, recipient: &PublicKey) -> Result<String, CryptoError> {
    let data = plaintext.as_bytes();
    let max = recipient.max_plaintext_len();
    if data.len() > max {
        return Err(CryptoError::MessageTooLarge {
            size: data.len(),
            max,
        });
    }

    let ciphertext = recipient
        .as_rsa()
        .encrypt(&mut OsRng, padding(), data)
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

    Ok(BASE64.encode(ciphertext))
}

/// Decrypt base64 ciphertext produced by [`encrypt`] with the holder's
/// private key.
pub fn decrypt(ciphertext: &str, own_key: &PrivateKey) -> Result<String, CryptoError> {
    let bytes = BASE64
        .decode(ciphertext.trim())
        .map_err(|_| CryptoError::DecryptionFailed)?;

    let plaintext = own_key
        .as_rsa()
        .decrypt(padding(), &bytes)
        .map_err(|_| CryptoError::DecryptionFailed)?;

    String::from_utf8(plaintext).map_err(|_| CryptoError::DecryptionFailed)
}
