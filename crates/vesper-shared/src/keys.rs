use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use rsa::pkcs8::{DecodePublicKey, EncodePublicKey};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};

use crate::constants::{
    oaep_capacity, DEFAULT_RSA_BITS, FINGERPRINT_HEX_LEN, KDF_CONTEXT_FINGERPRINT, MAX_RSA_BITS,
    MIN_RSA_BITS,
};
use crate::error::CryptoError;

/// A session's RSA-OAEP key pair.
///
/// The private half never leaves this struct: there is no export, no
/// serialization and `Debug` output is redacted.
#[derive(Clone)]
pub struct KeyPair {
    private_key: PrivateKey,
    public_key: PublicKey,
}

/// The decrypting half of a [`KeyPair`].
#[derive(Clone)]
pub struct PrivateKey(RsaPrivateKey);

/// The encrypting half, safe to publish in a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey(RsaPublicKey);

impl KeyPair {
    /// Generate a fresh 2048-bit key pair
    pub fn generate() -> Result<Self, CryptoError> {
        Self::generate_with_bits(DEFAULT_RSA_BITS)
    }

    /// Generate a key pair with an explicit modulus size (2048 to 4096 bits)
    pub fn generate_with_bits(bits: usize) -> Result<Self, CryptoError> {
        if bits < MIN_RSA_BITS {
            return Err(CryptoError::CryptoUnavailable(format!(
                "refusing to generate a {bits}-bit RSA key (minimum {MIN_RSA_BITS})"
            )));
        }
        // Anything larger would export to a key that no peer can import.
        if bits > MAX_RSA_BITS {
            return Err(CryptoError::CryptoUnavailable(format!(
                "refusing to generate a {bits}-bit RSA key (maximum {MAX_RSA_BITS})"
            )));
        }

        // OsRng panics on failure inside the RSA routines; probe it first so a
        // missing entropy source surfaces as an error instead.
        let mut probe = [0u8; 16];
        OsRng
            .try_fill_bytes(&mut probe)
            .map_err(|e| CryptoError::CryptoUnavailable(format!("secure random source: {e}")))?;

        let private_key = RsaPrivateKey::new(&mut OsRng, bits)
            .map_err(|e| CryptoError::CryptoUnavailable(format!("RSA key generation: {e}")))?;
        let public_key = private_key.to_public_key();

        tracing::debug!(bits, "generated RSA-OAEP key pair");

        Ok(Self {
            private_key: PrivateKey(private_key),
            public_key: PublicKey(public_key),
        })
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key)
            .field("private_key", &self.private_key)
            .finish()
    }
}

impl PrivateKey {
    pub(crate) fn as_rsa(&self) -> &RsaPrivateKey {
        &self.0
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

impl PublicKey {
    /// Serialize as base64 over DER-encoded SubjectPublicKeyInfo (SPKI)
    pub fn export(&self) -> Result<String, CryptoError> {
        let der = self
            .0
            .to_public_key_der()
            .map_err(|e| CryptoError::MalformedKey(format!("SPKI encoding: {e}")))?;
        Ok(BASE64.encode(der.as_bytes()))
    }

    /// Parse the output of [`PublicKey::export`]
    pub fn import(encoded: &str) -> Result<Self, CryptoError> {
        let der = BASE64
            .decode(encoded.trim())
            .map_err(|e| CryptoError::MalformedKey(format!("invalid base64: {e}")))?;

        let key = RsaPublicKey::from_public_key_der(&der)
            .map_err(|e| CryptoError::MalformedKey(format!("not an RSA SPKI key: {e}")))?;

        let key = Self(key);
        if key.size_bits() < MIN_RSA_BITS {
            return Err(CryptoError::MalformedKey(format!(
                "{}-bit modulus is below the {MIN_RSA_BITS}-bit minimum",
                key.size_bits()
            )));
        }
        Ok(key)
    }

    /// Modulus size in bits
    pub fn size_bits(&self) -> usize {
        self.0.size() * 8
    }

    /// Largest UTF-8 payload, in bytes, that fits in one OAEP block
    pub fn max_plaintext_len(&self) -> usize {
        oaep_capacity(self.0.size())
    }

    /// Short hex fingerprint for displaying next to a username
    pub fn fingerprint(&self) -> Result<String, CryptoError> {
        let der = self
            .0
            .to_public_key_der()
            .map_err(|e| CryptoError::MalformedKey(format!("SPKI encoding: {e}")))?;
        let mut hasher = blake3::Hasher::new_derive_key(KDF_CONTEXT_FINGERPRINT);
        hasher.update(der.as_bytes());
        let hash = hasher.finalize();
        Ok(hex::encode(hash.as_bytes())[..FINGERPRINT_HEX_LEN].to_string())
    }

    pub(crate) fn as_rsa(&self) -> &RsaPublicKey {
        &self.0
    }
}

/// Generate a fresh key pair for a session
pub fn generate_key_pair() -> Result<KeyPair, CryptoError> {
    KeyPair::generate()
}

/// Export a public key for the directory
pub fn export_public_key(key: &PublicKey) -> Result<String, CryptoError> {
    key.export()
}

/// Import a public key fetched from the directory
pub fn import_public_key(encoded: &str) -> Result<PublicKey, CryptoError> {
    PublicKey::import(encoded)
}

/// Key pairs shared across a test binary; RSA generation is too slow to
/// repeat per test.
#[cfg(test)]
pub(crate) fn fixture(slot: usize) -> &'static KeyPair {
    use std::sync::OnceLock;

    static PAIRS: [OnceLock<KeyPair>; 2] = [OnceLock::new(), OnceLock::new()];
    PAIRS[slot].get_or_init(|| KeyPair::generate().expect("key generation"))
}
