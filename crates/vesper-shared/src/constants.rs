/// Wire envelope format version
pub const ENVELOPE_VERSION: u8 = 1;

/// Smallest RSA modulus accepted for generated or imported keys, in bits
pub const MIN_RSA_BITS: usize = 2048;

/// Largest RSA modulus a published key may use and still import, in bits
pub const MAX_RSA_BITS: usize = 4096;

/// Default RSA modulus for generated keys, in bits
pub const DEFAULT_RSA_BITS: usize = 2048;

/// SHA-256 digest size in bytes (OAEP hash and MGF1)
pub const OAEP_HASH_SIZE: usize = 32;

/// Number of hex characters shown in a public key fingerprint
pub const FINGERPRINT_HEX_LEN: usize = 16;

/// Key derivation context for public key fingerprints (BLAKE3)
pub const KDF_CONTEXT_FINGERPRINT: &str = "vesper-pubkey-fingerprint-v1";

/// Largest plaintext RSA-OAEP-SHA256 can seal in a single operation for a
/// modulus of `modulus_bytes` bytes.
pub const fn oaep_capacity(modulus_bytes: usize) -> usize {
    modulus_bytes.saturating_sub(2 * OAEP_HASH_SIZE + 2)
}
