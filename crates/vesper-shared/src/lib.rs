//! # vesper-shared
//!
//! Cryptographic core and wire types shared by every Vesper crate.
//!
//! Each session owns an RSA-OAEP (SHA-256) key pair. The public half is
//! exported as base64 SPKI and published to the directory; the private half
//! stays inside [`keys::KeyPair`] and is never serialized.

pub mod cipher;
pub mod constants;
pub mod error;
pub mod keys;
pub mod protocol;
pub mod types;

pub use error::{CryptoError, ProtocolError};
pub use keys::{KeyPair, PrivateKey, PublicKey};
pub use protocol::Envelope;
pub use types::{MessageId, Username};
