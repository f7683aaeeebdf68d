//! # vesper-store
//!
//! In-memory state for the Vesper messenger: the public key directory, the
//! friend-request state machine, the append-only message log and the
//! notification queue.
//!
//! Nothing here is persisted or shared across processes. Each structure has a
//! single owner (see `vesper-client`'s `AppState`) and is mutated through
//! `&mut self`, so writes are serialized by construction. A networked
//! deployment swaps these for server-backed implementations.

pub mod directory;
pub mod messages;
pub mod models;
pub mod notifications;
pub mod relationships;

mod error;

pub use directory::Directory;
pub use error::{Result, StoreError};
pub use messages::MessageLog;
pub use models::*;
pub use notifications::NotificationQueue;
pub use relationships::{FriendshipGate, Relationships, RequestPolicy};
