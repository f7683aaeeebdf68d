//! Public key directory: username -> exported public key.
//!
//! Bindings are not authenticated. Any caller may publish under any name, and
//! a later `publish` for the same username replaces the earlier entry.

use std::collections::BTreeMap;

use chrono::Utc;
use tracing::info;
use vesper_shared::Username;

use crate::error::{Result, StoreError};
use crate::models::DirectoryEntry;

/// In-memory key directory. Iteration is ordered by username.
#[derive(Debug, Default)]
pub struct Directory {
    entries: BTreeMap<Username, DirectoryEntry>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace the key published under `username`.
    ///
    /// Returns the replaced entry, if any.
    pub fn publish(
        &mut self,
        username: Username,
        public_key: impl Into<String>,
    ) -> Option<DirectoryEntry> {
        let entry = DirectoryEntry {
            username: username.clone(),
            public_key: public_key.into(),
            published_at: Utc::now(),
        };
        let previous = self.entries.insert(username.clone(), entry);
        info!(
            username = %username,
            replaced = previous.is_some(),
            "published public key"
        );
        previous
    }

    /// The exported public key for `username`.
    pub fn lookup(&self, username: &Username) -> Result<&str> {
        self.entry(username).map(|e| e.public_key.as_str())
    }

    pub fn entry(&self, username: &Username) -> Result<&DirectoryEntry> {
        self.entries
            .get(username)
            .ok_or_else(|| StoreError::NotFound(username.clone()))
    }

    /// Remove `username`. Ciphertext already produced for the old key is
    /// unaffected.
    pub fn revoke(&mut self, username: &Username) -> Result<DirectoryEntry> {
        let removed = self
            .entries
            .remove(username)
            .ok_or_else(|| StoreError::NotFound(username.clone()))?;
        info!(username = %username, "revoked directory entry");
        Ok(removed)
    }

    pub fn contains(&self, username: &Username) -> bool {
        self.entries.contains_key(username)
    }

    /// Entries other than `viewer` whose name contains `query`,
    /// case-insensitively. An empty query matches everyone.
    pub fn search<'a>(
        &'a self,
        viewer: &'a Username,
        query: &str,
    ) -> impl Iterator<Item = &'a DirectoryEntry> + 'a {
        let needle = query.trim().to_lowercase();
        self.entries.values().filter(move |e| {
            &e.username != viewer && e.username.as_str().to_lowercase().contains(&needle)
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
