use std::collections::VecDeque;

use chrono::Utc;
use tracing::debug;
use vesper_shared::Username;

use crate::error::{Result, StoreError};
use crate::models::{Notification, NotificationId};

/// FIFO queue of notices, each addressed to one user and dismissed by id.
#[derive(Debug, Default)]
pub struct NotificationQueue {
    items: VecDeque<Notification>,
    next_id: u64,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, recipient: Username, text: impl Into<String>) -> NotificationId {
        self.next_id += 1;
        let id = NotificationId(self.next_id);
        debug!(id = %id, recipient = %recipient, "queued notification");
        self.items.push_back(Notification {
            id,
            recipient,
            text: text.into(),
            created_at: Utc::now(),
        });
        id
    }

    /// Notifications for `recipient`, oldest first.
    pub fn for_recipient<'a>(
        &'a self,
        recipient: &'a Username,
    ) -> impl Iterator<Item = &'a Notification> + 'a {
        self.items.iter().filter(move |n| &n.recipient == recipient)
    }

    /// Remove one notification. Only its recipient may dismiss it.
    pub fn dismiss(&mut self, recipient: &Username, id: NotificationId) -> Result<Notification> {
        self.items
            .iter()
            .position(|n| n.id == id && &n.recipient == recipient)
            .and_then(|position| self.items.remove(position))
            .ok_or_else(|| StoreError::NotificationNotFound {
                id,
                recipient: recipient.clone(),
            })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
