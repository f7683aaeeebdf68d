//! Friend-request lifecycle between pairs of users.
//!
//! Each directed pair moves `absent -> pending -> {accepted, rejected}`.
//! Records are never deleted. Only the initiator's record exists, so
//! friendship checks look at both directions.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use vesper_shared::Username;

use crate::error::{Result, StoreError};
use crate::models::{ContactStatus, Decision, FriendRequest, RequestStatus};
use crate::notifications::NotificationQueue;

/// Answers whether two users may exchange messages.
pub trait FriendshipGate {
    fn is_accepted(&self, a: &Username, b: &Username) -> bool;
}

/// Tunables for the request lifecycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RequestPolicy {
    /// Allow `from` to ask `to` again after `to` rejected them. The rejected
    /// record is reset to pending rather than duplicated.
    pub allow_rerequest: bool,
}

impl Default for RequestPolicy {
    fn default() -> Self {
        Self {
            allow_rerequest: true,
        }
    }
}

#[derive(Debug, Default)]
pub struct Relationships {
    // Insertion ordered; a user has few enough requests that scans are fine.
    requests: Vec<FriendRequest>,
    policy: RequestPolicy,
}

impl Relationships {
    pub fn new(policy: RequestPolicy) -> Self {
        Self {
            requests: Vec::new(),
            policy,
        }
    }

    pub fn policy(&self) -> RequestPolicy {
        self.policy
    }

    /// Open a pending request from `from` to `to` and notify `to`.
    pub fn request(
        &mut self,
        from: &Username,
        to: &Username,
        notifications: &mut NotificationQueue,
    ) -> Result<&FriendRequest> {
        if from == to {
            return Err(StoreError::SelfRequest(from.clone()));
        }

        if let Some(live) = self
            .requests
            .iter()
            .find(|r| r.links(from, to) && r.status != RequestStatus::Rejected)
        {
            return Err(StoreError::AlreadyRequested {
                from: live.from.clone(),
                to: live.to.clone(),
                status: live.status,
            });
        }

        let index = match self.position(from, to) {
            Some(index) => {
                // Only a rejected record can remain for this direction here.
                if !self.policy.allow_rerequest {
                    return Err(StoreError::PreviouslyRejected {
                        from: from.clone(),
                        to: to.clone(),
                    });
                }
                self.requests[index] = FriendRequest::pending(from.clone(), to.clone());
                info!(from = %from, to = %to, "friend request resubmitted after rejection");
                index
            }
            None => {
                self.requests
                    .push(FriendRequest::pending(from.clone(), to.clone()));
                info!(from = %from, to = %to, "friend request sent");
                self.requests.len() - 1
            }
        };

        notifications.push(to.clone(), format!("New friend request from {from}"));
        Ok(&self.requests[index])
    }

    /// Settle the pending request `from -> to`. Must be invoked on behalf of
    /// `to`; notifies `from` of the outcome.
    pub fn respond(
        &mut self,
        from: &Username,
        to: &Username,
        decision: Decision,
        notifications: &mut NotificationQueue,
    ) -> Result<&FriendRequest> {
        let index = self
            .position(from, to)
            .filter(|&i| self.requests[i].status == RequestStatus::Pending)
            .ok_or_else(|| StoreError::NoSuchRequest {
                from: from.clone(),
                to: to.clone(),
            })?;

        let request = &mut self.requests[index];
        request.status = decision.into();
        request.responded_at = Some(Utc::now());

        info!(from = %from, to = %to, status = %request.status, "friend request answered");

        let text = match decision {
            Decision::Accepted => format!("{to} accepted your friend request"),
            Decision::Rejected => format!("{to} rejected your friend request"),
        };
        notifications.push(from.clone(), text);

        Ok(&self.requests[index])
    }

    /// True iff an accepted request exists in either direction.
    pub fn is_accepted(&self, a: &Username, b: &Username) -> bool {
        self.requests
            .iter()
            .any(|r| r.links(a, b) && r.status == RequestStatus::Accepted)
    }

    /// True iff `from` has a pending request to `to` (this direction only).
    pub fn has_pending_outgoing(&self, from: &Username, to: &Username) -> bool {
        self.get(from, to)
            .is_some_and(|r| r.status == RequestStatus::Pending)
    }

    /// The record for exactly this direction, if any.
    pub fn get(&self, from: &Username, to: &Username) -> Option<&FriendRequest> {
        self.position(from, to).map(|i| &self.requests[i])
    }

    /// Pending requests awaiting `recipient`'s answer, oldest first.
    pub fn incoming_pending<'a>(
        &'a self,
        recipient: &'a Username,
    ) -> impl Iterator<Item = &'a FriendRequest> + 'a {
        self.requests
            .iter()
            .filter(move |r| &r.to == recipient && r.status == RequestStatus::Pending)
    }

    /// How `other` looks from `viewer`'s side.
    pub fn contact_status(&self, viewer: &Username, other: &Username) -> ContactStatus {
        if self.is_accepted(viewer, other) {
            ContactStatus::Friend
        } else if self.has_pending_outgoing(viewer, other) {
            ContactStatus::RequestSent
        } else if self.has_pending_outgoing(other, viewer) {
            ContactStatus::RequestReceived
        } else if self
            .requests
            .iter()
            .any(|r| r.links(viewer, other) && r.status == RequestStatus::Rejected)
        {
            ContactStatus::Rejected
        } else {
            ContactStatus::None
        }
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    fn position(&self, from: &Username, to: &Username) -> Option<usize> {
        self.requests
            .iter()
            .position(|r| &r.from == from && &r.to == to)
    }
}

impl FriendshipGate for Relationships {
    fn is_accepted(&self, a: &Username, b: &Username) -> bool {
        Relationships::is_accepted(self, a, b)
    }
}
