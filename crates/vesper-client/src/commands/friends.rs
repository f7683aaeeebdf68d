use serde::Serialize;
use tracing::info;

use vesper_shared::{PublicKey, Username};
use vesper_store::{ContactStatus, Decision, FriendRequest, StoreError};

use crate::error::{ClientError, Result};
use crate::session::Session;
use crate::state::{lock, AppState, SharedState};

/// A directory entry as seen from the current session.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContactDto {
    pub username: Username,
    /// `None` when the published key does not parse.
    pub fingerprint: Option<String>,
    pub status: ContactStatus,
}

fn parse_username(raw: &str) -> Result<Username> {
    Username::parse(raw).ok_or_else(|| ClientError::InvalidUsername(raw.to_string()))
}

/// Ask `to` to become friends. `to` must be in the directory.
pub fn send_friend_request(
    state: &SharedState,
    session: &Session,
    to: &str,
) -> Result<FriendRequest> {
    let to = parse_username(to)?;
    let mut guard = lock(state)?;
    if !guard.directory.contains(&to) {
        return Err(StoreError::NotFound(to).into());
    }

    let AppState {
        relationships,
        notifications,
        ..
    } = &mut *guard;
    let request = relationships.request(session.username(), &to, notifications)?;
    Ok(request.clone())
}

/// Accept or reject the pending request `from` sent to this session.
pub fn respond_to_request(
    state: &SharedState,
    session: &Session,
    from: &str,
    decision: Decision,
) -> Result<FriendRequest> {
    let from = parse_username(from)?;
    let mut guard = lock(state)?;

    let AppState {
        relationships,
        notifications,
        ..
    } = &mut *guard;
    let request = relationships.respond(&from, session.username(), decision, notifications)?;
    info!(from = %from, to = %session.username(), ?decision, "Answered friend request");
    Ok(request.clone())
}

/// Requests waiting for this session's answer, oldest first.
pub fn pending_requests(state: &SharedState, session: &Session) -> Result<Vec<FriendRequest>> {
    let guard = lock(state)?;
    Ok(guard
        .relationships
        .incoming_pending(session.username())
        .cloned()
        .collect())
}

/// Other users whose name contains `query` (case-insensitive), with their
/// relationship to this session.
pub fn list_contacts(state: &SharedState, session: &Session, query: &str) -> Result<Vec<ContactDto>> {
    let guard = lock(state)?;
    let me = session.username();

    Ok(guard
        .directory
        .search(me, query)
        .map(|entry| ContactDto {
            username: entry.username.clone(),
            fingerprint: PublicKey::import(&entry.public_key)
                .and_then(|key| key.fingerprint())
                .ok(),
            status: guard.relationships.contact_status(me, &entry.username),
        })
        .collect())
}

pub fn contact_status(state: &SharedState, session: &Session, other: &str) -> Result<ContactStatus> {
    let other = parse_username(other)?;
    let guard = lock(state)?;
    Ok(guard.relationships.contact_status(session.username(), &other))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::identity::register;
    use crate::config::ClientConfig;
    use vesper_store::RequestStatus;

    async fn two_users() -> (SharedState, Session, Session) {
        let state = AppState::default().into_shared();
        let config = ClientConfig::default();
        let alice = register(&state, &config, "alice").await.unwrap();
        let bob = register(&state, &config, "bob").await.unwrap();
        (state, alice, bob)
    }

    #[tokio::test]
    async fn test_request_and_accept() {
        let (state, alice, bob) = two_users().await;

        let sent = send_friend_request(&state, &alice, "bob").unwrap();
        assert_eq!(sent.status, RequestStatus::Pending);

        let pending = pending_requests(&state, &bob).unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].from.as_str(), "alice");

        let answered = respond_to_request(&state, &bob, "alice", Decision::Accepted).unwrap();
        assert_eq!(answered.status, RequestStatus::Accepted);
        assert!(pending_requests(&state, &bob).unwrap().is_empty());
        assert_eq!(
            contact_status(&state, &alice, "bob").unwrap(),
            ContactStatus::Friend
        );
        assert_eq!(
            contact_status(&state, &bob, "alice").unwrap(),
            ContactStatus::Friend
        );
    }

    #[tokio::test]
    async fn test_request_to_unknown_user() {
        let (state, alice, _bob) = two_users().await;
        let err = send_friend_request(&state, &alice, "nobody").unwrap_err();
        assert!(matches!(err, ClientError::Store(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_request_to_logged_out_user() {
        let (state, alice, bob) = two_users().await;
        crate::commands::identity::logout(&state, bob).unwrap();

        let err = send_friend_request(&state, &alice, "bob").unwrap_err();
        assert!(matches!(err, ClientError::Store(StoreError::NotFound(name)) if name.as_str() == "bob"));
        let guard = state.lock().unwrap();
        assert!(guard.relationships.is_empty());
        assert!(guard.notifications.is_empty());
    }

    #[tokio::test]
    async fn test_sender_cannot_answer_own_request() {
        let (state, alice, _bob) = two_users().await;
        send_friend_request(&state, &alice, "bob").unwrap();

        // alice answering "a request from bob" finds nothing: the record is alice -> bob.
        let err = respond_to_request(&state, &alice, "bob", Decision::Accepted).unwrap_err();
        assert!(matches!(
            err,
            ClientError::Store(StoreError::NoSuchRequest { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_contacts_annotates_status() {
        let (state, alice, _bob) = two_users().await;
        send_friend_request(&state, &alice, "bob").unwrap();

        let contacts = list_contacts(&state, &alice, "").unwrap();
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].username.as_str(), "bob");
        assert_eq!(contacts[0].status, ContactStatus::RequestSent);
        assert_eq!(contacts[0].fingerprint.as_deref().map(str::len), Some(16));

        assert!(list_contacts(&state, &alice, "zzz").unwrap().is_empty());
    }
}
