//! End-to-end flows across several sessions sharing one state owner.

use vesper_client::commands::{friends, identity, messaging, notifications};
use vesper_client::{AppState, ClientConfig, ClientError, Session, SharedState};
use vesper_shared::{cipher, CryptoError, Envelope, MessageId};
use vesper_store::{ContactStatus, Decision, Message, RequestPolicy, RequestStatus, StoreError};

async fn setup(names: &[&str]) -> (SharedState, Vec<Session>) {
    let config = ClientConfig::default();
    let state = AppState::from_config(&config).into_shared();
    let mut sessions = Vec::new();
    for name in names {
        sessions.push(identity::register(&state, &config, name).await.unwrap());
    }
    (state, sessions)
}

#[tokio::test]
async fn friend_request_then_encrypted_hello() {
    let (state, sessions) = setup(&["A", "B"]).await;
    let (a, b) = (&sessions[0], &sessions[1]);

    friends::send_friend_request(&state, a, "B").unwrap();
    let b_notes = notifications::list_notifications(&state, b).unwrap();
    assert_eq!(b_notes.len(), 1);
    assert!(b_notes[0].text.contains('A'));

    friends::respond_to_request(&state, b, "A", Decision::Accepted).unwrap();
    let a_notes = notifications::list_notifications(&state, a).unwrap();
    assert_eq!(a_notes.len(), 1);
    assert_eq!(a_notes[0].text, "B accepted your friend request");

    let sent = messaging::send_message(&state, a, "B", "hello").await.unwrap();
    assert_ne!(sent.envelope.ciphertext, "hello");

    // Over the wire and back.
    let wire = sent.envelope.to_bytes().unwrap();
    let delivered = Envelope::from_bytes(&wire).unwrap();
    assert_eq!(messaging::receive_message(&state, b, &delivered).await.unwrap(), "hello");

    let conversation = messaging::get_conversation(&state, a, "B").unwrap();
    assert_eq!(conversation.len(), 1);
    assert_eq!(conversation[0].sender.as_str(), "A");
    assert_eq!(conversation[0].content, "hello");
    assert_eq!(messaging::get_conversation(&state, b, "A").unwrap(), conversation);
}

#[tokio::test]
async fn strangers_cannot_message() {
    let (state, sessions) = setup(&["C", "D"]).await;
    let (c, d) = (&sessions[0], &sessions[1]);

    let err = messaging::send_message(&state, c, "D", "hi").await.unwrap_err();
    match err {
        ClientError::Store(StoreError::NotFriends { sender, recipient }) => {
            assert_eq!(sender.as_str(), "C");
            assert_eq!(recipient.as_str(), "D");
        }
        other => panic!("expected NotFriends, got {other:?}"),
    }
    assert!(messaging::get_conversation(&state, c, "D").unwrap().is_empty());
    assert!(messaging::get_conversation(&state, d, "C").unwrap().is_empty());
}

#[tokio::test]
async fn pending_request_does_not_unlock_messaging() {
    let (state, sessions) = setup(&["A", "B"]).await;
    let (a, b) = (&sessions[0], &sessions[1]);

    friends::send_friend_request(&state, a, "B").unwrap();
    for (from, to) in [(a, "B"), (b, "A")] {
        assert!(matches!(
            messaging::send_message(&state, from, to, "too soon").await,
            Err(ClientError::Store(StoreError::NotFriends { .. }))
        ));
    }
}

#[tokio::test]
async fn second_request_is_rejected_until_answered() {
    let (state, sessions) = setup(&["A", "B"]).await;
    let (a, b) = (&sessions[0], &sessions[1]);

    friends::send_friend_request(&state, a, "B").unwrap();
    let err = friends::send_friend_request(&state, a, "B").unwrap_err();
    assert!(matches!(
        err,
        ClientError::Store(StoreError::AlreadyRequested {
            status: RequestStatus::Pending,
            ..
        })
    ));
    // One notification, not two.
    assert_eq!(notifications::list_notifications(&state, b).unwrap().len(), 1);
}

#[tokio::test]
async fn friendship_is_symmetric_for_messaging() {
    let (state, sessions) = setup(&["A", "B"]).await;
    let (a, b) = (&sessions[0], &sessions[1]);

    friends::send_friend_request(&state, a, "B").unwrap();
    friends::respond_to_request(&state, b, "A", Decision::Accepted).unwrap();

    let reply = messaging::send_message(&state, b, "A", "hi back").await.unwrap();
    assert_eq!(messaging::receive_message(&state, a, &reply.envelope).await.unwrap(), "hi back");
    assert_eq!(
        friends::contact_status(&state, b, "A").unwrap(),
        ContactStatus::Friend
    );
}

#[tokio::test]
async fn same_text_encrypts_differently_each_time() {
    let (state, sessions) = setup(&["A", "B"]).await;
    let (a, b) = (&sessions[0], &sessions[1]);
    friends::send_friend_request(&state, a, "B").unwrap();
    friends::respond_to_request(&state, b, "A", Decision::Accepted).unwrap();

    let first = messaging::send_message(&state, a, "B", "again").await.unwrap();
    let second = messaging::send_message(&state, a, "B", "again").await.unwrap();
    assert_ne!(first.envelope.ciphertext, second.envelope.ciphertext);
    assert_ne!(first.message.id, second.message.id);

    let log = messaging::get_conversation(&state, b, "A").unwrap();
    let ids: Vec<_> = log.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![first.message.id, second.message.id]);
}

#[tokio::test]
async fn third_party_cannot_read_envelope() {
    let (state, sessions) = setup(&["A", "B", "E"]).await;
    let (a, b, eve) = (&sessions[0], &sessions[1], &sessions[2]);
    friends::send_friend_request(&state, a, "B").unwrap();
    friends::respond_to_request(&state, b, "A", Decision::Accepted).unwrap();

    let mut envelope = messaging::send_message(&state, a, "B", "secret")
        .await
        .unwrap()
        .envelope;

    // Readdressed to a stranger, it is refused before any decryption.
    envelope.recipient = eve.username().clone();
    assert!(matches!(
        messaging::receive_message(&state, eve, &envelope).await,
        Err(ClientError::Store(StoreError::NotFriends { .. }))
    ));

    // Even a friend of A cannot open it without B's private key.
    friends::send_friend_request(&state, a, "E").unwrap();
    friends::respond_to_request(&state, eve, "A", Decision::Accepted).unwrap();
    assert!(matches!(
        messaging::receive_message(&state, eve, &envelope).await,
        Err(ClientError::Crypto(CryptoError::DecryptionFailed))
    ));
}

#[tokio::test]
async fn hand_built_envelope_from_stranger_is_refused() {
    let (state, sessions) = setup(&["C", "D"]).await;
    let (c, d) = (&sessions[0], &sessions[1]);

    let ciphertext = cipher::encrypt("unsolicited", d.public_key()).unwrap();
    let envelope = Envelope::new(
        MessageId::new(),
        c.username().clone(),
        d.username().clone(),
        ciphertext,
        Message::new(c.username().clone(), d.username().clone(), "").created_at,
    );

    assert!(matches!(
        messaging::receive_message(&state, d, &envelope).await,
        Err(ClientError::Store(StoreError::NotFriends { .. }))
    ));
    assert_eq!(
        friends::contact_status(&state, d, "C").unwrap(),
        ContactStatus::None
    );
}

#[tokio::test]
async fn rejected_request_can_be_resubmitted_by_default() {
    let (state, sessions) = setup(&["A", "B"]).await;
    let (a, b) = (&sessions[0], &sessions[1]);

    friends::send_friend_request(&state, a, "B").unwrap();
    friends::respond_to_request(&state, b, "A", Decision::Rejected).unwrap();
    assert_eq!(
        notifications::list_notifications(&state, a).unwrap()[0].text,
        "B rejected your friend request"
    );
    assert_eq!(
        friends::contact_status(&state, a, "B").unwrap(),
        ContactStatus::Rejected
    );

    let again = friends::send_friend_request(&state, a, "B").unwrap();
    assert_eq!(again.status, RequestStatus::Pending);
    assert_eq!(friends::pending_requests(&state, b).unwrap().len(), 1);
}

#[tokio::test]
async fn rejection_is_final_when_policy_forbids_rerequest() {
    let config = ClientConfig {
        request_policy: RequestPolicy {
            allow_rerequest: false,
        },
        ..ClientConfig::default()
    };
    let state = AppState::from_config(&config).into_shared();
    let a = identity::register(&state, &config, "A").await.unwrap();
    let b = identity::register(&state, &config, "B").await.unwrap();

    friends::send_friend_request(&state, &a, "B").unwrap();
    friends::respond_to_request(&state, &b, "A", Decision::Rejected).unwrap();

    assert!(matches!(
        friends::send_friend_request(&state, &a, "B"),
        Err(ClientError::Store(StoreError::PreviouslyRejected { .. }))
    ));
}

#[tokio::test]
async fn contacts_serialize_for_presentation() {
    let (state, sessions) = setup(&["A", "B"]).await;
    let contacts = friends::list_contacts(&state, &sessions[0], "b").unwrap();

    let json = serde_json::to_value(&contacts).unwrap();
    assert_eq!(json[0]["username"], "B");
    assert_eq!(json[0]["status"], "none");
    assert!(json[0]["fingerprint"].is_string());
}
