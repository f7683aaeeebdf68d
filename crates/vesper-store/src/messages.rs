use tracing::{info, warn};
use vesper_shared::Username;

use crate::error::{Result, StoreError};
use crate::models::Message;
use crate::relationships::FriendshipGate;

/// Append-only message history. Insertion order is authoritative; entries are
/// never edited, removed or re-sorted by timestamp.
#[derive(Debug, Default)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `message` if sender and recipient are friends right now.
    pub fn append(&mut self, gate: &impl FriendshipGate, message: Message) -> Result<&Message> {
        if !gate.is_accepted(&message.sender, &message.recipient) {
            warn!(
                sender = %message.sender,
                recipient = %message.recipient,
                "rejected message between non-friends"
            );
            return Err(StoreError::NotFriends {
                sender: message.sender,
                recipient: message.recipient,
            });
        }

        info!(
            msg_id = %message.id,
            sender = %message.sender,
            recipient = %message.recipient,
            "message appended"
        );
        self.messages.push(message);
        Ok(&self.messages[self.messages.len() - 1])
    }

    /// Every message exchanged between `a` and `b`, in insertion order.
    pub fn conversation<'a>(
        &'a self,
        a: &'a Username,
        b: &'a Username,
    ) -> impl Iterator<Item = &'a Message> + 'a {
        self.messages.iter().filter(move |m| m.is_between(a, b))
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Decision;
    use crate::notifications::NotificationQueue;
    use crate::relationships::Relationships;

    struct AllowAll;

    impl FriendshipGate for AllowAll {
        fn is_accepted(&self, _: &Username, _: &Username) -> bool {
            true
        }
    }

    fn friends(a: &Username, b: &Username) -> Relationships {
        let mut rel = Relationships::default();
        let mut notes = NotificationQueue::new();
        rel.request(a, b, &mut notes).unwrap();
        rel.respond(a, b, Decision::Accepted, &mut notes).unwrap();
        rel
    }

    #[test]
    fn test_append_requires_friendship() {
        let (c, d): (Username, Username) = ("carol".into(), "dave".into());
        let mut log = MessageLog::new();

        let err = log
            .append(&Relationships::default(), Message::new(c.clone(), d.clone(), "hi"))
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::NotFriends {
                sender: c.clone(),
                recipient: d.clone()
            }
        );
        assert_eq!(log.conversation(&c, &d).count(), 0);
        assert!(log.is_empty());
    }

    #[test]
    fn test_pending_request_is_not_enough() {
        let (a, b): (Username, Username) = ("alice".into(), "bob".into());
        let mut rel = Relationships::default();
        rel.request(&a, &b, &mut NotificationQueue::new()).unwrap();

        let mut log = MessageLog::new();
        assert!(log.append(&rel, Message::new(a, b, "early")).is_err());
    }

    #[test]
    fn test_both_directions_allowed_once_accepted() {
        let (a, b): (Username, Username) = ("alice".into(), "bob".into());
        let rel = friends(&a, &b);
        let mut log = MessageLog::new();

        log.append(&rel, Message::new(a.clone(), b.clone(), "ping")).unwrap();
        log.append(&rel, Message::new(b.clone(), a.clone(), "pong")).unwrap();

        let contents: Vec<&str> = log.conversation(&b, &a).map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["ping", "pong"]);
    }

    #[test]
    fn test_conversation_filters_other_pairs_and_keeps_order() {
        let (a, b, c): (Username, Username, Username) = ("a".into(), "b".into(), "c".into());
        let mut log = MessageLog::new();

        log.append(&AllowAll, Message::new(a.clone(), b.clone(), "1")).unwrap();
        log.append(&AllowAll, Message::new(a.clone(), c.clone(), "x")).unwrap();
        log.append(&AllowAll, Message::new(b.clone(), a.clone(), "2")).unwrap();
        log.append(&AllowAll, Message::new(c.clone(), b.clone(), "y")).unwrap();
        log.append(&AllowAll, Message::new(a.clone(), b.clone(), "3")).unwrap();

        let ab: Vec<&str> = log.conversation(&a, &b).map(|m| m.content.as_str()).collect();
        assert_eq!(ab, vec!["1", "2", "3"]);
        assert_eq!(log.len(), 5);
    }
}
