use vesper_store::{Notification, NotificationId};

use crate::error::Result;
use crate::session::Session;
use crate::state::{lock, SharedState};

/// This session's notifications, oldest first.
pub fn list_notifications(state: &SharedState, session: &Session) -> Result<Vec<Notification>> {
    let guard = lock(state)?;
    Ok(guard
        .notifications
        .for_recipient(session.username())
        .cloned()
        .collect())
}

pub fn dismiss_notification(
    state: &SharedState,
    session: &Session,
    id: NotificationId,
) -> Result<Notification> {
    let mut guard = lock(state)?;
    Ok(guard.notifications.dismiss(session.username(), id)?)
}
