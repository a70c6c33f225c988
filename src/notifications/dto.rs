use serde::{Deserialize, Serialize};

use super::repo_types::Notification;

#[derive(Debug, Deserialize)]
pub struct SendNotificationRequest {
    pub message: String,
    pub receiver_id: i64,
}

/// The caller's inbox split by read state.
#[derive(Debug, Serialize)]
pub struct Inbox {
    pub unread: Vec<Notification>,
    pub read: Vec<Notification>,
}

impl From<Vec<Notification>> for Inbox {
    fn from(all: Vec<Notification>) -> Self {
        let (read, unread) = all.into_iter().partition(|n| n.is_read);
        Self { unread, read }
    }
}
