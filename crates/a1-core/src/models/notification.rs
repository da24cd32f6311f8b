use std::fmt;

use crate::constants::routes;

/// Which of the two polled message classes a message came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageChannel {
    Direct,
    Group,
}

impl fmt::Display for MessageChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageChannel::Direct => write!(f, "direct"),
            MessageChannel::Group => write!(f, "group"),
        }
    }
}

/// Where a click on a notification should take the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationRoute {
    Direct { username: String },
    Group { group_id: i64 },
}

impl NotificationRoute {
    /// Encode as the opaque payload string attached to a platform notification
    pub fn to_payload(&self) -> String {
        match self {
            NotificationRoute::Direct { username } => {
                format!("{}{}", routes::DIRECT_PREFIX, username)
            }
            NotificationRoute::Group { group_id } => {
                format!("{}{}", routes::GROUP_PREFIX, group_id)
            }
        }
    }

    pub fn from_payload(payload: &str) -> Option<Self> {
        if let Some(username) = payload.strip_prefix(routes::DIRECT_PREFIX) {
            if username.is_empty() {
                return None;
            }
            return Some(NotificationRoute::Direct {
                username: username.to_string(),
            });
        }
        payload
            .strip_prefix(routes::GROUP_PREFIX)
            .and_then(|id| id.parse().ok())
            .map(|group_id| NotificationRoute::Group { group_id })
    }
}

/// What gets handed to a [`crate::notify::NotificationSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub notification_id: i64,
    pub title: String,
    pub body: String,
    pub route: NotificationRoute,
}

impl NotificationRequest {
    pub fn payload(&self) -> String {
        self.route.to_payload()
    }
}
