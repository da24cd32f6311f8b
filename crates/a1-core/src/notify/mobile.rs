use std::sync::Arc;

use parking_lot::RwLock;

use super::{NotificationSink, NotifyError};
use crate::models::NotificationRequest;

/// Implemented by the mobile shell, which owns the platform notification
/// APIs. Called from a background thread.
pub trait MobileNotificationHost: Send + Sync {
    fn show_notification(&self, id: i64, title: &str, body: &str, payload: &str);
}

/// Forwards notifications to the registered mobile host.
pub struct MobileSink {
    host: RwLock<Option<Arc<dyn MobileNotificationHost>>>,
}

impl MobileSink {
    pub fn new(host: Arc<dyn MobileNotificationHost>) -> Self {
        Self {
            host: RwLock::new(Some(host)),
        }
    }

    /// Replace the host, e.g. after the activity was recreated
    pub fn set_host(&self, host: Arc<dyn MobileNotificationHost>) {
        *self.host.write() = Some(host);
    }

    /// Detach the host on logout; later dispatches fail until a new one is set
    pub fn clear_host(&self) {
        *self.host.write() = None;
    }
}

impl NotificationSink for MobileSink {
    fn dispatch(&self, request: &NotificationRequest) -> Result<(), NotifyError> {
        let host = self.host.read().clone().ok_or(NotifyError::HostUnavailable)?;
        host.show_notification(
            request.notification_id,
            &request.title,
            &request.body,
            &request.payload(),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NotificationRoute;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct FakeHost {
        shown: Mutex<Vec<(i64, String, String, String)>>,
    }

    impl MobileNotificationHost for FakeHost {
        fn show_notification(&self, id: i64, title: &str, body: &str, payload: &str) {
            self.shown
                .lock()
                .push((id, title.to_string(), body.to_string(), payload.to_string()));
        }
    }

    #[test]
    fn test_forwards_to_host() {
        let host = Arc::new(FakeHost::default());
        let sink = MobileSink::new(host.clone());
        let request = NotificationRequest {
            notification_id: 9,
            title: "New message from dave".to_string(),
            body: "hello".to_string(),
            route: NotificationRoute::Direct {
                username: "dave".to_string(),
            },
        };

        sink.dispatch(&request).unwrap();
        let shown = host.shown.lock();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].0, 9);
        assert_eq!(shown[0].3, "chat:dave");
    }

    #[test]
    fn test_cleared_host_fails() {
        let sink = MobileSink::new(Arc::new(FakeHost::default()));
        sink.clear_host();
        let request = NotificationRequest {
            notification_id: 1,
            title: String::new(),
            body: String::new(),
            route: NotificationRoute::Group { group_id: 1 },
        };
        assert!(matches!(
            sink.dispatch(&request),
            Err(NotifyError::HostUnavailable)
        ));
    }
}
