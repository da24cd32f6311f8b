use parking_lot::Mutex;

use super::{NotificationSink, NotifyError};
use crate::models::NotificationRequest;

/// Keeps dispatched notifications in memory. Used by hosts that draw their
/// own in-app banners and by tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    requests: Mutex<Vec<NotificationRequest>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatched(&self) -> Vec<NotificationRequest> {
        self.requests.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.lock().is_empty()
    }

    /// Drain everything recorded so far
    pub fn take(&self) -> Vec<NotificationRequest> {
        std::mem::take(&mut *self.requests.lock())
    }
}

impl NotificationSink for RecordingSink {
    fn dispatch(&self, request: &NotificationRequest) -> Result<(), NotifyError> {
        tracing::info!(
            id = request.notification_id,
            title = %request.title,
            payload = %request.payload(),
            "notification"
        );
        self.requests.lock().push(request.clone());
        Ok(())
    }
}
