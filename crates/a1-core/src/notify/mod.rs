//! Platform notification dispatch
//!
//! The poller only knows the [`NotificationSink`] capability. Which sink is
//! used is decided once at startup by [`select_sink`] and injected.

mod desktop;
mod mobile;
mod recording;

use std::sync::Arc;

pub use desktop::DesktopSink;
pub use mobile::{MobileNotificationHost, MobileSink};
pub use recording::RecordingSink;

use crate::models::NotificationRequest;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Failed to launch notifier `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("No notification host registered")]
    HostUnavailable,

    #[error("Desktop notifications are not supported on {0:?}")]
    Unsupported(Platform),
}

/// Called with a notification's routing payload when the user activates it.
pub type ActivationCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Something that can show a notification to the user.
pub trait NotificationSink: Send + Sync {
    fn dispatch(&self, request: &NotificationRequest) -> Result<(), NotifyError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    MacOs,
    Windows,
    Android,
    Ios,
    Other,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "android") {
            Platform::Android
        } else if cfg!(target_os = "ios") {
            Platform::Ios
        } else if cfg!(target_os = "linux") {
            Platform::Linux
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Other
        }
    }

    pub fn is_mobile(&self) -> bool {
        matches!(self, Platform::Android | Platform::Ios)
    }
}

/// Pick the sink for a platform. Mobile platforms need the host callback
/// that actually posts the notification; unknown platforms get an in-memory
/// sink so the poller still runs headless. `on_activate` receives the routing
/// payload of clicked desktop notifications where the notifier reports them.
pub fn select_sink(
    platform: Platform,
    mobile_host: Option<Arc<dyn MobileNotificationHost>>,
    on_activate: Option<ActivationCallback>,
) -> Result<Arc<dyn NotificationSink>, NotifyError> {
    match platform {
        Platform::Android | Platform::Ios => {
            let host = mobile_host.ok_or(NotifyError::HostUnavailable)?;
            Ok(Arc::new(MobileSink::new(host)))
        }
        Platform::Linux | Platform::MacOs | Platform::Windows => {
            let sink = match on_activate {
                Some(callback) => DesktopSink::with_activation(platform, callback),
                None => DesktopSink::new(platform),
            };
            Ok(Arc::new(sink))
        }
        Platform::Other => {
            tracing::warn!("no native notifier for this platform, recording notifications in memory");
            Ok(Arc::new(RecordingSink::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NotificationRoute;

    fn request() -> NotificationRequest {
        NotificationRequest {
            notification_id: 1,
            title: "t".to_string(),
            body: "b".to_string(),
            route: NotificationRoute::Group { group_id: 1 },
        }
    }

    #[test]
    fn test_mobile_requires_host() {
        assert!(matches!(
            select_sink(Platform::Android, None, None),
            Err(NotifyError::HostUnavailable)
        ));
    }

    #[test]
    fn test_other_platform_records() {
        let sink = select_sink(Platform::Other, None, None).unwrap();
        assert!(sink.dispatch(&request()).is_ok());
    }

    #[test]
    fn test_current_platform_is_consistent() {
        let platform = Platform::current();
        if cfg!(target_os = "linux") {
            assert_eq!(platform, Platform::Linux);
            assert!(!platform.is_mobile());
        }
    }
}
