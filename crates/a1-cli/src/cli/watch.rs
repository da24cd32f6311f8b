use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{info, warn};

use a1_core::chat::{HttpChatApi, NotificationClickHandler, NotificationSync};
use a1_core::{select_sink, A1Config, ActivationCallback, Platform};

/// Click hooks for the headless host: nothing to navigate to, so log it.
pub struct LoggingClickHandler;

impl NotificationClickHandler for LoggingClickHandler {
    fn on_notification_clicked(&self, from_username: &str) {
        info!(from = %from_username, "open conversation");
    }

    fn on_group_notification_clicked(&self, group_id: i64) {
        info!(group_id, "open group chat");
    }
}

/// Poll for unread messages until Ctrl-C.
pub async fn run_watch(config: &A1Config, username: Option<String>) -> Result<()> {
    let username = username
        .or_else(|| config.username.clone())
        .context("No username given; pass --username or set \"username\" in the config file")?;

    // Notifier threads report clicks here; they are routed on the runtime
    let (click_tx, mut click_rx) = mpsc::unbounded_channel::<String>();
    let on_activate: ActivationCallback = Arc::new(move |payload: &str| {
        let _ = click_tx.send(payload.to_string());
    });

    let api = HttpChatApi::from_config(config).context("Failed to build HTTP client")?;
    let sink = select_sink(Platform::current(), None, Some(on_activate))
        .context("No notification sink available")?;

    let sync = NotificationSync::from_config(config, Arc::new(api), sink);
    sync.set_click_handler(Arc::new(LoggingClickHandler));
    sync.start(username);

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl-C");
        }
    };
    route_clicks_until(&sync, &mut click_rx, shutdown).await;

    sync.stop();
    let stats = sync.stats();
    info!(
        cycles = stats.cycles,
        dispatched = stats.total_dispatched(),
        suppressed = stats.suppressed,
        "watch finished"
    );
    Ok(())
}

/// Hand clicked-notification payloads to the sync's click hooks until
/// `shutdown` resolves.
async fn route_clicks_until(
    sync: &NotificationSync,
    clicks: &mut mpsc::UnboundedReceiver<String>,
    shutdown: impl Future<Output = ()>,
) {
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            biased;
            Some(payload) = clicks.recv() => {
                sync.handle_click(&payload);
            }
            _ = &mut shutdown => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use a1_core::notify::{NotificationSink, RecordingSink};
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct Clicks {
        opened: Mutex<Vec<String>>,
    }

    impl NotificationClickHandler for Clicks {
        fn on_notification_clicked(&self, from_username: &str) {
            self.opened.lock().unwrap().push(format!("chat with {}", from_username));
        }

        fn on_group_notification_clicked(&self, group_id: i64) {
            self.opened.lock().unwrap().push(format!("group {}", group_id));
        }
    }

    #[tokio::test]
    async fn test_activated_notifications_reach_click_hooks() {
        let api = HttpChatApi::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let sink: Arc<dyn NotificationSink> = Arc::new(RecordingSink::new());
        let sync = NotificationSync::new(Arc::new(api), sink, Duration::from_secs(10), 100);
        let clicks = Arc::new(Clicks::default());
        sync.set_click_handler(clicks.clone());

        let (click_tx, mut click_rx) = mpsc::unbounded_channel::<String>();
        let on_activate: ActivationCallback = Arc::new(move |payload: &str| {
            let _ = click_tx.send(payload.to_string());
        });
        on_activate("chat:dave");
        on_activate("group:7");
        on_activate("bogus");
        drop(on_activate);

        route_clicks_until(&sync, &mut click_rx, std::future::ready(())).await;

        assert_eq!(
            *clicks.opened.lock().unwrap(),
            vec!["chat with dave".to_string(), "group 7".to_string()]
        );
    }

    #[tokio::test]
    async fn test_watch_requires_username() {
        let err = run_watch(&A1Config::default(), None).await.unwrap_err();
        assert!(err.to_string().contains("No username given"));
    }
}
