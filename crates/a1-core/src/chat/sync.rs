//! Unread-message poller
//!
//! Polls the direct and group unread endpoints on a fixed interval and turns
//! each message it has not seen before into exactly one notification. There
//! is no server-side "notified" flag; the seen-sets below are the only
//! record, so they are in-memory and a restart notifies again.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::client::{ChatApi, ChatError};
use crate::config::A1Config;
use crate::constants::{
    GROUP_NOTIFICATION_ID_OFFSET, MAX_NOTIFICATION_BODY_CHARS, SYSTEM_USERNAME,
};
use crate::models::{InboundMessage, MessageChannel, NotificationRequest, NotificationRoute};
use crate::notify::NotificationSink;
use crate::stats::{PollStats, SharedPollStats};
use crate::store::SeenIdSet;

/// Host hooks invoked when the user activates a notification.
pub trait NotificationClickHandler: Send + Sync {
    fn on_notification_clicked(&self, from_username: &str);
    fn on_group_notification_clicked(&self, group_id: i64);
}

/// Result of one poll cycle
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PollOutcome {
    pub direct_dispatched: usize,
    pub group_dispatched: usize,
    pub direct_error: Option<String>,
    pub group_error: Option<String>,
}

struct SyncState {
    api: Arc<dyn ChatApi>,
    sink: Arc<dyn NotificationSink>,
    click_handler: RwLock<Option<Arc<dyn NotificationClickHandler>>>,
    username: RwLock<Option<String>>,
    seen_direct: Mutex<SeenIdSet>,
    seen_group: Mutex<SeenIdSet>,
    stats: SharedPollStats,
}

struct PollTask {
    cancel_tx: watch::Sender<bool>,
    _handle: JoinHandle<()>,
}

pub struct NotificationSync {
    state: Arc<SyncState>,
    interval: Duration,
    task: Mutex<Option<PollTask>>,
}

impl NotificationSync {
    pub fn new(
        api: Arc<dyn ChatApi>,
        sink: Arc<dyn NotificationSink>,
        interval: Duration,
        seen_capacity: usize,
    ) -> Self {
        Self {
            state: Arc::new(SyncState {
                api,
                sink,
                click_handler: RwLock::new(None),
                username: RwLock::new(None),
                seen_direct: Mutex::new(SeenIdSet::with_capacity(seen_capacity)),
                seen_group: Mutex::new(SeenIdSet::with_capacity(seen_capacity)),
                stats: SharedPollStats::new(),
            }),
            interval,
            task: Mutex::new(None),
        }
    }

    pub fn from_config(
        config: &A1Config,
        api: Arc<dyn ChatApi>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self::new(api, sink, config.poll_interval(), config.seen_capacity)
    }

    pub fn set_click_handler(&self, handler: Arc<dyn NotificationClickHandler>) {
        *self.state.click_handler.write() = Some(handler);
    }

    pub fn clear_click_handler(&self) {
        *self.state.click_handler.write() = None;
    }

    pub fn is_running(&self) -> bool {
        self.task.lock().is_some()
    }

    pub fn username(&self) -> Option<String> {
        self.state.username.read().clone()
    }

    pub fn stats(&self) -> PollStats {
        self.state.stats.snapshot()
    }

    /// Start polling as `username`: one check right away, then one per
    /// interval. Calling this while running restarts with the new username.
    /// Switching to another user forgets what the previous one was notified
    /// about. Must be called from inside a tokio runtime.
    pub fn start(&self, username: impl Into<String>) {
        let username = username.into();
        let mut task = self.task.lock();
        if let Some(previous) = task.take() {
            let _ = previous.cancel_tx.send(true);
        }

        let previous_user = self.state.username.write().replace(username.clone());
        if previous_user.is_some_and(|previous| previous != username) {
            self.state.seen_direct.lock().clear();
            self.state.seen_group.lock().clear();
            debug!("user changed, seen-sets cleared");
        }
        info!(username = %username, interval_secs = self.interval.as_secs(), "starting notification sync");

        let (cancel_tx, cancel_rx) = watch::channel(false);
        let handle = tokio::spawn(run_poll_loop(self.state.clone(), self.interval, cancel_rx));
        *task = Some(PollTask {
            cancel_tx,
            _handle: handle,
        });
    }

    /// Stop the timer. A poll already in flight still completes and its
    /// notifications are still dispatched.
    pub fn stop(&self) {
        if let Some(task) = self.task.lock().take() {
            let _ = task.cancel_tx.send(true);
            info!("notification sync stopped");
        }
    }

    /// Run one poll cycle now.
    pub async fn check_for_new_messages(&self) -> PollOutcome {
        self.state.check_for_new_messages().await
    }

    /// Route a clicked notification's payload to the host hooks. Returns
    /// false when the payload is not one of ours or no handler is set.
    pub fn handle_click(&self, payload: &str) -> bool {
        let Some(route) = NotificationRoute::from_payload(payload) else {
            warn!(payload = %payload, "ignoring click with unknown payload");
            return false;
        };
        let handler = self.state.click_handler.read().clone();
        let Some(handler) = handler else {
            debug!(payload = %payload, "notification clicked with no handler registered");
            return false;
        };

        match route {
            NotificationRoute::Direct { username } => handler.on_notification_clicked(&username),
            NotificationRoute::Group { group_id } => {
                handler.on_group_notification_clicked(group_id)
            }
        }
        true
    }
}

impl Drop for NotificationSync {
    fn drop(&mut self) {
        if let Some(task) = self.task.get_mut().take() {
            let _ = task.cancel_tx.send(true);
        }
    }
}

async fn run_poll_loop(
    state: Arc<SyncState>,
    interval: Duration,
    mut cancel_rx: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            changed = cancel_rx.changed() => {
                if changed.is_err() || *cancel_rx.borrow() {
                    break;
                }
            }
            _ = ticker.tick() => {
                // Each poll runs on its own task so a slow server does not
                // hold back the timer. Overlapping polls are harmless because
                // the seen-sets drop duplicates.
                let state = state.clone();
                tokio::spawn(async move {
                    state.check_for_new_messages().await;
                });
            }
        }
    }
    debug!("poll loop exited");
}

impl SyncState {
    async fn check_for_new_messages(&self) -> PollOutcome {
        let username = self.username.read().clone();
        let Some(username) = username else {
            debug!("skipping poll, no user");
            return PollOutcome::default();
        };

        let (direct, group) = futures::join!(
            self.api.fetch_unread_direct(&username),
            self.api.fetch_unread_groups(&username)
        );

        let mut outcome = PollOutcome::default();
        match direct {
            Ok(messages) => {
                outcome.direct_dispatched = self.process(MessageChannel::Direct, messages, &username)
            }
            Err(e) => outcome.direct_error = Some(self.record_failure(MessageChannel::Direct, e)),
        }
        match group {
            Ok(messages) => {
                outcome.group_dispatched = self.process(MessageChannel::Group, messages, &username)
            }
            Err(e) => outcome.group_error = Some(self.record_failure(MessageChannel::Group, e)),
        }

        self.stats.update(PollStats::record_cycle);
        outcome
    }

    fn record_failure(&self, channel: MessageChannel, error: ChatError) -> String {
        warn!(channel = %channel, error = %error, "unread poll failed");
        self.stats.update(|s| s.record_failure(channel));
        error.to_string()
    }

    fn process(
        &self,
        channel: MessageChannel,
        messages: Vec<InboundMessage>,
        username: &str,
    ) -> usize {
        let mut dispatched = 0;

        for message in messages {
            if channel == MessageChannel::Group
                && (message.from_username == SYSTEM_USERNAME || message.from_username == username)
            {
                self.stats.update(|s| s.suppressed += 1);
                continue;
            }

            let is_new = match channel {
                MessageChannel::Direct => self.seen_direct.lock().insert(message.id),
                MessageChannel::Group => self.seen_group.lock().insert(message.id),
            };
            if !is_new {
                continue;
            }

            let request = build_request(channel, &message);
            debug!(channel = %channel, id = message.id, "dispatching notification");
            match self.sink.dispatch(&request) {
                Ok(()) => {
                    dispatched += 1;
                    self.stats.update(|s| s.record_dispatch(channel));
                }
                Err(e) => {
                    // Stays in the seen-set; a failed banner is not retried
                    warn!(channel = %channel, id = message.id, error = %e, "notification dispatch failed");
                    self.stats.update(|s| s.dispatch_errors += 1);
                }
            }
        }

        dispatched
    }
}

/// Title, body and route for a message.
pub fn build_request(channel: MessageChannel, message: &InboundMessage) -> NotificationRequest {
    match channel {
        MessageChannel::Direct => {
            let body = if message.text.trim().is_empty() && message.has_attachment {
                match &message.attachment_name {
                    Some(name) => format!("📎 {}", name),
                    None => "📎 Attachment".to_string(),
                }
            } else {
                message.text.clone()
            };
            NotificationRequest {
                notification_id: message.id,
                title: format!("New message from {}", message.from_username),
                body: truncate_body(&body),
                route: NotificationRoute::Direct {
                    username: message.from_username.clone(),
                },
            }
        }
        MessageChannel::Group => NotificationRequest {
            notification_id: message.id.saturating_add(GROUP_NOTIFICATION_ID_OFFSET),
            title: message.group_name.clone().unwrap_or_default(),
            body: truncate_body(&format!("{}: {}", message.display_name, message.text)),
            route: NotificationRoute::Group {
                group_id: message.group_id.unwrap_or_default(),
            },
        },
    }
}

fn truncate_body(body: &str) -> String {
    if body.chars().count() <= MAX_NOTIFICATION_BODY_CHARS {
        return body.to_string();
    }
    let cut: String = body.chars().take(MAX_NOTIFICATION_BODY_CHARS).collect();
    format!("{}...", cut)
}
