//! Application-wide constants
//!
//! Centralized location for endpoint paths, defaults and limits that are
//! shared between the core and the CLI.

/// Default REST API root for the A1 Tools backend
pub const API_BASE_URL: &str = "https://a1chimney.com/api";

/// Directory name under the platform config dir
pub const CONFIG_DIR_NAME: &str = "a1-tools";
pub const CONFIG_FILE_NAME: &str = "config.json";

// Polling defaults
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// How many notified message ids each seen-set remembers
pub const SEEN_SET_CAPACITY: usize = 100;

/// Added to group message ids when a single platform notification id is
/// needed, so they never collide with direct message ids.
pub const GROUP_NOTIFICATION_ID_OFFSET: i64 = 1_000_000;

/// Sender name the backend uses for join/leave and other generated messages
pub const SYSTEM_USERNAME: &str = "system";

/// Notification bodies are cut to this many characters
pub const MAX_NOTIFICATION_BODY_CHARS: usize = 100;

// Chat endpoints (relative to API_BASE_URL)
pub mod endpoints {
    pub const CHAT: &str = "chat";
    pub const CHAT_GROUPS: &str = "chat_groups";
    pub const ACTION_GET_UNREAD: &str = "get_unread";
    pub const ACTION_GET_UNREAD_ALL: &str = "get_unread_all";
}

// Routing payload prefixes understood by the click handler
pub mod routes {
    pub const DIRECT_PREFIX: &str = "chat:";
    pub const GROUP_PREFIX: &str = "group:";
}

/// WordPress REST path for posts
pub const WORDPRESS_POSTS_PATH: &str = "wp-json/wp/v2/posts";
