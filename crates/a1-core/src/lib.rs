pub mod blog;
pub mod chat;
pub mod config;
pub mod constants;
pub mod models;
pub mod notify;
pub mod stats;
pub mod store;
pub mod tracing_setup;

pub use blog::{convert, convert_json, SeoAnalyzer, WordPressClient};
pub use chat::{HttpChatApi, NotificationSync};
pub use config::A1Config;
pub use notify::{select_sink, ActivationCallback, NotificationSink, Platform};
