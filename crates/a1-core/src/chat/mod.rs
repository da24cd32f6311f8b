pub mod client;
pub mod sync;

pub use client::{ChatApi, ChatError, HttpChatApi};
pub use sync::{build_request, NotificationClickHandler, NotificationSync, PollOutcome};
