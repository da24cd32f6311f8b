pub mod chat;
pub mod delta;
pub mod notification;

pub use chat::{
    DirectMessageRecord, DirectUnreadResponse, GroupMessageRecord, GroupUnreadResponse,
    InboundMessage,
};
pub use delta::{Attributes, Block, Insert, ListKind, Op};
pub use notification::{MessageChannel, NotificationRequest, NotificationRoute};
