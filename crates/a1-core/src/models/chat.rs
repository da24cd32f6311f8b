use serde::{Deserialize, Deserializer};

/// Response of `GET /chat?action=get_unread`
#[derive(Debug, Clone, Deserialize)]
pub struct DirectUnreadResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub messages: Vec<DirectMessageRecord>,
}

/// Response of `GET /chat_groups?action=get_unread_all`
#[derive(Debug, Clone, Deserialize)]
pub struct GroupUnreadResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub messages: Vec<GroupMessageRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectMessageRecord {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: i64,
    pub from_username: String,
    /// Null for attachment-only messages
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub attachment_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroupMessageRecord {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: i64,
    #[serde(deserialize_with = "deserialize_id")]
    pub group_id: i64,
    #[serde(default)]
    pub group_name: Option<String>,
    pub from_username: String,
    #[serde(default)]
    pub from_display_name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A message read from a poll response. Lives only long enough to produce
/// zero or one notification.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    pub id: i64,
    pub from_username: String,
    pub display_name: String,
    pub text: String,
    pub has_attachment: bool,
    pub attachment_name: Option<String>,
    pub group_id: Option<i64>,
    pub group_name: Option<String>,
}

impl InboundMessage {
    pub fn is_group(&self) -> bool {
        self.group_id.is_some()
    }
}

impl From<DirectMessageRecord> for InboundMessage {
    fn from(record: DirectMessageRecord) -> Self {
        let attachment_name = record.attachment_name.filter(|name| !name.is_empty());
        Self {
            id: record.id,
            display_name: record.from_username.clone(),
            from_username: record.from_username,
            text: record.message.unwrap_or_default(),
            has_attachment: attachment_name.is_some(),
            attachment_name,
            group_id: None,
            group_name: None,
        }
    }
}

impl From<GroupMessageRecord> for InboundMessage {
    fn from(record: GroupMessageRecord) -> Self {
        let display_name = record
            .from_display_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| record.from_username.clone());
        Self {
            id: record.id,
            from_username: record.from_username,
            display_name,
            text: record.message.unwrap_or_default(),
            has_attachment: false,
            attachment_name: None,
            group_id: Some(record.group_id),
            group_name: Some(record.group_name.unwrap_or_default()),
        }
    }
}

/// The backend is PHP and serializes ids as either numbers or numeric strings.
fn deserialize_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(id) => Ok(id),
        RawId::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid message id: {text:?}"))),
    }
}
