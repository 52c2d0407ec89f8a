//! In-app notifications

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Structured notification payload.
///
/// The backend stores it as JSON; some endpoints send it as an object, others
/// as a JSON-encoded string, and older rows hold plain text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationMessage {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NotificationMessage {
    /// Text to display in a notification list
    pub fn summary(&self) -> &str {
        self.message
            .as_deref()
            .or(self.title.as_deref())
            .unwrap_or("")
    }
}

fn deserialize_message<'de, D>(deserializer: D) -> Result<NotificationMessage, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(message_from_value(value))
}

fn message_from_value(value: Value) -> NotificationMessage {
    match value {
        Value::Object(_) => serde_json::from_value(value).unwrap_or_default(),
        Value::String(text) => match serde_json::from_str::<Value>(&text) {
            Ok(inner @ Value::Object(_)) => serde_json::from_value(inner).unwrap_or_default(),
            _ => NotificationMessage {
                message: Some(text),
                ..Default::default()
            },
        },
        _ => NotificationMessage::default(),
    }
}

/// Notification record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub public_id: String,
    #[serde(deserialize_with = "deserialize_message")]
    pub message: NotificationMessage,
    #[serde(default)]
    pub is_read: bool,
    pub related_event_public_id: Option<String>,
    pub related_reservation_public_id: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unread_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreadCount {
    pub count: u64,
}
