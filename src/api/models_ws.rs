use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::relay::Fragment;

#[derive(Debug, Deserialize)]
pub struct WsClientMessage {
    pub r#type: String, // Expected: "subscribe"
    #[serde(rename = "conversationId")]
    pub conversation_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct WsSubscribedEvent {
    pub r#type: &'static str,
    #[serde(rename = "conversationId")]
    pub conversation_id: Uuid,
}

impl WsSubscribedEvent {
    pub fn new(conversation_id: Uuid) -> Self {
        Self {
            r#type: "subscribed",
            conversation_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WsTokenEvent {
    pub r#type: &'static str,
    #[serde(rename = "messageId")]
    pub message_id: Uuid,
    pub content: String,
    #[serde(rename = "isFinal")]
    pub is_final: bool,
}

impl From<Fragment> for WsTokenEvent {
    fn from(fragment: Fragment) -> Self {
        Self {
            r#type: "token",
            message_id: fragment.message_id,
            content: fragment.content,
            is_final: fragment.is_final,
        }
    }
}
