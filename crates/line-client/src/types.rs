//! LINE Messaging API types.

use serde::{Deserialize, Serialize};

/// Max characters LINE accepts for an action label.
pub const MAX_ACTION_LABEL: usize = 20;

/// Max items in a quick reply bar.
pub const MAX_QUICK_REPLY_ITEMS: usize = 13;

// ==================== INBOUND ====================

/// Webhook request body.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookBody {
    /// Bot user ID that received the events.
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub events: Vec<Event>,
}

/// A single webhook event.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Event {
    /// User added the bot as a friend (or unblocked it).
    Follow {
        #[serde(rename = "replyToken")]
        reply_token: String,
        source: Source,
    },
    /// User blocked the bot.
    Unfollow { source: Source },
    Message {
        #[serde(rename = "replyToken")]
        reply_token: String,
        source: Source,
        message: EventMessage,
    },
    #[serde(other)]
    Unsupported,
}

impl Event {
    /// Event type name, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Follow { .. } => "follow",
            Event::Unfollow { .. } => "unfollow",
            Event::Message { .. } => "message",
            Event::Unsupported => "unsupported",
        }
    }
}

/// Event source.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
}

/// Message payload of a message event.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EventMessage {
    Text {
        #[serde(default)]
        id: Option<String>,
        text: String,
    },
    #[serde(other)]
    Other,
}

impl EventMessage {
    /// Text content, if this is a text message.
    pub fn text(&self) -> Option<&str> {
        match self {
            EventMessage::Text { text, .. } => Some(text),
            EventMessage::Other => None,
        }
    }
}

// ==================== OUTBOUND ====================

/// Outgoing message object.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Message {
    Text {
        text: String,
        #[serde(rename = "quickReply", skip_serializing_if = "Option::is_none")]
        quick_reply: Option<QuickReply>,
    },
    Flex {
        #[serde(rename = "altText")]
        alt_text: String,
        /// Bubble or carousel container.
        contents: serde_json::Value,
    },
}

impl Message {
    pub fn text(text: impl Into<String>) -> Self {
        Message::Text {
            text: text.into(),
            quick_reply: None,
        }
    }

    pub fn flex(alt_text: impl Into<String>, contents: serde_json::Value) -> Self {
        Message::Flex {
            alt_text: alt_text.into(),
            contents,
        }
    }

    /// Attach quick reply buttons to a text message. Items past the
    /// platform limit are dropped. Flex messages are returned unchanged.
    pub fn with_quick_reply(self, actions: Vec<Action>) -> Self {
        match self {
            Message::Text { text, .. } => Message::Text {
                text,
                quick_reply: Some(QuickReply {
                    items: actions
                        .into_iter()
                        .take(MAX_QUICK_REPLY_ITEMS)
                        .map(QuickReplyItem::new)
                        .collect(),
                }),
            },
            flex => flex,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QuickReply {
    pub items: Vec<QuickReplyItem>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QuickReplyItem {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub action: Action,
}

impl QuickReplyItem {
    pub fn new(action: Action) -> Self {
        Self {
            kind: "action",
            action,
        }
    }
}

/// Message action: tapping sends `text` back as a user message.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Action {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub label: String,
    pub text: String,
}

impl Action {
    pub fn message(label: &str, text: impl Into<String>) -> Self {
        Self {
            kind: "message",
            label: truncate_label(label),
            text: text.into(),
        }
    }
}

/// Cut a label to the platform limit on character (not byte) boundaries.
pub fn truncate_label(label: &str) -> String {
    label.chars().take(MAX_ACTION_LABEL).collect()
}

/// Push message request.
#[derive(Debug, Clone, Serialize)]
pub struct PushRequest<'a> {
    pub to: &'a str,
    pub messages: &'a [Message],
}

/// Reply message request.
#[derive(Debug, Clone, Serialize)]
pub struct ReplyRequest<'a> {
    #[serde(rename = "replyToken")]
    pub reply_token: &'a str,
    pub messages: &'a [Message],
}

/// User profile.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub user_id: String,
    pub display_name: String,
    #[serde(default)]
    pub picture_url: Option<String>,
    #[serde(default)]
    pub status_message: Option<String>,
}
