//! Chat data types.

use crate::{Error, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Originator of a message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Bot,
    System,
}

impl ChatRole {
    /// Whether appending this role while closed counts as unread.
    pub fn counts_as_unread(&self) -> bool {
        !matches!(self, ChatRole::User)
    }
}

/// One turn in the conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub text: String,
    /// Creation time in milliseconds since the Unix epoch
    pub timestamp: i64,
}

impl ChatMessage {
    /// Create a message stamped now, never earlier than `not_before`.
    pub fn new(role: ChatRole, text: impl Into<String>, not_before: Option<i64>) -> Self {
        let now = Utc::now().timestamp_millis();
        Self {
            id: uuid::Uuid::new_v4().simple().to_string(),
            role,
            text: text.into(),
            timestamp: not_before.map_or(now, |last| now.max(last)),
        }
    }
}

/// Canned questions behind the quick prompt chips.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QuickTopic {
    Skills,
    Projects,
    Experience,
    Contact,
}

impl QuickTopic {
    pub const ALL: [QuickTopic; 4] = [
        QuickTopic::Skills,
        QuickTopic::Projects,
        QuickTopic::Experience,
        QuickTopic::Contact,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuickTopic::Skills => "skills",
            QuickTopic::Projects => "projects",
            QuickTopic::Experience => "experience",
            QuickTopic::Contact => "contact",
        }
    }

    /// Dictionary key of the prompt text that gets sent.
    pub fn prompt_key(&self) -> &'static str {
        match self {
            QuickTopic::Skills => "chat.quick.skills",
            QuickTopic::Projects => "chat.quick.projects",
            QuickTopic::Experience => "chat.quick.experience",
            QuickTopic::Contact => "chat.quick.contact",
        }
    }

    /// Dictionary key of the chip label.
    pub fn label_key(&self) -> &'static str {
        match self {
            QuickTopic::Skills => "chat.quick.skillsLabel",
            QuickTopic::Projects => "chat.quick.projectsLabel",
            QuickTopic::Experience => "chat.quick.experienceLabel",
            QuickTopic::Contact => "chat.quick.contactLabel",
        }
    }
}

impl fmt::Display for QuickTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for QuickTopic {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        QuickTopic::ALL
            .into_iter()
            .find(|topic| topic.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| Error::UnknownTopic(s.to_string()))
    }
}

/// Snapshot of the chat session.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct SessionState {
    pub is_open: bool,
    pub typing: bool,
    pub messages: Vec<ChatMessage>,
    pub unread: u32,
}

/// Change notifications for renderers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    MessageAppended(ChatMessage),
    TypingChanged(bool),
    VisibilityChanged(bool),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_ids_unique() {
        let a = ChatMessage::new(ChatRole::User, "hi", None);
        let b = ChatMessage::new(ChatRole::User, "hi", None);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_timestamp_not_before_previous() {
        let future = Utc::now().timestamp_millis() + 60_000;
        let msg = ChatMessage::new(ChatRole::Bot, "later", Some(future));
        assert_eq!(msg.timestamp, future);
    }

    #[test]
    fn test_role_serialization() {
        let msg = ChatMessage {
            id: "abc".to_string(),
            role: ChatRole::Bot,
            text: "Hello!".to_string(),
            timestamp: 1_700_000_000_000,
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(
            json,
            r#"{"id":"abc","role":"bot","text":"Hello!","timestamp":1700000000000}"#
        );
    }

    #[test]
    fn test_quick_topic_parse() {
        assert_eq!("skills".parse::<QuickTopic>().unwrap(), QuickTopic::Skills);
        assert_eq!(" Contact ".parse::<QuickTopic>().unwrap(), QuickTopic::Contact);
        assert!(matches!(
            "hobbies".parse::<QuickTopic>(),
            Err(Error::UnknownTopic(_))
        ));
    }

    #[test]
    fn test_unread_roles() {
        assert!(!ChatRole::User.counts_as_unread());
        assert!(ChatRole::Bot.counts_as_unread());
        assert!(ChatRole::System.counts_as_unread());
    }
}
