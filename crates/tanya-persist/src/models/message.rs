use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// Immutable, append-only turn of a thread.
///
/// Ids are UUID v7, so `(created_at, id)` is a strict order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub thread_id: Uuid,
    pub role: MessageRole,
    pub content: String,
    pub audio_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewMessage {
    pub thread_id: Uuid,
    pub role: MessageRole,
    pub content: String,
    pub audio_url: Option<String>,
}

impl NewMessage {
    pub fn user(thread_id: Uuid, content: impl Into<String>) -> Self {
        Self {
            thread_id,
            role: MessageRole::User,
            content: content.into(),
            audio_url: None,
        }
    }

    pub fn assistant(thread_id: Uuid, content: impl Into<String>) -> Self {
        Self {
            thread_id,
            role: MessageRole::Assistant,
            content: content.into(),
            audio_url: None,
        }
    }

    pub fn with_audio_url(mut self, audio_url: Option<String>) -> Self {
        self.audio_url = audio_url;
        self
    }

    /// Stamp id and creation time
    pub(crate) fn into_message(self, created_at: DateTime<Utc>) -> Message {
        Message {
            id: Uuid::now_v7(),
            thread_id: self.thread_id,
            role: self.role,
            content: self.content,
            audio_url: self.audio_url,
            created_at,
        }
    }
}
