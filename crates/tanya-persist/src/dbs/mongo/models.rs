use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PersistError;
use crate::models::{Message, MessageRole, Thread};

/// MongoDB-specific Thread model (ids stored as hyphenated UUID strings)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoThread {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub title: Option<String>,
    pub system_instruction: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

/// MongoDB-specific Message model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoMessage {
    #[serde(rename = "_id")]
    pub id: String,
    pub thread_id: String,
    pub role: MessageRole,
    pub content: String,
    pub audio_url: Option<String>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

fn parse_id(field: &str, raw: &str) -> Result<Uuid, PersistError> {
    Uuid::parse_str(raw).map_err(|e| PersistError::Corrupt(format!("{} '{}': {}", field, raw, e)))
}

// Conversions between database-agnostic and MongoDB-specific models

impl From<Thread> for MongoThread {
    fn from(thread: Thread) -> Self {
        Self {
            id: thread.id.to_string(),
            user_id: thread.user_id,
            title: thread.title,
            system_instruction: thread.system_instruction,
            created_at: thread.created_at,
            updated_at: thread.updated_at,
        }
    }
}

impl TryFrom<MongoThread> for Thread {
    type Error = PersistError;

    fn try_from(thread: MongoThread) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_id("thread id", &thread.id)?,
            user_id: thread.user_id,
            title: thread.title,
            system_instruction: thread.system_instruction,
            created_at: thread.created_at,
            updated_at: thread.updated_at,
        })
    }
}

impl From<Message> for MongoMessage {
    fn from(msg: Message) -> Self {
        Self {
            id: msg.id.to_string(),
            thread_id: msg.thread_id.to_string(),
            role: msg.role,
            content: msg.content,
            audio_url: msg.audio_url,
            created_at: msg.created_at,
        }
    }
}

impl TryFrom<MongoMessage> for Message {
    type Error = PersistError;

    fn try_from(msg: MongoMessage) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_id("message id", &msg.id)?,
            thread_id: parse_id("thread id", &msg.thread_id)?,
            role: msg.role,
            content: msg.content,
            audio_url: msg.audio_url,
            created_at: msg.created_at,
        })
    }
}
