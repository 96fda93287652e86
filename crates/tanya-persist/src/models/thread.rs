use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A conversation owned by exactly one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thread {
    pub id: Uuid,
    pub user_id: String,
    /// `None` until generated or set explicitly
    pub title: Option<String>,
    pub system_instruction: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewThread {
    #[serde(default)]
    pub title: Option<String>,
    pub system_instruction: String,
}

impl NewThread {
    pub fn new(system_instruction: impl Into<String>) -> Self {
        Self {
            title: None,
            system_instruction: system_instruction.into(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Partial update; `None` fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThreadUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub system_instruction: Option<String>,
}

impl ThreadUpdate {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            system_instruction: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.system_instruction.is_none()
    }
}
