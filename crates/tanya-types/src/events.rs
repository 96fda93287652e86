use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One frame of a chat or voice event stream.
///
/// A stream is `thread_created?`, then `transcript`/`chunk` content, then an
/// optional `title_generated`, and ends with exactly one of `done` or `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    /// A new thread was created for this turn
    ThreadCreated {
        thread_id: Uuid,
    },

    /// Speech-to-text result for the uploaded audio
    Transcript {
        content: String,
    },

    /// Reply fragment (streamed token-by-token)
    Chunk {
        content: String,
    },

    TitleGenerated {
        title: String,
    },

    /// Turn completed; carries the full reply
    Done {
        content: String,
    },

    /// Fatal error, nothing follows
    Error {
        content: String,
    },
}

impl ChatEvent {
    pub fn chunk(content: impl Into<String>) -> Self {
        Self::Chunk {
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self::Error {
            content: content.into(),
        }
    }

    /// `done` and `error` close the stream
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done { .. } | Self::Error { .. })
    }

    /// Type tag as it appears on the wire
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ThreadCreated { .. } => "thread_created",
            Self::Transcript { .. } => "transcript",
            Self::Chunk { .. } => "chunk",
            Self::TitleGenerated { .. } => "title_generated",
            Self::Done { .. } => "done",
            Self::Error { .. } => "error",
        }
    }

    /// JSON payload for an SSE `data:` line
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(r#"{{"type":"error","content":"serialization failed: {}"}}"#, e)
        })
    }
}
