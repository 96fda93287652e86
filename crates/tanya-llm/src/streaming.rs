use futures::StreamExt;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::traits::EventStream;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Text fragment of the reply
    Message {
        content: String,
    },

    Done {
        #[serde(skip_serializing_if = "Option::is_none")]
        finish_reason: Option<String>,
    },
}

/// Drain a stream into the full reply text.
///
/// Stops at the first error or at `Done`.
pub async fn collect_stream(mut stream: EventStream) -> Result<String> {
    let mut full_response = String::new();

    while let Some(event) = stream.next().await {
        match event? {
            StreamEvent::Message { content } => full_response.push_str(&content),
            StreamEvent::Done { .. } => break,
        }
    }

    Ok(full_response)
}
