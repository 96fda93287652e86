use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::buffer_utils::SseLineParser;
use crate::error::{ProviderError, Result};
use crate::streaming::StreamEvent;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatStreamChunk {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<StreamChoice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamChoice {
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub delta: Delta,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Delta {
    pub role: Option<String>,
    pub content: Option<String>,
}

impl ChatStreamChunk {
    pub fn content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.delta.content.as_deref())
    }

    fn to_stream_events(&self) -> Vec<StreamEvent> {
        let mut events = Vec::new();

        if let Some(choice) = self.choices.first() {
            if let Some(content) = &choice.delta.content {
                if !content.is_empty() {
                    events.push(StreamEvent::Message {
                        content: content.clone(),
                    });
                }
            }

            if let Some(finish_reason) = &choice.finish_reason {
                events.push(StreamEvent::Done {
                    finish_reason: Some(finish_reason.clone()),
                });
            }
        }

        events
    }
}

/// `data:` payload parser for `/chat/completions` streams
pub struct OpenAIChatParser {
    pub(crate) provider: &'static str,
}

impl SseLineParser for OpenAIChatParser {
    fn provider(&self) -> &'static str {
        self.provider
    }

    fn parse_data_line(&self, data: &str) -> Result<Vec<StreamEvent>> {
        let chunk: ChatStreamChunk = serde_json::from_str(data)
            .map_err(|e| ProviderError::invalid_response(self.provider, e, data))?;
        Ok(chunk.to_stream_events())
    }
}

/// Pull the reply text out of a non-streaming completion body.
///
/// Accepts chat-completion choices (string or part-list content), legacy
/// completion `text`, and the `output_text`/`text` convenience fields;
/// anything else is returned as the serialized JSON.
pub fn extract_text(raw: &Value) -> String {
    let Some(obj) = raw.as_object() else {
        return raw.to_string();
    };

    if let Some(first) = obj.get("choices").and_then(Value::as_array).and_then(|c| c.first()) {
        if let Some(content) = first.get("message").and_then(|m| m.get("content")) {
            match content {
                Value::String(text) => return text.clone(),
                Value::Array(parts) if !parts.is_empty() => {
                    return match parts[0].get("text").and_then(Value::as_str) {
                        Some(text) => text.to_string(),
                        None => parts[0].to_string(),
                    };
                }
                _ => {}
            }
        }
        if let Some(text) = first.get("text").and_then(Value::as_str) {
            return text.to_string();
        }
    }

    if let Some(text) = obj.get("output_text").and_then(Value::as_str) {
        return text.to_string();
    }
    if let Some(text) = obj.get("text").and_then(Value::as_str) {
        return text.to_string();
    }

    raw.to_string()
}
