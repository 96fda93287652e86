use serde::Deserialize;

use crate::buffer_utils::SseLineParser;
use crate::error::{ProviderError, Result};
use crate::streaming::StreamEvent;

/// One `GenerateContentResponse` as emitted by `streamGenerateContent?alt=sse`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiChunk {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
    #[serde(default)]
    pub total_token_count: u32,
}

impl GeminiChunk {
    /// Concatenated text of the first candidate
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }

    pub fn finish_reason(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|c| c.finish_reason.as_deref())
    }

    fn to_stream_events(&self) -> Vec<StreamEvent> {
        let mut events = Vec::new();

        let text = self.text();
        if !text.is_empty() {
            events.push(StreamEvent::Message { content: text });
        }

        if let Some(reason) = self.finish_reason() {
            events.push(StreamEvent::Done {
                finish_reason: Some(reason.to_string()),
            });
        }

        events
    }
}

/// `data:` payload parser for Gemini SSE streams
pub struct GeminiParser;

impl SseLineParser for GeminiParser {
    fn provider(&self) -> &'static str {
        "Gemini"
    }

    fn parse_data_line(&self, data: &str) -> Result<Vec<StreamEvent>> {
        let chunk: GeminiChunk = serde_json::from_str(data)
            .map_err(|e| ProviderError::invalid_response(self.provider(), e, data))?;
        Ok(chunk.to_stream_events())
    }
}
