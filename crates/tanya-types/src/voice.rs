use serde::{Deserialize, Serialize};

/// Non-streaming result of a speech turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceReply {
    pub transcript: String,
    /// Provider response body as returned
    pub llm_raw: serde_json::Value,
    pub llm_text: String,
}
