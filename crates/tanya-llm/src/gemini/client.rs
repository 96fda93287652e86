// Gemini client implementation (generateContent REST API)

use crate::buffer_utils::parse_sse_stream;
use crate::error::{ProviderError, Result};
use crate::gemini::chunks::{GeminiChunk, GeminiParser};
use crate::traits::{ChatClient, ChatOptions, ChatRequest, ChatResponse, EventStream, TokenUsage};
use crate::types::{Content, ContentPart, Message};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::{json, Value};
use std::time::Duration;

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

const PROVIDER: &str = "Gemini";

/// Text part sent alongside audio when the user typed nothing
pub const AUDIO_ONLY_PROMPT: &str = "Please process this audio and respond appropriately.";

pub struct GeminiClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder().api_key(api_key).build()
    }

    pub fn builder() -> GeminiClientBuilder {
        GeminiClientBuilder::default()
    }

    /// Build the `generateContent` body.
    ///
    /// System messages are merged into `system_instruction`; the remaining
    /// turns become `contents` with `user`/`model` roles.
    fn build_request(&self, messages: Vec<Message>, options: &ChatOptions) -> Value {
        let mut system_texts = Vec::new();
        let mut contents = Vec::new();

        for message in messages {
            match message {
                Message::System { content } => system_texts.push(content.joined_text()),
                Message::Human { content } => contents.push(json!({
                    "role": "user",
                    "parts": convert_parts(content),
                })),
                Message::AI { content } => contents.push(json!({
                    "role": "model",
                    "parts": convert_parts(content),
                })),
            }
        }

        let mut request = json!({ "contents": contents });
        let Some(obj) = request.as_object_mut() else {
            return request;
        };

        if !system_texts.is_empty() {
            obj.insert(
                "system_instruction".to_string(),
                json!({ "parts": [{ "text": system_texts.join("\n\n") }] }),
            );
        }

        let mut generation_config = serde_json::Map::new();
        if let Some(temp) = options.temperature {
            generation_config.insert("temperature".to_string(), json!(temp));
        }
        if let Some(max_tokens) = options.max_tokens {
            generation_config.insert("maxOutputTokens".to_string(), json!(max_tokens));
        }
        if !generation_config.is_empty() {
            obj.insert("generationConfig".to_string(), Value::Object(generation_config));
        }

        request
    }

    async fn post(&self, url: String, payload: &Value) -> Result<reqwest::Response> {
        let response = self
            .http_client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| ProviderError::network(PROVIDER, e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status, body = %body, "Gemini request failed");
            return Err(ProviderError::Http {
                provider: PROVIDER,
                status,
                body,
            });
        }

        Ok(response)
    }
}

fn convert_parts(content: Content) -> Vec<Value> {
    match content {
        Content::Text(text) => vec![json!({ "text": text })],
        Content::Parts(parts) => {
            let has_audio = parts
                .iter()
                .any(|part| matches!(part, ContentPart::InlineAudio { .. }));
            let mut converted: Vec<Value> = parts
                .into_iter()
                .filter_map(|part| match part {
                    ContentPart::Text { text } if has_audio && text.trim().is_empty() => None,
                    ContentPart::Text { text } => Some(json!({ "text": text })),
                    ContentPart::InlineAudio { mime_type, data } => Some(json!({
                        "inline_data": {
                            "mime_type": mime_type,
                            "data": BASE64.encode(data),
                        }
                    })),
                })
                .collect();

            if has_audio && converted.iter().all(|part| part.get("text").is_none()) {
                converted.push(json!({ "text": AUDIO_ONLY_PROMPT }));
            }
            converted
        }
    }
}

#[async_trait]
impl ChatClient for GeminiClient {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let payload = self.build_request(request.messages, &request.options);
        let url = format!("{}/models/{}:generateContent", self.base_url, request.model);

        let response = self.post(url, &payload).await?;
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::network(PROVIDER, e))?;
        let raw: Value = serde_json::from_str(&body)
            .map_err(|e| ProviderError::invalid_response(PROVIDER, e, &body))?;
        let parsed: GeminiChunk = serde_json::from_value(raw.clone())
            .map_err(|e| ProviderError::invalid_response(PROVIDER, e, &body))?;

        Ok(ChatResponse {
            content: Some(parsed.text()),
            usage: parsed.usage_metadata.as_ref().map(|u| TokenUsage {
                input_tokens: u.prompt_token_count,
                output_tokens: u.candidates_token_count,
                total_tokens: u.total_token_count,
            }),
            finish_reason: parsed.finish_reason().map(str::to_string),
            raw,
        })
    }

    async fn chat_stream(&self, request: ChatRequest) -> Result<EventStream> {
        let payload = self.build_request(request.messages, &request.options);
        let url = format!(
            "{}/models/{}:streamGenerateContent?alt=sse",
            self.base_url, request.model
        );

        tracing::debug!(model = %request.model, "Opening Gemini stream");
        let response = self.post(url, &payload).await?;
        Ok(parse_sse_stream(response, GeminiParser))
    }
}

#[derive(Default)]
pub struct GeminiClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl GeminiClientBuilder {
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<GeminiClient> {
        let api_key = self
            .api_key
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ProviderError::Config("Gemini API key is required".to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(&api_key)
                .map_err(|_| ProviderError::Config("Invalid API key format".to_string()))?,
        );

        let mut http = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }
        let http_client = http
            .build()
            .map_err(|e| ProviderError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(GeminiClient {
            http_client,
            base_url: self
                .base_url
                .unwrap_or_else(|| GEMINI_API_BASE.to_string())
                .trim_end_matches('/')
                .to_string(),
        })
    }
}
