// OpenAI-compatible client implementation (Groq by default)

use crate::buffer_utils::parse_sse_stream;
use crate::error::{ProviderError, Result};
use crate::openai::chunks::{extract_text, OpenAIChatParser};
use crate::traits::{
    ChatClient, ChatOptions, ChatRequest, ChatResponse, EventStream, TokenUsage,
    TranscriptionClient, TranscriptionRequest,
};
use crate::types::{Content, ContentPart, Message};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;
use std::time::Duration;

pub const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_STT_MODEL: &str = "whisper-large-v3";

const PROVIDER: &str = "Groq";

/// OpenAI-compatible client (HTTP direct, no SDK)
///
/// Serves chat completions and audio transcriptions from the same base URL.
pub struct OpenAIClient {
    http_client: reqwest::Client,
    base_url: String,
    stt_model: String,
}

impl OpenAIClient {
    /// Create new client with API key against the Groq endpoint
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder().api_key(api_key).build()
    }

    pub fn builder() -> OpenAIClientBuilder {
        OpenAIClientBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build chat completion request payload
    fn build_chat_request(
        &self,
        model: &str,
        messages: Vec<Message>,
        options: &ChatOptions,
        stream: bool,
    ) -> Value {
        let openai_messages: Vec<Value> = messages
            .into_iter()
            .map(|msg| self.convert_message(msg))
            .collect();

        let mut request = serde_json::json!({
            "model": model,
            "messages": openai_messages,
            "stream": stream,
        });

        if let Some(obj) = request.as_object_mut() {
            if let Some(temp) = options.temperature {
                obj.insert("temperature".to_string(), serde_json::json!(temp));
            }
            if let Some(max_tokens) = options.max_tokens {
                obj.insert("max_tokens".to_string(), serde_json::json!(max_tokens));
            }
        }

        request
    }

    /// Convert our Message type to OpenAI format
    fn convert_message(&self, message: Message) -> Value {
        let role = message.role().to_string();
        let content = match message {
            Message::System { content } | Message::Human { content } | Message::AI { content } => {
                self.convert_content(content)
            }
        };

        serde_json::json!({
            "role": role,
            "content": content,
        })
    }

    /// Convert Content to OpenAI format (string or array)
    ///
    /// Chat completions do not take raw audio, so audio parts are dropped
    /// and the caller is expected to transcribe first.
    fn convert_content(&self, content: Content) -> Value {
        match content {
            Content::Text(s) => serde_json::json!(s),
            Content::Parts(parts) => {
                let converted: Vec<Value> = parts
                    .into_iter()
                    .filter_map(|part| match part {
                        ContentPart::Text { text } => Some(serde_json::json!({
                            "type": "text",
                            "text": text,
                        })),
                        ContentPart::InlineAudio { .. } => {
                            tracing::debug!("Dropping inline audio part for chat completions");
                            None
                        }
                    })
                    .collect();
                serde_json::json!(converted)
            }
        }
    }

    async fn post_chat(&self, payload: &Value) -> Result<reqwest::Response> {
        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .json(payload)
            .send()
            .await
            .map_err(|e| ProviderError::network(PROVIDER, e))?;

        ensure_success(response).await
    }
}

/// Turn a non-2xx response into `ProviderError::Http`
async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    tracing::error!(status, body = %body, "{} request failed", PROVIDER);
    Err(ProviderError::Http {
        provider: PROVIDER,
        status,
        body,
    })
}

#[async_trait]
impl ChatClient for OpenAIClient {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let payload = self.build_chat_request(
            &request.model,
            request.messages,
            &request.options,
            false,
        );

        let response = self.post_chat(&payload).await?;
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::network(PROVIDER, e))?;
        let raw: Value = serde_json::from_str(&body)
            .map_err(|e| ProviderError::invalid_response(PROVIDER, e, &body))?;

        let choice = raw.get("choices").and_then(|c| c.get(0));
        let usage = raw.get("usage").and_then(|u| {
            Some(TokenUsage {
                input_tokens: u.get("prompt_tokens")?.as_u64()? as u32,
                output_tokens: u.get("completion_tokens")?.as_u64()? as u32,
                total_tokens: u.get("total_tokens")?.as_u64()? as u32,
            })
        });

        Ok(ChatResponse {
            content: Some(extract_text(&raw)),
            usage,
            finish_reason: choice
                .and_then(|c| c.get("finish_reason"))
                .and_then(Value::as_str)
                .map(str::to_string),
            raw,
        })
    }

    async fn chat_stream(&self, request: ChatRequest) -> Result<EventStream> {
        let payload = self.build_chat_request(
            &request.model,
            request.messages,
            &request.options,
            true,
        );

        let response = self.post_chat(&payload).await?;
        Ok(parse_sse_stream(response, OpenAIChatParser { provider: PROVIDER }))
    }
}

#[async_trait]
impl TranscriptionClient for OpenAIClient {
    async fn transcribe(&self, request: TranscriptionRequest) -> Result<String> {
        let model = request.model.unwrap_or_else(|| self.stt_model.clone());
        let size = request.audio.len();

        let file_part = reqwest::multipart::Part::bytes(request.audio)
            .file_name(request.filename)
            .mime_str(&request.mime_type)
            .map_err(|e| ProviderError::Config(format!("Invalid audio MIME type: {}", e)))?;
        let form = reqwest::multipart::Form::new()
            .text("model", model.clone())
            .part("file", file_part);

        tracing::debug!(model = %model, bytes = size, "Sending audio for transcription");

        let response = self
            .http_client
            .post(format!("{}/audio/transcriptions", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| ProviderError::network(PROVIDER, e))?;
        let response = ensure_success(response).await?;

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::network(PROVIDER, e))?;
        let json: Value = serde_json::from_str(&body)
            .map_err(|e| ProviderError::invalid_response(PROVIDER, e, &body))?;

        let transcript = ["text", "transcript"]
            .iter()
            .filter_map(|key| json.get(*key).and_then(Value::as_str))
            .find(|text| !text.is_empty())
            .unwrap_or_default()
            .to_string();

        Ok(transcript)
    }
}

#[derive(Default)]
pub struct OpenAIClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    stt_model: Option<String>,
    timeout: Option<Duration>,
}

impl OpenAIClientBuilder {
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn stt_model(mut self, model: impl Into<String>) -> Self {
        self.stt_model = Some(model.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<OpenAIClient> {
        let api_key = self
            .api_key
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ProviderError::Config("API key is required".to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|_| ProviderError::Config("Invalid API key format".to_string()))?,
        );

        let mut http = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }
        let http_client = http
            .build()
            .map_err(|e| ProviderError::Config(format!("Failed to create HTTP client: {}", e)))?;

        let base_url = self
            .base_url
            .unwrap_or_else(|| GROQ_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(OpenAIClient {
            http_client,
            base_url,
            stt_model: self.stt_model.unwrap_or_else(|| DEFAULT_STT_MODEL.to_string()),
        })
    }
}
