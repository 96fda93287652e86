#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tanya_llm::{
    ChatClient, ChatRequest, ChatResponse, EventStream, ProviderError, StreamEvent,
    TranscriptionClient, TranscriptionRequest,
};
use tanya_types::ChatEvent;
use tokio::sync::mpsc;

/// Chat client that replays scripted fragments and records every request
#[derive(Default)]
pub struct ScriptedChatClient {
    pub fragments: Vec<String>,
    /// Error yielded after the fragments instead of `Done`
    pub fail_mid_stream: bool,
    /// `chat_stream` fails before returning a stream
    pub fail_on_open: bool,
    pub title: Option<String>,
    pub requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedChatClient {
    pub fn replying(fragments: &[&str]) -> Self {
        Self {
            fragments: fragments.iter().map(|f| f.to_string()).collect(),
            title: Some("Produk Celengan Amartha".to_string()),
            ..Default::default()
        }
    }

    pub fn recorded(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatClient for ScriptedChatClient {
    fn provider(&self) -> &'static str {
        "Scripted"
    }

    async fn chat(&self, request: ChatRequest) -> tanya_llm::Result<ChatResponse> {
        self.requests.lock().unwrap().push(request);
        match &self.title {
            Some(title) => Ok(ChatResponse {
                content: Some(title.clone()),
                usage: None,
                finish_reason: Some("stop".to_string()),
                raw: serde_json::json!({ "choices": [{ "message": { "content": title } }] }),
            }),
            None => Err(ProviderError::Http {
                provider: "Scripted",
                status: 500,
                body: "title backend down".to_string(),
            }),
        }
    }

    async fn chat_stream(&self, request: ChatRequest) -> tanya_llm::Result<EventStream> {
        self.requests.lock().unwrap().push(request);
        if self.fail_on_open {
            return Err(ProviderError::Http {
                provider: "Scripted",
                status: 503,
                body: "overloaded".to_string(),
            });
        }

        let mut events: Vec<tanya_llm::Result<StreamEvent>> = self
            .fragments
            .iter()
            .map(|f| Ok(StreamEvent::Message { content: f.clone() }))
            .collect();
        if self.fail_mid_stream {
            events.push(Err(ProviderError::Stream("connection reset".to_string())));
        } else {
            events.push(Ok(StreamEvent::Done {
                finish_reason: Some("stop".to_string()),
            }));
        }

        Ok(Box::pin(futures::stream::iter(events)))
    }
}

pub struct FixedTranscriber {
    pub transcript: Option<String>,
    pub models: Mutex<Vec<Option<String>>>,
}

impl FixedTranscriber {
    pub fn new(transcript: &str) -> Self {
        Self {
            transcript: Some(transcript.to_string()),
            models: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            transcript: None,
            models: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TranscriptionClient for FixedTranscriber {
    async fn transcribe(&self, request: TranscriptionRequest) -> tanya_llm::Result<String> {
        self.models.lock().unwrap().push(request.model);
        self.transcript.clone().ok_or_else(|| ProviderError::Http {
            provider: "Groq",
            status: 400,
            body: "invalid media".to_string(),
        })
    }
}

pub async fn drain(mut rx: mpsc::Receiver<ChatEvent>) -> Vec<ChatEvent> {
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    events
}

pub fn arc<T>(value: T) -> Arc<T> {
    Arc::new(value)
}
