#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use tanya_api::auth::StaticSessionValidator;
use tanya_api::build_router;
use tanya_api::config::Config;
use tanya_api::state::AppState;
use tanya_chat::{ChatOrchestrator, VoiceAssistant, VoiceSettings};
use tanya_llm::{
    ChatClient, ChatRequest, ChatResponse, EventStream, ProviderError, StreamEvent,
    TranscriptionClient, TranscriptionRequest,
};
use tanya_persist::{InMemoryPersistenceClient, PersistenceClient};

pub const ANI_TOKEN: &str = "token-ani";
pub const ANI: &str = "user-ani";
pub const BUDI_TOKEN: &str = "token-budi";
pub const BUDI: &str = "user-budi";

pub const BOUNDARY: &str = "tanya-test-boundary";

/// Replays fixed fragments; `chat` answers with `reply`
#[derive(Default)]
pub struct ScriptedChatClient {
    pub fragments: Vec<String>,
    pub reply: String,
    pub fail_mid_stream: bool,
    pub requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedChatClient {
    pub fn new(fragments: &[&str], reply: &str) -> Self {
        Self {
            fragments: fragments.iter().map(|f| f.to_string()).collect(),
            reply: reply.to_string(),
            ..Default::default()
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
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
        Ok(ChatResponse {
            content: Some(self.reply.clone()),
            usage: None,
            finish_reason: Some("stop".to_string()),
            raw: serde_json::json!({ "choices": [{ "message": { "content": self.reply } }] }),
        })
    }

    async fn chat_stream(&self, request: ChatRequest) -> tanya_llm::Result<EventStream> {
        self.requests.lock().unwrap().push(request);

        let mut events: Vec<tanya_llm::Result<StreamEvent>> = self
            .fragments
            .iter()
            .map(|f| Ok(StreamEvent::Message { content: f.clone() }))
            .collect();
        if self.fail_mid_stream {
            events.push(Err(ProviderError::Stream("connection reset".to_string())));
        } else {
            events.push(Ok(StreamEvent::Done { finish_reason: None }));
        }
        Ok(Box::pin(futures::stream::iter(events)))
    }
}

pub struct FixedTranscriber {
    pub transcript: Option<String>,
    pub calls: Mutex<Vec<TranscriptionRequest>>,
}

impl FixedTranscriber {
    pub fn new(transcript: &str) -> Self {
        Self {
            transcript: Some(transcript.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            transcript: None,
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TranscriptionClient for FixedTranscriber {
    async fn transcribe(&self, request: TranscriptionRequest) -> tanya_llm::Result<String> {
        self.calls.lock().unwrap().push(request);
        self.transcript.clone().ok_or_else(|| ProviderError::Http {
            provider: "Groq",
            status: 400,
            body: "could not process file".to_string(),
        })
    }
}

pub struct TestApp {
    pub router: Router,
    pub persist: Arc<InMemoryPersistenceClient>,
    pub llm: Arc<ScriptedChatClient>,
    pub voice_llm: Arc<ScriptedChatClient>,
    pub stt: Arc<FixedTranscriber>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_clients(
            ScriptedChatClient::new(&["Celengan adalah ", "produk investasi ", "Amartha."], "Produk Celengan Amartha"),
            FixedTranscriber::new("apa itu celengan"),
        )
    }

    pub fn with_clients(llm: ScriptedChatClient, stt: FixedTranscriber) -> Self {
        let persist = Arc::new(InMemoryPersistenceClient::new());
        let llm = Arc::new(llm);
        let stt = Arc::new(stt);
        let voice_llm = Arc::new(ScriptedChatClient::new(
            &["Celengan ", "mulai Rp10.000."],
            "Celengan adalah investasi mulai Rp10.000.",
        ));

        let orchestrator = ChatOrchestrator::builder()
            .llm_client(llm.clone())
            .persistence(persist.clone())
            .model("gemini-2.5-flash")
            .default_system_prompt("Anda adalah Asisten Customer Service Amartha.")
            .build()
            .unwrap();

        let voice = VoiceAssistant::new(
            stt.clone(),
            voice_llm.clone(),
            VoiceSettings::new("whisper-large-v3", "llama-test", "Jawab singkat."),
        );

        let auth = StaticSessionValidator::default()
            .with_token(ANI_TOKEN, ANI)
            .with_token(BUDI_TOKEN, BUDI);

        let persist_dyn: Arc<dyn PersistenceClient> = persist.clone();
        let state = AppState::new(
            Config::default(),
            persist_dyn,
            orchestrator,
            voice,
            Arc::new(auth),
        );

        Self {
            router: build_router(Arc::new(state)),
            persist,
            llm,
            voice_llm,
            stt,
        }
    }

    pub async fn call(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Create a thread through the API and return its id
    pub async fn create_thread(&self, token: &str, title: Option<&str>) -> String {
        let body = serde_json::json!({
            "title": title,
            "system_instruction": "Anda adalah Asisten Customer Service Amartha.",
        });
        let response = self
            .call(json_request("POST", "/api/v1/chat/threads", token, &body))
            .await;
        assert_eq!(response.status(), 201);
        body_json(response).await["id"].as_str().unwrap().to_string()
    }
}

pub fn get(uri: &str, token: &str) -> Request<Body> {
    Request::get(uri)
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

pub fn delete(uri: &str, token: &str) -> Request<Body> {
    Request::delete(uri)
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, token: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        filename: &'a str,
        content_type: &'a str,
        data: &'a [u8],
    },
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                filename,
                content_type,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                        name, filename, content_type
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_request(uri: &str, token: &str, parts: &[Part<'_>]) -> Request<Body> {
    Request::post(uri)
        .header("authorization", format!("Bearer {}", token))
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Collect the JSON payload of every `data:` frame
pub async fn sse_events(response: Response<Body>) -> Vec<Value> {
    let body = String::from_utf8(body_bytes(response).await).unwrap();
    body.split("\n\n")
        .filter_map(|frame| {
            frame
                .lines()
                .find_map(|line| line.strip_prefix("data:"))
                .map(|data| serde_json::from_str(data.trim_start()).unwrap())
        })
        .collect()
}

pub fn event_types(events: &[Value]) -> Vec<String> {
    events
        .iter()
        .map(|e| e["type"].as_str().unwrap_or_default().to_string())
        .collect()
}
