//! End-to-end "Apa itu Celengan?" conversation against a mocked Gemini
//! endpoint, exercising the real provider client and SSE parsing.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use mockito::Matcher;
use tanya_api::{auth::StaticSessionValidator, build_router, config::Config, state::AppState};
use tanya_chat::{ChatOrchestrator, VoiceAssistant, VoiceSettings};
use tanya_llm::{ClientFactory, GeminiConfig, ProviderConfig, ProviderDetails};
use tanya_persist::{InMemoryPersistenceClient, PersistenceClient};
use tower::ServiceExt;

use common::{body_json, event_types, get, multipart_request, sse_events, FixedTranscriber, Part, ScriptedChatClient};

const TOKEN: &str = "token-siti";

#[tokio::test]
async fn test_apa_itu_celengan() {
    let mut server = mockito::Server::new_async().await;

    let stream_body = concat!(
        "data: {\"candidates\":[{\"content\":{\"role\":\"model\",\"parts\":[{\"text\":\"Celengan adalah platform investasi \"}]}}]}\r\n\r\n",
        "data: {\"candidates\":[{\"content\":{\"role\":\"model\",\"parts\":[{\"text\":\"mulai dari Rp10.000.\"}]},\"finishReason\":\"STOP\"}]}\r\n\r\n",
    );
    let stream_mock = server
        .mock("POST", "/models/gemini-2.5-flash:streamGenerateContent")
        .match_query(Matcher::UrlEncoded("alt".into(), "sse".into()))
        .match_header("x-goog-api-key", "gemini-test-key")
        .match_body(Matcher::PartialJsonString(
            r#"{"contents":[{"role":"user","parts":[{"text":"Apa itu Celengan?"}]}]}"#.to_string(),
        ))
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(stream_body)
        .create_async()
        .await;

    let title_mock = server
        .mock("POST", "/models/gemini-2.5-flash:generateContent")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Produk Celengan Amartha\n"}]},"finishReason":"STOP"}]}"#,
        )
        .create_async()
        .await;

    let persist = Arc::new(InMemoryPersistenceClient::new());
    let llm = ClientFactory::create_client(ProviderConfig {
        details: ProviderDetails::Gemini(
            GeminiConfig::new("gemini-test-key").with_base_url(server.url()),
        ),
    })
    .unwrap();

    let orchestrator = ChatOrchestrator::builder()
        .llm_client(llm)
        .persistence(persist.clone())
        .model("gemini-2.5-flash")
        .default_system_prompt(tanya_api::templates::SYSTEM_INSTRUCTION)
        .build()
        .unwrap();
    let voice = VoiceAssistant::new(
        Arc::new(FixedTranscriber::new("unused")),
        Arc::new(ScriptedChatClient::new(&[], "unused")),
        VoiceSettings::new("whisper-large-v3", "llama", "unused"),
    );
    let auth = StaticSessionValidator::default().with_token(TOKEN, "user-siti");

    let persist_dyn: Arc<dyn PersistenceClient> = persist.clone();
    let state = AppState::new(Config::default(), persist_dyn, orchestrator, voice, Arc::new(auth));
    let router = build_router(Arc::new(state));

    let response = router
        .clone()
        .oneshot(multipart_request(
            "/api/v1/chat/send",
            TOKEN,
            &[Part::Text("message", "Apa itu Celengan?")],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let events = sse_events(response).await;
    assert_eq!(
        event_types(&events),
        vec!["thread_created", "chunk", "chunk", "title_generated", "done"]
    );
    assert_eq!(events[3]["title"], "Produk Celengan Amartha");
    assert_eq!(
        events[4]["content"],
        "Celengan adalah platform investasi mulai dari Rp10.000."
    );
    stream_mock.assert_async().await;
    title_mock.assert_async().await;

    let thread_id = events[0]["thread_id"].as_str().unwrap();
    let response = router
        .oneshot(get(&format!("/api/v1/chat/threads/{}", thread_id), TOKEN))
        .await
        .unwrap();
    let body = body_json(response).await;

    assert_eq!(body["thread"]["user_id"], "user-siti");
    assert_eq!(body["thread"]["title"], "Produk Celengan Amartha");
    assert!(body["thread"]["system_instruction"]
        .as_str()
        .unwrap()
        .starts_with("Anda adalah Asisten Customer Service Amartha"));

    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "user");
    assert_eq!(messages[0]["content"], "Apa itu Celengan?");
    assert_eq!(messages[1]["role"], "assistant");
    assert_eq!(
        messages[1]["content"],
        "Celengan adalah platform investasi mulai dari Rp10.000."
    );
}
