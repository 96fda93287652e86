mod common;

use std::sync::Arc;

use common::{drain, ScriptedChatClient};
use tanya_chat::{
    AudioInput, ChatError, ChatOrchestrator, SendInput, AUDIO_MESSAGE_PLACEHOLDER,
};
use tanya_llm::{Content, ContentPart, Message};
use tanya_persist::{InMemoryPersistenceClient, MessageRole, NewThread, PersistenceClient};
use tanya_types::ChatEvent;
use uuid::Uuid;

const DEFAULT_PROMPT: &str = "Kamu adalah asisten CS Amartha.";

fn orchestrator(
    llm: Arc<ScriptedChatClient>,
    persist: Arc<InMemoryPersistenceClient>,
) -> ChatOrchestrator {
    ChatOrchestrator::builder()
        .llm_client(llm)
        .persistence(persist)
        .model("gemini-2.5-flash")
        .default_system_prompt(DEFAULT_PROMPT)
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_new_thread_event_order() {
    let llm = Arc::new(ScriptedChatClient::replying(&["Celengan adalah ", "tabungan harian."]));
    let persist = Arc::new(InMemoryPersistenceClient::new());
    let chat = orchestrator(llm.clone(), persist.clone());

    let turn = chat.prepare(SendInput::text("alice", "Apa itu Celengan?")).await.unwrap();
    let thread_id = turn.thread.id;
    let events = drain(chat.spawn_stream(turn)).await;

    assert_eq!(events.first(), Some(&ChatEvent::ThreadCreated { thread_id }));
    assert_eq!(
        events.last(),
        Some(&ChatEvent::Done { content: "Celengan adalah tabungan harian.".to_string() })
    );
    let titles: Vec<usize> = events
        .iter()
        .enumerate()
        .filter(|(_, e)| matches!(e, ChatEvent::TitleGenerated { .. }))
        .map(|(i, _)| i)
        .collect();
    assert_eq!(titles, vec![events.len() - 2]);
    assert_eq!(
        events.iter().filter(|e| matches!(e, ChatEvent::Chunk { .. })).count(),
        2
    );

    let messages = persist.get_messages(thread_id).await.unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, MessageRole::User);
    assert_eq!(messages[0].content, "Apa itu Celengan?");
    assert_eq!(messages[1].role, MessageRole::Assistant);
    assert_eq!(messages[1].content, "Celengan adalah tabungan harian.");

    let thread = persist.get_thread(thread_id, "alice").await.unwrap().unwrap();
    assert_eq!(thread.title.as_deref(), Some("Produk Celengan Amartha"));
    assert_eq!(thread.system_instruction, DEFAULT_PROMPT);
}

#[tokio::test]
async fn test_continuing_thread_sends_history_and_skips_title() {
    let llm = Arc::new(ScriptedChatClient::replying(&["Bisa, kak."]));
    let persist = Arc::new(InMemoryPersistenceClient::new());
    let chat = orchestrator(llm.clone(), persist.clone());

    let first = chat.prepare(SendInput::text("alice", "Halo")).await.unwrap();
    let thread_id = first.thread.id;
    drain(chat.spawn_stream(first)).await;

    let turn = chat
        .prepare(SendInput::text("alice", "Bisa tarik dana?").in_thread(thread_id))
        .await
        .unwrap();
    let events = drain(chat.spawn_stream(turn)).await;

    assert!(events.iter().all(|e| !matches!(
        e,
        ChatEvent::ThreadCreated { .. } | ChatEvent::TitleGenerated { .. }
    )));
    assert!(matches!(events.last(), Some(ChatEvent::Done { .. })));

    let requests = llm.recorded();
    let last_stream = requests
        .iter()
        .rev()
        .find(|r| r.model == "gemini-2.5-flash" && r.messages.len() > 1)
        .unwrap();
    let roles: Vec<&str> = last_stream.messages.iter().map(Message::role).collect();
    assert_eq!(roles, vec!["system", "user", "assistant", "user"]);
    assert_eq!(last_stream.messages[3].content().as_text(), Some("Bisa tarik dana?"));

    assert_eq!(persist.get_messages(thread_id).await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_other_users_thread_is_not_found() {
    let llm = Arc::new(ScriptedChatClient::replying(&["x"]));
    let persist = Arc::new(InMemoryPersistenceClient::new());
    let chat = orchestrator(llm, persist.clone());

    let thread = persist
        .create_thread("alice", NewThread::new(DEFAULT_PROMPT))
        .await
        .unwrap();

    let err = chat
        .prepare(SendInput::text("mallory", "hi").in_thread(thread.id))
        .await
        .unwrap_err();
    assert!(matches!(err, ChatError::NotFound(_)));
    assert!(persist.get_messages(thread.id).await.unwrap().is_empty());

    let err = chat
        .prepare(SendInput::text("alice", "hi").in_thread(Uuid::new_v4()))
        .await
        .unwrap_err();
    assert!(matches!(err, ChatError::NotFound(_)));
}

#[tokio::test]
async fn test_empty_input_is_rejected_before_persistence() {
    let llm = Arc::new(ScriptedChatClient::replying(&["x"]));
    let persist = Arc::new(InMemoryPersistenceClient::new());
    let chat = orchestrator(llm.clone(), persist.clone());

    let input = SendInput {
        user_id: "alice".to_string(),
        thread_id: None,
        message: Some("   ".to_string()),
        audio: None,
    };
    let err = chat.prepare(input).await.unwrap_err();

    assert!(matches!(err, ChatError::Validation(_)));
    assert!(persist.list_threads("alice", 50, 0).await.unwrap().is_empty());
    assert!(llm.recorded().is_empty());
}

#[tokio::test]
async fn test_audio_only_turn() {
    let llm = Arc::new(ScriptedChatClient::replying(&["Saya dengar Anda."]));
    let persist = Arc::new(InMemoryPersistenceClient::new());
    let chat = orchestrator(llm.clone(), persist.clone());

    let input = SendInput {
        user_id: "alice".to_string(),
        thread_id: None,
        message: None,
        audio: Some(AudioInput::new(None, "audio/wav", b"RIFFdata".to_vec())),
    };
    let turn = chat.prepare(input).await.unwrap();
    let thread_id = turn.thread.id;
    drain(chat.spawn_stream(turn)).await;

    let messages = persist.get_messages(thread_id).await.unwrap();
    assert_eq!(messages[0].content, AUDIO_MESSAGE_PLACEHOLDER);
    let url = messages[0].audio_url.clone().unwrap();
    let key = url.strip_prefix("/api/v1/chat/audio/").unwrap();
    assert!(key.starts_with(&format!("alice/{}/", thread_id)));
    assert!(key.ends_with("-audio.wav"));
    assert_eq!(persist.load_audio(key).await.unwrap().unwrap().data, b"RIFFdata");

    let stream_request = &llm.recorded()[0];
    match stream_request.messages.last().unwrap().content() {
        Content::Parts(parts) => {
            assert!(matches!(&parts[0], ContentPart::InlineAudio { mime_type, .. } if mime_type == "audio/wav"));
        }
        Content::Text(_) => panic!("Expected inline audio part"),
    }
}

#[tokio::test]
async fn test_second_recording_keeps_first_reference() {
    let llm = Arc::new(ScriptedChatClient::replying(&["Baik."]));
    let persist = Arc::new(InMemoryPersistenceClient::new());
    let chat = orchestrator(llm, persist.clone());

    let recording = |data: &[u8]| AudioInput::new(None, "audio/wav", data.to_vec());
    let first = chat
        .prepare(SendInput {
            user_id: "alice".to_string(),
            thread_id: None,
            message: None,
            audio: Some(recording(b"FIRST")),
        })
        .await
        .unwrap();
    let thread_id = first.thread.id;
    let first_url = first.user_message.audio_url.clone().unwrap();
    drain(chat.spawn_stream(first)).await;

    let second = chat
        .prepare(SendInput {
            user_id: "alice".to_string(),
            thread_id: Some(thread_id),
            message: None,
            audio: Some(recording(b"SECOND")),
        })
        .await
        .unwrap();
    let second_url = second.user_message.audio_url.clone().unwrap();
    drain(chat.spawn_stream(second)).await;

    assert_ne!(first_url, second_url);
    let load = |url: &str| {
        let key = url.trim_start_matches("/api/v1/chat/audio/").to_string();
        let persist = persist.clone();
        async move { persist.load_audio(&key).await.unwrap().unwrap().data }
    };
    assert_eq!(load(&first_url).await, b"FIRST".to_vec());
    assert_eq!(load(&second_url).await, b"SECOND".to_vec());

    let messages = persist.get_messages(thread_id).await.unwrap();
    let urls: Vec<_> = messages.iter().filter_map(|m| m.audio_url.clone()).collect();
    assert_eq!(urls, vec![first_url, second_url]);
}

#[tokio::test]
async fn test_mid_stream_failure_emits_single_error() {
    let mut script = ScriptedChatClient::replying(&["partial"]);
    script.fail_mid_stream = true;
    let llm = Arc::new(script);
    let persist = Arc::new(InMemoryPersistenceClient::new());
    let chat = orchestrator(llm, persist.clone());

    let turn = chat.prepare(SendInput::text("alice", "Halo")).await.unwrap();
    let thread_id = turn.thread.id;
    let events = drain(chat.spawn_stream(turn)).await;

    assert_eq!(events.len(), 3);
    assert!(matches!(events[0], ChatEvent::ThreadCreated { .. }));
    assert_eq!(events[1], ChatEvent::chunk("partial"));
    assert!(matches!(&events[2], ChatEvent::Error { content } if content.contains("connection reset")));

    let messages = persist.get_messages(thread_id).await.unwrap();
    assert_eq!(messages.len(), 1);
}

#[tokio::test]
async fn test_upstream_refusal_emits_error() {
    let mut script = ScriptedChatClient::replying(&[]);
    script.fail_on_open = true;
    let chat = orchestrator(Arc::new(script), Arc::new(InMemoryPersistenceClient::new()));

    let turn = chat.prepare(SendInput::text("alice", "Halo")).await.unwrap();
    let events = drain(chat.spawn_stream(turn)).await;

    assert!(matches!(&events[1], ChatEvent::Error { content } if content.contains("503")));
    assert_eq!(events.len(), 2);
}

#[tokio::test]
async fn test_title_failure_is_swallowed() {
    let mut script = ScriptedChatClient::replying(&["Jawaban"]);
    script.title = None;
    let persist = Arc::new(InMemoryPersistenceClient::new());
    let chat = orchestrator(Arc::new(script), persist.clone());

    let turn = chat.prepare(SendInput::text("alice", "Halo")).await.unwrap();
    let thread_id = turn.thread.id;
    let events = drain(chat.spawn_stream(turn)).await;

    assert!(events.iter().all(|e| !matches!(e, ChatEvent::TitleGenerated { .. })));
    assert_eq!(events.last(), Some(&ChatEvent::Done { content: "Jawaban".to_string() }));
    assert!(persist.get_thread(thread_id, "alice").await.unwrap().unwrap().title.is_none());
}

#[tokio::test]
async fn test_titles_can_be_disabled() {
    let llm = Arc::new(ScriptedChatClient::replying(&["ok"]));
    let chat = ChatOrchestrator::builder()
        .llm_client(llm.clone())
        .persistence(Arc::new(InMemoryPersistenceClient::new()))
        .model("gemini-2.5-flash")
        .default_system_prompt(DEFAULT_PROMPT)
        .generate_titles(false)
        .build()
        .unwrap();

    let turn = chat.prepare(SendInput::text("alice", "Halo")).await.unwrap();
    let events = drain(chat.spawn_stream(turn)).await;

    assert!(events.iter().all(|e| !matches!(e, ChatEvent::TitleGenerated { .. })));
    assert_eq!(llm.recorded().len(), 1);
}
