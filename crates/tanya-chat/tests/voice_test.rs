mod common;

use std::sync::Arc;

use common::{drain, FixedTranscriber, ScriptedChatClient};
use tanya_chat::{AudioInput, ChatError, VoiceAssistant, VoiceOverrides, VoiceSettings};
use tanya_types::ChatEvent;

fn assistant(stt: Arc<FixedTranscriber>, llm: Arc<ScriptedChatClient>) -> VoiceAssistant {
    VoiceAssistant::new(
        stt,
        llm,
        VoiceSettings::new("whisper-large-v3", "llama-4", "Jawab singkat."),
    )
}

fn audio() -> AudioInput {
    AudioInput::new(Some("q.webm".to_string()), "audio/webm", vec![1, 2, 3])
}

#[tokio::test]
async fn test_respond_returns_transcript_and_reply() {
    let stt = Arc::new(FixedTranscriber::new("Apa itu Celengan?"));
    let mut script = ScriptedChatClient::replying(&[]);
    script.title = Some("Celengan adalah tabungan.".to_string());
    let llm = Arc::new(script);

    let reply = assistant(stt.clone(), llm.clone())
        .respond(audio(), VoiceOverrides::default())
        .await
        .unwrap();

    assert_eq!(reply.transcript, "Apa itu Celengan?");
    assert_eq!(reply.llm_text, "Celengan adalah tabungan.");
    assert!(reply.llm_raw["choices"].is_array());

    let request = &llm.recorded()[0];
    assert_eq!(request.model, "llama-4");
    assert_eq!(request.options.temperature, Some(0.0));
    assert_eq!(request.options.max_tokens, Some(300));
    assert_eq!(
        request.messages[1].content().as_text(),
        Some("Transcript:\nApa itu Celengan?\n\nPlease reply concisely according to the system rules.")
    );
    assert_eq!(stt.models.lock().unwrap()[0].as_deref(), Some("whisper-large-v3"));
}

#[tokio::test]
async fn test_overrides_are_used() {
    let stt = Arc::new(FixedTranscriber::new("halo"));
    let llm = Arc::new(ScriptedChatClient::replying(&[]));

    assistant(stt.clone(), llm.clone())
        .respond(
            audio(),
            VoiceOverrides {
                stt_model: Some("whisper-large-v3-turbo".to_string()),
                llm_model: Some("llama-3.3-70b".to_string()),
            },
        )
        .await
        .unwrap();

    assert_eq!(stt.models.lock().unwrap()[0].as_deref(), Some("whisper-large-v3-turbo"));
    assert_eq!(llm.recorded()[0].model, "llama-3.3-70b");
}

#[tokio::test]
async fn test_transcription_failure_is_upstream_error() {
    let err = assistant(
        Arc::new(FixedTranscriber::failing()),
        Arc::new(ScriptedChatClient::replying(&[])),
    )
    .respond(audio(), VoiceOverrides::default())
    .await
    .unwrap_err();

    assert!(matches!(err, ChatError::Upstream(_)));
}

#[tokio::test]
async fn test_stream_transcript_chunks_done() {
    let voice = assistant(
        Arc::new(FixedTranscriber::new("unused")),
        Arc::new(ScriptedChatClient::replying(&["Halo ", "Anda"])),
    );

    let events = drain(voice.spawn_stream("halo".to_string(), VoiceOverrides::default())).await;

    assert_eq!(
        events,
        vec![
            ChatEvent::Transcript { content: "halo".to_string() },
            ChatEvent::chunk("Halo "),
            ChatEvent::chunk("Anda"),
            ChatEvent::Done { content: "Halo Anda".to_string() },
        ]
    );
}

#[tokio::test]
async fn test_stream_error_terminates() {
    let mut script = ScriptedChatClient::replying(&["Hal"]);
    script.fail_mid_stream = true;
    let voice = assistant(Arc::new(FixedTranscriber::new("x")), Arc::new(script));

    let events = drain(voice.spawn_stream("halo".to_string(), VoiceOverrides::default())).await;

    assert_eq!(events.len(), 3);
    assert!(matches!(&events[2], ChatEvent::Error { content } if content.starts_with("LLM error")));
}
