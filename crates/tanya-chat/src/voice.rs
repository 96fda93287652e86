use std::sync::Arc;

use futures::StreamExt;
use tanya_llm::openai::extract_text;
use tanya_llm::{
    ChatClient, ChatOptions, ChatRequest, Message, StreamEvent, TranscriptionClient,
    TranscriptionRequest,
};
use tanya_types::{ChatEvent, VoiceReply};
use tokio::sync::mpsc;

use crate::error::Result;
use crate::input::AudioInput;
use crate::orchestrator::{emit, EVENT_CHANNEL_CAPACITY};

#[derive(Debug, Clone)]
pub struct VoiceSettings {
    pub stt_model: String,
    pub llm_model: String,
    pub system_prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl VoiceSettings {
    pub fn new(
        stt_model: impl Into<String>,
        llm_model: impl Into<String>,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            stt_model: stt_model.into(),
            llm_model: llm_model.into(),
            system_prompt: system_prompt.into(),
            temperature: 0.0,
            max_tokens: 300,
        }
    }
}

/// Per-request model overrides
#[derive(Debug, Clone, Default)]
pub struct VoiceOverrides {
    pub stt_model: Option<String>,
    pub llm_model: Option<String>,
}

/// Wrap a transcript in the user prompt sent to the voice model
pub fn transcript_prompt(transcript: &str) -> String {
    format!(
        "Transcript:\n{}\n\nPlease reply concisely according to the system rules.",
        transcript
    )
}

/// Speech turn without persistence: transcribe, then answer the transcript
pub struct VoiceAssistant {
    stt: Arc<dyn TranscriptionClient>,
    llm: Arc<dyn ChatClient>,
    settings: VoiceSettings,
}

impl VoiceAssistant {
    pub fn new(
        stt: Arc<dyn TranscriptionClient>,
        llm: Arc<dyn ChatClient>,
        settings: VoiceSettings,
    ) -> Self {
        Self { stt, llm, settings }
    }

    pub async fn transcribe(&self, audio: AudioInput, overrides: &VoiceOverrides) -> Result<String> {
        let model = overrides
            .stt_model
            .clone()
            .unwrap_or_else(|| self.settings.stt_model.clone());

        let transcript = self
            .stt
            .transcribe(
                TranscriptionRequest::new(audio.data, audio.filename, audio.content_type)
                    .with_model(Some(model)),
            )
            .await?;

        tracing::info!(chars = transcript.chars().count(), "Audio transcribed");
        Ok(transcript)
    }

    /// Transcribe and answer in one non-streaming call
    pub async fn respond(&self, audio: AudioInput, overrides: VoiceOverrides) -> Result<VoiceReply> {
        let transcript = self.transcribe(audio, &overrides).await?;
        let response = self
            .llm
            .chat(self.build_request(&transcript, &overrides))
            .await?;

        let llm_text = response
            .content
            .clone()
            .unwrap_or_else(|| extract_text(&response.raw));

        Ok(VoiceReply {
            transcript,
            llm_raw: response.raw,
            llm_text,
        })
    }

    /// Stream an answer for an already transcribed utterance.
    ///
    /// Emits `transcript`, `chunk`*, then `done` or a single `error`.
    pub fn spawn_stream(
        &self,
        transcript: String,
        overrides: VoiceOverrides,
    ) -> mpsc::Receiver<ChatEvent> {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let request = self.build_request(&transcript, &overrides);
        let llm = Arc::clone(&self.llm);

        tokio::spawn(async move {
            if !emit(&tx, ChatEvent::Transcript { content: transcript }).await {
                return;
            }

            let mut stream = match llm.chat_stream(request).await {
                Ok(stream) => stream,
                Err(e) => {
                    tracing::error!(error = %e, "Voice LLM request failed");
                    let _ = tx.send(ChatEvent::error(format!("LLM error: {}", e))).await;
                    return;
                }
            };

            let mut full_response = String::new();
            while let Some(event) = stream.next().await {
                match event {
                    Ok(StreamEvent::Message { content }) => {
                        full_response.push_str(&content);
                        if !emit(&tx, ChatEvent::Chunk { content }).await {
                            return;
                        }
                    }
                    Ok(StreamEvent::Done { .. }) => break,
                    Err(e) => {
                        tracing::error!(error = %e, "Voice LLM stream failed");
                        let _ = tx.send(ChatEvent::error(format!("LLM error: {}", e))).await;
                        return;
                    }
                }
            }

            emit(&tx, ChatEvent::Done { content: full_response }).await;
        });

        rx
    }

    fn build_request(&self, transcript: &str, overrides: &VoiceOverrides) -> ChatRequest {
        let model = overrides
            .llm_model
            .clone()
            .unwrap_or_else(|| self.settings.llm_model.clone());

        ChatRequest::new(
            model,
            vec![
                Message::system(self.settings.system_prompt.clone()),
                Message::human(transcript_prompt(transcript)),
            ],
        )
        .with_options(
            ChatOptions::new()
                .temperature(self.settings.temperature)
                .max_tokens(self.settings.max_tokens),
        )
    }
}
