use std::sync::Arc;

use futures::StreamExt;
use tanya_llm::{generate_title, ChatClient, ChatOptions, ChatRequest, Message, StreamEvent};
use tanya_persist::{
    AudioBlob, Message as StoredMessage, MessageRole, NewMessage, NewThread, PersistenceClient,
    Thread, ThreadUpdate,
};
use tanya_types::ChatEvent;
use tokio::sync::mpsc;

use crate::error::{ChatError, Result};
use crate::input::{AudioInput, SendInput};

/// Stored content of a user turn that carried only audio
pub const AUDIO_MESSAGE_PLACEHOLDER: &str = "[Audio message]";

pub(crate) const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub model: String,
    /// Falls back to `model`
    pub title_model: Option<String>,
    pub generate_titles: bool,
    pub default_system_prompt: String,
    pub options: ChatOptions,
}

impl ChatSettings {
    pub fn new(model: impl Into<String>, default_system_prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            title_model: None,
            generate_titles: true,
            default_system_prompt: default_system_prompt.into(),
            options: ChatOptions::default(),
        }
    }

    fn title_model(&self) -> &str {
        self.title_model.as_deref().unwrap_or(&self.model)
    }
}

/// Everything a turn needs once its side effects before streaming are done
#[derive(Debug)]
pub struct PreparedTurn {
    pub thread: Thread,
    pub is_new_thread: bool,
    pub user_id: String,
    /// Prior turns, oldest first, excluding the one being sent
    pub history: Vec<StoredMessage>,
    pub user_message: StoredMessage,
    /// Text typed by the user, empty for audio-only turns
    pub text: String,
    pub audio: Option<AudioInput>,
}

pub struct ChatOrchestrator {
    llm: Arc<dyn ChatClient>,
    persist: Arc<dyn PersistenceClient>,
    settings: ChatSettings,
}

impl ChatOrchestrator {
    pub fn new(
        llm: Arc<dyn ChatClient>,
        persist: Arc<dyn PersistenceClient>,
        settings: ChatSettings,
    ) -> Self {
        Self {
            llm,
            persist,
            settings,
        }
    }

    pub fn builder() -> crate::builder::ChatOrchestratorBuilder {
        crate::builder::ChatOrchestratorBuilder::new()
    }

    pub fn settings(&self) -> &ChatSettings {
        &self.settings
    }

    /// Validate the input, resolve the thread and persist the user turn.
    ///
    /// Failures here happen before any event is emitted, so callers can map
    /// them to plain HTTP errors.
    pub async fn prepare(&self, input: SendInput) -> Result<PreparedTurn> {
        let text = input
            .message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());
        if text.is_none() && input.audio.is_none() {
            return Err(ChatError::Validation(
                "Either a message or an audio file is required".to_string(),
            ));
        }

        let (thread, history, is_new_thread) = match input.thread_id {
            Some(thread_id) => {
                let thread = self
                    .persist
                    .get_thread(thread_id, &input.user_id)
                    .await?
                    .ok_or_else(|| ChatError::NotFound(thread_id.to_string()))?;
                let history = self.persist.get_messages(thread_id).await?;
                (thread, history, false)
            }
            None => {
                let thread = self
                    .persist
                    .create_thread(
                        &input.user_id,
                        NewThread::new(self.settings.default_system_prompt.clone()),
                    )
                    .await?;
                tracing::info!(thread_id = %thread.id, user_id = %input.user_id, "Created thread");
                (thread, Vec::new(), true)
            }
        };

        let audio_url = match &input.audio {
            Some(audio) => Some(
                self.persist
                    .upload_audio(AudioBlob::new(
                        input.user_id.clone(),
                        thread.id,
                        audio.filename.clone(),
                        audio.content_type.clone(),
                        audio.data.clone(),
                    ))
                    .await?,
            ),
            None => None,
        };

        let content = text
            .clone()
            .unwrap_or_else(|| AUDIO_MESSAGE_PLACEHOLDER.to_string());
        let user_message = self
            .persist
            .add_message(NewMessage::user(thread.id, content).with_audio_url(audio_url))
            .await?;

        Ok(PreparedTurn {
            thread,
            is_new_thread,
            user_id: input.user_id,
            history,
            user_message,
            text: text.unwrap_or_default(),
            audio: input.audio,
        })
    }

    /// Stream the assistant turn on a background task.
    ///
    /// Emits `thread_created` (new threads), `chunk`*, `title_generated`
    /// (new threads, best-effort) and finally `done`, or a single `error`.
    pub fn spawn_stream(&self, turn: PreparedTurn) -> mpsc::Receiver<ChatEvent> {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        let llm = Arc::clone(&self.llm);
        let persist = Arc::clone(&self.persist);
        let settings = self.settings.clone();

        tokio::spawn(async move {
            let thread_id = turn.thread.id;
            if let Err(e) = Self::run_turn(turn, &tx, llm, persist, settings).await {
                tracing::error!(thread_id = %thread_id, error = %e, "Chat turn failed");
                let _ = tx.send(ChatEvent::error(e.to_string())).await;
            }
        });

        rx
    }

    /// Chat request for this turn: system prompt, history, then the new user part
    pub fn build_request(settings: &ChatSettings, turn: &PreparedTurn) -> ChatRequest {
        let mut messages = Vec::with_capacity(turn.history.len() + 2);
        messages.push(Message::system(turn.thread.system_instruction.clone()));

        for prior in &turn.history {
            messages.push(match prior.role {
                MessageRole::User => Message::human(prior.content.clone()),
                MessageRole::Assistant => Message::ai(prior.content.clone()),
            });
        }

        messages.push(match &turn.audio {
            Some(audio) => Message::human_with_audio(
                turn.text.clone(),
                audio.content_type.clone(),
                audio.data.clone(),
            ),
            None => Message::human(turn.text.clone()),
        });

        ChatRequest::new(settings.model.clone(), messages).with_options(settings.options.clone())
    }

    async fn run_turn(
        turn: PreparedTurn,
        tx: &mpsc::Sender<ChatEvent>,
        llm: Arc<dyn ChatClient>,
        persist: Arc<dyn PersistenceClient>,
        settings: ChatSettings,
    ) -> Result<()> {
        let thread_id = turn.thread.id;

        if turn.is_new_thread && !emit(tx, ChatEvent::ThreadCreated { thread_id }).await {
            return Ok(());
        }

        let request = Self::build_request(&settings, &turn);
        let mut stream = llm.chat_stream(request).await?;
        let mut full_response = String::new();

        while let Some(event) = stream.next().await {
            match event? {
                StreamEvent::Message { content } => {
                    full_response.push_str(&content);
                    if !emit(tx, ChatEvent::Chunk { content }).await {
                        tracing::debug!(thread_id = %thread_id, "Client went away mid-stream");
                        return Ok(());
                    }
                }
                StreamEvent::Done { .. } => break,
            }
        }

        persist
            .add_message(NewMessage::assistant(thread_id, full_response.clone()))
            .await?;

        if turn.is_new_thread && settings.generate_titles {
            if let Some(title) = Self::derive_title(
                llm.as_ref(),
                persist.as_ref(),
                &settings,
                &turn,
                &full_response,
            )
            .await
            {
                if !emit(tx, ChatEvent::TitleGenerated { title }).await {
                    return Ok(());
                }
            }
        }

        emit(tx, ChatEvent::Done { content: full_response }).await;
        Ok(())
    }

    /// Best-effort: every failure is logged and swallowed
    async fn derive_title(
        llm: &dyn ChatClient,
        persist: &dyn PersistenceClient,
        settings: &ChatSettings,
        turn: &PreparedTurn,
        reply: &str,
    ) -> Option<String> {
        let user_message = &turn.user_message.content;
        let title = match generate_title(llm, settings.title_model(), user_message, reply).await {
            Ok(title) if !title.is_empty() => title,
            Ok(_) => {
                tracing::warn!(thread_id = %turn.thread.id, "Title generation returned nothing");
                return None;
            }
            Err(e) => {
                tracing::warn!(thread_id = %turn.thread.id, error = %e, "Title generation failed");
                return None;
            }
        };

        match persist
            .update_thread(turn.thread.id, &turn.user_id, ThreadUpdate::title(title.clone()))
            .await
        {
            Ok(Some(_)) => Some(title),
            Ok(None) => {
                tracing::warn!(thread_id = %turn.thread.id, "Thread vanished before title was saved");
                None
            }
            Err(e) => {
                tracing::warn!(thread_id = %turn.thread.id, error = %e, "Failed to save title");
                None
            }
        }
    }
}

/// Send one event; `false` once the receiver is gone
pub(crate) async fn emit(tx: &mpsc::Sender<ChatEvent>, event: ChatEvent) -> bool {
    tx.send(event).await.is_ok()
}
