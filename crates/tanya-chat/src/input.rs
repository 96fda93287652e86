use uuid::Uuid;

pub const DEFAULT_AUDIO_FILENAME: &str = "audio.wav";

/// Audio received from the caller, already buffered
#[derive(Debug, Clone)]
pub struct AudioInput {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl AudioInput {
    pub fn new(filename: Option<String>, content_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            filename: filename
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_AUDIO_FILENAME.to_string()),
            content_type: content_type.into(),
            data,
        }
    }
}

/// One "send message" request
#[derive(Debug, Clone)]
pub struct SendInput {
    pub user_id: String,
    /// `None` starts a new thread
    pub thread_id: Option<Uuid>,
    pub message: Option<String>,
    pub audio: Option<AudioInput>,
}

impl SendInput {
    pub fn text(user_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            thread_id: None,
            message: Some(message.into()),
            audio: None,
        }
    }

    pub fn in_thread(mut self, thread_id: Uuid) -> Self {
        self.thread_id = Some(thread_id);
        self
    }

    pub fn with_audio(mut self, audio: AudioInput) -> Self {
        self.audio = Some(audio);
        self
    }
}
