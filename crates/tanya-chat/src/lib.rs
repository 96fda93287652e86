pub mod builder;
pub mod error;
pub mod input;
pub mod orchestrator;
pub mod voice;

pub use builder::ChatOrchestratorBuilder;
pub use error::{ChatError, Result};
pub use input::{AudioInput, SendInput, DEFAULT_AUDIO_FILENAME};
pub use orchestrator::{ChatOrchestrator, ChatSettings, PreparedTurn, AUDIO_MESSAGE_PLACEHOLDER};
pub use voice::{transcript_prompt, VoiceAssistant, VoiceOverrides, VoiceSettings};
