mod audio;
mod message;
mod thread;

// Export database-agnostic models
pub use audio::{audio_reference, AudioBlob, StoredAudio, AUDIO_ROUTE_PREFIX};
pub use message::{Message, MessageRole, NewMessage};
pub use thread::{NewThread, Thread, ThreadUpdate};
