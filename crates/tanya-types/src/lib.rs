pub mod events;
pub mod voice;

pub use events::ChatEvent;
pub use voice::VoiceReply;
