mod chunks;
mod client;

pub use chunks::{GeminiChunk, GeminiParser};
pub use client::{GeminiClient, GeminiClientBuilder, AUDIO_ONLY_PROMPT, GEMINI_API_BASE};
