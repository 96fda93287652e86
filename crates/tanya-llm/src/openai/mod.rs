mod chunks;
mod client;

pub use chunks::{extract_text, ChatStreamChunk, Delta, OpenAIChatParser, StreamChoice};
pub use client::{OpenAIClient, OpenAIClientBuilder, DEFAULT_STT_MODEL, GROQ_API_BASE};
