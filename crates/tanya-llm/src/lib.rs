pub mod buffer_utils;
pub mod config;
pub mod error;
pub mod gemini;
pub mod openai;
pub mod streaming;
pub mod title;
pub mod traits;
pub mod types;

pub use traits::{
    ChatClient, TranscriptionClient,
    ChatRequest, ChatResponse, ChatOptions,
    EventStream, TokenUsage, TranscriptionRequest,
};

pub use config::{ClientFactory, GeminiConfig, OpenAIConfig, ProviderConfig, ProviderDetails, ProviderType};
pub use error::{ProviderError, Result};
pub use gemini::GeminiClient;
pub use openai::OpenAIClient;
pub use streaming::{collect_stream, StreamEvent};
pub use title::{generate_title, title_prompt, truncate_title};
pub use types::{Content, ContentPart, Message};
