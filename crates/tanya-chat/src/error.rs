use tanya_llm::ProviderError;
use tanya_persist::PersistError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChatError {
    /// Rejected input; nothing was persisted
    #[error("{0}")]
    Validation(String),

    #[error("Thread not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Upstream(#[from] ProviderError),

    #[error(transparent)]
    Persistence(#[from] PersistError),
}

pub type Result<T> = std::result::Result<T, ChatError>;
