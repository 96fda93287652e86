use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tanya_chat::ChatError;
use tanya_llm::ProviderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("Thread not found: {0}")]
    ThreadNotFound(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Upstream(#[from] ProviderError),

    #[error("Persistence error: {0}")]
    Persist(#[from] tanya_persist::PersistError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error")]
    Internal,
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::Validation(msg) => ApiError::BadRequest(msg),
            ChatError::NotFound(id) => ApiError::ThreadNotFound(id),
            ChatError::Upstream(e) => ApiError::Upstream(e),
            ChatError::Persistence(e) => ApiError::Persist(e),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::ThreadNotFound(_) | ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Persist(_) | ApiError::Config(_) | ApiError::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            ApiError::Upstream(ProviderError::Http {
                provider,
                status: upstream,
                body,
            }) => {
                tracing::error!(provider, status = upstream, "Upstream provider error");
                json!({
                    "error": format!("{} error ({})", provider, upstream),
                    "body": body,
                })
            }
            ApiError::Upstream(e) => {
                tracing::error!(error = %e, "Upstream provider error");
                json!({ "error": e.to_string() })
            }
            ApiError::Persist(e) => {
                tracing::error!(error = %e, "Persistence error");
                json!({ "error": "Storage error" })
            }
            ApiError::Config(msg) => {
                tracing::error!("Config error: {}", msg);
                json!({ "error": "Configuration error" })
            }
            ApiError::Internal => {
                tracing::error!("Internal error");
                json!({ "error": "Internal server error" })
            }
            _ => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<axum::extract::multipart::MultipartError> for ApiError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        ApiError::BadRequest(format!("Invalid multipart body: {}", err.body_text()))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
