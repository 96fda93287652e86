use thiserror::Error;

/// Maximum number of body bytes kept when a provider returns something we cannot decode.
pub const RAW_BODY_PREVIEW: usize = 1000;

#[derive(Error, Debug)]
pub enum ProviderError {
    /// Provider answered with a non-2xx status.
    #[error("{provider} API error ({status}): {body}")]
    Http {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("{provider} network error: {source}")]
    Network {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} returned invalid JSON: {message}. Raw (truncated): {raw}")]
    InvalidResponse {
        provider: &'static str,
        message: String,
        raw: String,
    },

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ProviderError {
    pub(crate) fn network(provider: &'static str, source: reqwest::Error) -> Self {
        Self::Network { provider, source }
    }

    pub(crate) fn invalid_response(
        provider: &'static str,
        message: impl ToString,
        raw: &str,
    ) -> Self {
        Self::InvalidResponse {
            provider,
            message: message.to_string(),
            raw: preview(raw),
        }
    }

    /// Upstream HTTP status, when the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Upstream response body, when the failure carried one.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Http { body, .. } => Some(body),
            Self::InvalidResponse { raw, .. } => Some(raw),
            _ => None,
        }
    }
}

fn preview(raw: &str) -> String {
    match raw.char_indices().nth(RAW_BODY_PREVIEW) {
        Some((idx, _)) => raw[..idx].to_string(),
        None => raw.to_string(),
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_response_truncates_raw_body() {
        let raw = "x".repeat(RAW_BODY_PREVIEW + 50);
        let err = ProviderError::invalid_response("Groq STT", "expected value", &raw);

        assert_eq!(err.body().map(str::len), Some(RAW_BODY_PREVIEW));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_http_error_exposes_status_and_body() {
        let err = ProviderError::Http {
            provider: "Gemini",
            status: 429,
            body: "quota".to_string(),
        };

        assert_eq!(err.status(), Some(429));
        assert_eq!(err.body(), Some("quota"));
        assert!(err.to_string().contains("Gemini API error (429)"));
    }
}
