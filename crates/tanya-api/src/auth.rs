//! Bearer-token authentication.
//!
//! Tokens are never verified locally: a [`SessionValidator`] asks the managed
//! auth provider (or a static table in dev/test) who the caller is. Handlers
//! take a [`CurrentUser`] argument to require an authenticated caller.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::config::{AuthConfig, AuthMode};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: String,
    pub email: Option<String>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Auth provider unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Resolves a bearer token to the user it was issued to
#[async_trait]
pub trait SessionValidator: Send + Sync {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}

#[derive(Debug, Deserialize)]
struct ProviderUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

/// Asks a Supabase-style provider: `GET {url}/auth/v1/user`
pub struct SupabaseSessionValidator {
    http_client: reqwest::Client,
    user_url: String,
    api_key: String,
}

impl SupabaseSessionValidator {
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to create auth HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            user_url: format!("{}/auth/v1/user", base_url.trim_end_matches('/')),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl SessionValidator for SupabaseSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let response = self
            .http_client
            .get(&self.user_url)
            .header("apikey", &self.api_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AuthError::ServiceUnavailable(e.to_string()))?;

        match response.status() {
            status if status.is_success() => {
                let user: ProviderUser = response
                    .json()
                    .await
                    .map_err(|e| AuthError::ServiceUnavailable(e.to_string()))?;
                Ok(AuthenticatedUser {
                    id: user.id,
                    email: user.email,
                })
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AuthError::InvalidToken),
            status => Err(AuthError::ServiceUnavailable(format!(
                "auth provider answered {}",
                status
            ))),
        }
    }
}

/// Fixed token table for local development and tests
#[derive(Debug, Clone, Default)]
pub struct StaticSessionValidator {
    tokens: HashMap<String, String>,
}

impl StaticSessionValidator {
    pub fn new(tokens: HashMap<String, String>) -> Self {
        Self { tokens }
    }

    pub fn with_token(mut self, token: impl Into<String>, user_id: impl Into<String>) -> Self {
        self.tokens.insert(token.into(), user_id.into());
        self
    }
}

#[async_trait]
impl SessionValidator for StaticSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        self.tokens
            .get(token)
            .map(|id| AuthenticatedUser {
                id: id.clone(),
                email: None,
            })
            .ok_or(AuthError::InvalidToken)
    }
}

/// Build the validator selected by `auth.mode`
pub fn build_validator(
    config: &AuthConfig,
    api_key: &str,
) -> Result<Arc<dyn SessionValidator>, ApiError> {
    match config.mode {
        AuthMode::Supabase => Ok(Arc::new(SupabaseSessionValidator::new(
            &config.url,
            api_key,
            config.timeout_secs.map(Duration::from_secs),
        )?)),
        AuthMode::Static => Ok(Arc::new(StaticSessionValidator::new(config.tokens.clone()))),
    }
}

/// The authenticated caller; rejects the request with 401 otherwise
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthenticatedUser);

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

        let token = header
            .to_str()
            .ok()
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ApiError::Unauthorized("Invalid authorization header".to_string()))?;

        match state.auth.validate(token).await {
            Ok(user) => Ok(CurrentUser(user)),
            Err(AuthError::InvalidToken) => Err(ApiError::Unauthorized(
                AuthError::InvalidToken.to_string(),
            )),
            Err(AuthError::ServiceUnavailable(reason)) => {
                tracing::warn!(reason = %reason, "Token validation failed");
                Err(ApiError::Unauthorized("Authentication failed".to_string()))
            }
        }
    }
}
