use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use tanya_persist::Message;

use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiResult};
use crate::routes::threads::parse_thread_id;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub id: Uuid,
    pub thread_id: Uuid,
    /// `user` or `assistant`
    pub role: String,
    pub content: String,
    pub audio_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// List messages in a thread, oldest first
#[utoipa::path(
    get,
    path = "/api/v1/chat/threads/{thread_id}/messages",
    params(("thread_id" = Uuid, Path, description = "Thread ID")),
    responses(
        (status = 200, description = "Ordered messages", body = Vec<MessageResponse>),
        (status = 404, description = "Thread not found")
    ),
    security(("bearer" = [])),
    tag = "messages"
)]
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(thread_id): Path<String>,
) -> ApiResult<Json<Vec<MessageResponse>>> {
    let id = parse_thread_id(&thread_id)?;

    // Ownership check; messages carry no user id
    if state.persist.get_thread(id, &user.id).await?.is_none() {
        return Err(ApiError::ThreadNotFound(thread_id));
    }

    let messages = state.persist.get_messages(id).await?;
    Ok(Json(messages.into_iter().map(message_to_response).collect()))
}

pub(crate) fn message_to_response(message: Message) -> MessageResponse {
    MessageResponse {
        id: message.id,
        thread_id: message.thread_id,
        role: message.role.as_str().to_string(),
        content: message.content,
        audio_url: message.audio_url,
        created_at: message.created_at,
    }
}
