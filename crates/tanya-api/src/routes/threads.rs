use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use tanya_persist::{NewThread, Thread, ThreadUpdate};

use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiResult};
use crate::routes::messages::{message_to_response, MessageResponse};
use crate::state::AppState;

const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateThreadRequest {
    #[serde(default)]
    pub title: Option<String>,
    pub system_instruction: String,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateThreadRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub system_instruction: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ThreadResponse {
    pub id: Uuid,
    pub user_id: String,
    pub title: Option<String>,
    pub system_instruction: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ThreadWithMessagesResponse {
    pub thread: ThreadResponse,
    pub messages: Vec<MessageResponse>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListThreadsQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub skip: u64,
}

fn default_limit() -> i64 {
    50
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListThreadsResponse {
    pub threads: Vec<ThreadResponse>,
    pub has_more: bool,
}

pub(crate) fn parse_thread_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest("Invalid thread ID format".to_string()))
}

/// Create a new thread
#[utoipa::path(
    post,
    path = "/api/v1/chat/threads",
    request_body = CreateThreadRequest,
    responses(
        (status = 201, description = "Thread created", body = ThreadResponse),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer" = [])),
    tag = "threads"
)]
pub async fn create_thread(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateThreadRequest>,
) -> ApiResult<(StatusCode, Json<ThreadResponse>)> {
    if req.system_instruction.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "system_instruction must not be empty".to_string(),
        ));
    }

    let thread = state
        .persist
        .create_thread(
            &user.id,
            NewThread {
                title: req.title,
                system_instruction: req.system_instruction,
            },
        )
        .await?;

    tracing::info!(thread_id = %thread.id, user_id = %user.id, "Thread created");
    Ok((StatusCode::CREATED, Json(thread_to_response(thread))))
}

/// List the caller's threads, most recently active first
#[utoipa::path(
    get,
    path = "/api/v1/chat/threads",
    params(ListThreadsQuery),
    responses(
        (status = 200, description = "List of threads", body = ListThreadsResponse),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer" = [])),
    tag = "threads"
)]
pub async fn list_threads(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ListThreadsQuery>,
) -> ApiResult<Json<ListThreadsResponse>> {
    let limit = query.limit.clamp(1, MAX_PAGE_SIZE);

    let threads = state
        .persist
        .list_threads(&user.id, limit, query.skip)
        .await?;

    let has_more = threads.len() as i64 == limit;
    Ok(Json(ListThreadsResponse {
        threads: threads.into_iter().map(thread_to_response).collect(),
        has_more,
    }))
}

/// Get a thread together with its messages
#[utoipa::path(
    get,
    path = "/api/v1/chat/threads/{thread_id}",
    params(("thread_id" = Uuid, Path, description = "Thread ID")),
    responses(
        (status = 200, description = "Thread details", body = ThreadWithMessagesResponse),
        (status = 404, description = "Thread not found")
    ),
    security(("bearer" = [])),
    tag = "threads"
)]
pub async fn get_thread(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(thread_id): Path<String>,
) -> ApiResult<Json<ThreadWithMessagesResponse>> {
    let id = parse_thread_id(&thread_id)?;

    let thread = state
        .persist
        .get_thread(id, &user.id)
        .await?
        .ok_or(ApiError::ThreadNotFound(thread_id))?;
    let messages = state.persist.get_messages(id).await?;

    Ok(Json(ThreadWithMessagesResponse {
        thread: thread_to_response(thread),
        messages: messages.into_iter().map(message_to_response).collect(),
    }))
}

/// Update a thread's title or system instruction
#[utoipa::path(
    patch,
    path = "/api/v1/chat/threads/{thread_id}",
    params(("thread_id" = Uuid, Path, description = "Thread ID")),
    request_body = UpdateThreadRequest,
    responses(
        (status = 200, description = "Updated thread", body = ThreadResponse),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Thread not found")
    ),
    security(("bearer" = [])),
    tag = "threads"
)]
pub async fn update_thread(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(thread_id): Path<String>,
    Json(req): Json<UpdateThreadRequest>,
) -> ApiResult<Json<ThreadResponse>> {
    let id = parse_thread_id(&thread_id)?;

    if matches!(&req.system_instruction, Some(s) if s.trim().is_empty()) {
        return Err(ApiError::BadRequest(
            "system_instruction must not be empty".to_string(),
        ));
    }

    let update = ThreadUpdate {
        title: req.title,
        system_instruction: req.system_instruction,
    };

    let thread = if update.is_empty() {
        state.persist.get_thread(id, &user.id).await?
    } else {
        state.persist.update_thread(id, &user.id, update).await?
    };

    thread
        .map(|thread| Json(thread_to_response(thread)))
        .ok_or(ApiError::ThreadNotFound(thread_id))
}

/// Delete a thread and all its messages
#[utoipa::path(
    delete,
    path = "/api/v1/chat/threads/{thread_id}",
    params(("thread_id" = Uuid, Path, description = "Thread ID")),
    responses(
        (status = 204, description = "Thread deleted"),
        (status = 404, description = "Thread not found")
    ),
    security(("bearer" = [])),
    tag = "threads"
)]
pub async fn delete_thread(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(thread_id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_thread_id(&thread_id)?;

    if !state.persist.delete_thread(id, &user.id).await? {
        return Err(ApiError::ThreadNotFound(thread_id));
    }

    tracing::info!(thread_id = %id, user_id = %user.id, "Thread deleted");
    Ok(StatusCode::NO_CONTENT)
}

fn thread_to_response(thread: Thread) -> ThreadResponse {
    ThreadResponse {
        id: thread.id,
        user_id: thread.user_id,
        title: thread.title,
        system_instruction: thread.system_instruction,
        created_at: thread.created_at,
        updated_at: thread.updated_at,
    }
}
