use axum::{
    extract::{Path, State},
    http::header::{CACHE_CONTROL, CONTENT_TYPE},
    response::IntoResponse,
};
use std::sync::Arc;

use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Download a stored audio upload. Only its owner may fetch it.
#[utoipa::path(
    get,
    path = "/api/v1/chat/audio/{user_id}/{thread_id}/{filename}",
    params(
        ("user_id" = String, Path, description = "Owner of the upload"),
        ("thread_id" = String, Path, description = "Thread the upload belongs to"),
        ("filename" = String, Path, description = "Original file name")
    ),
    responses(
        (status = 200, description = "Audio bytes", content_type = "audio/*"),
        (status = 404, description = "Audio not found")
    ),
    security(("bearer" = [])),
    tag = "messages"
)]
pub async fn download_audio(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path((owner, thread_id, filename)): Path<(String, String, String)>,
) -> ApiResult<impl IntoResponse> {
    if owner != user.id {
        return Err(ApiError::NotFound("Audio".to_string()));
    }

    let key = format!("{}/{}/{}", owner, thread_id, filename);
    let audio = state
        .persist
        .load_audio(&key)
        .await?
        .ok_or_else(|| ApiError::NotFound("Audio".to_string()))?;

    Ok((
        [
            (CONTENT_TYPE, audio.content_type),
            (CACHE_CONTROL, "private, max-age=3600".to_string()),
        ],
        audio.data,
    ))
}
