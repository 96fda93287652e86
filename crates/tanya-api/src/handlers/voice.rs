use axum::{
    extract::{Multipart, Query, State},
    response::Response,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

use tanya_chat::VoiceOverrides;
use tanya_types::VoiceReply;

use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiResult};
use crate::handlers::stream::sse_response;
use crate::state::AppState;
use crate::upload::AudioUpload;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct VoiceQuery {
    /// Speech-to-text model override
    pub stt_model: Option<String>,
    /// Reply model override
    pub llm_model: Option<String>,
}

impl From<VoiceQuery> for VoiceOverrides {
    fn from(query: VoiceQuery) -> Self {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Self {
            stt_model: non_empty(query.stt_model),
            llm_model: non_empty(query.llm_model),
        }
    }
}

async fn read_audio_part(mut multipart: Multipart) -> ApiResult<AudioUpload> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("audio") {
            return AudioUpload::from_field(field).await;
        }
    }
    Err(ApiError::BadRequest("The `audio` file field is required".to_string()))
}

/// Transcribe an utterance and answer it in one JSON response
#[utoipa::path(
    post,
    path = "/api/v1/stt/simple",
    params(VoiceQuery),
    request_body(content = String, content_type = "multipart/form-data", description = "`audio` file part"),
    responses(
        (status = 200, description = "`{transcript, llm_raw, llm_text}`"),
        (status = 400, description = "Missing or non-audio upload"),
        (status = 502, description = "Speech or reply provider failed")
    ),
    security(("bearer" = [])),
    tag = "speech"
)]
pub async fn stt_simple(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<VoiceQuery>,
    multipart: Multipart,
) -> ApiResult<Json<VoiceReply>> {
    let upload = read_audio_part(multipart).await?;
    tracing::info!(user_id = %user.id, size = upload.size, "Voice turn");

    let audio = upload.into_audio_input().await?;
    let reply = state.voice.respond(audio, query.into()).await?;
    Ok(Json(reply))
}

/// Transcribe an utterance, then stream the answer
///
/// Transcription failures are plain 502 responses; once streaming starts,
/// failures arrive as an `error` event.
#[utoipa::path(
    post,
    path = "/api/v1/stt/stream",
    params(VoiceQuery),
    request_body(content = String, content_type = "multipart/form-data", description = "`audio` file part"),
    responses(
        (status = 200, description = "`transcript`, `chunk`*, then `done` or `error`", content_type = "text/event-stream"),
        (status = 400, description = "Missing or non-audio upload"),
        (status = 502, description = "Speech provider failed")
    ),
    security(("bearer" = [])),
    tag = "speech"
)]
pub async fn stt_stream(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<VoiceQuery>,
    multipart: Multipart,
) -> ApiResult<Response> {
    let upload = read_audio_part(multipart).await?;
    tracing::info!(user_id = %user.id, size = upload.size, "Streaming voice turn");

    let overrides = VoiceOverrides::from(query);
    let audio = upload.into_audio_input().await?;
    let transcript = state.voice.transcribe(audio, &overrides).await?;

    Ok(sse_response(state.voice.spawn_stream(transcript, overrides)))
}
