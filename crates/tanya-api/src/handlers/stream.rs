use axum::{
    extract::{Multipart, State},
    http::{header::CACHE_CONTROL, HeaderName, HeaderValue},
    response::{
        sse::{Event, Sse},
        IntoResponse, Response,
    },
};
use futures::stream::StreamExt;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use tanya_chat::SendInput;
use tanya_types::ChatEvent;

use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiResult};
use crate::routes::threads::parse_thread_id;
use crate::state::AppState;
use crate::upload::AudioUpload;

static X_ACCEL_BUFFERING: HeaderName = HeaderName::from_static("x-accel-buffering");

/// Adapt an event channel into a `text/event-stream` response.
///
/// Each event is one `data:` frame holding its JSON.
pub fn sse_response(events: mpsc::Receiver<ChatEvent>) -> Response {
    let stream = ReceiverStream::new(events)
        .map(|event| Ok::<Event, Infallible>(Event::default().data(event.to_json())));

    let mut response = Sse::new(stream).into_response();
    let headers = response.headers_mut();
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(X_ACCEL_BUFFERING.clone(), HeaderValue::from_static("no"));
    response
}

/// Fields of the `/chat/send` multipart form
#[derive(Debug, Default)]
pub struct SendForm {
    pub message: Option<String>,
    pub thread_id: Option<String>,
    pub audio: Option<AudioUpload>,
}

impl SendForm {
    /// Read every part; an audio part with a non audio/video type fails fast
    pub async fn parse(mut multipart: Multipart) -> ApiResult<Self> {
        let mut form = SendForm::default();

        while let Some(field) = multipart.next_field().await? {
            match field.name() {
                Some("message") => form.message = Some(field.text().await?),
                Some("thread_id") => {
                    let value = field.text().await?;
                    form.thread_id = Some(value.trim().to_string()).filter(|v| !v.is_empty());
                }
                Some("audio") => {
                    // Browsers send an empty file part when nothing was picked
                    if field.file_name().map_or(false, str::is_empty) {
                        continue;
                    }
                    form.audio = Some(AudioUpload::from_field(field).await?);
                }
                other => {
                    tracing::debug!(field = ?other, "Ignoring unknown form field");
                }
            }
        }

        Ok(form)
    }
}

/// Send a message and stream the reply using Server-Sent Events
///
/// Without `thread_id` a new thread is created and announced first with a
/// `thread_created` event; its title follows as `title_generated`.
#[utoipa::path(
    post,
    path = "/api/v1/chat/send",
    request_body(content = String, content_type = "multipart/form-data", description = "`message`, `thread_id`, `audio` (all optional, at least one of message/audio)"),
    responses(
        (status = 200, description = "Streaming response", content_type = "text/event-stream"),
        (status = 400, description = "Invalid input or non-audio upload"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Thread not found")
    ),
    security(("bearer" = [])),
    tag = "chat"
)]
pub async fn send_message_stream(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    multipart: Multipart,
) -> ApiResult<Response> {
    let form = SendForm::parse(multipart).await?;

    let thread_id = form
        .thread_id
        .as_deref()
        .map(parse_thread_id)
        .transpose()?;
    let audio = match form.audio {
        Some(upload) => Some(upload.into_audio_input().await?),
        None => None,
    };

    let turn = state
        .orchestrator
        .prepare(SendInput {
            user_id: user.id,
            thread_id,
            message: form.message,
            audio,
        })
        .await
        .map_err(ApiError::from)?;

    tracing::info!(
        thread_id = %turn.thread.id,
        new_thread = turn.is_new_thread,
        has_audio = turn.audio.is_some(),
        "Streaming chat turn"
    );

    Ok(sse_response(state.orchestrator.spawn_stream(turn)))
}
