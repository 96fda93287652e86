use axum::Json;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::handlers::{stream, voice};
use crate::routes::{audio, health, messages, threads};

#[derive(OpenApi)]
#[openapi(
    info(title = "Tanya API", description = "Customer-support chat backend"),
    paths(
        health::root,
        health::health_check,
        threads::create_thread,
        threads::list_threads,
        threads::get_thread,
        threads::update_thread,
        threads::delete_thread,
        messages::list_messages,
        audio::download_audio,
        stream::send_message_stream,
        voice::stt_simple,
        voice::stt_stream,
    ),
    components(schemas(
        health::WelcomeResponse,
        health::HealthResponse,
        threads::CreateThreadRequest,
        threads::UpdateThreadRequest,
        threads::ThreadResponse,
        threads::ThreadWithMessagesResponse,
        threads::ListThreadsResponse,
        messages::MessageResponse,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "health"),
        (name = "threads", description = "Conversation threads"),
        (name = "messages", description = "Stored turns and their audio"),
        (name = "chat", description = "Streamed replies"),
        (name = "speech", description = "Speech-to-text driven replies")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
