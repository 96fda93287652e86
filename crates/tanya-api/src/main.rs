use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tanya_api::{
    auth::build_validator, build_router, config::Config, state::AppState, templates,
};
use tanya_chat::{ChatOrchestrator, VoiceAssistant, VoiceSettings};
use tanya_llm::{ChatOptions, ClientFactory};
use tanya_persist::PersistenceBuilder;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config =
        Config::load().map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    init_logging(&config);

    tracing::info!("Starting Tanya API server");
    tracing::info!("Config loaded: {}:{}", config.server.host, config.server.port);

    tracing::info!(backend = ?config.storage.backend, "Initializing persistence");
    let persist = PersistenceBuilder::new()
        .backend(config.storage.backend)
        .mongodb_uri(config.mongodb_uri.clone())
        .database(config.storage.database.clone())
        .audio_bucket(config.storage.audio_bucket.clone())
        .public_audio_base_url(config.public_audio_base_url())
        .build()
        .await?;

    tracing::info!(provider = ?config.llm.provider, model = %config.llm.model, "Initializing chat client");
    let llm_client = ClientFactory::create_client(config.chat_provider())?;

    let mut options = ChatOptions::new();
    if let Some(temperature) = config.llm.temperature {
        options = options.temperature(temperature);
    }
    if let Some(max_tokens) = config.llm.max_tokens {
        options = options.max_tokens(max_tokens);
    }

    let orchestrator = ChatOrchestrator::builder()
        .llm_client(llm_client)
        .persistence(Arc::clone(&persist))
        .model(config.llm.model.clone())
        .title_model(config.title_model())
        .generate_titles(config.llm.generate_titles)
        .default_system_prompt(templates::SYSTEM_INSTRUCTION)
        .options(options)
        .build()?;

    tracing::info!(stt_model = %config.stt.model, "Initializing speech clients");
    let voice = VoiceAssistant::new(
        ClientFactory::create_transcription_client(config.stt_provider())?,
        ClientFactory::create_client(config.voice_llm_provider())?,
        VoiceSettings::new(
            config.stt.model.clone(),
            config.stt.llm_model.clone(),
            templates::VOICE_SYSTEM_INSTRUCTION,
        ),
    );

    let auth = build_validator(&config.auth, &config.auth_api_key)?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(AppState::new(config, persist, orchestrator, voice, auth));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);
    tracing::info!("API docs: http://{}/api-docs/openapi.json", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
