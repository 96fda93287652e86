use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use tanya_llm::{GeminiConfig, OpenAIConfig, ProviderConfig, ProviderDetails, ProviderType};
use tanya_persist::StorageBackend;

/// Env sections, e.g. `SERVER__PORT=9000` or `LLM__MODEL=gemini-2.5-pro`
const ENV_SECTIONS: &[&str] = &["SERVER", "CORS", "STORAGE", "LLM", "STT", "AUTH", "LOGGING"];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub stt: SttConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,

    // Secrets (from ENV only)
    #[serde(default)]
    pub mongodb_uri: String,
    #[serde(default)]
    pub gemini_api_key: String,
    #[serde(default)]
    pub groq_api_key: String,
    #[serde(default)]
    pub auth_api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    /// Multipart bodies larger than this are rejected
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            request_timeout_secs: 300,
            max_upload_bytes: 25 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub enabled: bool,
    pub origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub database: String,
    pub audio_bucket: String,
    /// Empty means audio is served through the API download route
    pub public_audio_base_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Mongodb,
            database: "tanya".to_string(),
            audio_bucket: "audio".to_string(),
            public_audio_base_url: String::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: ProviderType,
    pub model: String,
    /// Empty falls back to `model`
    pub title_model: String,
    pub generate_titles: bool,
    /// Empty uses the provider's public endpoint
    pub base_url: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderType::Gemini,
            model: "gemini-2.5-flash".to_string(),
            title_model: String::new(),
            generate_titles: true,
            base_url: String::new(),
            temperature: None,
            max_tokens: None,
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SttConfig {
    pub base_url: String,
    pub model: String,
    /// Model answering transcripts on the `/stt` routes
    pub llm_model: String,
    pub timeout_secs: u64,
    pub llm_timeout_secs: u64,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            base_url: tanya_llm::openai::GROQ_API_BASE.to_string(),
            model: tanya_llm::openai::DEFAULT_STT_MODEL.to_string(),
            llm_model: "meta-llama/llama-4-maverick-17b-128e-instruct".to_string(),
            timeout_secs: 180,
            llm_timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    #[default]
    Supabase,
    Static,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub mode: AuthMode,
    /// Base URL of the managed auth provider
    pub url: String,
    pub timeout_secs: Option<u64>,
    /// token -> user id, only read in `static` mode
    pub tokens: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. Environment variables (`SERVER__PORT`, `LLM__MODEL`, ...)
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let mut builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false));

        for section in ENV_SECTIONS {
            builder = builder.add_source(
                Environment::with_prefix(section)
                    .prefix_separator("__")
                    .separator("__")
                    .keep_prefix(true)
                    .list_separator(",")
                    .with_list_parse_key("cors.origins")
                    .try_parsing(true),
            );
        }

        let mut cfg: Config = builder.build()?.try_deserialize()?;

        // Secrets never live in TOML
        cfg.mongodb_uri = std::env::var("MONGODB_URI").unwrap_or_default();
        cfg.gemini_api_key = std::env::var("GEMINI_API_KEY").unwrap_or_default();
        cfg.groq_api_key = std::env::var("GROQ_API_KEY").unwrap_or_default();
        cfg.auth_api_key = std::env::var("AUTH_API_KEY").unwrap_or_default();

        cfg.validate()?;
        Ok(cfg)
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = ConfigLoader::builder().add_source(File::from(path.as_ref()));

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Check that every secret the selected backends need is present
    pub fn validate(&self) -> Result<(), ConfigError> {
        let require = |value: &str, name: &str| {
            if value.is_empty() {
                Err(ConfigError::Message(format!(
                    "{} environment variable is required",
                    name
                )))
            } else {
                Ok(())
            }
        };

        if self.storage.backend == StorageBackend::Mongodb {
            require(&self.mongodb_uri, "MONGODB_URI")?;
        }
        match self.llm.provider {
            ProviderType::Gemini => require(&self.gemini_api_key, "GEMINI_API_KEY")?,
            ProviderType::OpenAI => require(&self.groq_api_key, "GROQ_API_KEY")?,
        }
        require(&self.groq_api_key, "GROQ_API_KEY")?;

        match self.auth.mode {
            AuthMode::Supabase => {
                if self.auth.url.is_empty() {
                    return Err(ConfigError::Message(
                        "auth.url is required in supabase mode".to_string(),
                    ));
                }
                require(&self.auth_api_key, "AUTH_API_KEY")?;
            }
            AuthMode::Static => {
                if self.auth.tokens.is_empty() {
                    tracing::warn!("Static auth has no tokens; every request will be rejected");
                }
            }
        }

        Ok(())
    }

    /// Provider config for the conversational model behind `/chat/send`
    pub fn chat_provider(&self) -> ProviderConfig {
        let base_url = non_empty(&self.llm.base_url);
        let details = match self.llm.provider {
            ProviderType::Gemini => ProviderDetails::Gemini(GeminiConfig {
                api_key: self.gemini_api_key.clone(),
                base_url,
                timeout_secs: Some(self.llm.timeout_secs),
            }),
            ProviderType::OpenAI => ProviderDetails::OpenAI(OpenAIConfig {
                api_key: self.groq_api_key.clone(),
                base_url,
                timeout_secs: Some(self.llm.timeout_secs),
            }),
        };
        ProviderConfig { details }
    }

    /// Speech-to-text endpoint
    pub fn stt_provider(&self) -> OpenAIConfig {
        OpenAIConfig::new(self.groq_api_key.clone())
            .with_base_url(self.stt.base_url.clone())
            .with_timeout_secs(self.stt.timeout_secs)
    }

    /// Chat completions on the same OpenAI-compatible host, for voice turns
    pub fn voice_llm_provider(&self) -> ProviderConfig {
        ProviderConfig {
            details: ProviderDetails::OpenAI(
                OpenAIConfig::new(self.groq_api_key.clone())
                    .with_base_url(self.stt.base_url.clone())
                    .with_timeout_secs(self.stt.llm_timeout_secs),
            ),
        }
    }

    pub fn public_audio_base_url(&self) -> Option<String> {
        non_empty(&self.storage.public_audio_base_url)
    }

    pub fn title_model(&self) -> Option<String> {
        non_empty(&self.llm.title_model)
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
