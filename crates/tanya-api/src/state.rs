use std::sync::Arc;

use tanya_chat::{ChatOrchestrator, VoiceAssistant};
use tanya_persist::PersistenceClient;

use crate::auth::SessionValidator;
use crate::config::Config;

/// Shared application state passed to all handlers
///
/// Every handle is built once at startup; handlers only clone `Arc`s.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub persist: Arc<dyn PersistenceClient>,
    pub orchestrator: Arc<ChatOrchestrator>,
    pub voice: Arc<VoiceAssistant>,
    pub auth: Arc<dyn SessionValidator>,
}

impl AppState {
    pub fn new(
        config: Config,
        persist: Arc<dyn PersistenceClient>,
        orchestrator: ChatOrchestrator,
        voice: VoiceAssistant,
        auth: Arc<dyn SessionValidator>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            persist,
            orchestrator: Arc::new(orchestrator),
            voice: Arc::new(voice),
            auth,
        }
    }
}
