use std::sync::Arc;

use tanya_llm::{ChatClient, ChatOptions};
use tanya_persist::PersistenceClient;

use crate::error::{ChatError, Result};
use crate::orchestrator::{ChatOrchestrator, ChatSettings};

pub struct ChatOrchestratorBuilder {
    llm: Option<Arc<dyn ChatClient>>,
    persist: Option<Arc<dyn PersistenceClient>>,
    model: Option<String>,
    title_model: Option<String>,
    generate_titles: bool,
    default_system_prompt: Option<String>,
    options: ChatOptions,
}

impl ChatOrchestratorBuilder {
    pub fn new() -> Self {
        Self {
            llm: None,
            persist: None,
            model: None,
            title_model: None,
            generate_titles: true,
            default_system_prompt: None,
            options: ChatOptions::default(),
        }
    }

    pub fn llm_client(mut self, client: Arc<dyn ChatClient>) -> Self {
        self.llm = Some(client);
        self
    }

    pub fn persistence(mut self, persist: Arc<dyn PersistenceClient>) -> Self {
        self.persist = Some(persist);
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn title_model(mut self, model: Option<String>) -> Self {
        self.title_model = model;
        self
    }

    pub fn generate_titles(mut self, enabled: bool) -> Self {
        self.generate_titles = enabled;
        self
    }

    pub fn default_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.default_system_prompt = Some(prompt.into());
        self
    }

    pub fn options(mut self, options: ChatOptions) -> Self {
        self.options = options;
        self
    }

    pub fn build(self) -> Result<ChatOrchestrator> {
        let missing = |what: &str| ChatError::Validation(format!("{} is required", what));

        let llm = self.llm.ok_or_else(|| missing("llm_client"))?;
        let persist = self.persist.ok_or_else(|| missing("persistence"))?;
        let model = self.model.ok_or_else(|| missing("model"))?;
        let default_system_prompt = self
            .default_system_prompt
            .ok_or_else(|| missing("default_system_prompt"))?;

        Ok(ChatOrchestrator::new(
            llm,
            persist,
            ChatSettings {
                model,
                title_model: self.title_model,
                generate_titles: self.generate_titles,
                default_system_prompt,
                options: self.options,
            },
        ))
    }
}

impl Default for ChatOrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
