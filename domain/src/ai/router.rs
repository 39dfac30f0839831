use super::executor::{Executor, Generation};
use super::prompts::{build_prompt, Feature, PromptContext};
use super::settings::{DbSettingsSource, SettingsSource};
use super::store::DbCredentialStore;
use crate::encryption::SecretCodec;
use crate::error::Error;
use crate::gateway::Adapters;
use ai_provider::Request;
use log::*;
use service::AppState;
use std::sync::Arc;

/// Sends requests to whichever provider the settings currently name.
pub struct Router {
    executor: Executor,
    settings: Arc<dyn SettingsSource>,
    language: String,
}

impl Router {
    pub fn new(
        executor: Executor,
        settings: Arc<dyn SettingsSource>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            executor,
            settings,
            language: language.into(),
        }
    }

    /// Wires the database-backed store and settings, the configured codec and both
    /// provider adapters.
    pub fn from_state(app_state: &AppState) -> Result<Self, Error> {
        let config = &app_state.config;

        let executor = Executor::new(
            Arc::new(DbCredentialStore::new(app_state.db_conn())),
            SecretCodec::from_config(config)?,
            Adapters::from_config(config)?,
        );

        Ok(Self::new(
            executor,
            Arc::new(DbSettingsSource::new(app_state.db_conn())),
            config.ai_response_language(),
        ))
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    pub fn prompt_context(&self) -> PromptContext {
        PromptContext::new(self.language.clone())
    }

    /// Routes `request` to the active provider. The provider is read once per call.
    pub async fn generate(&self, request: &Request) -> Result<Generation, Error> {
        let provider = self.settings.active_provider().await;
        debug!("Routing generation request to {provider}");
        self.executor.execute(provider, request).await
    }

    /// Renders `feature` into a prompt and routes it.
    pub async fn run(&self, feature: &Feature) -> Result<Generation, Error> {
        let request = build_prompt(feature, &self.prompt_context()).into_request();
        self.generate(&request).await
    }
}
