//! Where the router learns which provider to send requests to.

use crate::ai_provider::AiProvider;
use crate::error::Error;
use async_trait::async_trait;
use entity_api::site_setting;
use log::*;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

#[async_trait]
pub trait SettingsSource: Send + Sync {
    /// The provider generation requests should be routed to right now.
    async fn active_provider(&self) -> AiProvider;
}

/// Reads the active provider from the `site_settings` row.
///
/// A missing row, or a failed read, routes to the default provider (Gemini).
pub struct DbSettingsSource {
    db: Arc<DatabaseConnection>,
}

impl DbSettingsSource {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Stores `provider` as the active provider.
    pub async fn set_active_provider(&self, provider: AiProvider) -> Result<AiProvider, Error> {
        let settings = site_setting::set_ai_provider(&self.db, provider).await?;
        info!("Active AI provider is now {}", settings.ai_provider);
        Ok(settings.ai_provider)
    }
}

#[async_trait]
impl SettingsSource for DbSettingsSource {
    async fn active_provider(&self) -> AiProvider {
        match site_setting::find(&self.db).await {
            Ok(Some(settings)) => settings.ai_provider,
            Ok(None) => AiProvider::default(),
            Err(e) => {
                warn!("Failed to read site settings, using default AI provider: {e}");
                AiProvider::default()
            }
        }
    }
}

/// Always routes to the same provider.
pub struct FixedProvider(pub AiProvider);

#[async_trait]
impl SettingsSource for FixedProvider {
    async fn active_provider(&self) -> AiProvider {
        self.0
    }
}
