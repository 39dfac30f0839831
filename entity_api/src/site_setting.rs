use super::error::Error;
use entity::ai_provider::AiProvider;
use entity::site_settings::{ActiveModel, Column, Entity, Model};
use log::debug;
use sea_orm::{entity::prelude::*, ActiveValue::Set, DatabaseConnection, QueryOrder};

/// Returns the settings row, if one has been written yet.
pub async fn find(db: &DatabaseConnection) -> Result<Option<Model>, Error> {
    Ok(Entity::find().order_by_asc(Column::UpdatedAt).one(db).await?)
}

/// Stores the provider generation requests are routed to, creating the settings row on first use.
pub async fn set_ai_provider(db: &DatabaseConnection, provider: AiProvider) -> Result<Model, Error> {
    let now = chrono::Utc::now();

    match find(db).await? {
        Some(existing) => {
            debug!("Switching active AI provider from {} to {provider}", existing.ai_provider);

            let mut active_model: ActiveModel = existing.into();
            active_model.ai_provider = Set(provider);
            active_model.updated_at = Set(now.into());
            Ok(active_model.update(db).await?)
        }
        None => {
            debug!("Creating site settings with AI provider {provider}");

            let active_model = ActiveModel {
                ai_provider: Set(provider),
                updated_at: Set(now.into()),
                ..Default::default()
            };
            Ok(active_model.insert(db).await?)
        }
    }
}
