use super::error::Error;
use entity::ai_keys::{ActiveModel, Column, Entity, Model};
use entity::ai_provider::AiProvider;
use entity::Id;
use log::debug;
use sea_orm::{
    entity::prelude::*,
    sea_query::NullOrdering,
    ActiveValue::{Set, Unchanged},
    DatabaseConnection, Order, QueryOrder,
};

/// Creates a new, active API key record with a clean error count.
pub async fn create(
    db: &DatabaseConnection,
    provider: AiProvider,
    encrypted_key: String,
) -> Result<Model, Error> {
    debug!("Creating {provider} API key");

    let now = chrono::Utc::now();

    let active_model = ActiveModel {
        provider: Set(provider),
        key: Set(encrypted_key),
        is_active: Set(true),
        error_count: Set(0),
        last_used: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(active_model.insert(db).await?)
}

pub async fn find_by_id(db: &DatabaseConnection, id: Id) -> Result<Option<Model>, Error> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

/// Finds the keys of one provider, healthiest first.
///
/// Ordered by error count, then by last use with never-used keys first, so repeated
/// selections rotate through equally healthy keys.
pub async fn find_by_provider(
    db: &DatabaseConnection,
    provider: AiProvider,
    active_only: bool,
) -> Result<Vec<Model>, Error> {
    let mut query = Entity::find().filter(Column::Provider.eq(provider));
    if active_only {
        query = query.filter(Column::IsActive.eq(true));
    }

    Ok(query
        .order_by_asc(Column::ErrorCount)
        .order_by_with_nulls(Column::LastUsed, Order::Asc, NullOrdering::First)
        .order_by_asc(Column::CreatedAt)
        .all(db)
        .await?)
}

/// Finds every key, newest first, optionally restricted to one provider.
pub async fn find_all(
    db: &DatabaseConnection,
    provider: Option<AiProvider>,
) -> Result<Vec<Model>, Error> {
    let mut query = Entity::find();
    if let Some(provider) = provider {
        query = query.filter(Column::Provider.eq(provider));
    }

    Ok(query.order_by_desc(Column::CreatedAt).all(db).await?)
}

/// Persists the health fields (`error_count`, `last_used`) of a key.
///
/// The write is unconditional: concurrent updates to the same key resolve as last-write-wins.
pub async fn update_health(db: &DatabaseConnection, model: &Model) -> Result<Model, Error> {
    debug!(
        "Updating health of API key {}: error_count={}, last_used={:?}",
        model.id, model.error_count, model.last_used
    );

    let active_model = ActiveModel {
        id: Unchanged(model.id),
        provider: Unchanged(model.provider),
        key: Unchanged(model.key.clone()),
        is_active: Unchanged(model.is_active),
        error_count: Set(model.error_count),
        last_used: Set(model.last_used),
        created_at: Unchanged(model.created_at),
        updated_at: Set(chrono::Utc::now().into()),
    };

    Ok(active_model.update(db).await?)
}

/// Enables or disables a key without deleting it.
pub async fn set_active(db: &DatabaseConnection, id: Id, is_active: bool) -> Result<Model, Error> {
    let existing = find_by_id(db, id).await?.ok_or_else(Error::not_found)?;

    debug!("Setting API key {id} active={is_active}");

    let mut active_model: ActiveModel = existing.into();
    active_model.is_active = Set(is_active);
    active_model.updated_at = Set(chrono::Utc::now().into());

    Ok(active_model.update(db).await?)
}

pub async fn reset_error_count(db: &DatabaseConnection, id: Id) -> Result<Model, Error> {
    let existing = find_by_id(db, id).await?.ok_or_else(Error::not_found)?;

    debug!("Resetting error count of API key {id}");

    let mut active_model: ActiveModel = existing.into();
    active_model.error_count = Set(0);
    active_model.updated_at = Set(chrono::Utc::now().into());

    Ok(active_model.update(db).await?)
}

pub async fn delete_by_id(db: &DatabaseConnection, id: Id) -> Result<(), Error> {
    let result = Entity::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::not_found());
    }

    debug!("Deleted API key {id}");
    Ok(())
}

#[cfg(test)]
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use crate::error::EntityApiErrorKind;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn test_model(provider: AiProvider, error_count: i32) -> Model {
        let now = chrono::Utc::now();
        Model {
            id: Id::new_v4(),
            provider,
            key: "ciphertext".to_string(),
            is_active: true,
            error_count,
            last_used: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn create_returns_an_active_key_with_no_errors() -> Result<(), Error> {
        let model = test_model(AiProvider::Groq, 0);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model.clone()]])
            .into_connection();

        let result = create(&db, AiProvider::Groq, "ciphertext".to_string()).await?;

        assert_eq!(result.provider, AiProvider::Groq);
        assert!(result.is_active);
        assert_eq!(result.error_count, 0);
        Ok(())
    }

    #[tokio::test]
    async fn find_by_provider_filters_and_orders_by_health() -> Result<(), Error> {
        let healthy = test_model(AiProvider::Gemini, 0);
        let flaky = test_model(AiProvider::Gemini, 3);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![healthy.clone(), flaky.clone()]])
            .into_connection();

        let result = find_by_provider(&db, AiProvider::Gemini, true).await?;
        assert_eq!(result, vec![healthy, flaky]);
        Ok(())
    }

    #[tokio::test]
    async fn find_all_returns_empty_when_no_keys_exist() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results::<Model, Vec<Model>, _>(vec![vec![]])
            .into_connection();

        let result = find_all(&db, None).await?;
        assert!(result.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn update_health_writes_error_count_and_last_used() -> Result<(), Error> {
        let mut model = test_model(AiProvider::Gemini, 1);
        model.last_used = Some(chrono::Utc::now().into());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model.clone()]])
            .into_connection();

        let result = update_health(&db, &model).await?;
        assert_eq!(result.error_count, 1);
        assert_eq!(result.last_used, model.last_used);
        Ok(())
    }

    #[tokio::test]
    async fn set_active_returns_error_when_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results::<Model, Vec<Model>, _>(vec![vec![]])
            .into_connection();

        let result = set_active(&db, Id::new_v4(), false).await;

        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordNotFound
        );
    }

    #[tokio::test]
    async fn set_active_disables_an_existing_key() -> Result<(), Error> {
        let model = test_model(AiProvider::Gemini, 0);
        let mut disabled = model.clone();
        disabled.is_active = false;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // First query: find_by_id
            .append_query_results(vec![vec![model.clone()]])
            // Second query: update result
            .append_query_results(vec![vec![disabled.clone()]])
            .into_connection();

        let result = set_active(&db, model.id, false).await?;
        assert!(!result.is_active);
        Ok(())
    }

    #[tokio::test]
    async fn reset_error_count_zeroes_the_counter() -> Result<(), Error> {
        let model = test_model(AiProvider::Groq, 7);
        let mut reset = model.clone();
        reset.error_count = 0;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model.clone()]])
            .append_query_results(vec![vec![reset.clone()]])
            .into_connection();

        let result = reset_error_count(&db, model.id).await?;
        assert_eq!(result.error_count, 0);
        Ok(())
    }

    #[tokio::test]
    async fn delete_by_id_reports_missing_rows() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let result = delete_by_id(&db, Id::new_v4()).await;
        assert_eq!(
            result.unwrap_err().error_kind,
            EntityApiErrorKind::RecordNotFound
        );
    }

    #[tokio::test]
    async fn delete_by_id_executes_delete() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        delete_by_id(&db, Id::new_v4()).await
    }
}
