//! Credential persistence seen from the router.
//!
//! The executor and the admin operations only talk to a `CredentialStore`, so the
//! failover logic runs the same against Postgres and the in-memory store used in tests.

use crate::error::Error;
use crate::{ai_keys, ai_provider::AiProvider, Id};
use async_trait::async_trait;
use entity_api::ai_key;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// A stored API key together with its health metadata. `key` holds the encrypted secret.
pub type Credential = ai_keys::Model;

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Keys of one provider, optionally restricted to active ones.
    async fn list(&self, provider: AiProvider, active_only: bool)
        -> Result<Vec<Credential>, Error>;

    /// Every key, newest first, optionally restricted to one provider.
    async fn list_all(&self, provider: Option<AiProvider>) -> Result<Vec<Credential>, Error>;

    async fn find(&self, id: Id) -> Result<Option<Credential>, Error>;

    /// Persists `error_count` and `last_used` of `credential`. Last write wins.
    async fn update(&self, credential: &Credential) -> Result<Credential, Error>;

    async fn create(&self, provider: AiProvider, encrypted_key: String)
        -> Result<Credential, Error>;

    async fn delete(&self, id: Id) -> Result<(), Error>;

    async fn set_active(&self, id: Id, is_active: bool) -> Result<Credential, Error>;

    async fn reset_error_count(&self, id: Id) -> Result<Credential, Error>;
}

/// `CredentialStore` backed by the `ai_keys` table.
#[derive(Clone)]
pub struct DbCredentialStore {
    db: Arc<DatabaseConnection>,
}

impl DbCredentialStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CredentialStore for DbCredentialStore {
    async fn list(
        &self,
        provider: AiProvider,
        active_only: bool,
    ) -> Result<Vec<Credential>, Error> {
        Ok(ai_key::find_by_provider(&self.db, provider, active_only).await?)
    }

    async fn list_all(&self, provider: Option<AiProvider>) -> Result<Vec<Credential>, Error> {
        Ok(ai_key::find_all(&self.db, provider).await?)
    }

    async fn find(&self, id: Id) -> Result<Option<Credential>, Error> {
        Ok(ai_key::find_by_id(&self.db, id).await?)
    }

    async fn update(&self, credential: &Credential) -> Result<Credential, Error> {
        Ok(ai_key::update_health(&self.db, credential).await?)
    }

    async fn create(
        &self,
        provider: AiProvider,
        encrypted_key: String,
    ) -> Result<Credential, Error> {
        Ok(ai_key::create(&self.db, provider, encrypted_key).await?)
    }

    async fn delete(&self, id: Id) -> Result<(), Error> {
        Ok(ai_key::delete_by_id(&self.db, id).await?)
    }

    async fn set_active(&self, id: Id, is_active: bool) -> Result<Credential, Error> {
        Ok(ai_key::set_active(&self.db, id, is_active).await?)
    }

    async fn reset_error_count(&self, id: Id) -> Result<Credential, Error> {
        Ok(ai_key::reset_error_count(&self.db, id).await?)
    }
}
