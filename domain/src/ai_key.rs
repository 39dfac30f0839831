//! Administrative operations on stored provider keys.
//!
//! Plaintext keys only exist transiently here: they are encrypted before they reach
//! the store and only ever leave this module masked.

use crate::ai::executor::attempt;
use crate::ai::store::{Credential, CredentialStore};
use crate::ai_provider::AiProvider;
use crate::encryption::SecretCodec;
use crate::error::{DomainErrorKind, EntityErrorKind, Error, InternalErrorKind};
use crate::gateway::Adapters;
use crate::Id;
use ai_provider::{Error as ProviderError, Request};
use chrono::{DateTime, FixedOffset};
use log::*;
use serde::Serialize;

const VERIFY_PROMPT: &str = "Test connection. Reply with 'OK'.";

/// A stored key as it may be shown to an operator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaskedKey {
    pub id: Id,
    pub provider: AiProvider,
    pub masked_key: String,
    pub is_active: bool,
    pub error_count: i32,
    pub last_used: Option<DateTime<FixedOffset>>,
    pub created_at: DateTime<FixedOffset>,
}

/// Result of probing a single key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyOutcome {
    pub success: bool,
    pub message: String,
}

/// First 8 and last 4 characters of keys longer than 12 characters, `****` otherwise.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 12 {
        return "****".to_string();
    }

    let head: String = chars[..8].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

/// Encrypts and stores a new active key.
pub async fn add(
    store: &dyn CredentialStore,
    codec: &SecretCodec,
    provider: AiProvider,
    plaintext: &str,
) -> Result<MaskedKey, Error> {
    let plaintext = plaintext.trim();
    if plaintext.is_empty() {
        return Err(Error::invalid("Provider and Key are required"));
    }

    let credential = store.create(provider, codec.encrypt(plaintext)?).await?;
    info!("Added {provider} API key {}", credential.id);

    Ok(masked(codec, credential))
}

/// Every key, newest first, with its secret masked.
pub async fn list_masked(
    store: &dyn CredentialStore,
    codec: &SecretCodec,
    provider: Option<AiProvider>,
) -> Result<Vec<MaskedKey>, Error> {
    Ok(store
        .list_all(provider)
        .await?
        .into_iter()
        .map(|credential| masked(codec, credential))
        .collect())
}

pub async fn delete(store: &dyn CredentialStore, id: Id) -> Result<(), Error> {
    store.delete(id).await?;
    info!("Deleted API key {id}");
    Ok(())
}

pub async fn set_active(
    store: &dyn CredentialStore,
    codec: &SecretCodec,
    id: Id,
    is_active: bool,
) -> Result<MaskedKey, Error> {
    Ok(masked(codec, store.set_active(id, is_active).await?))
}

pub async fn reset_error_count(
    store: &dyn CredentialStore,
    codec: &SecretCodec,
    id: Id,
) -> Result<MaskedKey, Error> {
    Ok(masked(codec, store.reset_error_count(id).await?))
}

/// Sends a one-line probe with a single key and reports whether the provider answered.
///
/// The probe does not touch the key's `error_count` or `last_used`.
pub async fn verify(
    store: &dyn CredentialStore,
    codec: &SecretCodec,
    adapters: &Adapters,
    id: Id,
) -> Result<VerifyOutcome, Error> {
    let credential = store.find(id).await?.ok_or_else(|| Error {
        source: None,
        error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::NotFound)),
    })?;

    let adapter = adapters.get(credential.provider).ok_or_else(|| Error {
        source: Some(format!("no adapter registered for provider {}", credential.provider).into()),
        error_kind: DomainErrorKind::Internal(InternalErrorKind::Config),
    })?;

    let probe = Request::new(VERIFY_PROMPT);
    let outcome = match attempt(adapter.as_ref(), codec, &credential, &probe).await {
        Ok(_) => VerifyOutcome {
            success: true,
            message: "Connection successful!".to_string(),
        },
        Err(err) => VerifyOutcome {
            success: false,
            message: failure_message(credential.provider, &err),
        },
    };

    info!(
        "Verified {} API key {}: success={}",
        credential.provider, credential.id, outcome.success
    );
    Ok(outcome)
}

fn failure_message(provider: AiProvider, err: &ProviderError) -> String {
    match (provider, err) {
        (AiProvider::Gemini, ProviderError::RateLimited(_)) => {
            "Quota Exceeded (Limit Reached)".to_string()
        }
        (AiProvider::Groq, ProviderError::RateLimited(_)) => "Rate Limit Exceeded".to_string(),
        (provider, err) => format!("{} Error: {err}", provider.display_name()),
    }
}

fn masked(codec: &SecretCodec, credential: Credential) -> MaskedKey {
    MaskedKey {
        id: credential.id,
        provider: credential.provider,
        masked_key: mask_secret(&codec.decrypt(&credential.key)),
        is_active: credential.is_active,
        error_count: credential.error_count,
        last_used: credential.last_used,
        created_at: credential.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::store::memory::MemoryStore;
    use ai_provider::MockProvider;
    use secrecy::ExposeSecret;
    use std::sync::Arc;

    fn codec() -> SecretCodec {
        SecretCodec::new("admin-test-secret")
    }

    #[test]
    fn masks_long_keys_and_hides_short_ones() {
        assert_eq!(mask_secret("AIzaSyA1234567890abcd"), "AIzaSyA1...abcd");
        assert_eq!(mask_secret("123456789012"), "****");
        assert_eq!(mask_secret(""), "****");
    }

    #[tokio::test]
    async fn add_encrypts_and_lists_masked() {
        let store = MemoryStore::default();
        let codec = codec();

        let added = add(&store, &codec, AiProvider::Groq, " gsk_abcdefghijklmnop ")
            .await
            .unwrap();
        assert_eq!(added.masked_key, "gsk_abcd...mnop");
        assert!(added.is_active);
        assert_eq!(added.error_count, 0);

        let stored = store.get(added.id);
        assert_ne!(stored.key, "gsk_abcdefghijklmnop");
        assert_eq!(codec.decrypt(&stored.key), "gsk_abcdefghijklmnop");

        let listed = list_masked(&store, &codec, Some(AiProvider::Groq)).await.unwrap();
        assert_eq!(listed, vec![added]);
    }

    #[tokio::test]
    async fn add_rejects_empty_key() {
        let store = MemoryStore::default();
        let err = add(&store, &codec(), AiProvider::Gemini, "   ").await.unwrap_err();

        assert!(matches!(
            err.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Invalid(_))
        ));
    }

    #[tokio::test]
    async fn toggling_and_resetting_missing_keys_is_not_found() {
        let store = MemoryStore::default();
        let not_found =
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::NotFound));

        let err = set_active(&store, &codec(), Id::new_v4(), false).await.unwrap_err();
        assert_eq!(err.error_kind, not_found);

        let err = delete(&store, Id::new_v4()).await.unwrap_err();
        assert_eq!(err.error_kind, not_found);
    }

    #[tokio::test]
    async fn verify_reports_success_without_touching_health() {
        let store = MemoryStore::default();
        let codec = codec();
        let added = add(&store, &codec, AiProvider::Gemini, "AIzaSy-verify-key-0001")
            .await
            .unwrap();

        let mut mock = MockProvider::new();
        mock.expect_generate()
            .withf(|secret, request| {
                secret.expose_secret() == "AIzaSy-verify-key-0001"
                    && request.prompt == "Test connection. Reply with 'OK'."
            })
            .times(1)
            .returning(|_, _| Ok("OK".to_string()));
        let adapters = Adapters::new().with(AiProvider::Gemini, Arc::new(mock));

        let outcome = verify(&store, &codec, &adapters, added.id).await.unwrap();

        assert_eq!(
            outcome,
            VerifyOutcome {
                success: true,
                message: "Connection successful!".to_string()
            }
        );
        assert_eq!(store.update_count(), 0);
        assert_eq!(store.get(added.id).last_used, None);
    }

    #[tokio::test]
    async fn verify_reports_provider_specific_failures() {
        let store = MemoryStore::default();
        let codec = codec();
        let groq = add(&store, &codec, AiProvider::Groq, "gsk_rate_limited_key")
            .await
            .unwrap();

        let mut mock = MockProvider::new();
        mock.expect_generate()
            .returning(|_, _| Err(ProviderError::RateLimited("429".to_string())));
        let adapters = Adapters::new().with(AiProvider::Groq, Arc::new(mock));

        let outcome = verify(&store, &codec, &adapters, groq.id).await.unwrap();

        assert!(!outcome.success);
        assert_eq!(outcome.message, "Rate Limit Exceeded");
        assert_eq!(store.get(groq.id).error_count, 0);
    }

    #[test]
    fn other_failures_name_the_provider() {
        let message = failure_message(
            AiProvider::Gemini,
            &ProviderError::Unknown("gemini responded 400".to_string()),
        );
        assert_eq!(message, "Gemini Error: Provider error: gemini responded 400");
    }
}
