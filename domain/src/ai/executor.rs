//! Runs one generation request against a provider, failing over across its keys.

use super::selector::select_candidates;
use super::store::{Credential, CredentialStore};
use crate::ai_provider::AiProvider;
use crate::encryption::SecretCodec;
use crate::error::{AiErrorKind, DomainErrorKind, Error, ExternalErrorKind, InternalErrorKind};
use crate::gateway::Adapters;
use crate::Id;
use ai_provider::{AttemptErrorKind, Error as ProviderError, Provider, Request};
use log::*;
use secrecy::SecretString;
use std::sync::Arc;

/// A successful generation and the keys it took to get there.
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    pub text: String,
    pub provider: AiProvider,
    /// The key that produced `text`.
    pub credential_id: Id,
    /// Every key tried, in order, ending with `credential_id`.
    pub tried: Vec<Id>,
}

pub struct Executor {
    store: Arc<dyn CredentialStore>,
    codec: SecretCodec,
    adapters: Adapters,
}

impl Executor {
    pub fn new(store: Arc<dyn CredentialStore>, codec: SecretCodec, adapters: Adapters) -> Self {
        Self {
            store,
            codec,
            adapters,
        }
    }

    pub fn store(&self) -> &dyn CredentialStore {
        self.store.as_ref()
    }

    pub fn codec(&self) -> &SecretCodec {
        &self.codec
    }

    pub fn adapters(&self) -> &Adapters {
        &self.adapters
    }

    /// Tries the active keys of `provider` in selection order until one returns text.
    ///
    /// Each attempt is recorded on its key: a success stamps `last_used`, a failure
    /// (including an empty reply) increments `error_count`. Every key is tried at most
    /// once per call.
    pub async fn execute(
        &self,
        provider: AiProvider,
        request: &Request,
    ) -> Result<Generation, Error> {
        let adapter = self.adapter(provider)?;

        let candidates = select_candidates(self.store.as_ref(), provider).await?;
        if candidates.is_empty() {
            warn!("No active {provider} API keys available");
            return Err(Error::ai(AiErrorKind::NoCredentialsAvailable { provider }));
        }

        let mut tried = Vec::with_capacity(candidates.len());
        let mut last_error: Option<ProviderError> = None;

        for mut credential in candidates {
            tried.push(credential.id);

            match attempt(adapter.as_ref(), &self.codec, &credential, request).await {
                Ok(text) => {
                    credential.last_used = Some(chrono::Utc::now().into());
                    self.record(&credential).await;

                    info!(
                        "{provider} request succeeded with key {} after {} attempt(s)",
                        credential.id,
                        tried.len()
                    );
                    return Ok(Generation {
                        text,
                        provider,
                        credential_id: credential.id,
                        tried,
                    });
                }
                Err(err) => {
                    credential.error_count = credential.error_count.saturating_add(1);
                    self.record(&credential).await;

                    warn!(
                        "{provider} key {} failed ({}): {err}. Trying next key",
                        credential.id,
                        err.kind()
                    );
                    last_error = Some(err);
                }
            }
        }

        let last = last_error
            .as_ref()
            .map(ProviderError::kind)
            .unwrap_or(AttemptErrorKind::Unknown);
        error!(
            "All {} {provider} API keys failed, last failure: {last}",
            tried.len()
        );

        Err(Error {
            source: last_error
                .map(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
            error_kind: DomainErrorKind::External(ExternalErrorKind::Ai(
                AiErrorKind::AllCredentialsExhausted {
                    provider,
                    tried,
                    last,
                },
            )),
        })
    }

    fn adapter(&self, provider: AiProvider) -> Result<Arc<dyn Provider>, Error> {
        self.adapters.get(provider).ok_or_else(|| Error {
            source: Some(format!("no adapter registered for provider {provider}").into()),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Config),
        })
    }

    // Health writes never change the outcome of an attempt.
    async fn record(&self, credential: &Credential) {
        if let Err(e) = self.store.update(credential).await {
            error!(
                "Failed to record health of {} key {}: {e}",
                credential.provider, credential.id
            );
        }
    }
}

/// Sends `request` with one key. An answer without any non-whitespace text counts as a failure.
pub(crate) async fn attempt(
    adapter: &dyn Provider,
    codec: &SecretCodec,
    credential: &Credential,
    request: &Request,
) -> Result<String, ProviderError> {
    let secret = SecretString::new(codec.decrypt(&credential.key));

    match adapter.generate(&secret, request).await {
        Ok(text) if text.trim().is_empty() => Err(ProviderError::Empty(
            "provider returned no text".to_string(),
        )),
        result => result,
    }
}
