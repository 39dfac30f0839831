use super::store::{Credential, CredentialStore};
use crate::ai_provider::AiProvider;
use crate::error::Error;
use log::*;

/// Returns the active credentials of `provider` in the order they should be tried.
///
/// Fewest errors first; among equals, never-used keys first, then least recently used.
/// The sort is stable, so remaining ties keep the store's order.
pub async fn select_candidates(
    store: &dyn CredentialStore,
    provider: AiProvider,
) -> Result<Vec<Credential>, Error> {
    let mut candidates: Vec<Credential> = store
        .list(provider, true)
        .await?
        .into_iter()
        .filter(|c| c.provider == provider && c.is_active)
        .collect();

    // None sorts before Some, which puts never-used keys first
    candidates.sort_by(|a, b| {
        a.error_count
            .cmp(&b.error_count)
            .then_with(|| a.last_used.cmp(&b.last_used))
    });

    debug!(
        "Selected {} candidate {} key(s)",
        candidates.len(),
        provider
    );

    Ok(candidates)
}
