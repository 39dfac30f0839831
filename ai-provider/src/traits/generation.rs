//! Text-generation provider trait.

use crate::types::generation::Request;
use crate::Error;
use async_trait::async_trait;
use secrecy::SecretString;

/// Abstraction for a hosted large-language-model text-generation API.
///
/// Implementations translate a `Request` into the provider's wire format,
/// authenticate with the key they are handed, and map every failure into
/// an `Error` variant. They never retry and never touch key health: both
/// belong to the failover executor.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait Provider: Send + Sync {
    /// Generate text for `request` using the plaintext API key `secret`.
    ///
    /// Returns the first candidate's text exactly as the provider sent it.
    /// A successful response without any text yields `Error::Empty`.
    async fn generate(&self, secret: &SecretString, request: &Request) -> Result<String, Error>;

    /// Return unique identifier for this provider (e.g., "gemini", "groq").
    ///
    /// Used in logs and attempt records. Lowercase, alphanumeric.
    fn provider_id(&self) -> &str;
}
