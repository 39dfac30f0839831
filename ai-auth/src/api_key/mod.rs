//! API key authentication for text-generation providers.
//!
//! Provides the trait and implementations for attaching a provider key to an
//! outgoing request (Gemini's `x-goog-api-key` header, Groq's Bearer token).

mod auth;
mod bearer;

pub use auth::{ApiKeyAuth, AuthMethod, ProviderAuth};
pub use bearer::BearerTokenAuth;
