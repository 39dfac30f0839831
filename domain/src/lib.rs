//! Domain layer of the AI request router.
//!
//! Consumers of this crate work with `domain` types only; the re-exports below keep the
//! `entity` and `entity_api` crates an implementation detail of this layer.

// Re-exports from `entity` crate via `entity_api`
pub use entity_api::{ai_keys, ai_provider, site_settings, Id};

pub use ::ai_provider::{AttemptErrorKind, Request};

pub mod ai;
pub mod ai_key;
pub mod encryption;
pub mod error;
pub mod gateway;
