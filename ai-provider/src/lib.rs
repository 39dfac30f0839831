//! Text-generation provider abstraction.
//!
//! This crate defines the seam between the request router and concrete
//! generation services:
//! - A `Provider` trait that turns one prompt into text using one API key
//! - A provider-agnostic `Request` type
//! - An error taxonomy the failover executor uses to classify failed attempts
//!
//! Concrete adapters (Gemini, Groq) live in `domain::gateway`; the credential
//! is passed per call so one adapter instance serves every key of its provider.

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{AttemptErrorKind, Error};
pub use traits::generation::Provider;
pub use types::generation::Request;

#[cfg(feature = "mock")]
pub use traits::generation::MockProvider;
