//! # ai-auth
//!
//! Request authentication and HTTP client construction for text-generation providers:
//! - API key header and Bearer token authentication applied per request
//! - HTTP client building with a mandatory, finite timeout
//!
//! ## Architecture
//!
//! Provider adapters in `domain::gateway` build one client per provider and
//! authenticate each request with whichever key the failover executor is
//! currently trying, so a single client serves every key of a provider.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ai_auth::{
//!     api_key::{ApiKeyAuth, ProviderAuth},
//!     http::HttpClientBuilder,
//! };
//! ```

pub mod api_key;
pub mod error;
pub mod http;

// Re-export commonly used types
pub use error::{Error, ErrorKind};
pub use secrecy::{ExposeSecret, SecretString};
