//! Multi-provider text generation with per-key failover.
//!
//! A request flows `Router` → `Executor` → `selector` → `gateway` adapter, and every
//! attempt's outcome is written back to the `CredentialStore`.

pub mod executor;
pub mod features;
pub mod prompts;
pub mod router;
pub mod selector;
pub mod settings;
pub mod store;
pub mod structured;

pub use executor::{Executor, Generation};
pub use router::Router;
