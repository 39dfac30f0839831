//! Persistence functions for the router's tables.
//!
//! Every function takes a `&DatabaseConnection` and returns models from the `entity` crate.
//! Nothing here knows about encryption; keys are stored as the opaque strings they are given.

pub use entity::{ai_keys, ai_provider, site_settings, Id};

pub mod ai_key;
pub mod error;
pub mod site_setting;
