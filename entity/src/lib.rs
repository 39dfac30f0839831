use uuid::Uuid;

pub mod ai_keys;
pub mod ai_provider;
pub mod site_settings;

/// A type alias that represents any Entity's internal id field data type.
/// Aliased so that it's easy to change the underlying type if necessary.
pub type Id = Uuid;
